//! Drives the layer-by-layer sumcheck, per spec.md §4.6, producing one [`LayerProof`] per layer
//! and the two final claims about the base/input layer that the Ligero commitment must
//! discharge.

use longfellow_circuit::Circuit;
use longfellow_field::types::{Field, Sample};
use longfellow_maybe_rayon::*;
use longfellow_transcript::{Tag, Transcript};

use crate::eq::{eq_eval, eq_table};
use crate::phase::prove_phase;
use crate::proof::{LayerProof, SumcheckProof};
use crate::quad::Quad;
use crate::util::{log2_ceil, pad_to_pow2};

/// The two wire claims and the copy-point the sumcheck reduces each layer's combined claim down
/// to — at the base layer these describe the witness-dependent linear forms Ligero must open.
#[derive(Clone, Debug)]
pub struct ReducedClaims<F: Field> {
    pub g0: Vec<F>,
    pub claim0: F,
    pub g1: Vec<F>,
    pub claim1: F,
    pub q: Vec<F>,
}

/// Proves that every copy's witness satisfies the circuit (every output wire zero), for `nc`
/// copies sharing one circuit. `witness_per_copy[c]` is copy `c`'s full input vector (length
/// `circuit.ninputs`), already checked (by the caller, via [`Circuit::check_witness`]) to
/// satisfy the circuit.
pub fn prove<F: Field + Sample>(
    transcript: &mut Transcript,
    circuit: &Circuit<F>,
    witness_per_copy: &[Vec<F>],
) -> (SumcheckProof<F>, ReducedClaims<F>) {
    let nc = witness_per_copy.len();
    assert!(nc > 0, "sumcheck requires at least one copy");
    let logc = log2_ceil(nc);
    log::debug!("sumcheck: proving {} layers over {nc} copies", circuit.layers.len());

    // Per-copy, per-layer wire values, deepest layer (the base) last — see
    // `Circuit::evaluate_all_layers`.
    let levels_per_copy: Vec<Vec<Vec<F>>> = witness_per_copy
        .par_iter()
        .map(|w| circuit.evaluate_all_layers(w).expect("witness already checked to satisfy the circuit"))
        .collect();

    let logw0 = circuit.layers[0].log_output_width() as usize;
    let g_init: Vec<F> = transcript.squeeze_field(logw0).expect("transcript squeeze");
    let q_init: Vec<F> = transcript.squeeze_field(logc).expect("transcript squeeze");

    let mut g0 = g_init.clone();
    let mut claim0 = F::ZERO;
    let mut g1 = g_init;
    let mut claim1 = F::ZERO;
    let mut q = q_init;

    let mut layer_proofs = Vec::with_capacity(circuit.layers.len());

    for (layer_idx, layer) in circuit.layers.iter().enumerate() {
        transcript.absorb(Tag::LayerBegin, &(layer_idx as u64).to_le_bytes());
        let alpha: F = transcript.squeeze_field(1).expect("transcript squeeze")[0];
        let beta: F = transcript.squeeze_field(1).expect("transcript squeeze")[0];
        let target = alpha * claim0 + beta * claim1;

        let quad = Quad::from_layer(layer, &circuit.consts, &g0, &g1, alpha, beta);
        let logw_in = layer.log_input_width() as usize;
        let nw_in = 1usize << logw_in;

        let copies_padded: Vec<Vec<F>> = levels_per_copy
            .iter()
            .map(|levels| pad_to_pow2(&levels[layer_idx + 1], nw_in))
            .collect();

        let (copy_rounds, copy_mid, rho, m) = if logc == 0 {
            (Vec::new(), target, Vec::new(), copies_padded[0].clone())
        } else {
            let eq_q = eq_table(&q);
            let a0: Vec<F> = (0..(1usize << logc))
                .map(|c| {
                    if c < nc {
                        quad.terms.iter().fold(F::ZERO, |acc, &(h0, h1, coeff)| {
                            acc + coeff * copies_padded[c][h0 as usize] * copies_padded[c][h1 as usize]
                        })
                    } else {
                        F::ZERO
                    }
                })
                .collect();
            let (copy_rounds, rho, _eq_final, a0_final) = prove_phase(transcript, eq_q, a0);
            debug_assert_eq!(eq_eval(&q, &rho), _eq_final);

            let eq_rho = eq_table(&rho);
            let mut m = vec![F::ZERO; nw_in];
            for (c, copy) in copies_padded.iter().enumerate() {
                let w = eq_rho[c];
                for (slot, &value) in m.iter_mut().zip(copy.iter()) {
                    *slot += w * value;
                }
            }
            (copy_rounds, a0_final, rho, m)
        };

        let f1 = quad.fold_against_witness_h1(&m, nw_in);
        let (left_rounds, rx, wc0, mid_claim) = prove_phase(transcript, m.clone(), f1);

        let g1_table = quad.fold_at_rx_h1(&rx, nw_in);
        let (right_rounds, ry, wc1, _g1_final) = prove_phase(transcript, m, g1_table);

        layer_proofs.push(LayerProof {
            copy_rounds,
            copy_mid,
            left_rounds,
            mid_claim,
            right_rounds,
            wc0,
            wc1,
        });

        g0 = rx;
        claim0 = wc0;
        g1 = ry;
        claim1 = wc1;
        q = rho;
    }

    (
        SumcheckProof { layers: layer_proofs },
        ReducedClaims { g0, claim0, g1, claim1, q },
    )
}
