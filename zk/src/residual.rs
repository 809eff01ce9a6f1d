//! Translates the sumcheck's two final input-layer claims into the `LinearClaim` tensor shape
//! Ligero expects, per spec.md §4.8: "the verifier must independently compute the two final
//! input-layer linear forms (EQ over copy bits times Lagrange-basis wire reconstruction) and
//! supply them as the linear claims to Ligero." Both [`crate::api::prove`] and
//! [`crate::api::verify`] call [`setup_residuals`] so they build byte-identical claims.

use longfellow_circuit::{BaseSource, Circuit};
use longfellow_field::types::{Field, Sample};
use longfellow_ligero::{blinding_row, LinearClaim};
use longfellow_sumcheck::eq::eq_table;
use longfellow_sumcheck::ReducedClaims;

/// Splits a base-layer evaluation point's `EQ` weight between the public inputs/constants
/// (folded directly into `target`) and the private witness columns actually committed to Ligero
/// (`col_weights`, indexed by private-input position, zero-padded to a power of two).
pub fn base_layer_coeffs<F: Field>(circuit: &Circuit<F>, g: &[F], public_inputs: &[F]) -> (Vec<F>, F) {
    let npriv = circuit.ninputs - circuit.npub_in;
    let k_pad = npriv.max(1).next_power_of_two();
    let eq_g = eq_table(g);
    let mut col_weights = vec![F::ZERO; k_pad];
    let mut offset = F::ZERO;
    for (h, &source) in circuit.base.iter().enumerate() {
        let w = eq_g[h];
        match source {
            BaseSource::Const(k) => offset += w * circuit.consts[k as usize],
            BaseSource::Input(i) if (i as usize) < circuit.npub_in => offset += w * public_inputs[i as usize],
            BaseSource::Input(i) => col_weights[i as usize - circuit.npub_in] += w,
        }
    }
    (col_weights, offset)
}

/// Both residual claims' shared tensor inputs: one row-weight vector (the copy-point `EQ` table,
/// common to both claims), and each claim's own column weights/target.
pub struct ResidualSetup<F: Field> {
    pub row_weights: Vec<F>,
    pub col0: Vec<F>,
    pub target0: F,
    pub col1: Vec<F>,
    pub target1: F,
    pub k_pad: usize,
    pub m_pad: usize,
}

/// Computes both residual claims' tensor coordinates from a sumcheck run's [`ReducedClaims`].
/// Deterministic given `circuit`/`public_inputs`/`reduced`, so prover and verifier (who compute
/// `reduced` independently, the prover by running the real sumcheck, the verifier by running
/// [`longfellow_sumcheck::verify`]) always agree.
pub fn setup_residuals<F: Field>(
    circuit: &Circuit<F>,
    public_inputs: &[F],
    reduced: &ReducedClaims<F>,
) -> ResidualSetup<F> {
    let row_weights = eq_table(&reduced.q);
    let m_pad = row_weights.len();
    let (col0, offset0) = base_layer_coeffs(circuit, &reduced.g0, public_inputs);
    let (col1, offset1) = base_layer_coeffs(circuit, &reduced.g1, public_inputs);
    let k_pad = col0.len();

    ResidualSetup {
        row_weights,
        col0,
        target0: reduced.claim0 - offset0,
        col1,
        target1: reduced.claim1 - offset1,
        k_pad,
        m_pad,
    }
}

/// Builds one of the two `LinearClaim`s the zk driver discharges via Ligero: the shared
/// copy-point row weights, extended with two trailing blinding-row slots, one per claim — this
/// claim gets weight `1` at its own blinding row and `0` at the other claim's.
pub fn residual_claim<F: Field>(setup: &ResidualSetup<F>, claim_index: usize, col_weights: Vec<F>, target: F) -> LinearClaim<F> {
    let mut weights = setup.row_weights.clone();
    weights.push(if claim_index == 0 { F::ONE } else { F::ZERO });
    weights.push(if claim_index == 1 { F::ONE } else { F::ZERO });
    LinearClaim { row_weights: weights, col_weights, target }
}

/// Samples a fresh blinding row orthogonal to `col_weights`, per spec.md §4.7's zero-knowledge
/// requirement.
pub fn sample_blind<F: Field + Sample>(col_weights: &[F]) -> Vec<F> {
    blinding_row(col_weights)
}
