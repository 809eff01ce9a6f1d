//! One phase of a layer's sumcheck: `nvars` rounds reducing a claim `claim = sum_i a[i] * b[i]`
//! over two dense boolean-indexed arrays to a single challenge point, per spec.md §4.6. Every
//! phase (copy bits, left/`h0` hand, right/`h1` hand) is exactly this, differing only in what
//! `a` and `b` are.

use longfellow_field::types::Field;
use longfellow_transcript::{Tag, Transcript};

use crate::eq::{fold_in_place, lagrange3_eval};
use crate::error::SumcheckError;

/// Runs the prover's side of a phase: computes each round's degree-2 polynomial (Lagrange form
/// over `{0, 1, 2}`), absorbs it into the transcript, and folds both arrays by the squeezed
/// challenge. Returns the round polynomials, the challenge point, and the two arrays' final
/// (length-1) values.
pub fn prove_phase<F: Field>(transcript: &mut Transcript, mut a: Vec<F>, mut b: Vec<F>) -> (Vec<[F; 3]>, Vec<F>, F, F) {
    assert_eq!(a.len(), b.len(), "phase arrays must have equal length");
    assert!(a.len().is_power_of_two(), "phase arrays must have power-of-two length");
    let nvars = a.len().trailing_zeros() as usize;

    let mut rounds = Vec::with_capacity(nvars);
    let mut challenges = Vec::with_capacity(nvars);
    for _ in 0..nvars {
        let half = a.len() / 2;
        let mut p = [F::ZERO; 3];
        for (x, slot) in p.iter_mut().enumerate() {
            let xf = F::from_canonical_u64(x as u64);
            let mut sum = F::ZERO;
            for i in 0..half {
                let ai = a[i] + xf * (a[half + i] - a[i]);
                let bi = b[i] + xf * (b[half + i] - b[i]);
                sum += ai * bi;
            }
            *slot = sum;
        }
        absorb_round(transcript, &p);
        let r: F = transcript
            .squeeze_field(1)
            .expect("field squeeze only fails after exhausting an astronomically unlikely rejection bound")[0];
        fold_in_place(&mut a, r);
        fold_in_place(&mut b, r);
        rounds.push(p);
        challenges.push(r);
    }
    (rounds, challenges, a[0], b[0])
}

/// Runs the verifier's side of a phase: checks each round's `p(0) + p(1)` against the running
/// claim, absorbs/squeezes in lockstep with the prover, and folds the claim forward via
/// Lagrange evaluation at the challenge. Returns the challenge point and the claim carried out
/// of the phase (which the caller checks against `a_final * b_final` using whatever `a_final`,
/// `b_final` it can independently obtain or trust).
pub fn verify_phase<F: Field>(
    transcript: &mut Transcript,
    layer: usize,
    nvars: usize,
    mut claim: F,
    rounds: &[[F; 3]],
) -> Result<(Vec<F>, F), SumcheckError> {
    if rounds.len() != nvars {
        return Err(SumcheckError::WrongRoundCount { layer, expected: nvars, found: rounds.len() });
    }
    let mut challenges = Vec::with_capacity(nvars);
    for (round, p) in rounds.iter().enumerate() {
        let sum01 = p[0] + p[1];
        if sum01 != claim {
            return Err(SumcheckError::RoundMismatch {
                layer,
                round,
                got: sum01.to_string(),
                want: claim.to_string(),
            });
        }
        absorb_round(transcript, p);
        let r: F = transcript.squeeze_field(1)?[0];
        claim = lagrange3_eval(p, r);
        challenges.push(r);
    }
    Ok((challenges, claim))
}

fn absorb_round<F: Field>(transcript: &mut Transcript, p: &[F; 3]) {
    let mut bytes = Vec::with_capacity(3 * F::BYTES);
    for &v in p {
        bytes.extend_from_slice(&v.to_bytes());
    }
    transcript.absorb(Tag::Round, &bytes);
}
