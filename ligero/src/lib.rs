//! Ligero-style polynomial commitment over a Reed-Solomon encoded witness tableau, per
//! spec.md §4.7: the witness is laid out as an `m x k` matrix, each row independently
//! Reed-Solomon encoded to `n = k << rate_bits`, and columns are Merkle-committed. A
//! [`LinearClaim`] (`sum k_i w_i = b`) or [`QuadraticClaim`] (`z = x * y` on designated triple
//! rows) is discharged by sending a random row-combination "response" plus a shared batch of
//! `Q` random column openings the verifier checks for Merkle authenticity, response consistency,
//! and (for quadratic claims) the Hadamard relation on the raw revealed entries.

pub mod claim;
pub mod eq;
pub mod error;
pub mod merkle;
pub mod proof;
pub mod tableau;

pub use claim::{blinding_row, LinearClaim, QuadraticClaim};
pub use error::LigeroError;
pub use merkle::{MerklePath, MerkleTree};
pub use proof::{ColumnOpening, LigeroProof};
pub use tableau::{EncodedTableau, LigeroParam};

use longfellow_field::types::{Field, Sample, TwoAdicField};
use longfellow_transcript::{Tag, Transcript};

/// A single Merkle root over the tableau's encoded columns — the object absorbed into the
/// transcript and checked by every subsequent opening.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LigeroCommitment(pub [u8; 32]);

/// Reed-Solomon encodes `rows` and builds the column Merkle tree, per spec.md §4.7. `rows` is
/// expected to already include any blinding rows the caller wants committed alongside the real
/// witness (see [`blinding_row`]) — this crate doesn't decide how many claims need blinding or
/// which rows back them; that is a property of the claims the caller builds against the
/// returned tableau.
pub fn commit<F: TwoAdicField>(rows: Vec<Vec<F>>, param: &LigeroParam) -> (EncodedTableau<F>, LigeroCommitment) {
    let tableau = EncodedTableau::build(rows, param.rate_bits);
    let commitment = LigeroCommitment(tableau.tree.root());
    (tableau, commitment)
}

/// Proves `linear_claims` and `quadratic_claims` against `tableau`, per spec.md §4.7/§4.8:
/// absorbs the commitment root, computes every claim's response, squeezes the shared column-query
/// subset, and opens it.
pub fn prove<F: TwoAdicField + Sample>(
    transcript: &mut Transcript,
    tableau: &EncodedTableau<F>,
    param: &LigeroParam,
    linear_claims: &[LinearClaim<F>],
    quadratic_claims: &[QuadraticClaim],
) -> LigeroProof<F> {
    transcript.absorb(Tag::Commitment, &tableau.tree.root());

    let linear_responses: Vec<Vec<F>> = linear_claims.iter().map(|c| c.response(&tableau.rows)).collect();

    let quadratic_responses: Vec<(Vec<F>, Vec<F>, Vec<F>)> = quadratic_claims
        .iter()
        .map(|q| {
            let lambda: Vec<F> = transcript.squeeze_field(q.len()).expect("transcript squeeze");
            let ux = claim::combine(&tableau.rows, &q.x_rows, &lambda);
            let uy = claim::combine(&tableau.rows, &q.y_rows, &lambda);
            let uz = claim::combine(&tableau.rows, &q.z_rows, &lambda);
            (ux, uy, uz)
        })
        .collect();

    let n = tableau.codewords.first().map(Vec::len).unwrap_or(0);
    let indices = transcript
        .squeeze_distinct_indices(n, param.num_queries.min(n))
        .expect("transcript squeeze");
    let openings = indices
        .into_iter()
        .map(|idx| ColumnOpening { index: idx, column: tableau.column(idx), path: tableau.tree.open(idx) })
        .collect();

    LigeroProof { linear_responses, quadratic_responses, openings }
}

/// Verifies a [`LigeroProof`] against `commitment`, per spec.md §4.7/§7: never trusts the
/// prover's response vectors without checking them against the committed codewords at every
/// opened column, and never panics on malformed input.
pub fn verify<F: TwoAdicField>(
    transcript: &mut Transcript,
    commitment: &LigeroCommitment,
    param: &LigeroParam,
    linear_claims: &[LinearClaim<F>],
    quadratic_claims: &[QuadraticClaim],
    proof: &LigeroProof<F>,
) -> Result<(), LigeroError> {
    transcript.absorb(Tag::Commitment, &commitment.0);

    if proof.linear_responses.len() != linear_claims.len() {
        return Err(LigeroError::ResponseCountMismatch {
            got: proof.linear_responses.len(),
            want: linear_claims.len(),
        });
    }
    if proof.quadratic_responses.len() != quadratic_claims.len() {
        return Err(LigeroError::ResponseCountMismatch {
            got: proof.quadratic_responses.len(),
            want: quadratic_claims.len(),
        });
    }

    for (claim_idx, (claim, response)) in linear_claims.iter().zip(&proof.linear_responses).enumerate() {
        if claim.value_of(response) != claim.target {
            return Err(LigeroError::ValueCheck { claim: claim_idx });
        }
    }

    let mut quadratic_lambdas = Vec::with_capacity(quadratic_claims.len());
    for q in quadratic_claims {
        quadratic_lambdas.push(transcript.squeeze_field::<F>(q.len())?);
    }

    let n = param.encoded_width();
    let indices: Vec<usize> = transcript.squeeze_distinct_indices(n, param.num_queries.min(n))?;
    if indices.len() != proof.openings.len() {
        return Err(LigeroError::ResponseCountMismatch { got: proof.openings.len(), want: indices.len() });
    }

    for (&expected_index, opening) in indices.iter().zip(&proof.openings) {
        if opening.index != expected_index {
            return Err(LigeroError::MerkleMismatch { index: opening.index });
        }
        let leaf_bytes: Vec<Vec<u8>> = opening.column.iter().map(Field::to_bytes).collect();
        let leaf = merkle::leaf_hash(&leaf_bytes);
        if !opening.path.verify(commitment.0, opening.index, leaf) {
            return Err(LigeroError::MerkleMismatch { index: opening.index });
        }

        for (claim_idx, (claim, response)) in linear_claims.iter().zip(&proof.linear_responses).enumerate() {
            let lhs: F = claim
                .row_weights
                .iter()
                .enumerate()
                .fold(F::ZERO, |acc, (r, &w)| acc + w * opening.column[r]);
            let rhs = tableau::encode_row(response, param.rate_bits)[opening.index];
            if lhs != rhs {
                return Err(LigeroError::ColumnConsistency { index: opening.index, claim: claim_idx });
            }
        }

        for (claim_idx, ((q, (ux, uy, uz)), lambda)) in
            quadratic_claims.iter().zip(&proof.quadratic_responses).zip(&quadratic_lambdas).enumerate()
        {
            for (rows, response) in [(&q.x_rows, ux), (&q.y_rows, uy), (&q.z_rows, uz)] {
                let lhs: F = rows.iter().zip(lambda).fold(F::ZERO, |acc, (&r, &w)| acc + w * opening.column[r]);
                let rhs = tableau::encode_row(response, param.rate_bits)[opening.index];
                if lhs != rhs {
                    return Err(LigeroError::ColumnConsistency { index: opening.index, claim: claim_idx });
                }
            }

            let hadamard: F = (0..q.len()).fold(F::ZERO, |acc, i| {
                let x = opening.column[q.x_rows[i]];
                let y = opening.column[q.y_rows[i]];
                let z = opening.column[q.z_rows[i]];
                acc + lambda[i] * (x * y - z)
            });
            if hadamard.is_nonzero() {
                return Err(LigeroError::QuadraticMismatch { claim: claim_idx, index: opening.index });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use longfellow_field::fp128::Fp128;
    use longfellow_field::types::Sample;

    use super::*;
    use crate::claim::combine;

    fn param() -> LigeroParam {
        LigeroParam { m: 4, k: 4, rate_bits: 2, num_queries: 12 }
    }

    #[test]
    fn proves_and_verifies_a_linear_claim() {
        let param = param();
        let rows: Vec<Vec<Fp128>> = (0..param.m).map(|_| Fp128::rand_vec(param.k)).collect();
        let (tableau, commitment) = commit(rows.clone(), &param);

        let row_weights = Fp128::rand_vec(param.m);
        let col_weights = Fp128::rand_vec(param.k);
        let u = combine(&rows, &(0..param.m).collect::<Vec<_>>(), &row_weights);
        let target = col_weights.iter().zip(&u).fold(Fp128::ZERO, |acc, (&c, &v)| acc + c * v);
        let claims = [LinearClaim { row_weights, col_weights, target }];

        let mut pt = Transcript::new(b"ligero-linear");
        let proof = prove(&mut pt, &tableau, &param, &claims, &[]);

        let mut vt = Transcript::new(b"ligero-linear");
        verify(&mut vt, &commitment, &param, &claims, &[], &proof).unwrap();
    }

    #[test]
    fn rejects_a_tampered_linear_response() {
        let param = param();
        let rows: Vec<Vec<Fp128>> = (0..param.m).map(|_| Fp128::rand_vec(param.k)).collect();
        let (tableau, commitment) = commit(rows.clone(), &param);

        let row_weights = Fp128::rand_vec(param.m);
        let col_weights = Fp128::rand_vec(param.k);
        let u = combine(&rows, &(0..param.m).collect::<Vec<_>>(), &row_weights);
        let target = col_weights.iter().zip(&u).fold(Fp128::ZERO, |acc, (&c, &v)| acc + c * v);
        let claims = [LinearClaim { row_weights, col_weights, target }];

        let mut pt = Transcript::new(b"ligero-tamper");
        let mut proof = prove(&mut pt, &tableau, &param, &claims, &[]);
        proof.linear_responses[0][0] += Fp128::ONE;

        let mut vt = Transcript::new(b"ligero-tamper");
        assert!(verify(&mut vt, &commitment, &param, &claims, &[], &proof).is_err());
    }

    #[test]
    fn blinded_claim_still_verifies_and_masks_the_response() {
        let param = LigeroParam { m: 3, k: 4, rate_bits: 2, num_queries: 12 };
        let witness: Vec<Vec<Fp128>> = (0..2).map(|_| Fp128::rand_vec(param.k)).collect();
        let col_weights = Fp128::rand_vec(param.k);
        let blind = blinding_row(&col_weights);
        let rows = vec![witness[0].clone(), witness[1].clone(), blind];
        let (tableau, commitment) = commit(rows.clone(), &param);

        let row_weights = vec![Fp128::ONE, Fp128::ONE, Fp128::ONE];
        let u_unblinded = combine(&rows[..2], &[0, 1], &vec![Fp128::ONE, Fp128::ONE]);
        let target = col_weights.iter().zip(&u_unblinded).fold(Fp128::ZERO, |acc, (&c, &v)| acc + c * v);
        let claims = [LinearClaim { row_weights, col_weights, target }];

        let mut pt = Transcript::new(b"ligero-blind");
        let proof = prove(&mut pt, &tableau, &param, &claims, &[]);
        assert_ne!(proof.linear_responses[0], u_unblinded);

        let mut vt = Transcript::new(b"ligero-blind");
        verify(&mut vt, &commitment, &param, &claims, &[], &proof).unwrap();
    }

    #[test]
    fn proves_and_verifies_a_quadratic_claim() {
        let param = LigeroParam { m: 6, k: 4, rate_bits: 2, num_queries: 12 };
        let xs: Vec<Vec<Fp128>> = (0..2).map(|_| Fp128::rand_vec(param.k)).collect();
        let ys: Vec<Vec<Fp128>> = (0..2).map(|_| Fp128::rand_vec(param.k)).collect();
        let zs: Vec<Vec<Fp128>> =
            xs.iter().zip(&ys).map(|(x, y)| x.iter().zip(y).map(|(&a, &b)| a * b).collect()).collect();
        let rows = vec![xs[0].clone(), xs[1].clone(), ys[0].clone(), ys[1].clone(), zs[0].clone(), zs[1].clone()];
        let (tableau, commitment) = commit(rows, &param);

        let quad = QuadraticClaim { x_rows: vec![0, 1], y_rows: vec![2, 3], z_rows: vec![4, 5] };

        let mut pt = Transcript::new(b"ligero-quad");
        let proof = prove(&mut pt, &tableau, &param, &[], std::slice::from_ref(&quad));

        let mut vt = Transcript::new(b"ligero-quad");
        verify(&mut vt, &commitment, &param, &[], std::slice::from_ref(&quad), &proof).unwrap();
    }

    /// spec.md §8 scenario 6, at the scale `ZkSpec`'s deployed `mdoc` table entries actually use:
    /// `rate_bits: 2, num_queries: 80` (see `longfellow_zk::spec`), here with an encoded width of
    /// `128 << 2 = 512` columns so 80 distinct queries are comfortably available.
    #[test]
    fn proves_and_verifies_a_linear_claim_at_deployed_query_scale() {
        let param = LigeroParam { m: 8, k: 128, rate_bits: 2, num_queries: 80 };
        let rows: Vec<Vec<Fp128>> = (0..param.m).map(|_| Fp128::rand_vec(param.k)).collect();
        let (tableau, commitment) = commit(rows.clone(), &param);

        let row_weights = Fp128::rand_vec(param.m);
        let col_weights = Fp128::rand_vec(param.k);
        let u = combine(&rows, &(0..param.m).collect::<Vec<_>>(), &row_weights);
        let target = col_weights.iter().zip(&u).fold(Fp128::ZERO, |acc, (&c, &v)| acc + c * v);
        let claims = [LinearClaim { row_weights, col_weights, target }];

        let mut pt = Transcript::new(b"ligero-deployed-scale");
        let proof = prove(&mut pt, &tableau, &param, &claims, &[]);
        assert_eq!(proof.openings.len(), 80);

        let mut vt = Transcript::new(b"ligero-deployed-scale");
        verify(&mut vt, &commitment, &param, &claims, &[], &proof).unwrap();
    }

    #[test]
    fn rejects_a_quadratic_claim_with_a_broken_triple() {
        let param = LigeroParam { m: 3, k: 4, rate_bits: 2, num_queries: 12 };
        let x = Fp128::rand_vec(param.k);
        let y = Fp128::rand_vec(param.k);
        let mut z: Vec<Fp128> = x.iter().zip(&y).map(|(&a, &b)| a * b).collect();
        z[0] += Fp128::ONE;
        let rows = vec![x, y, z];
        let (tableau, commitment) = commit(rows, &param);

        let quad = QuadraticClaim { x_rows: vec![0], y_rows: vec![1], z_rows: vec![2] };

        let mut pt = Transcript::new(b"ligero-quad-broken");
        let proof = prove(&mut pt, &tableau, &param, &[], std::slice::from_ref(&quad));

        let mut vt = Transcript::new(b"ligero-quad-broken");
        assert!(verify(&mut vt, &commitment, &param, &[], std::slice::from_ref(&quad), &proof).is_err());
    }
}
