//! The two claim shapes Ligero discharges against a committed tableau, per spec.md §4.7:
//! a **linear claim** (`sum_i k_i * w_i = b`) and a **quadratic claim** (`z_j = x_j * y_j` for a
//! batch of committed triple rows). Both reduce to the same primitive — a random row combination
//! ("response") checked against the committed codewords at a shared set of opened columns — with
//! the quadratic claim adding a pointwise Hadamard check on the raw opened entries.

use longfellow_field::types::{Field, Sample};

/// `sum_r row_weights[r] * col_weights[c] * tableau[r][c] == target`, i.e. the coefficient
/// matrix is the outer product `row_weights (x) col_weights`. This is the shape every claim
/// this crate needs reduces to: spec.md §4.8's two final sumcheck claims split as `EQ(q, copy)`
/// (row weights, one per tableau row/copy) times `EQ(g, wire)` restricted to input wires (column
/// weights).
#[derive(Clone, Debug)]
pub struct LinearClaim<F: Field> {
    pub row_weights: Vec<F>,
    pub col_weights: Vec<F>,
    pub target: F,
}

impl<F: Field> LinearClaim<F> {
    /// The prover's response: `u[c] = sum_r row_weights[r] * rows[r][c]`, a single message-space
    /// row of the same width as every committed row. Sent in the clear; the verifier checks (a)
    /// it is consistent with the committed codewords at every opened column, and (b)
    /// `col_weights . u == target`.
    pub fn response(&self, rows: &[Vec<F>]) -> Vec<F> {
        combine(rows, &row_indices(self.row_weights.len()), &self.row_weights)
    }

    /// `col_weights . u`, the value check a verifier runs against a received response.
    pub fn value_of(&self, response: &[F]) -> F {
        self.col_weights.iter().zip(response).fold(F::ZERO, |acc, (&c, &v)| acc + c * v)
    }
}

/// A batch of `n` committed triple-rows `(x_j, y_j, z_j)` that must satisfy `z_j = x_j * y_j`
/// entrywise, per spec.md §4.7. `x_rows[i]`/`y_rows[i]`/`z_rows[i]` are tableau row indices.
#[derive(Clone, Debug)]
pub struct QuadraticClaim {
    pub x_rows: Vec<usize>,
    pub y_rows: Vec<usize>,
    pub z_rows: Vec<usize>,
}

impl QuadraticClaim {
    pub fn len(&self) -> usize {
        self.x_rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_rows.is_empty()
    }
}

/// `u[c] = sum_i weights[i] * rows[indices[i]][c]`.
pub fn combine<F: Field>(rows: &[Vec<F>], indices: &[usize], weights: &[F]) -> Vec<F> {
    let width = rows.first().map(Vec::len).unwrap_or(0);
    let mut u = vec![F::ZERO; width];
    for (&idx, &w) in indices.iter().zip(weights) {
        if w.is_zero() {
            continue;
        }
        for (acc, &v) in u.iter_mut().zip(&rows[idx]) {
            *acc += w * v;
        }
    }
    u
}

fn row_indices(n: usize) -> Vec<usize> {
    (0..n).collect()
}

/// Samples a row uniformly at random subject to `col_weights . row == 0`, per spec.md §4.7's
/// zero-knowledge requirement ("blinding rows make every response distribution independent of
/// the witness"). Adding this row (with weight 1) to a [`LinearClaim`]'s row set perturbs the
/// response `u` by a uniformly random vector drawn from the hyperplane `col_weights . v = 0`,
/// which masks `u` completely while leaving `col_weights . u` (the value actually checked)
/// unchanged.
///
/// Panics if `col_weights` is the zero vector (there is then no pivot to project against, and
/// blinding would do nothing useful).
pub fn blinding_row<F: Field + Sample>(col_weights: &[F]) -> Vec<F> {
    let pivot = col_weights
        .iter()
        .position(Field::is_nonzero)
        .expect("col_weights must have at least one nonzero entry to blind against");
    let mut row = F::rand_vec(col_weights.len());
    let dot: F = col_weights.iter().zip(&row).fold(F::ZERO, |acc, (&c, &v)| acc + c * v);
    row[pivot] -= dot * col_weights[pivot].inverse();
    debug_assert!(col_weights.iter().zip(&row).fold(F::ZERO, |acc, (&c, &v)| acc + c * v).is_zero());
    row
}

#[cfg(test)]
mod tests {
    use longfellow_field::fp128::Fp128;
    use longfellow_field::types::Sample;

    use super::*;

    #[test]
    fn blinding_row_is_orthogonal_to_col_weights() {
        let col_weights: Vec<Fp128> = Fp128::rand_vec(6);
        let row = blinding_row(&col_weights);
        let dot: Fp128 = col_weights.iter().zip(&row).fold(Fp128::ZERO, |acc, (&c, &v)| acc + c * v);
        assert_eq!(dot, Fp128::ZERO);
    }

    #[test]
    fn linear_claim_response_reproduces_the_weighted_sum() {
        let rows = vec![
            vec![Fp128::from_canonical_u64(1), Fp128::from_canonical_u64(2)],
            vec![Fp128::from_canonical_u64(3), Fp128::from_canonical_u64(4)],
        ];
        let row_weights = vec![Fp128::from_canonical_u64(5), Fp128::from_canonical_u64(7)];
        let col_weights = vec![Fp128::ONE, Fp128::TWO];
        let target = {
            let u = combine(&rows, &[0, 1], &row_weights);
            col_weights.iter().zip(&u).fold(Fp128::ZERO, |acc, (&c, &v)| acc + c * v)
        };
        let claim = LinearClaim { row_weights, col_weights, target };
        let response = claim.response(&rows);
        assert_eq!(claim.value_of(&response), target);
    }
}
