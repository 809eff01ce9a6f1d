//! The multilinear equality table, used to split an evaluation point into its row/column halves
//! (see [`crate::tableau`]) the same way `longfellow_sumcheck::eq` does for circuit wires.

use longfellow_field::types::Field;

/// `table[i] = EQ(point, i)` for every `i` in `0..2^point.len()`, built by repeated doubling:
/// `table` for `point[..j]` doubles into `table` for `point[..j+1]` by splitting each entry into
/// its "bit clear" and "bit set" halves, matching the MSB-first convention used throughout this
/// crate's sibling crates.
pub fn eq_table<F: Field>(point: &[F]) -> Vec<F> {
    let mut table = vec![F::ONE];
    for &p in point {
        let mut next = vec![F::ZERO; table.len() * 2];
        for (i, &v) in table.iter().enumerate() {
            next[2 * i] = v * (F::ONE - p);
            next[2 * i + 1] = v * p;
        }
        table = next;
    }
    table
}
