//! The multilinear `EQ` basis and the generic dense-array folding it rides on, per spec.md
//! §4.6: every sumcheck round (copy bits, left hand, right hand) is an instance of folding two
//! dense arrays indexed by the remaining unbound boolean variables and producing a degree-2
//! round polynomial in Lagrange form over the three points `{0, 1, 2}`.
//!
//! Throughout this crate, a point `r = [r_0, ..., r_{m-1}]` and an integer index `idx < 2^m`
//! are matched bit-for-bit with `r_0` the *most significant* bit of `idx` — the same convention
//! [`fold_in_place`] uses when it halves an array (the top half is bit `1`, the bottom half bit
//! `0`). Any consistent convention works; this crate only needs to use one convention
//! everywhere, which it does.

use longfellow_field::types::Field;

/// `EQ(point, idx) = prod_i (point[i] if bit_i(idx) else 1 - point[i])`, the multilinear
/// extension of the indicator "idx's bits equal point" evaluated at a (possibly non-boolean)
/// field point.
pub fn eq_eval_index<F: Field>(point: &[F], idx: u32) -> F {
    let logw = point.len();
    let mut acc = F::ONE;
    for (i, &r) in point.iter().enumerate() {
        let bit = (idx >> (logw - 1 - i)) & 1;
        acc *= if bit == 1 { r } else { F::ONE - r };
    }
    acc
}

/// `EQ(a, b)` for two field points of equal length, the multilinear extension of the boolean
/// equality predicate.
pub fn eq_eval<F: Field>(a: &[F], b: &[F]) -> F {
    assert_eq!(a.len(), b.len(), "eq_eval requires equal-length points");
    a.iter()
        .zip(b)
        .fold(F::ONE, |acc, (&x, &y)| acc * (x * y + (F::ONE - x) * (F::ONE - y)))
}

/// Dense table of `EQ(point, idx)` for every boolean `idx`, built by repeated doubling so the
/// whole table costs one multiplication per (table entry, variable) pair rather than one
/// `eq_eval_index` call (`O(m)` multiplications) per entry.
pub fn eq_table<F: Field>(point: &[F]) -> Vec<F> {
    let mut table = vec![F::ONE];
    for &r in point {
        let mut next = vec![F::ZERO; table.len() * 2];
        for (i, &t) in table.iter().enumerate() {
            next[2 * i] = t * (F::ONE - r);
            next[2 * i + 1] = t * r;
        }
        table = next;
    }
    table
}

/// Folds a dense multilinear-coefficient array in place, substituting `r` for its current
/// leading variable and halving the array's length: `values[i] <- lo[i] + r*(hi[i] - lo[i])`
/// where `lo`/`hi` are the array's bottom/top halves.
pub fn fold_in_place<F: Field>(values: &mut Vec<F>, r: F) {
    let half = values.len() / 2;
    for i in 0..half {
        let lo = values[i];
        let hi = values[half + i];
        values[i] = lo + r * (hi - lo);
    }
    values.truncate(half);
}

/// Evaluates a degree-2 round polynomial given in Lagrange form over `{0, 1, 2}` at an
/// arbitrary field point, via the standard 3-point Lagrange basis.
pub fn lagrange3_eval<F: Field>(p: &[F; 3], r: F) -> F {
    let two_inv = F::TWO.inverse();
    let l0 = (r - F::ONE) * (r - F::TWO) * two_inv;
    let l1 = -(r * (r - F::TWO));
    let l2 = r * (r - F::ONE) * two_inv;
    p[0] * l0 + p[1] * l1 + p[2] * l2
}
