//! Radix-2 Cooley-Tukey FFT over a [`TwoAdicField`]'s two-adic subgroup, used to move between
//! coefficient and evaluation form for the Ligero witness encoding and for Reed-Solomon
//! extension/interpolation.

use longfellow_util::{log2_strict, reverse_index_bits_in_place};

use crate::polynomial::{PolynomialCoeffs, PolynomialValues};
use crate::types::TwoAdicField;

pub type FftRootTable<F> = Vec<Vec<F>>;

pub fn fft_root_table<F: TwoAdicField>(n: usize) -> FftRootTable<F> {
    let lg_n = log2_strict(n);
    // bases[i] = g^(2^i), for i = 0, ..., lg_n - 1
    let mut bases = Vec::with_capacity(lg_n);
    let mut base = F::primitive_root_of_unity(lg_n);
    bases.push(base);
    for _ in 1..lg_n {
        base = base.square();
        bases.push(base);
    }

    let mut root_table = Vec::with_capacity(lg_n);
    for lg_m in 1..=lg_n {
        let half_m = 1 << (lg_m - 1);
        let base = bases[lg_n - lg_m];
        let root_row = base.powers().take(half_m.max(2)).collect();
        root_table.push(root_row);
    }
    root_table
}

#[inline]
fn fft_dispatch<F: TwoAdicField>(
    input: &mut [F],
    zero_factor: Option<usize>,
    root_table: Option<&FftRootTable<F>>,
) {
    let computed_root_table = root_table.is_none().then(|| fft_root_table(input.len()));
    let used_root_table = root_table.or(computed_root_table.as_ref()).unwrap();
    fft_classic(input, zero_factor.unwrap_or(0), used_root_table);
}

#[inline]
pub fn fft<F: TwoAdicField>(poly: PolynomialCoeffs<F>) -> PolynomialValues<F> {
    fft_with_options(poly, None, None)
}

#[inline]
pub fn fft_with_options<F: TwoAdicField>(
    poly: PolynomialCoeffs<F>,
    zero_factor: Option<usize>,
    root_table: Option<&FftRootTable<F>>,
) -> PolynomialValues<F> {
    let PolynomialCoeffs { coeffs: mut buffer } = poly;
    fft_dispatch(&mut buffer, zero_factor, root_table);
    PolynomialValues::new(buffer)
}

#[inline]
pub fn ifft<F: TwoAdicField>(poly: PolynomialValues<F>) -> PolynomialCoeffs<F> {
    ifft_with_options(poly, None, None)
}

pub fn ifft_with_options<F: TwoAdicField>(
    poly: PolynomialValues<F>,
    zero_factor: Option<usize>,
    root_table: Option<&FftRootTable<F>>,
) -> PolynomialCoeffs<F> {
    let n = poly.len();
    let lg_n = log2_strict(n);
    let n_inv = F::from_canonical_usize(n).inverse();

    let PolynomialValues { values: mut buffer } = poly;
    fft_dispatch(&mut buffer, zero_factor, root_table);

    // Reverse all values except the first, and divide each by n.
    buffer[0] *= n_inv;
    buffer[n / 2] *= n_inv;
    for i in 1..(n / 2) {
        let j = n - i;
        let coeffs_i = buffer[j] * n_inv;
        let coeffs_j = buffer[i] * n_inv;
        buffer[i] = coeffs_i;
        buffer[j] = coeffs_j;
    }
    PolynomialCoeffs { coeffs: buffer }
}

/// FFT implementation based on Section 32.3 of "Introduction to Algorithms" by Cormen et al.
///
/// `r` signifies that only the first `1/2^r` entries of `values` may be non-zero; the rest are
/// known to be zero, which lets the first `r` rounds be skipped (a "truncated" FFT).
pub(crate) fn fft_classic<F: TwoAdicField>(values: &mut [F], r: usize, root_table: &FftRootTable<F>) {
    reverse_index_bits_in_place(values);

    let n = values.len();
    let lg_n = log2_strict(n);

    if root_table.len() != lg_n {
        panic!(
            "expected root table of length {lg_n}, but it was {}",
            root_table.len()
        );
    }

    // After reverse_index_bits, the only non-zero elements of values are at indices i*2^r.
    // Replicate each such value across the 2^r - 1 zero slots that follow it; this performs the
    // first r rounds of the FFT when the input has 2^r trailing zeros.
    if r > 0 {
        let mask = !((1 << r) - 1);
        for i in 0..n {
            values[i] = values[i & mask];
        }
    }

    for lg_half_m in r..lg_n {
        let lg_m = lg_half_m + 1;
        let m = 1 << lg_m;
        let half_m = m / 2;
        let omegas = &root_table[lg_half_m];
        for k in (0..n).step_by(m) {
            for j in 0..half_m {
                let omega = omegas[j];
                let t = omega * values[k + half_m + j];
                let u = values[k + j];
                values[k + j] = u + t;
                values[k + half_m + j] = u - t;
            }
        }
    }
}
