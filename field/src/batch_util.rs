//! Elementwise slice operations shared by the Ligero row/column loops and the circuit's
//! per-copy evaluation loop.

use crate::types::Field;

/// Elementwise inplace multiplication of two slices of field elements.
pub fn batch_multiply_inplace<F: Field>(out: &mut [F], a: &[F]) {
    assert_eq!(out.len(), a.len(), "both arrays must have the same length");
    for (x_out, &x_a) in out.iter_mut().zip(a) {
        *x_out *= x_a;
    }
}

/// Elementwise inplace addition of two slices of field elements.
pub fn batch_add_inplace<F: Field>(out: &mut [F], a: &[F]) {
    assert_eq!(out.len(), a.len(), "both arrays must have the same length");
    for (x_out, &x_a) in out.iter_mut().zip(a) {
        *x_out += x_a;
    }
}
