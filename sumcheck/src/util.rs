use longfellow_field::types::Field;

pub use longfellow_util::log2_ceil;

/// Zero-pads `values` up to `target_len` (a power of two); panics if `values` is already longer.
pub fn pad_to_pow2<F: Field>(values: &[F], target_len: usize) -> Vec<F> {
    assert!(values.len() <= target_len, "values longer than the padded target length");
    let mut out = values.to_vec();
    out.resize(target_len, F::ZERO);
    out
}
