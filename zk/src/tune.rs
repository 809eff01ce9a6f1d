//! Picks the smallest Ligero `block_enc` meeting a target column-query count, per spec.md §9:
//! "the code ships a utility that sweeps `block_enc` to minimize proof size and records the
//! result into the ZkSpec table." This is an ordinary function run once per
//! `(num_attributes, version)` pair when the table in [`crate::spec`] is assembled, not invoked
//! by `prove`/`verify`.

/// Smallest power-of-two `block_enc` (used as a square tableau's row/column count) that can hold
/// `witness_len` field elements and whose Reed-Solomon-encoded width supports at least
/// `target_queries` distinct column openings at the given rate.
pub fn tune_block_enc(witness_len: usize, rate_bits: usize, target_queries: usize) -> usize {
    let mut block_enc = (witness_len.max(1) as f64).sqrt().ceil() as usize;
    block_enc = block_enc.max(1).next_power_of_two();
    loop {
        let encoded_width = block_enc << rate_bits;
        if block_enc * block_enc >= witness_len && encoded_width >= target_queries {
            return block_enc;
        }
        block_enc *= 2;
    }
}
