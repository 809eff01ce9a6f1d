/// A wire index within a single layer's width. Circuits in this crate are small enough (one
/// MDOC/ECDSA circuit, not a million-gate SNARK) that 32 bits is ample headroom; kept narrower
/// than `usize` so the wire format (spec.md §6) can pick a tight byte width per layer.
pub type WireId = u32;
