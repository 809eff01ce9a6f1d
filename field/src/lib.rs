//! Finite field arithmetic for the proving stack: the working field `Fp128` (Montgomery-form,
//! two-adic), the characteristic-two field `Binary128`, the P-256 base/scalar fields used by
//! `longfellow-curve`, and the polynomial/FFT machinery built on top of them.

#![allow(clippy::len_without_is_empty)]
#![allow(clippy::needless_range_loop)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

mod limbs;

pub mod batch_util;
pub mod binary128;
pub mod error;
pub mod fft;
pub mod fp128;
pub mod interpolation;
pub mod lch14;
pub mod ops;
pub mod p256;
pub mod polynomial;
pub mod types;
