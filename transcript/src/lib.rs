//! Fiat-Shamir transcript, per spec.md §4.5.
//!
//! The transcript is a running SHA-256 digest `D`. Each [`Transcript::absorb`] folds a
//! tagged, length-prefixed message into `D`; each [`Transcript::squeeze_field`] derives an
//! AES-256 key from the current `D` and uses AES-256 in ECB mode on an incrementing counter to
//! stretch as many pseudorandom bytes as needed, rejection-sampling them into field elements.
//! Absorbing resets the counter, so two transcripts that absorbed the same sequence of
//! `(tag, bytes)` pairs produce byte-identical challenge streams — this is the determinism
//! property spec.md §8 requires of two provers given the same inputs and RNG seed.

pub mod error;
pub mod tag;

use aes::cipher::{BlockEncrypt, KeyInit};
use aes::cipher::generic_array::GenericArray;
use aes::Aes256;
use longfellow_field::types::Field;
use sha2::{Digest, Sha256};

pub use error::TranscriptError;
pub use tag::Tag;

/// Number of squeeze attempts allotted to rejection-sample a single field element before giving
/// up; for any field this crate ships, the reject probability per attempt is astronomically
/// small, so this bound is never expected to bite — it exists so a corrupted/adversarial field
/// implementation can't turn a squeeze into an infinite loop.
const MAX_REJECTION_ATTEMPTS: usize = 256;

#[derive(Clone, Debug)]
pub struct Transcript {
    digest: [u8; 32],
    counter: u64,
}

impl Transcript {
    /// Starts a fresh transcript, absorbing `domain` under the `Input` tag so transcripts built
    /// for different protocols (or different circuit IDs) never share a prefix.
    pub fn new(domain: &[u8]) -> Self {
        let mut t = Transcript {
            digest: [0u8; 32],
            counter: 0,
        };
        t.absorb(Tag::Input, domain);
        t
    }

    /// `D <- SHA256(D || tag_byte || length_be(bytes) || bytes)`.
    pub fn absorb(&mut self, tag: Tag, bytes: &[u8]) {
        let mut hasher = Sha256::new();
        hasher.update(self.digest);
        hasher.update([tag.byte()]);
        hasher.update((bytes.len() as u64).to_be_bytes());
        hasher.update(bytes);
        self.digest = hasher.finalize().into();
        self.counter = 0;
    }

    /// Stretches `n` pseudorandom bytes from the current digest via AES-256-ECB on an
    /// incrementing counter. Does not itself affect `self.digest` — only `absorb` does.
    pub fn squeeze_bytes(&mut self, n: usize) -> Vec<u8> {
        let key = GenericArray::from(self.digest);
        let cipher = Aes256::new(&key);

        let mut out = Vec::with_capacity(n + 16);
        while out.len() < n {
            let mut block = [0u8; 16];
            block[..8].copy_from_slice(&self.counter.to_be_bytes());
            self.counter += 1;

            let mut ga = GenericArray::clone_from_slice(&block);
            cipher.encrypt_block(&mut ga);
            out.extend_from_slice(&ga);
        }
        out.truncate(n);
        out
    }

    /// Squeezes `n` uniformly pseudorandom field elements, rejection-sampling each one from
    /// `F::BYTES`-wide chunks of the AES keystream.
    pub fn squeeze_field<F: Field>(&mut self, n: usize) -> Result<Vec<F>, TranscriptError> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.squeeze_one_field::<F>()?);
        }
        Ok(out)
    }

    fn squeeze_one_field<F: Field>(&mut self) -> Result<F, TranscriptError> {
        for _ in 0..MAX_REJECTION_ATTEMPTS {
            let bytes = self.squeeze_bytes(F::BYTES);
            if let Some(f) = F::from_bytes(&bytes) {
                return Ok(f);
            }
        }
        Err(TranscriptError::RejectionSamplingExhausted)
    }

    /// Squeezes a uniformly random index in `[0, bound)`, used to pick Ligero column-query
    /// indices. `bound` must be nonzero.
    pub fn squeeze_index(&mut self, bound: usize) -> Result<usize, TranscriptError> {
        assert!(bound > 0, "squeeze_index requires a nonzero bound");
        let width = ((usize::BITS - (bound - 1).leading_zeros()).max(1) as usize + 7) / 8;
        for _ in 0..MAX_REJECTION_ATTEMPTS {
            let bytes = self.squeeze_bytes(width.max(1));
            let mut value: u64 = 0;
            for &b in &bytes {
                value = (value << 8) | b as u64;
            }
            let value = value as usize;
            if value < bound {
                return Ok(value);
            }
        }
        Err(TranscriptError::RejectionSamplingExhausted)
    }

    /// Squeezes `count` distinct indices in `[0, bound)`, used for Ligero's column-subset
    /// challenge (spec.md §4.7). `count` must not exceed `bound`.
    pub fn squeeze_distinct_indices(
        &mut self,
        bound: usize,
        count: usize,
    ) -> Result<Vec<usize>, TranscriptError> {
        assert!(count <= bound, "cannot draw more distinct indices than the bound");
        let mut seen = vec![false; bound];
        let mut out = Vec::with_capacity(count);
        while out.len() < count {
            let idx = self.squeeze_index(bound)?;
            if !seen[idx] {
                seen[idx] = true;
                out.push(idx);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use longfellow_field::fp128::Fp128;

    use super::*;

    #[test]
    fn absorbing_resets_the_counter_so_repeats_are_deterministic() {
        let mut t1 = Transcript::new(b"domain");
        t1.absorb(Tag::Commitment, b"root");
        let a: Vec<u8> = t1.squeeze_bytes(16);

        let mut t2 = Transcript::new(b"domain");
        t2.absorb(Tag::Commitment, b"root");
        let b: Vec<u8> = t2.squeeze_bytes(16);

        assert_eq!(a, b);
    }

    #[test]
    fn different_absorbed_bytes_give_different_challenges() {
        let mut t1 = Transcript::new(b"domain");
        t1.absorb(Tag::Input, b"one");
        let a: Vec<u8> = t1.squeeze_bytes(16);

        let mut t2 = Transcript::new(b"domain");
        t2.absorb(Tag::Input, b"two");
        let b: Vec<u8> = t2.squeeze_bytes(16);

        assert_ne!(a, b);
    }

    #[test]
    fn distinct_tags_separate_domains() {
        let mut t1 = Transcript::new(b"domain");
        t1.absorb(Tag::Round, b"x");
        let a: Vec<u8> = t1.squeeze_bytes(16);

        let mut t2 = Transcript::new(b"domain");
        t2.absorb(Tag::Polynomial, b"x");
        let b: Vec<u8> = t2.squeeze_bytes(16);

        assert_ne!(a, b);
    }

    #[test]
    fn squeezed_field_elements_are_always_canonical() {
        let mut t = Transcript::new(b"field-squeeze");
        let elements: Vec<Fp128> = t.squeeze_field(64).unwrap();
        assert_eq!(elements.len(), 64);
    }

    #[test]
    fn squeezing_more_elements_extends_rather_than_repeats() {
        let mut t = Transcript::new(b"stream");
        let a: Vec<Fp128> = t.squeeze_field(4).unwrap();
        let b: Vec<Fp128> = t.squeeze_field(4).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn distinct_indices_are_actually_distinct_and_in_range() {
        let mut t = Transcript::new(b"columns");
        let idxs = t.squeeze_distinct_indices(50, 20).unwrap();
        assert_eq!(idxs.len(), 20);
        for &i in &idxs {
            assert!(i < 50);
        }
        let mut sorted = idxs.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), idxs.len());
    }
}
