//! Circuit-producer interfaces, per spec.md §1/§4.9: SHA-256, ECDSA-P256 verification, CBOR
//! parsing, base64 decoding, and the MDOC attribute walker are declared here as traits with
//! native reference implementations, not gate-level arithmetizations. Each trait exposes a
//! `circuit_cost` hook so a tableau can be sized before the corresponding arithmetization exists.

use longfellow_curve::ecdsa::{verify_message, PublicKey, Signature};
use longfellow_curve::p256::P256;
use longfellow_field::p256::{P256Base, P256Scalar};
use longfellow_field::types::PrimeField;
use num::BigUint;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::cbor::{decode_top_level_map, CborValue};

/// Rough sizing a circuit producer would impose on the compiled circuit: input-wire, constant,
/// and layer counts, used to budget a Ligero tableau before the gate-level circuit exists.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CircuitShape {
    pub ninputs: usize,
    pub nconst: usize,
    pub nlayers: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("input too short to hold a CBOR header")]
    Truncated,
    #[error("unsupported CBOR major type {0}")]
    UnsupportedMajorType(u8),
    #[error("attribute {0:?} not present in the mdoc")]
    AttributeNotFound(String),
    #[error("mdoc is missing a valid_until field")]
    MissingValidUntil,
    #[error("invalid base64 input")]
    InvalidBase64,
}

pub trait Sha256Circuit {
    fn hash_witness(&self, input: &[u8]) -> [u8; 32];
    fn circuit_cost(&self, input_len: usize) -> CircuitShape;
}

pub trait EcdsaP256VerifyCircuit {
    /// Verifies the signature natively, the way the MDOC circuit producer would compute the
    /// witness flag that the compiled circuit then asserts is `1`. All five arguments are
    /// big-endian 32-byte integers, per spec.md §8 scenario 1.
    fn verify_witness(&self, pk_x: &[u8; 32], pk_y: &[u8; 32], e: &[u8; 32], r: &[u8; 32], s: &[u8; 32]) -> bool;
    fn circuit_cost(&self) -> CircuitShape;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CborWitness {
    pub valid_until: [u8; 20],
    pub attribute: Vec<u8>,
}

pub trait CborParserCircuit {
    fn parse_witness<'a>(&self, bytes: &'a [u8]) -> Result<CborValue<'a>, ParseError>;
    fn circuit_cost(&self, input_len: usize) -> CircuitShape;
}

pub trait Base64DecodeCircuit {
    fn decode_witness(&self, input: &[u8]) -> Result<Vec<u8>, ParseError>;
    fn circuit_cost(&self, input_len: usize) -> CircuitShape;
}

pub trait MdocWalkerCircuit {
    /// Locates `attribute_id` among an mdoc's disclosed attributes, returning the attribute's
    /// raw CBOR-encoded value bytes alongside the document's `valid_until` field (spec.md §8
    /// scenario 2: attribute id bytes `"age_over_18"`, value cbor `0xF5`).
    fn find_attribute(&self, mdoc: &[u8], attribute_id: &[u8]) -> Result<CborWitness, ParseError>;
    fn circuit_cost(&self, mdoc_len: usize) -> CircuitShape;
}

/// Native SHA-256, standing in for the compression-function circuit producer.
#[derive(Copy, Clone, Debug, Default)]
pub struct NativeSha256;

impl Sha256Circuit for NativeSha256 {
    fn hash_witness(&self, input: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(input);
        hasher.finalize().into()
    }

    fn circuit_cost(&self, input_len: usize) -> CircuitShape {
        let blocks = longfellow_util::ceil_div_usize(input_len + 9, 64).max(1);
        CircuitShape { ninputs: input_len * 8, nconst: 64, nlayers: blocks * 2 }
    }
}

/// Native ECDSA-P256 verification, standing in for the signature-verification circuit producer.
#[derive(Copy, Clone, Debug, Default)]
pub struct NativeEcdsaP256Verify;

/// Interprets `bytes` as a big-endian integer and reduces it into `F`, the convention every
/// producer trait above uses for its byte-string arguments (spec.md §8 scenario 1).
pub fn be_bytes_to_field<F: PrimeField>(bytes: &[u8]) -> F {
    F::from_biguint(&BigUint::from_bytes_be(bytes))
}

impl EcdsaP256VerifyCircuit for NativeEcdsaP256Verify {
    fn verify_witness(&self, pk_x: &[u8; 32], pk_y: &[u8; 32], e: &[u8; 32], r: &[u8; 32], s: &[u8; 32]) -> bool {
        let pk = PublicKey::<P256> {
            x: be_bytes_to_field::<P256Base>(pk_x),
            y: be_bytes_to_field::<P256Base>(pk_y),
        };
        if !pk.is_on_curve() {
            return false;
        }
        let msg = be_bytes_to_field::<P256Scalar>(e);
        let sig = Signature::<P256> { r: be_bytes_to_field(r), s: be_bytes_to_field(s) };
        verify_message(msg, &sig, &pk)
    }

    fn circuit_cost(&self) -> CircuitShape {
        CircuitShape { ninputs: 5 * 256, nconst: 8, nlayers: 512 }
    }
}

/// Native CBOR top-level reader, standing in for the grand-product nesting-counter circuit
/// producer spec.md §9 describes.
#[derive(Copy, Clone, Debug, Default)]
pub struct NativeCborParser;

impl CborParserCircuit for NativeCborParser {
    fn parse_witness<'a>(&self, bytes: &'a [u8]) -> Result<CborValue<'a>, ParseError> {
        decode_top_level_map(bytes)
    }

    fn circuit_cost(&self, input_len: usize) -> CircuitShape {
        CircuitShape { ninputs: input_len * 8, nconst: 4, nlayers: input_len }
    }
}

const BASE64_ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn base64_value(byte: u8) -> Option<u8> {
    BASE64_ALPHABET.iter().position(|&c| c == byte).map(|p| p as u8)
}

/// Native standard (RFC 4648) base64 decoder, standing in for the base64-decode circuit
/// producer.
#[derive(Copy, Clone, Debug, Default)]
pub struct NativeBase64Decode;

impl Base64DecodeCircuit for NativeBase64Decode {
    fn decode_witness(&self, input: &[u8]) -> Result<Vec<u8>, ParseError> {
        let stripped: Vec<u8> = input.iter().copied().filter(|&b| b != b'=').collect();
        let mut out = Vec::with_capacity(stripped.len() * 3 / 4);
        for chunk in stripped.chunks(4) {
            let values: Vec<u8> =
                chunk.iter().map(|&b| base64_value(b).ok_or(ParseError::InvalidBase64)).collect::<Result<_, _>>()?;
            let n = values.len();
            let v0 = values[0];
            let v1 = *values.get(1).unwrap_or(&0);
            out.push((v0 << 2) | (v1 >> 4));
            if n > 2 {
                let v2 = values[2];
                out.push((v1 << 4) | (v2 >> 2));
            }
            if n > 3 {
                let v2 = values[2];
                let v3 = values[3];
                out.push((v2 << 6) | v3);
            }
        }
        Ok(out)
    }

    fn circuit_cost(&self, input_len: usize) -> CircuitShape {
        CircuitShape { ninputs: input_len * 6, nconst: 64, nlayers: longfellow_util::ceil_div_usize(input_len, 4) }
    }
}

/// Native MDOC attribute walker: decodes the top-level CBOR map and picks out `valid_until` plus
/// a named attribute's raw encoded value, standing in for the MDOC-walker circuit producer.
#[derive(Copy, Clone, Debug, Default)]
pub struct NativeMdocWalker;

impl MdocWalkerCircuit for NativeMdocWalker {
    fn find_attribute(&self, mdoc: &[u8], attribute_id: &[u8]) -> Result<CborWitness, ParseError> {
        let top = decode_top_level_map(mdoc)?;
        let CborValue::Map(entries) = top else {
            return Err(ParseError::UnsupportedMajorType(0));
        };

        let attribute_id = std::str::from_utf8(attribute_id).map_err(|_| ParseError::Truncated)?;

        let mut valid_until: Option<[u8; 20]> = None;
        let mut attribute: Option<Vec<u8>> = None;
        for (key, _value, raw) in &entries {
            if *key == "valid_until" {
                if raw.len() == 21 {
                    // single-byte text-string header (0x74, length 20) + 20 ASCII bytes.
                    let mut buf = [0u8; 20];
                    buf.copy_from_slice(&raw[1..21]);
                    valid_until = Some(buf);
                }
            } else if *key == attribute_id {
                attribute = Some(raw.to_vec());
            }
        }

        Ok(CborWitness {
            valid_until: valid_until.ok_or(ParseError::MissingValidUntil)?,
            attribute: attribute.ok_or_else(|| ParseError::AttributeNotFound(attribute_id.to_string()))?,
        })
    }

    fn circuit_cost(&self, mdoc_len: usize) -> CircuitShape {
        CircuitShape { ninputs: mdoc_len * 8, nconst: 4, nlayers: mdoc_len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_sha256_matches_the_reference_digest() {
        let digest = NativeSha256.hash_witness(b"abc");
        assert_eq!(hex::encode(digest), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn native_base64_round_trips_a_padded_string() {
        let decoded = NativeBase64Decode.decode_witness(b"aGVsbG8=").unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn native_ecdsa_verify_accepts_a_freshly_signed_message_and_rejects_a_flipped_byte() {
        use longfellow_curve::ecdsa::{sign_message, SecretKey};
        use longfellow_field::types::Sample;

        let sk = SecretKey::<P256>(P256Scalar::rand());
        let pk = sk.to_public();
        let msg = P256Scalar::rand();
        let sig = sign_message(msg, &sk);

        let to_be = |limbs: [u64; 4]| -> [u8; 32] {
            let mut out = [0u8; 32];
            for (i, limb) in limbs.iter().enumerate() {
                out[24 - i * 8..32 - i * 8].copy_from_slice(&limb.to_be_bytes());
            }
            out
        };

        let pk_x = to_be(pk.x.to_canonical_limbs());
        let pk_y = to_be(pk.y.to_canonical_limbs());
        let e = to_be(msg.to_canonical_limbs());
        let r = to_be(sig.r.to_canonical_limbs());
        let s = to_be(sig.s.to_canonical_limbs());

        assert!(NativeEcdsaP256Verify.verify_witness(&pk_x, &pk_y, &e, &r, &s));

        let mut bad_e = e;
        bad_e[31] ^= 1;
        assert!(!NativeEcdsaP256Verify.verify_witness(&pk_x, &pk_y, &bad_e, &r, &s));
    }
}
