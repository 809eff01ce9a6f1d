use longfellow_field::types::Field;
use sha2::{Digest, Sha256};

use crate::error::CircuitError;
use crate::layer::Layer;
use crate::term::QuadTerm;

/// Where a base-domain wire (the circuit's deepest layer) gets its value from: either the
/// per-copy witness (`Input`) or the circuit-wide constant table (`Const`). Mixing the two into
/// one indexed domain keeps the layered representation uniform — a constant is just a value that
/// doesn't vary by copy, not a different kind of wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BaseSource {
    Input(u32),
    Const(u32),
}

/// A layered quadratic circuit, per spec.md §4.4/§6. `layers[0]` is the output layer;
/// `layers.last()` is the layer closest to the input: its `input_width` wires are exactly
/// `base.len()`, populated per [`BaseSource`] from a witness or from `consts`.
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit<F: Field> {
    pub ninputs: usize,
    pub npub_in: usize,
    pub consts: Vec<F>,
    pub base: Vec<BaseSource>,
    pub layers: Vec<Layer>,
}

impl<F: Field> Circuit<F> {
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn output_width(&self) -> usize {
        self.layers.first().map(|l| l.output_width as usize).unwrap_or(self.base.len())
    }

    /// Evaluates the circuit on one copy of witness `input` (length `self.ninputs`), returning
    /// the output layer's wire values. This is the native reference evaluation used both by the
    /// prover (to build the witness tableau) and by tests exercising circuit semantics; the
    /// sumcheck/Ligero layers never call this on the verifier's side.
    pub fn evaluate(&self, input: &[F]) -> Result<Vec<F>, CircuitError> {
        Ok(self.evaluate_all_layers(input)?.into_iter().next().expect("at least one layer level"))
    }

    /// Evaluates every layer's wire values for one copy of witness `input`, per spec.md §4.6:
    /// the sumcheck prover needs the full per-layer witness, not just the final output, to build
    /// each layer's claims. `result[0]` is the final circuit output (spec.md's "layer 0");
    /// `result[self.num_layers()]` is the base/input layer's resolved values (spec.md's "layer
    /// `nl - 1`", i.e. `self.base` with [`BaseSource`] resolved against `input` and `self.consts`).
    /// `self.layers[l]` is exactly the quadratic map from `result[l + 1]` to `result[l]`.
    pub fn evaluate_all_layers(&self, input: &[F]) -> Result<Vec<Vec<F>>, CircuitError> {
        if input.len() != self.ninputs {
            return Err(CircuitError::OutOfRange {
                index: input.len() as u64,
                max: self.ninputs as u64,
            });
        }

        let base: Vec<F> = self
            .base
            .iter()
            .map(|s| match *s {
                BaseSource::Input(i) => input[i as usize],
                BaseSource::Const(c) => self.consts[c as usize],
            })
            .collect();

        // Computed input-to-output, then reversed so index 0 is the output layer.
        let mut forward = vec![base];
        for layer in self.layers.iter().rev() {
            let cur = forward.last().expect("just pushed");
            let mut out = vec![F::ZERO; layer.output_width as usize];
            for term in &layer.terms {
                let k = self.consts[term.k as usize];
                out[term.g as usize] += k * cur[term.h0 as usize] * cur[term.h1 as usize];
            }
            forward.push(out);
        }
        forward.reverse();
        Ok(forward)
    }

    /// Runs [`Self::evaluate`] and checks every output wire is zero — the arithmetization of
    /// `assert_eq`/`assert0` (spec.md §9: "there is no exception path inside the
    /// arithmetization; violations surface only when the prover evaluates the circuit and finds
    /// a non-zero output").
    pub fn check_witness(&self, input: &[F]) -> Result<(), CircuitError> {
        let output = self.evaluate(input)?;
        if output.iter().all(Field::is_zero) {
            Ok(())
        } else {
            Err(CircuitError::NonzeroOutput)
        }
    }

    /// SHA-256 over the canonical serialized form, per spec.md §6: "circuit_id(bytes, spec) ->
    /// 32-byte digest: SHA-256 over the canonical (decompressed) concatenated circuit bytes".
    pub fn id(&self) -> [u8; 32] {
        let bytes = self.to_bytes();
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        hasher.finalize().into()
    }

    /// Serializes the circuit per spec.md §6: a fixed-width header, the constant table, then
    /// per layer `(nw, logw, nquad)` followed by `nquad` `(g, h0, h1, k)` tuples. Multi-byte
    /// integers are little-endian; index fields use the smallest byte width that fits the
    /// layer's own `output_width`/`input_width`/constant-table size.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(self.ninputs as u64).to_le_bytes());
        out.extend_from_slice(&(self.npub_in as u64).to_le_bytes());
        out.extend_from_slice(&(self.base.len() as u64).to_le_bytes());
        out.extend_from_slice(&(self.consts.len() as u64).to_le_bytes());
        out.extend_from_slice(&(self.layers.len() as u64).to_le_bytes());

        for &source in &self.base {
            match source {
                BaseSource::Input(i) => {
                    out.push(0);
                    out.extend_from_slice(&i.to_le_bytes());
                }
                BaseSource::Const(c) => {
                    out.push(1);
                    out.extend_from_slice(&c.to_le_bytes());
                }
            }
        }

        for c in &self.consts {
            let bytes = c.to_bytes();
            out.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
            out.extend_from_slice(&bytes);
        }

        for layer in &self.layers {
            out.extend_from_slice(&layer.output_width.to_le_bytes());
            out.extend_from_slice(&layer.input_width.to_le_bytes());
            out.extend_from_slice(&(layer.terms.len() as u64).to_le_bytes());
            let g_width = byte_width(layer.output_width);
            let h_width = byte_width(layer.input_width);
            let k_width = byte_width(self.consts.len() as u32);
            for term in &layer.terms {
                out.extend_from_slice(&term.g.to_le_bytes()[..g_width]);
                out.extend_from_slice(&term.h0.to_le_bytes()[..h_width]);
                out.extend_from_slice(&term.h1.to_le_bytes()[..h_width]);
                out.extend_from_slice(&term.k.to_le_bytes()[..k_width]);
            }
        }

        out
    }

    /// Parses circuit bytes produced by [`Self::to_bytes`], rejecting truncated input and any
    /// terms not in canonical sorted order (spec.md §6: "Parse rejects if any index is out of
    /// range or order is violated.").
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CircuitError> {
        let mut cursor = Cursor { bytes, pos: 0 };
        let ninputs = cursor.read_u64()? as usize;
        let npub_in = cursor.read_u64()? as usize;
        let base_len = cursor.read_u64()? as usize;
        let const_len = cursor.read_u64()? as usize;
        let nl = cursor.read_u64()? as usize;

        let mut base = Vec::with_capacity(base_len);
        for _ in 0..base_len {
            let tag = cursor.read_u8()?;
            let v = cursor.read_u32()?;
            base.push(if tag == 0 { BaseSource::Input(v) } else { BaseSource::Const(v) });
        }

        let mut consts = Vec::with_capacity(const_len);
        for i in 0..const_len {
            let len = cursor.read_u64()? as usize;
            let raw = cursor.read_bytes(len)?;
            consts.push(F::from_bytes(raw).ok_or(CircuitError::BadConstant { index: i })?);
        }

        let mut layers = Vec::with_capacity(nl);
        for layer_idx in 0..nl {
            let output_width = cursor.read_u32()?;
            let input_width = cursor.read_u32()?;
            let nquad = cursor.read_u64()? as usize;
            let g_width = byte_width(output_width);
            let h_width = byte_width(input_width);
            let k_width = byte_width(const_len as u32);

            let mut terms = Vec::with_capacity(nquad);
            for _ in 0..nquad {
                let g = cursor.read_uint(g_width)?;
                let h0 = cursor.read_uint(h_width)?;
                let h1 = cursor.read_uint(h_width)?;
                let k = cursor.read_uint(k_width)?;
                if g >= output_width || h0 >= input_width || h1 >= input_width || k >= const_len as u32 {
                    return Err(CircuitError::OutOfRange {
                        index: g.max(h0).max(h1).max(k) as u64,
                        max: output_width.max(input_width).max(const_len as u32) as u64,
                    });
                }
                terms.push(QuadTerm::new(g, h0, h1, k));
            }
            if !crate::term::assert_canonical_order(&terms) {
                return Err(CircuitError::NonCanonicalOrder { layer: layer_idx });
            }

            layers.push(Layer { output_width, input_width, terms });
        }

        Ok(Circuit { ninputs, npub_in, consts, base, layers })
    }
}

fn byte_width(max_exclusive: u32) -> usize {
    let max_value = max_exclusive.saturating_sub(1);
    if max_value == 0 {
        1
    } else {
        ((u32::BITS - max_value.leading_zeros()) as usize + 7) / 8
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CircuitError> {
        if self.remaining() < n {
            return Err(CircuitError::Truncated { expected: n, found: self.remaining() });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, CircuitError> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32, CircuitError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes(b.try_into().unwrap()))
    }

    fn read_u64(&mut self) -> Result<u64, CircuitError> {
        let b = self.read_bytes(8)?;
        Ok(u64::from_le_bytes(b.try_into().unwrap()))
    }

    fn read_uint(&mut self, width: usize) -> Result<u32, CircuitError> {
        let b = self.read_bytes(width)?;
        let mut buf = [0u8; 4];
        buf[..width].copy_from_slice(b);
        Ok(u32::from_le_bytes(buf))
    }
}
