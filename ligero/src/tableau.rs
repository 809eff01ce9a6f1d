//! The Ligero witness tableau, per spec.md §3/§4.7: the committed witness laid out as an
//! `m x k` matrix, each row Reed-Solomon encoded to `n = k << rate_bits` and committed column by
//! column in a Merkle tree.

use longfellow_field::polynomial::PolynomialCoeffs;
use longfellow_field::types::{Field, TwoAdicField};
use longfellow_maybe_rayon::*;

use crate::merkle::{leaf_hash, MerkleTree};

/// Shape and rate of a Ligero tableau, chosen once per circuit/attribute-count combination (see
/// spec.md §9's "Open question — Ligero parameter tuning": this reimplementation treats `m`/`k`
/// as constructor inputs rather than re-deriving them per proof).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LigeroParam {
    /// Number of rows the caller plans to commit, including any blinding rows (see
    /// [`crate::blinding_row`]) it appends alongside the real witness/triple rows.
    pub m: usize,
    /// Row width in message space; must be a power of two.
    pub k: usize,
    /// `log2` of the Reed-Solomon rate `R`; spec.md §4.7 uses `R = 4`, i.e. `rate_bits = 2`.
    pub rate_bits: usize,
    /// Number of column-query challenges `Q`; soundness error per query is `(1 - 1/R)`.
    pub num_queries: usize,
}

impl LigeroParam {
    pub fn capacity(&self) -> usize {
        self.m * self.k
    }

    /// Encoded row width `n = k << rate_bits`.
    pub fn encoded_width(&self) -> usize {
        self.k << self.rate_bits
    }

    /// Smallest square-ish tableau (`m` a power of two, `k = m`) holding `len` field elements,
    /// used by tests and by callers that don't have a tuned `ZkSpec` entry on hand.
    pub fn square_for_len(len: usize, rate_bits: usize, num_queries: usize) -> Self {
        let side = (len.max(1) as f64).sqrt().ceil() as usize;
        let k = side.next_power_of_two();
        let m = (len + k - 1) / k;
        LigeroParam { m: m.max(1), k, rate_bits, num_queries }
    }
}

/// Reed-Solomon encodes one row (length `param.k`) to `param.encoded_width()` evaluations, via
/// the field crate's monomial-form low-degree extension: zero-pad the row to `k << rate_bits`
/// coefficients, then evaluate at every point of the two-adic subgroup of that size.
pub fn encode_row<F: TwoAdicField>(row: &[F], rate_bits: usize) -> Vec<F> {
    PolynomialCoeffs::new(row.to_vec()).lde(rate_bits).fft().values
}

/// Row-major reshape of a flat vector into an `m x k` matrix, zero-padded up to `m*k`.
pub fn reshape_rows<F: Field>(flat: &[F], m: usize, k: usize) -> Vec<Vec<F>> {
    assert!(flat.len() <= m * k, "witness longer than the tableau can hold");
    let mut padded = flat.to_vec();
    padded.resize(m * k, F::ZERO);
    padded.chunks(k).map(<[F]>::to_vec).collect()
}

/// A tableau's Reed-Solomon-encoded rows together with the Merkle tree over its columns.
pub struct EncodedTableau<F: Field> {
    pub rows: Vec<Vec<F>>,
    pub codewords: Vec<Vec<F>>,
    pub tree: MerkleTree,
}

impl<F: TwoAdicField> EncodedTableau<F> {
    pub fn build(rows: Vec<Vec<F>>, rate_bits: usize) -> Self {
        let codewords: Vec<Vec<F>> = rows.par_iter().map(|row| encode_row(row, rate_bits)).collect();
        let n = codewords.first().map(Vec::len).unwrap_or(0);
        let leaves: Vec<[u8; 32]> = (0..n)
            .into_par_iter()
            .map(|col| {
                let column: Vec<Vec<u8>> = codewords.iter().map(|row| row[col].to_bytes()).collect();
                leaf_hash(&column)
            })
            .collect();
        let tree = MerkleTree::new(leaves);
        log::debug!("ligero: committed {} rows, encoded width {n}", codewords.len());
        EncodedTableau { rows, codewords, tree }
    }

    pub fn column(&self, index: usize) -> Vec<F> {
        self.codewords.iter().map(|row| row[index]).collect()
    }
}
