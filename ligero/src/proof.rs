//! The wire-level proof object, per spec.md §6: "`LigeroProof`: response vectors as
//! length-prefixed field-element arrays, then `Q` column openings each: column contents followed
//! by Merkle path as a run-length-encoded sequence of sibling digests."

use longfellow_field::types::Field;

use crate::merkle::MerklePath;

/// One of the `Q` column-query openings: the full column (one entry per committed row) plus its
/// Merkle authentication path against the commitment root.
#[derive(Clone, Debug)]
pub struct ColumnOpening<F: Field> {
    pub index: usize,
    pub column: Vec<F>,
    pub path: MerklePath,
}

/// `LigeroProof`, per spec.md §3/§4.7/§6: one response row per linear claim, one `(ux, uy, uz)`
/// response triple per quadratic claim, and the shared set of opened columns both kinds of claim
/// are checked against.
#[derive(Clone, Debug)]
pub struct LigeroProof<F: Field> {
    pub linear_responses: Vec<Vec<F>>,
    pub quadratic_responses: Vec<(Vec<F>, Vec<F>, Vec<F>)>,
    pub openings: Vec<ColumnOpening<F>>,
}

impl<F: Field> LigeroProof<F> {
    /// Length-prefixed, little-endian serialization, per spec.md §6. Merkle paths are encoded
    /// as a run-length count of 32-byte sibling digests (every real tree has a fixed depth, so
    /// "run-length-encoded" here just means "count then fixed-size entries", matching the
    /// circuit file's own `nquad`-then-tuples shape in §6).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        write_len(&mut out, self.linear_responses.len());
        for row in &self.linear_responses {
            write_field_vec(&mut out, row);
        }
        write_len(&mut out, self.quadratic_responses.len());
        for (x, y, z) in &self.quadratic_responses {
            write_field_vec(&mut out, x);
            write_field_vec(&mut out, y);
            write_field_vec(&mut out, z);
        }
        write_len(&mut out, self.openings.len());
        for opening in &self.openings {
            write_len(&mut out, opening.index);
            write_field_vec(&mut out, &opening.column);
            write_len(&mut out, opening.path.siblings.len());
            for sibling in &opening.path.siblings {
                out.extend_from_slice(sibling);
            }
        }
        out
    }

    /// Inverse of [`Self::to_bytes`]. Returns `None` on truncated input or a field element that
    /// doesn't parse to a canonical value — never panics, since this runs on verifier-supplied
    /// bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let mut cursor = 0usize;
        let n_linear = read_len(bytes, &mut cursor)?;
        let mut linear_responses = Vec::with_capacity(n_linear);
        for _ in 0..n_linear {
            linear_responses.push(read_field_vec::<F>(bytes, &mut cursor)?);
        }

        let n_quad = read_len(bytes, &mut cursor)?;
        let mut quadratic_responses = Vec::with_capacity(n_quad);
        for _ in 0..n_quad {
            let x = read_field_vec::<F>(bytes, &mut cursor)?;
            let y = read_field_vec::<F>(bytes, &mut cursor)?;
            let z = read_field_vec::<F>(bytes, &mut cursor)?;
            quadratic_responses.push((x, y, z));
        }

        let n_openings = read_len(bytes, &mut cursor)?;
        let mut openings = Vec::with_capacity(n_openings);
        for _ in 0..n_openings {
            let index = read_len(bytes, &mut cursor)?;
            let column = read_field_vec::<F>(bytes, &mut cursor)?;
            let n_siblings = read_len(bytes, &mut cursor)?;
            let mut siblings = Vec::with_capacity(n_siblings);
            for _ in 0..n_siblings {
                let slice = bytes.get(cursor..cursor + 32)?;
                cursor += 32;
                siblings.push(slice.try_into().ok()?);
            }
            openings.push(ColumnOpening { index, column, path: MerklePath { siblings } });
        }

        Some(LigeroProof { linear_responses, quadratic_responses, openings })
    }
}

fn write_len(out: &mut Vec<u8>, n: usize) {
    out.extend_from_slice(&(n as u64).to_le_bytes());
}

fn write_field_vec<F: Field>(out: &mut Vec<u8>, values: &[F]) {
    write_len(out, values.len());
    for v in values {
        out.extend_from_slice(&v.to_bytes());
    }
}

fn read_len(bytes: &[u8], cursor: &mut usize) -> Option<usize> {
    let slice = bytes.get(*cursor..*cursor + 8)?;
    *cursor += 8;
    Some(u64::from_le_bytes(slice.try_into().ok()?) as usize)
}

fn read_field_vec<F: Field>(bytes: &[u8], cursor: &mut usize) -> Option<Vec<F>> {
    let n = read_len(bytes, cursor)?;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let slice = bytes.get(*cursor..*cursor + F::BYTES)?;
        *cursor += F::BYTES;
        out.push(F::from_bytes(slice)?);
    }
    Some(out)
}
