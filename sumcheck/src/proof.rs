use longfellow_field::types::Field;

/// One layer's worth of sumcheck rounds, per spec.md §4.6. Copy-bit rounds are empty when the
/// circuit is run for a single copy (`nc == 1`, i.e. `logc == 0`) — the common case for a
/// single-credential MDOC proof — since there is then nothing to reduce over the copy axis.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerProof<F: Field> {
    pub copy_rounds: Vec<[F; 3]>,
    /// `A0_ext(rho)`, the value handed from the copy phase into the left-hand phase. Unused
    /// (and not separately checked) when `copy_rounds` is empty.
    pub copy_mid: F,
    pub left_rounds: Vec<[F; 3]>,
    /// `f1_ext(rx)`, the value bridging the left-hand phase into the right-hand phase.
    pub mid_claim: F,
    pub right_rounds: Vec<[F; 3]>,
    /// The two wire evaluations handed to the next (deeper) layer as its new claims.
    pub wc0: F,
    pub wc1: F,
}

/// The full layer-by-layer sumcheck proof: one [`LayerProof`] per layer of the circuit, from the
/// output layer to the one just above the base/input layer.
#[derive(Clone, Debug, PartialEq)]
pub struct SumcheckProof<F: Field> {
    pub layers: Vec<LayerProof<F>>,
}

impl<F: Field> SumcheckProof<F> {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(self.layers.len() as u64).to_le_bytes());
        for layer in &self.layers {
            write_rounds(&mut out, &layer.copy_rounds);
            write_field(&mut out, layer.copy_mid);
            write_rounds(&mut out, &layer.left_rounds);
            write_field(&mut out, layer.mid_claim);
            write_rounds(&mut out, &layer.right_rounds);
            write_field(&mut out, layer.wc0);
            write_field(&mut out, layer.wc1);
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let mut cursor = 0usize;
        let nlayers = read_u64(bytes, &mut cursor)? as usize;
        let mut layers = Vec::with_capacity(nlayers);
        for _ in 0..nlayers {
            let copy_rounds = read_rounds::<F>(bytes, &mut cursor)?;
            let copy_mid = read_field::<F>(bytes, &mut cursor)?;
            let left_rounds = read_rounds::<F>(bytes, &mut cursor)?;
            let mid_claim = read_field::<F>(bytes, &mut cursor)?;
            let right_rounds = read_rounds::<F>(bytes, &mut cursor)?;
            let wc0 = read_field::<F>(bytes, &mut cursor)?;
            let wc1 = read_field::<F>(bytes, &mut cursor)?;
            layers.push(LayerProof { copy_rounds, copy_mid, left_rounds, mid_claim, right_rounds, wc0, wc1 });
        }
        Some(SumcheckProof { layers })
    }
}

fn write_field<F: Field>(out: &mut Vec<u8>, f: F) {
    out.extend_from_slice(&f.to_bytes());
}

fn write_rounds<F: Field>(out: &mut Vec<u8>, rounds: &[[F; 3]]) {
    out.extend_from_slice(&(rounds.len() as u64).to_le_bytes());
    for p in rounds {
        for &v in p {
            write_field(out, v);
        }
    }
}

fn read_u64(bytes: &[u8], cursor: &mut usize) -> Option<u64> {
    let slice = bytes.get(*cursor..*cursor + 8)?;
    *cursor += 8;
    Some(u64::from_le_bytes(slice.try_into().ok()?))
}

fn read_field<F: Field>(bytes: &[u8], cursor: &mut usize) -> Option<F> {
    let slice = bytes.get(*cursor..*cursor + F::BYTES)?;
    *cursor += F::BYTES;
    F::from_bytes(slice)
}

fn read_rounds<F: Field>(bytes: &[u8], cursor: &mut usize) -> Option<Vec<[F; 3]>> {
    let n = read_u64(bytes, cursor)? as usize;
    let mut rounds = Vec::with_capacity(n);
    for _ in 0..n {
        let a = read_field::<F>(bytes, cursor)?;
        let b = read_field::<F>(bytes, cursor)?;
        let c = read_field::<F>(bytes, cursor)?;
        rounds.push([a, b, c]);
    }
    Some(rounds)
}
