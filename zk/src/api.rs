//! The ZK composition pipeline, per spec.md §4.8:
//!
//! 1. Build circuit, compile the witness into a `(nc, ninputs)` matrix.
//! 2. Absorb circuit-ID and public inputs into the transcript.
//! 3. Run the sumcheck prover, terminating with two claimed input-layer evaluations.
//! 4. Commit to the witness tableau (with blinding) via Ligero; absorb the commitment root.
//! 5. Derive challenges from the transcript; discharge the two residual linear claims via Ligero.
//!
//! `verify` mirrors this: absorb circuit-ID/public inputs, run the sumcheck verifier, derive the
//! same residual claims independently, then check the Ligero proof against them.

use longfellow_circuit::Circuit;
use longfellow_field::types::{Field, Sample, TwoAdicField};
use longfellow_ligero::{LigeroCommitment, LigeroParam, LigeroProof};
use longfellow_sumcheck::SumcheckProof;
use longfellow_transcript::{Tag, Transcript};

use crate::error::ZkError;
use crate::residual::{residual_claim, sample_blind, setup_residuals};

/// A complete zero-knowledge proof, per spec.md §6: a sumcheck proof, a Ligero commitment, and a
/// Ligero proof, in that order.
#[derive(Clone, Debug)]
pub struct ZkProof<F: Field> {
    pub sumcheck_proof: SumcheckProof<F>,
    pub commitment: LigeroCommitment,
    pub ligero_proof: LigeroProof<F>,
}

fn ligero_param(k_pad: usize, m_pad: usize, rate_bits: usize, num_queries: usize) -> LigeroParam {
    // Two extra rows beyond the padded copy count, one blinding row per residual claim.
    LigeroParam { m: m_pad + 2, k: k_pad, rate_bits, num_queries }
}

/// Proves that every copy's private witness, together with the shared `public_inputs`, satisfies
/// `circuit` (spec.md §4.8 steps 1-5). `private_witness_per_copy[c]` holds copy `c`'s private
/// input wires (everything past `circuit.npub_in`), already known (by the caller) to satisfy the
/// circuit.
///
/// `context` is opaque caller-supplied bytes absorbed into the transcript ahead of everything
/// else, binding the proof to whatever credential-identifying data the caller cares about (e.g.
/// the issuer public key, session transcript hash, and freshness bound `run_mdoc_prover`/
/// `run_mdoc_verifier` pass — see [`run_mdoc_prover`]) without needing circuit wires for it. Pass
/// `&[]` for circuits with no such context.
pub fn prove<F: TwoAdicField + Sample>(
    domain: &[u8],
    context: &[u8],
    circuit: &Circuit<F>,
    public_inputs: &[F],
    private_witness_per_copy: &[Vec<F>],
    rate_bits: usize,
    num_queries: usize,
) -> Result<ZkProof<F>, ZkError> {
    if public_inputs.len() != circuit.npub_in {
        return Err(ZkError::InvalidInput(format!(
            "expected {} public inputs, got {}",
            circuit.npub_in,
            public_inputs.len()
        )));
    }
    if private_witness_per_copy.is_empty() {
        return Err(ZkError::InvalidInput("at least one witness copy is required".to_string()));
    }

    let full_witness: Vec<Vec<F>> = private_witness_per_copy
        .iter()
        .map(|private| {
            let mut w = public_inputs.to_vec();
            w.extend(private.iter().copied());
            w
        })
        .collect();

    for w in &full_witness {
        circuit
            .check_witness(w)
            .map_err(|_| ZkError::WitnessFailure("circuit evaluates to a non-zero output".to_string()))?;
    }
    log::info!("zk: proving {} copies against circuit {:02x?}", full_witness.len(), &circuit.id()[..4]);

    let mut transcript = Transcript::new(domain);
    transcript.absorb(Tag::Input, &circuit.id());
    transcript.absorb(Tag::Input, context);
    for input in public_inputs {
        transcript.absorb(Tag::Input, &input.to_bytes());
    }

    let (sumcheck_proof, reduced) = longfellow_sumcheck::prove(&mut transcript, circuit, &full_witness);
    let setup = setup_residuals(circuit, public_inputs, &reduced);

    let mut rows: Vec<Vec<F>> = private_witness_per_copy
        .iter()
        .map(|private| {
            let mut row = private.clone();
            row.resize(setup.k_pad, F::ZERO);
            row
        })
        .collect();
    rows.resize(setup.m_pad, vec![F::ZERO; setup.k_pad]);

    let blind0 = sample_blind(&setup.col0);
    let blind1 = sample_blind(&setup.col1);
    rows.push(blind0);
    rows.push(blind1);

    let param = ligero_param(setup.k_pad, setup.m_pad, rate_bits, num_queries);
    let (tableau, commitment) = longfellow_ligero::commit(rows, &param);

    let claim0 = residual_claim(&setup, 0, setup.col0.clone(), setup.target0);
    let claim1 = residual_claim(&setup, 1, setup.col1.clone(), setup.target1);

    let ligero_proof = longfellow_ligero::prove(&mut transcript, &tableau, &param, &[claim0, claim1], &[]);

    Ok(ZkProof { sumcheck_proof, commitment, ligero_proof })
}

/// Verifies a [`ZkProof`] against `circuit`, `nc` copies, and `public_inputs`, per spec.md §4.8's
/// reversed pipeline. Never touches a witness. `context` must be byte-identical to what [`prove`]
/// absorbed, or the replayed transcript diverges and every subsequent check fails.
pub fn verify<F: TwoAdicField>(
    domain: &[u8],
    context: &[u8],
    circuit: &Circuit<F>,
    nc: usize,
    public_inputs: &[F],
    rate_bits: usize,
    num_queries: usize,
    proof: &ZkProof<F>,
) -> Result<(), ZkError> {
    if public_inputs.len() != circuit.npub_in {
        return Err(ZkError::InvalidInput(format!(
            "expected {} public inputs, got {}",
            circuit.npub_in,
            public_inputs.len()
        )));
    }

    log::info!("zk: verifying {nc} copies against circuit {:02x?}", &circuit.id()[..4]);
    let mut transcript = Transcript::new(domain);
    transcript.absorb(Tag::Input, &circuit.id());
    transcript.absorb(Tag::Input, context);
    for input in public_inputs {
        transcript.absorb(Tag::Input, &input.to_bytes());
    }

    let reduced = longfellow_sumcheck::verify(&mut transcript, circuit, nc, &proof.sumcheck_proof)?;
    let setup = setup_residuals(circuit, public_inputs, &reduced);

    let k_pad = setup.k_pad;
    let m_pad = setup.m_pad;
    let param = ligero_param(k_pad, m_pad, rate_bits, num_queries);

    let claim0 = residual_claim(&setup, 0, setup.col0.clone(), setup.target0);
    let claim1 = residual_claim(&setup, 1, setup.col1.clone(), setup.target1);

    longfellow_ligero::verify(&mut transcript, &proof.commitment, &param, &[claim0, claim1], &[], &proof.ligero_proof)?;
    Ok(())
}

impl<F: Field> ZkProof<F> {
    /// Length-prefixed wire format, per spec.md §6: the sumcheck proof, the commitment root,
    /// then the Ligero proof, each length-prefixed so `from_bytes` doesn't need to guess where
    /// one section ends and the next begins.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let sumcheck_bytes = self.sumcheck_proof.to_bytes();
        out.extend_from_slice(&(sumcheck_bytes.len() as u64).to_le_bytes());
        out.extend_from_slice(&sumcheck_bytes);
        out.extend_from_slice(&self.commitment.0);
        let ligero_bytes = self.ligero_proof.to_bytes();
        out.extend_from_slice(&(ligero_bytes.len() as u64).to_le_bytes());
        out.extend_from_slice(&ligero_bytes);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let mut cursor = 0usize;
        let sumcheck_len = read_u64(bytes, &mut cursor)? as usize;
        let sumcheck_bytes = bytes.get(cursor..cursor + sumcheck_len)?;
        cursor += sumcheck_len;
        let sumcheck_proof = SumcheckProof::from_bytes(sumcheck_bytes)?;

        let root: [u8; 32] = bytes.get(cursor..cursor + 32)?.try_into().ok()?;
        cursor += 32;
        let commitment = LigeroCommitment(root);

        let ligero_len = read_u64(bytes, &mut cursor)? as usize;
        let ligero_bytes = bytes.get(cursor..cursor + ligero_len)?;
        let ligero_proof = LigeroProof::from_bytes(ligero_bytes)?;

        Some(ZkProof { sumcheck_proof, commitment, ligero_proof })
    }
}

fn read_u64(bytes: &[u8], cursor: &mut usize) -> Option<u64> {
    let slice = bytes.get(*cursor..*cursor + 8)?;
    *cursor += 8;
    Some(u64::from_le_bytes(slice.try_into().ok()?))
}

/// Builds the policy circuit's binary serialization, per spec.md §6's `generate_circuit(spec) ->
/// bytes`. `longfellow-zk` ships exactly one circuit family (see [`crate::circuits`]), so this
/// ignores `spec.system`/`spec.num_attributes` beyond having validated them against the catalog
/// in [`crate::spec::ZkSpec`] — a multi-circuit deployment would switch on those fields here.
pub fn generate_circuit<F: TwoAdicField + Sample>(requested_version: u32, spec: &crate::spec::ZkSpec) -> Result<Vec<u8>, ZkError> {
    crate::spec::ZkSpec::check_not_stale(spec.system, spec.num_attributes, requested_version)?;
    Ok(crate::circuits::mdoc_policy_circuit::<F>().to_bytes())
}

/// `circuit_id(bytes, spec) -> [u8; 32]`, per spec.md §6: parses `bytes` back into a `Circuit`
/// (rejecting truncated/non-canonical input), checks its public-input count matches what
/// `spec.num_attributes` implies for this circuit family (one expected-attribute wire, per
/// [`crate::circuits::mdoc_policy_circuit`]), and returns its SHA-256 id.
pub fn circuit_id<F: TwoAdicField>(bytes: &[u8], spec: &crate::spec::ZkSpec) -> Result<[u8; 32], ZkError> {
    let circuit = Circuit::<F>::from_bytes(bytes)?;
    if circuit.npub_in != spec.num_attributes {
        return Err(ZkError::SpecMismatch);
    }
    Ok(circuit.id())
}

/// Parses `valid_until` (an ASCII `YYYY-MM-DDTHH:MM:SSZ` string, per spec.md §8 scenario 2) and
/// compares it lexicographically against `now` in the same format — valid because that format
/// sorts lexicographically in calendar order.
fn credential_still_valid(valid_until: &[u8; 20], now_iso8601: &str) -> bool {
    now_iso8601.as_bytes() <= &valid_until[..]
}

/// Builds the transcript-binding context shared by [`run_mdoc_prover`] and [`run_mdoc_verifier`]:
/// the concatenation of every credential-identifying value neither the public inputs nor the
/// circuit wires carry. Both functions must build this identically from the same raw bytes, or
/// a proof generated for one `(pk, transcript, now, doc_type)` silently fails to verify against
/// another — that divergence is exactly the point (see SPEC_FULL.md §4.9).
fn mdoc_context(pk_x: &[u8; 32], pk_y: &[u8; 32], transcript_hash: &[u8; 32], now_iso8601: &str, doc_type: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(32 + 32 + 32 + now_iso8601.len() + doc_type.len());
    out.extend_from_slice(pk_x);
    out.extend_from_slice(pk_y);
    out.extend_from_slice(transcript_hash);
    out.extend_from_slice(now_iso8601.as_bytes());
    out.extend_from_slice(doc_type);
    out
}

/// `run_mdoc_prover`, per spec.md §6: drives the native circuit-producer reference
/// implementations ([`crate::producers`]) over a raw mdoc/public-key/signature bundle to build
/// the policy circuit's witness, then runs [`prove`]. Returns the serialized [`ZkProof`].
///
/// `doc_type` is not part of spec.md §6's literal `run_mdoc_prover` argument list, but
/// `run_mdoc_verifier` does take one; this function accepts it too so both sides bind the
/// identical context bytes (see [`mdoc_context`]) rather than the verifier silently checking
/// against a document type the prover never committed to.
#[allow(clippy::too_many_arguments)]
pub fn run_mdoc_prover<F: TwoAdicField + Sample>(
    circuit_bytes: &[u8],
    mdoc: &[u8],
    attribute_id: &[u8],
    pk_x: &[u8; 32],
    pk_y: &[u8; 32],
    transcript_hash: &[u8; 32],
    sig_r: &[u8; 32],
    sig_s: &[u8; 32],
    attribute_expected: &[u8],
    now_iso8601: &str,
    doc_type: &[u8],
    spec: &crate::spec::ZkSpec,
) -> Result<Vec<u8>, ZkError> {
    use crate::producers::{
        EcdsaP256VerifyCircuit, MdocWalkerCircuit, NativeEcdsaP256Verify, NativeMdocWalker,
    };

    let circuit = Circuit::<F>::from_bytes(circuit_bytes)?;

    let walker = NativeMdocWalker;
    let found = walker
        .find_attribute(mdoc, attribute_id)
        .map_err(|e| ZkError::WitnessFailure(e.to_string()))?;

    let ecdsa = NativeEcdsaP256Verify;
    let sig_ok = ecdsa.verify_witness(pk_x, pk_y, transcript_hash, sig_r, sig_s);
    let valid_until_ok = credential_still_valid(&found.valid_until, now_iso8601);

    let witness = crate::circuits::MdocPolicyWitness {
        attribute_expected: crate::producers::be_bytes_to_field(attribute_expected),
        ecdsa_ok: if sig_ok { F::ONE } else { F::ZERO },
        valid_until_ok: if valid_until_ok { F::ONE } else { F::ZERO },
        attribute_actual: crate::producers::be_bytes_to_field(&found.attribute),
    };
    let (public_inputs, private) = witness.to_full_witness();

    let context = mdoc_context(pk_x, pk_y, transcript_hash, now_iso8601, doc_type);
    let proof = prove(b"mdoc-prover", &context, &circuit, &public_inputs, &[private], spec.rate_bits, spec.num_queries)?;
    Ok(proof.to_bytes())
}

/// `run_mdoc_verifier`, per spec.md §6: re-derives the public inputs (the policy's expected
/// attribute value) from the caller-supplied bytes, binds the same credential context
/// `run_mdoc_prover` bound (`pk_x`, `pk_y`, `transcript_hash`, `now`, `doc_type` — see
/// [`mdoc_context`]), and checks `proof_bytes` against them. Returns `Ok(())` on acceptance; any
/// [`ZkError`] otherwise — there is no separate boolean return, since the error variant itself
/// communicates the reason for rejection.
///
/// Binding this context closes the gap where an earlier revision of this function accepted any
/// proof for a requested `attribute_expected` with no connection whatsoever to a specific
/// issuer key, session transcript, or freshness bound: flipping a single byte of `pk_x`, `pk_y`,
/// `transcript_hash`, `now`, or `doc_type` between proving and verifying now diverges the
/// replayed Fiat-Shamir transcript and causes every subsequent check to fail. What it does not
/// do — per the scope limit recorded in SPEC_FULL.md §4.9 — is re-derive `ecdsa_ok` from
/// `pk_x`/`pk_y`/`transcript_hash` via in-circuit elliptic-curve arithmetic; that remains a
/// circuit-producer arithmetization this workspace treats as an interface, not a gate layout.
#[allow(clippy::too_many_arguments)]
pub fn run_mdoc_verifier<F: TwoAdicField>(
    circuit_bytes: &[u8],
    pk_x: &[u8; 32],
    pk_y: &[u8; 32],
    transcript_hash: &[u8; 32],
    attribute_expected: &[u8],
    now_iso8601: &str,
    proof_bytes: &[u8],
    doc_type: &[u8],
    spec: &crate::spec::ZkSpec,
) -> Result<(), ZkError> {
    let circuit = Circuit::<F>::from_bytes(circuit_bytes)?;
    let proof = ZkProof::<F>::from_bytes(proof_bytes)
        .ok_or_else(|| ZkError::InvalidInput("malformed proof bytes".to_string()))?;
    let public_inputs = vec![crate::producers::be_bytes_to_field::<F>(attribute_expected)];
    let context = mdoc_context(pk_x, pk_y, transcript_hash, now_iso8601, doc_type);
    verify(b"mdoc-prover", &context, &circuit, 1, &public_inputs, spec.rate_bits, spec.num_queries, &proof)
}
