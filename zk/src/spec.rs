//! The `ZkSpec` catalog, per spec.md §6/§9: a static table mapping `(system, num_attributes)` to
//! the deployed circuit's version and tuned Ligero parameters. Resolves spec.md §9's
//! "circuit-hash-list drift" open question: `generate_circuit` rejects any version older than the
//! latest one on file for that attribute count (the "no regeneration of legacy circuits" policy).

use crate::error::ZkError;

/// One deployed circuit's identity and Reed-Solomon/query tuning. `ligero_block_enc`/
/// `ligero_sig_block_enc` are the `block_enc` values [`crate::tune::tune_block_enc`] picked for
/// the attribute-policy and signature circuits respectively — recorded here, per spec.md §9,
/// rather than recomputed on every proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZkSpec {
    pub system: &'static str,
    pub num_attributes: usize,
    pub version: u32,
    pub rate_bits: usize,
    pub num_queries: usize,
    pub ligero_block_enc: usize,
    pub ligero_sig_block_enc: usize,
}

/// The deployed-circuit catalog.
static TABLE: &[ZkSpec] = &[
    ZkSpec {
        system: "mdoc",
        num_attributes: 1,
        version: 1,
        rate_bits: 2,
        num_queries: 80,
        ligero_block_enc: 64,
        ligero_sig_block_enc: 256,
    },
    ZkSpec {
        system: "mdoc",
        num_attributes: 4,
        version: 1,
        rate_bits: 2,
        num_queries: 80,
        ligero_block_enc: 128,
        ligero_sig_block_enc: 256,
    },
];

impl ZkSpec {
    /// Looks up the latest deployed spec for `(system, num_attributes)`.
    pub fn for_attributes(system: &str, num_attributes: usize) -> Result<&'static ZkSpec, ZkError> {
        TABLE
            .iter()
            .filter(|s| s.system == system && s.num_attributes == num_attributes)
            .max_by_key(|s| s.version)
            .ok_or_else(|| ZkError::UnknownSpec { system: system.to_string(), num_attributes })
    }

    /// Rejects `requested` if it is older than the latest version on file for this
    /// `(system, num_attributes)` pair, per spec.md §9's "no regeneration of legacy circuits".
    pub fn check_not_stale(system: &str, num_attributes: usize, requested: u32) -> Result<(), ZkError> {
        let latest = Self::for_attributes(system, num_attributes)?;
        if requested < latest.version {
            return Err(ZkError::StaleVersion { num_attributes, requested, latest: latest.version });
        }
        Ok(())
    }
}
