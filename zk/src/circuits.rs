//! The one concrete circuit this crate compiles: the MDOC attribute-policy check named in
//! spec.md §8 scenarios 1-3. Its inputs are the *outputs* of the native circuit-producer
//! reference implementations in [`crate::producers`] (an ECDSA verification flag, a validity-date
//! flag, and the disclosed attribute's value), not their raw byte-level computations — the
//! producers themselves remain interfaces, per spec.md §1/§4.9.

use longfellow_circuit::{Circuit, QuadCircuit};
use longfellow_field::types::Field;

/// Input-wire layout for [`mdoc_policy_circuit`]: `attribute_expected` is public (the verifier
/// supplies the policy's required value independently); the rest are private witness, populated
/// from the native producers' outputs.
#[derive(Copy, Clone, Debug)]
pub struct MdocPolicyWitness<F: Field> {
    pub attribute_expected: F,
    pub ecdsa_ok: F,
    pub valid_until_ok: F,
    pub attribute_actual: F,
}

impl<F: Field> MdocPolicyWitness<F> {
    /// Order matches [`mdoc_policy_circuit`]'s `reserve_inputs(4, 1)`: the public input first,
    /// then the three private ones.
    pub fn to_full_witness(self) -> (Vec<F>, Vec<F>) {
        (vec![self.attribute_expected], vec![self.ecdsa_ok, self.valid_until_ok, self.attribute_actual])
    }
}

/// Builds the circuit asserting: the signature verifies, the credential is still valid, and the
/// disclosed attribute equals the policy's expected value (spec.md §8 scenarios 1-3). Every
/// assertion here is a native `assert_eq` against a producer-computed flag, per
/// spec.md §9 ("`assert_eq(a,b)` becomes an output wire `a-b` that must evaluate to zero").
pub fn mdoc_policy_circuit<F: Field>() -> Circuit<F> {
    let mut builder = QuadCircuit::<F>::new();
    builder.reserve_inputs(4, 1);

    let attribute_expected = builder.input(0);
    let ecdsa_ok = builder.input(1);
    let valid_until_ok = builder.input(2);
    let attribute_actual = builder.input(3);

    let one = builder.konst(F::ONE);
    builder.assert_eq(ecdsa_ok, one);
    builder.assert_eq(valid_until_ok, one);
    builder.assert_eq(attribute_actual, attribute_expected);

    builder.build()
}
