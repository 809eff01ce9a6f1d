/// Squaring, broken out from `Mul` so field types can override it with a cheaper
/// squaring-specific reduction where one exists (e.g. Montgomery fields, `GF(2^k)`'s
/// characteristic-two `(a+b)^2 = a^2+b^2` shortcut) instead of going through the generic
/// multiply. Every concrete field in this crate provides its own impl; there is deliberately no
/// blanket `impl<F: Mul> Square for F` here, since a blanket impl would conflict with those
/// concrete ones without specialization (a nightly-only feature this crate doesn't enable).
pub trait Square {
    fn square(&self) -> Self;
}
