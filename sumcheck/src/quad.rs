//! `Quad`: a layer's quadratic-term list folded against the two upstream wire claims, per
//! spec.md §4.6:
//!
//! ```text
//! Quad_l(h0, h1) := alpha * sum_g eq(g0, g) * mult_l(g, h0, h1)
//!                 + beta  * sum_g eq(g1, g) * mult_l(g, h0, h1)
//! ```
//!
//! where `mult_l(g, h0, h1)` is the layer's constant coefficient for term `(g, h0, h1)` (zero if
//! no such term exists). Both hands of a layer's sumcheck (left/`h0`, right/`h1`) consume this
//! same folded term list; only the order of binding differs.

use std::collections::HashMap;

use longfellow_circuit::Layer;
use longfellow_field::types::Field;

use crate::eq::eq_eval_index;

/// `Quad_l`, represented sparsely as deduplicated `(h0, h1, coefficient)` triples. Construction
/// (`from_layer`) folds in the layer's constant table and the two claim points in one pass;
/// every other method treats `Quad` as a fixed bivariate function.
#[derive(Clone, Debug)]
pub struct Quad<F: Field> {
    pub terms: Vec<(u32, u32, F)>,
}

impl<F: Field> Quad<F> {
    /// Folds `alpha * mult(g0, .) + beta * mult(g1, .)` into one sparse term list.
    pub fn from_layer(layer: &Layer, consts: &[F], g0: &[F], g1: &[F], alpha: F, beta: F) -> Self {
        let mut acc: HashMap<(u32, u32), F> = HashMap::new();
        for term in &layer.terms {
            let k = consts[term.k as usize];
            let weight = alpha * eq_eval_index(g0, term.g) + beta * eq_eval_index(g1, term.g);
            if weight.is_zero() {
                continue;
            }
            *acc.entry((term.h0, term.h1)).or_insert(F::ZERO) += k * weight;
        }
        let mut terms: Vec<_> = acc
            .into_iter()
            .filter(|&(_, v)| v.is_nonzero())
            .map(|((h0, h1), v)| (h0, h1, v))
            .collect();
        terms.sort_by_key(|&(h0, h1, _)| (h0, h1));
        Quad { terms }
    }

    /// Dense `f1[h0] = sum_h1 Quad(h0, h1) * w[h1]`, the left hand's "other factor" array:
    /// `w` is the layer's full (boolean) input witness, already known to the prover.
    pub fn fold_against_witness_h1(&self, w: &[F], nw_in: usize) -> Vec<F> {
        let mut f = vec![F::ZERO; nw_in];
        for &(h0, h1, c) in &self.terms {
            f[h0 as usize] += c * w[h1 as usize];
        }
        f
    }

    /// Dense `g1[h1] = sum_h0 EQ(rx, h0) * Quad(h0, h1)` — the multilinear extension of `Quad`
    /// in its first argument, evaluated at the left hand's challenge point `rx` and left dense
    /// (boolean) in `h1` for the right hand's sumcheck.
    pub fn fold_at_rx_h1(&self, rx: &[F], nw_in: usize) -> Vec<F> {
        let mut g = vec![F::ZERO; nw_in];
        for &(h0, h1, c) in &self.terms {
            g[h1 as usize] += c * eq_eval_index(rx, h0);
        }
        g
    }

    /// `Quad(rx, ry)`, the fully-bound bivariate evaluation, computed directly from the (public)
    /// term list. This is what the verifier uses for the per-layer final check — no dense table,
    /// no trust in a prover-supplied intermediate value.
    pub fn eval(&self, rx: &[F], ry: &[F]) -> F {
        self.terms
            .iter()
            .fold(F::ZERO, |acc, &(h0, h1, c)| acc + c * eq_eval_index(rx, h0) * eq_eval_index(ry, h1))
    }
}

#[cfg(test)]
mod tests {
    use longfellow_circuit::QuadTerm;
    use longfellow_field::fp128::Fp128;
    use longfellow_field::types::Sample;

    use super::*;
    use crate::eq::eq_table;

    fn tiny_layer() -> (Layer, Vec<Fp128>) {
        // out[0] = 3*in[0]*in[1] + 2*in[1]*in[1]
        let consts = vec![Fp128::from_canonical_u64(3), Fp128::from_canonical_u64(2)];
        let layer = Layer {
            output_width: 1,
            input_width: 2,
            terms: vec![QuadTerm::new(0, 0, 1, 0), QuadTerm::new(0, 1, 1, 1)],
        };
        (layer, consts)
    }

    #[test]
    fn fold_against_witness_then_rx_agrees_with_direct_eval() {
        let (layer, consts) = tiny_layer();
        let g0: Vec<Fp128> = Fp128::rand_vec(1);
        let g1: Vec<Fp128> = Fp128::rand_vec(1);
        let alpha = Fp128::rand();
        let beta = Fp128::rand();
        let quad = Quad::from_layer(&layer, &consts, &g0, &g1, alpha, beta);

        let w = [Fp128::from_canonical_u64(5), Fp128::from_canonical_u64(7)];
        let f1 = quad.fold_against_witness_h1(&w, 2);
        // sum_h0 w[h0]*f1[h0] should equal sum_{h0,h1} Quad(h0,h1)*w[h0]*w[h1]
        let lhs: Fp128 = (0..2).map(|i| w[i] * f1[i]).sum();
        let rhs: Fp128 = quad.terms.iter().map(|&(h0, h1, c)| c * w[h0 as usize] * w[h1 as usize]).sum();
        assert_eq!(lhs, rhs);

        let rx: Vec<Fp128> = Fp128::rand_vec(1);
        let g1_at_rx = quad.fold_at_rx_h1(&rx, 2);
        let eq_rx = eq_table(&rx);
        let f1_ext_at_rx: Fp128 = (0..2).map(|i| eq_rx[i] * f1[i]).sum();
        let ry: Vec<Fp128> = Fp128::rand_vec(1);
        let eq_ry = eq_table(&ry);
        let direct_eval: Fp128 = (0..2).map(|i| eq_ry[i] * g1_at_rx[i]).sum();
        assert_eq!(direct_eval, quad.eval(&rx, &ry));
        let _ = f1_ext_at_rx;
    }
}
