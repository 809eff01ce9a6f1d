//! A binary Merkle tree over column hashes, per spec.md §4.7/§8 scenario 6 ("Merkle batch
//! openings"). Leaves are padded with a distinguished zero digest up to the next power of two so
//! every tree has a single well-defined root regardless of the column count.

use sha2::{Digest, Sha256};

const ZERO_LEAF: [u8; 32] = [0u8; 32];

fn hash_pair(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"node");
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// A sequence of sibling digests from a leaf up to (but not including) the root, ordered
/// leaf-to-root. spec.md §6 describes this on the wire as "a run-length-encoded sequence of
/// sibling digests"; this in-memory form keeps siblings explicit and lets [`LigeroProof`]
/// serialization (see [`crate::proof`]) apply the run-length encoding at the byte layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerklePath {
    pub siblings: Vec<[u8; 32]>,
}

#[derive(Clone, Debug)]
pub struct MerkleTree {
    levels: Vec<Vec<[u8; 32]>>,
    num_leaves: usize,
}

impl MerkleTree {
    /// Builds a tree over `leaves`, padding with [`ZERO_LEAF`] up to the next power of two.
    pub fn new(leaves: Vec<[u8; 32]>) -> Self {
        let num_leaves = leaves.len();
        let padded_len = num_leaves.next_power_of_two().max(1);
        let mut level = leaves;
        level.resize(padded_len, ZERO_LEAF);

        let mut levels = vec![level];
        while levels.last().expect("at least one level").len() > 1 {
            let prev = levels.last().expect("at least one level");
            let next: Vec<[u8; 32]> = prev.chunks(2).map(|pair| hash_pair(&pair[0], &pair[1])).collect();
            levels.push(next);
        }
        MerkleTree { levels, num_leaves }
    }

    pub fn root(&self) -> [u8; 32] {
        *self.levels.last().expect("at least one level").first().expect("root level has one entry")
    }

    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    pub fn open(&self, mut index: usize) -> MerklePath {
        let mut siblings = Vec::with_capacity(self.levels.len() - 1);
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling_index = index ^ 1;
            siblings.push(level[sibling_index]);
            index >>= 1;
        }
        MerklePath { siblings }
    }
}

/// The standard leaf digest for Ligero columns: `SHA256("leaf" || each field element's canonical
/// bytes concatenated, top to bottom)`.
pub fn leaf_hash(column: &[Vec<u8>]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"leaf");
    for entry in column {
        hasher.update((entry.len() as u64).to_le_bytes());
        hasher.update(entry);
    }
    hasher.finalize().into()
}

impl MerklePath {
    /// Recomputes the root from `leaf` and `self.siblings`, per `index`'s bit pattern (bit 0 of
    /// `index` says whether `leaf` is the left or right child at the bottom level, and so on up),
    /// and checks it matches `root`.
    pub fn verify(&self, root: [u8; 32], mut index: usize, leaf: [u8; 32]) -> bool {
        let mut current = leaf;
        for sibling in &self.siblings {
            current = if index & 1 == 0 { hash_pair(&current, sibling) } else { hash_pair(sibling, &current) };
            index >>= 1;
        }
        current == root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(i: u8) -> [u8; 32] {
        let mut l = [0u8; 32];
        l[0] = i;
        l
    }

    #[test]
    fn every_leaf_authenticates_against_the_root() {
        let leaves: Vec<[u8; 32]> = (0..13u8).map(leaf).collect();
        let tree = MerkleTree::new(leaves.clone());
        let root = tree.root();
        for (i, &l) in leaves.iter().enumerate() {
            let path = tree.open(i);
            assert!(path.verify(root, i, l));
        }
    }

    #[test]
    fn flipping_a_sibling_byte_breaks_verification() {
        let leaves: Vec<[u8; 32]> = (0..8u8).map(leaf).collect();
        let tree = MerkleTree::new(leaves.clone());
        let root = tree.root();
        let mut path = tree.open(3);
        path.siblings[0][0] ^= 1;
        assert!(!path.verify(root, 3, leaves[3]));
    }

    #[test]
    fn a_single_leaf_tree_has_an_empty_path() {
        let tree = MerkleTree::new(vec![leaf(7)]);
        let path = tree.open(0);
        assert!(path.siblings.is_empty());
        assert!(path.verify(tree.root(), 0, leaf(7)));
    }

    /// spec.md §8 scenario 6: a batch of 80 column openings against a 300-leaf tree, the scale
    /// `ZkSpec`'s deployed `mdoc` entries actually run at (`num_queries: 80`, per
    /// `crate::tableau::LigeroParam::encoded_width` sized well past 300 for a realistic witness).
    #[test]
    fn batch_of_eighty_openings_authenticates_against_a_three_hundred_leaf_tree() {
        let leaves: Vec<[u8; 32]> = (0..300u32)
            .map(|i| {
                let mut l = [0u8; 32];
                l[..4].copy_from_slice(&i.to_le_bytes());
                l
            })
            .collect();
        let tree = MerkleTree::new(leaves.clone());
        let root = tree.root();

        let queried: Vec<usize> = (0..300).step_by(300 / 80).take(80).collect();
        assert_eq!(queried.len(), 80);
        for &i in &queried {
            let path = tree.open(i);
            assert!(path.verify(root, i, leaves[i]));
        }

        // Tampering with one opening's sibling must not authenticate any leaf at that index.
        let mut tampered = tree.open(queried[17]);
        tampered.siblings[0][0] ^= 1;
        assert!(!tampered.verify(root, queried[17], leaves[queried[17]]));
    }
}
