//! Merkle tree hashing shared by the FORS trees and the hypertree subtrees.
//!
//! A node at height `z` with index `j` inside a tree whose leaves start at global index
//! `idx_offset` is hashed under the tree address with height `z` and index
//! `j + (idx_offset >> z)`. FORS places its `k` trees side by side in one index space this
//! way; hypertree subtrees always use offset zero.

use crate::adrs::Adrs;
use crate::hash::Engine;
use rayon::prelude::*;

/// Address of the node at `height`/`index` of the tree addressed by `tree_adrs`.
pub(crate) fn node_adrs(tree_adrs: Adrs, height: u32, index: u32) -> Adrs {
    tree_adrs.with_tree_height(height).with_tree_index(index)
}

/// Computes the root of a tree of the given height, together with the authentication path
/// of `leaf_idx`.
///
/// Leaf `i` is `gen_leaf(idx_offset + i)`. Leaves are generated in parallel; the result does
/// not depend on scheduling.
pub(crate) fn treehash<F>(
    engine: &Engine,
    leaf_idx: u32,
    idx_offset: u32,
    height: usize,
    tree_adrs: Adrs,
    gen_leaf: F,
) -> (Vec<u8>, Vec<u8>)
where
    F: Fn(u32) -> Vec<u8> + Sync,
{
    let n = engine.n();
    let leaves: Vec<Vec<u8>> = (0..1_u32 << height)
        .into_par_iter()
        .map(|i| gen_leaf(idx_offset + i))
        .collect();

    let mut level = leaves.concat();
    let mut auth_path = Vec::with_capacity(height * n);
    for z in 1..=height {
        let sibling = ((leaf_idx >> (z - 1)) ^ 1) as usize;
        auth_path.extend_from_slice(&level[sibling * n..(sibling + 1) * n]);

        let offset = idx_offset >> z;
        let mut next = vec![0u8; level.len() / 2];
        next.par_chunks_mut(n)
            .zip(level.par_chunks(2 * n))
            .enumerate()
            .for_each(|(j, (node, children))| {
                engine.thash(node, children, &node_adrs(tree_adrs, z as u32, offset + j as u32));
            });
        level = next;
    }

    (level, auth_path)
}

/// Computes a root node given a leaf and an authentication path.
///
/// The tree height is the length of `auth_path` in nodes.
pub(crate) fn compute_root(
    engine: &Engine,
    leaf: &[u8],
    mut leaf_idx: u32,
    mut idx_offset: u32,
    auth_path: &[u8],
    tree_adrs: Adrs,
) -> Vec<u8> {
    let n = engine.n();
    let mut node = leaf.to_vec();
    let mut buffer = vec![0u8; 2 * n];

    for (z, sibling) in auth_path.chunks_exact(n).enumerate() {
        // If leaf_idx is odd, the current node is a right child and the path goes left.
        if leaf_idx & 1 == 1 {
            buffer[..n].copy_from_slice(sibling);
            buffer[n..].copy_from_slice(&node);
        } else {
            buffer[..n].copy_from_slice(&node);
            buffer[n..].copy_from_slice(sibling);
        }
        leaf_idx >>= 1;
        idx_offset >>= 1;
        engine.thash(
            &mut node,
            &buffer,
            &node_adrs(tree_adrs, z as u32 + 1, leaf_idx + idx_offset),
        );
    }

    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adrs::AdrsType;
    use crate::params::SPHINCS_SHAKE_128F;

    fn leaf(engine: &Engine, i: u32) -> Vec<u8> {
        let mut out = vec![0u8; engine.n()];
        let input = vec![i as u8; engine.n()];
        engine.thash(
            &mut out,
            &input,
            &Adrs::new(AdrsType::ForsTree).with_tree_index(i),
        );
        out
    }

    #[test]
    fn test_every_auth_path_reaches_the_root() {
        let engine = Engine::new(SPHINCS_SHAKE_128F, &[4u8; 16]).unwrap();
        let tree_adrs = Adrs::new(AdrsType::Tree).with_layer(1).with_tree(5);
        let height = 4;

        let (root, _) = treehash(&engine, 0, 0, height, tree_adrs, |i| leaf(&engine, i));
        for leaf_idx in 0..1_u32 << height {
            let (same_root, auth_path) =
                treehash(&engine, leaf_idx, 0, height, tree_adrs, |i| leaf(&engine, i));
            assert_eq!(same_root, root);
            assert_eq!(auth_path.len(), height * engine.n());

            let recomputed = compute_root(
                &engine,
                &leaf(&engine, leaf_idx),
                leaf_idx,
                0,
                &auth_path,
                tree_adrs,
            );
            assert_eq!(recomputed, root);

            let mut forged = auth_path.clone();
            forged[engine.n() * (height - 1)] ^= 0x80;
            assert_ne!(
                compute_root(&engine, &leaf(&engine, leaf_idx), leaf_idx, 0, &forged, tree_adrs),
                root
            );
            assert_ne!(
                compute_root(
                    &engine,
                    &leaf(&engine, leaf_idx),
                    leaf_idx ^ 1,
                    0,
                    &auth_path,
                    tree_adrs
                ),
                root
            );
        }
    }

    #[test]
    fn test_offset_tree() {
        let engine = Engine::new(SPHINCS_SHAKE_128F, &[4u8; 16]).unwrap();
        let tree_adrs = Adrs::new(AdrsType::ForsTree).with_keypair(2);
        let height = 3;
        let offset = 2 << height;

        let (root, auth_path) =
            treehash(&engine, 5, offset, height, tree_adrs, |i| leaf(&engine, i));
        let (root_no_offset, _) = treehash(&engine, 5, 0, height, tree_adrs, |i| leaf(&engine, i));
        assert_ne!(root, root_no_offset);

        let recomputed = compute_root(
            &engine,
            &leaf(&engine, offset + 5),
            5,
            offset,
            &auth_path,
            tree_adrs,
        );
        assert_eq!(recomputed, root);
    }
}
