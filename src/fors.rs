//! # Forest Of Random Subsets (FORS)
//!
//! FORS is the few-time signature at the bottom of the hypertree. It signs the `k·a`-bit
//! digest produced by `H_msg`: the digest is cut into `k` indices of `a` bits and each index
//! reveals one secret leaf of its own tree of height `a`, together with the authentication
//! path to that tree's root. The `k` roots, compressed by one tweakable hash, form the FORS
//! public key, which the hypertree then signs.
//!
//! All `k` trees share one index space: tree `i` covers global leaf indices
//! `i·2^a .. (i+1)·2^a`, and every node address carries its global index, so no two trees
//! ever hash under the same address.

use crate::adrs::{Adrs, AdrsType};
use crate::hash::Engine;
use crate::merkle::{compute_root, treehash};
use crate::params::ParameterSet;
use crate::utils::write_at;
use crate::{Error, Result};

/// Base address of the FORS instance belonging to hypertree leaf `keypair` of bottom-layer
/// tree `tree`.
pub(crate) fn fors_adrs(tree: u64, keypair: u32) -> Adrs {
    Adrs::new(AdrsType::ForsTree)
        .with_tree(tree)
        .with_keypair(keypair)
}

/// Address compressing the `k` roots into the FORS public key.
pub(crate) fn roots_adrs(base: Adrs) -> Adrs {
    base.with_type_in_keypair(AdrsType::ForsRoots)
}

/// PRF address of the secret value at global leaf index `idx`.
pub(crate) fn sk_adrs(base: Adrs, idx: u32) -> Adrs {
    base.with_type_in_keypair(AdrsType::ForsPrf)
        .with_tree_height(0)
        .with_tree_index(idx)
}

/// Address hashing the secret value at global leaf index `idx` into its leaf node.
pub(crate) fn leaf_adrs(base: Adrs, idx: u32) -> Adrs {
    node_base_adrs(base).with_tree_height(0).with_tree_index(idx)
}

/// Tree address for the inner nodes of all `k` trees.
pub(crate) fn node_base_adrs(base: Adrs) -> Adrs {
    base.with_type_in_keypair(AdrsType::ForsTree)
}

/// Interprets `digest` as `k` integers of `a` bits each.
///
/// Bits are consumed least significant first within each byte. Bits past `k·a` are ignored.
pub(crate) fn message_to_indices(params: &ParameterSet, digest: &[u8]) -> Vec<u32> {
    let a = params.fors_height();
    let mut indices = vec![0u32; params.fors_trees()];
    let mut offset = 0;

    for index in indices.iter_mut() {
        for j in 0..a {
            *index ^= u32::from((digest[offset >> 3] >> (offset & 0x7)) & 0x1) << j;
            offset += 1;
        }
    }
    indices
}

/// The revealed part of one FORS tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForsTreeSignature {
    /// The `n`-byte secret leaf value.
    pub sk: Vec<u8>,
    /// `a` sibling nodes, bottom up.
    pub auth_path: Vec<u8>,
}

/// A FORS signature: one [`ForsTreeSignature`] per tree, `k·(a+1)·n` bytes serialised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForsSignature {
    pub trees: Vec<ForsTreeSignature>,
}

impl ForsSignature {
    /// Parses a FORS signature of exactly `fors_bytes()` bytes.
    pub fn from_bytes(params: &ParameterSet, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != params.fors_bytes() {
            return Err(Error::BadLength(params.fors_bytes(), bytes.len()));
        }
        let n = params.n();
        let trees = bytes
            .chunks_exact((params.fors_height() + 1) * n)
            .map(|chunk| {
                let (sk, auth_path) = chunk.split_at(n);
                ForsTreeSignature {
                    sk: sk.to_vec(),
                    auth_path: auth_path.to_vec(),
                }
            })
            .collect();
        Ok(Self { trees })
    }

    /// Serialises into `buf` at `*pos`, advancing the position.
    pub fn write_to(&self, buf: &mut [u8], pos: &mut usize) {
        for tree in &self.trees {
            write_at(buf, pos, &tree.sk);
            write_at(buf, pos, &tree.auth_path);
        }
    }

    pub fn to_vec(&self) -> Vec<u8> {
        let len = self
            .trees
            .iter()
            .map(|t| t.sk.len() + t.auth_path.len())
            .sum();
        let mut buf = vec![0u8; len];
        self.write_to(&mut buf, &mut 0);
        buf
    }
}

/// FORS operations over an engine. The instance is selected by the tree and key pair
/// fields of the base address.
#[derive(Clone, Copy, Debug)]
pub struct Fors<'a> {
    engine: &'a Engine,
}

impl<'a> Fors<'a> {
    pub fn new(engine: &'a Engine) -> Self {
        Self { engine }
    }

    /// Signs the `ceil(k·a/8)`-byte `digest`.
    pub fn sign(&self, digest: &[u8], sk_seed: &[u8], adrs: Adrs) -> ForsSignature {
        let params = self.engine.params();
        let a = params.fors_height();
        let node_adrs = node_base_adrs(adrs);

        let trees = message_to_indices(params, digest)
            .into_iter()
            .enumerate()
            .map(|(i, idx)| {
                let idx_offset = (i as u32) << a;
                let sk = self.secret(sk_seed, adrs, idx_offset + idx);
                let (_, auth_path) = treehash(self.engine, idx, idx_offset, a, node_adrs, |g| {
                    self.leaf(&self.secret(sk_seed, adrs, g), adrs, g)
                });
                ForsTreeSignature { sk, auth_path }
            })
            .collect();

        ForsSignature { trees }
    }

    /// Derives the FORS public key from a signature and the signed digest.
    pub fn pk_from_sig(&self, signature: &ForsSignature, digest: &[u8], adrs: Adrs) -> Vec<u8> {
        let params = self.engine.params();
        let n = self.engine.n();
        let a = params.fors_height();
        let node_adrs = node_base_adrs(adrs);
        let mut roots = vec![0u8; params.fors_trees() * n];

        let indices = message_to_indices(params, digest);
        for (i, ((tree, idx), root)) in signature
            .trees
            .iter()
            .zip(indices)
            .zip(roots.chunks_exact_mut(n))
            .enumerate()
        {
            let idx_offset = (i as u32) << a;
            let leaf = self.leaf(&tree.sk, adrs, idx_offset + idx);
            root.copy_from_slice(&compute_root(
                self.engine,
                &leaf,
                idx,
                idx_offset,
                &tree.auth_path,
                node_adrs,
            ));
        }

        let mut pk = vec![0u8; n];
        self.engine.thash(&mut pk, &roots, &roots_adrs(adrs));
        pk
    }

    fn secret(&self, sk_seed: &[u8], adrs: Adrs, idx: u32) -> Vec<u8> {
        let mut sk = vec![0u8; self.engine.n()];
        self.engine.prf(&mut sk, sk_seed, &sk_adrs(adrs, idx));
        sk
    }

    fn leaf(&self, sk: &[u8], adrs: Adrs, idx: u32) -> Vec<u8> {
        let mut leaf = vec![0u8; self.engine.n()];
        self.engine.thash(&mut leaf, sk, &leaf_adrs(adrs, idx));
        leaf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{HashFamily, SPHINCS_SHA2_192F, SPHINCS_SHAKE_128F};
    use rand::prelude::*;

    fn tiny() -> ParameterSet {
        ParameterSet::new(HashFamily::Shake, 16, 4, 2, 3, 4, 16).unwrap()
    }

    #[test]
    fn test_message_to_indices_boundaries() {
        // k = 33, a = 6: 198 bits in 25 bytes.
        let params = SPHINCS_SHAKE_128F;
        let bytes = params.fors_msg_bytes();
        assert_eq!(bytes, 25);

        let all_ones = message_to_indices(&params, &vec![0xff; bytes]);
        assert_eq!(all_ones.len(), 33);
        assert!(all_ones.iter().all(|&i| i == 63));

        let mut digest = vec![0u8; bytes];
        digest[0] = 0x01;
        let indices = message_to_indices(&params, &digest);
        assert_eq!(indices[0], 1);
        assert!(indices[1..].iter().all(|&i| i == 0));

        // Bit 7 of the first byte is bit 1 of the second index.
        digest[0] = 0x80;
        let indices = message_to_indices(&params, &digest);
        assert_eq!(indices[0], 0);
        assert_eq!(indices[1], 2);

        // Bits 198 and 199 are padding.
        let mut digest = vec![0u8; bytes];
        digest[24] = 0xc0;
        assert!(message_to_indices(&params, &digest).iter().all(|&i| i == 0));
        digest[24] = 0x20;
        let indices = message_to_indices(&params, &digest);
        assert_eq!(indices[32], 32);
    }

    #[test]
    fn test_message_to_indices_reassembles_bits() {
        let mut rng = StdRng::seed_from_u64(3);
        for params in [SPHINCS_SHAKE_128F, SPHINCS_SHA2_192F, tiny()] {
            let a = params.fors_height();
            for _ in 0..20 {
                let mut digest = vec![0u8; params.fors_msg_bytes()];
                rng.fill_bytes(&mut digest);
                let indices = message_to_indices(&params, &digest);
                for (i, idx) in indices.iter().enumerate() {
                    assert!(*idx < 1 << a);
                    for j in 0..a {
                        let off = i * a + j;
                        let bit = (digest[off / 8] >> (off % 8)) & 1;
                        assert_eq!((idx >> j) & 1, u32::from(bit));
                    }
                }
            }
        }
    }

    #[test]
    fn test_fors_sign_and_pk_from_sig() {
        let params = tiny();
        let n = params.n();
        let engine = Engine::new(params, &[5u8; 16]).unwrap();
        let fors = Fors::new(&engine);
        let sk_seed = [6u8; 16];
        let adrs = fors_adrs(2, 1);

        // Public key computed from the full trees.
        let a = params.fors_height();
        let mut roots = Vec::new();
        for i in 0..params.fors_trees() as u32 {
            let (root, _) = treehash(&engine, 0, i << a, a, node_base_adrs(adrs), |g| {
                fors.leaf(&fors.secret(&sk_seed, adrs, g), adrs, g)
            });
            roots.extend(root);
        }
        let mut expected_pk = vec![0u8; n];
        engine.thash(&mut expected_pk, &roots, &roots_adrs(adrs));

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..8 {
            let mut digest = vec![0u8; params.fors_msg_bytes()];
            rng.fill_bytes(&mut digest);

            let signature = fors.sign(&digest, &sk_seed, adrs);
            assert_eq!(signature.trees.len(), params.fors_trees());
            assert_eq!(signature.to_vec().len(), params.fors_bytes());
            assert_eq!(fors.pk_from_sig(&signature, &digest, adrs), expected_pk);

            let parsed = ForsSignature::from_bytes(&params, &signature.to_vec()).unwrap();
            assert_eq!(parsed, signature);

            let mut tampered = signature.clone();
            tampered.trees[1].sk[0] ^= 1;
            assert_ne!(fors.pk_from_sig(&tampered, &digest, adrs), expected_pk);

            let mut tampered = signature.clone();
            tampered.trees[3].auth_path[n] ^= 1;
            assert_ne!(fors.pk_from_sig(&tampered, &digest, adrs), expected_pk);

            // Another FORS instance, same seed.
            assert_ne!(
                fors.pk_from_sig(&signature, &digest, fors_adrs(2, 0)),
                expected_pk
            );
        }
    }

    #[test]
    fn test_fors_signature_length_checked() {
        let params = tiny();
        let len = params.fors_bytes();
        assert_eq!(
            ForsSignature::from_bytes(&params, &vec![0u8; len - 1]),
            Err(Error::BadLength(len, len - 1))
        );
        assert!(ForsSignature::from_bytes(&params, &vec![0u8; len + 1]).is_err());
    }
}
