//! # Hash engine
//!
//! The [`Engine`] binds a [`ParameterSet`] and a public seed to the primitive operations of
//! SPHINCS+: the tweakable hash (F, H and T_l), the seeded PRF used to derive every secret
//! value, the randomizer derivation `PRF_msg` and the randomized message hash `H_msg`.
//!
//! An engine only exists in the initialized state: it is created with its public seed and
//! can be re-bound to another seed with [`Engine::init`]. After that it is immutable, so a
//! single engine can be shared by any number of concurrent signing or verification calls.

use crate::adrs::Adrs;
use crate::params::{HashFamily, ParameterSet};
use crate::utils::{bytes_to_u64, mask_low_bits};
use crate::{Error, Result};

mod sha2;
mod shake;

use self::sha2::Sha2Hasher;
use self::shake::ShakeHasher;

/// Output of `H_msg`: the FORS digest and the hypertree coordinates of the signing leaf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedDigest {
    /// `ceil(k * a / 8)` bytes selecting one leaf in each FORS tree.
    pub digest: Vec<u8>,
    /// Which bottom-layer subtree signs, in `[0, 2^(h - h'))`.
    pub idx_tree: u64,
    /// Which leaf of that subtree signs, in `[0, 2^h')`.
    pub idx_leaf: u32,
}

#[derive(Clone, Debug)]
enum Backend {
    Sha2(Sha2Hasher),
    Shake(ShakeHasher),
}

#[derive(Clone, Debug)]
pub struct Engine {
    params: ParameterSet,
    pk_seed: Vec<u8>,
    backend: Backend,
}

impl Engine {
    /// Creates an engine for `params` bound to the `n`-byte public seed `pk_seed`.
    pub fn new(params: ParameterSet, pk_seed: &[u8]) -> Result<Self> {
        if pk_seed.len() != params.n() {
            return Err(Error::BadLength(params.n(), pk_seed.len()));
        }
        let backend = match params.hash() {
            HashFamily::Sha2 => Backend::Sha2(Sha2Hasher::new(pk_seed, params.uses_sha512())),
            HashFamily::Shake => Backend::Shake(ShakeHasher::new(pk_seed)),
        };
        Ok(Self {
            params,
            pk_seed: pk_seed.to_vec(),
            backend,
        })
    }

    /// Re-binds the engine to another public seed.
    pub fn init(&mut self, pk_seed: &[u8]) -> Result<()> {
        *self = Self::new(self.params, pk_seed)?;
        Ok(())
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn n(&self) -> usize {
        self.params.n()
    }

    pub fn pk_seed(&self) -> &[u8] {
        &self.pk_seed
    }

    /// Tweakable hash of `input` (a whole number of `n`-byte blocks) under `adrs`.
    /// Writes `n` bytes to `output`.
    pub fn thash(&self, output: &mut [u8], input: &[u8], adrs: &Adrs) {
        debug_assert_eq!(output.len(), self.n());
        debug_assert!(!input.is_empty() && input.len() % self.n() == 0);
        match &self.backend {
            Backend::Sha2(hasher) => hasher.thash(output, input, adrs),
            Backend::Shake(hasher) => hasher.thash(output, input, adrs),
        }
    }

    /// Applies F to the `n`-byte block `inout` in place.
    pub fn thash_inplace(&self, inout: &mut [u8], adrs: &Adrs) {
        debug_assert_eq!(inout.len(), self.n());
        match &self.backend {
            Backend::Sha2(hasher) => hasher.thash_inplace(inout, adrs),
            Backend::Shake(hasher) => hasher.thash_inplace(inout, adrs),
        }
    }

    /// PRF(PK.seed, SK.seed, ADRS): derives the secret value at `adrs`.
    pub fn prf(&self, output: &mut [u8], sk_seed: &[u8], adrs: &Adrs) {
        debug_assert_eq!(output.len(), self.n());
        match &self.backend {
            Backend::Sha2(hasher) => hasher.prf(output, sk_seed, adrs),
            Backend::Shake(hasher) => hasher.prf(output, sk_seed, adrs),
        }
    }

    /// Derives the per-signature randomizer `R`.
    ///
    /// `opt_rand` is fresh randomness for randomized signing, or the public seed for
    /// deterministic signing.
    pub fn prf_msg(&self, sk_prf: &[u8], opt_rand: &[u8], message: &[u8]) -> Vec<u8> {
        let mut r = vec![0u8; self.n()];
        match &self.backend {
            Backend::Sha2(hasher) => hasher.prf_msg(&mut r, sk_prf, opt_rand, message),
            Backend::Shake(_) => ShakeHasher::prf_msg(&mut r, sk_prf, opt_rand, message),
        }
        r
    }

    /// Computes the message hash using R, the public key, and the message.
    /// Outputs the message digest and the index of the leaf. The index is split in
    /// the tree index and the leaf index, for convenient copying to an address.
    pub fn h_msg(&self, r: &[u8], pk_seed: &[u8], pk_root: &[u8], message: &[u8]) -> IndexedDigest {
        let params = &self.params;
        let mut buf = vec![0u8; params.digest_bytes()];
        match &self.backend {
            Backend::Sha2(hasher) => hasher.h_msg(&mut buf, r, pk_seed, pk_root, message),
            Backend::Shake(_) => ShakeHasher::h_msg(&mut buf, r, pk_seed, pk_root, message),
        }

        let (digest, rest) = buf.split_at(params.fors_msg_bytes());
        let (tree_buf, leaf_buf) = rest.split_at((params.tree_bits() + 7) / 8);
        let idx_tree = mask_low_bits(bytes_to_u64(tree_buf), params.tree_bits());
        let idx_leaf = mask_low_bits(bytes_to_u64(leaf_buf), params.leaf_bits()) as u32;

        IndexedDigest {
            digest: digest.to_vec(),
            idx_tree,
            idx_leaf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adrs::AdrsType;
    use crate::params::*;
    use rand::rngs::StdRng;
    use rand::{Rng, RngCore, SeedableRng};
    use sha3::digest::{ExtendableOutput, Update, XofReader};

    fn tiny(hash: HashFamily) -> ParameterSet {
        ParameterSet::new(hash, 16, 4, 2, 3, 4, 16).unwrap()
    }

    #[test]
    fn test_engine_requires_n_byte_seed() {
        assert_eq!(
            Engine::new(SPHINCS_SHAKE_128F, &[0u8; 15]).unwrap_err(),
            Error::BadLength(16, 15)
        );
        let mut engine = Engine::new(SPHINCS_SHA2_192F, &[0u8; 24]).unwrap();
        assert_eq!(engine.init(&[0u8; 32]), Err(Error::BadLength(24, 32)));
        assert!(engine.init(&[1u8; 24]).is_ok());
        assert_eq!(engine.pk_seed(), &[1u8; 24]);
    }

    #[test]
    fn test_h_msg_indices_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sets: Vec<ParameterSet> =
            STANDARD_PARAMETER_SETS.iter().map(|(_, p)| *p).collect();
        sets.push(tiny(HashFamily::Shake));
        sets.push(tiny(HashFamily::Sha2));

        for params in sets {
            let n = params.n();
            let engine = Engine::new(params, &vec![3u8; n]).unwrap();
            for _ in 0..64 {
                let mut r = vec![0u8; n];
                let mut root = vec![0u8; n];
                rng.fill_bytes(&mut r);
                rng.fill_bytes(&mut root);
                let message: Vec<u8> = (0..rng.gen_range(0..300)).map(|_| rng.gen()).collect();

                let idx = engine.h_msg(&r, engine.pk_seed(), &root, &message);
                assert_eq!(idx.digest.len(), params.fors_msg_bytes());
                if params.tree_bits() < 64 {
                    assert!(idx.idx_tree < 1_u64 << params.tree_bits(), "{params}");
                }
                assert!(idx.idx_leaf < 1_u32 << params.leaf_bits(), "{params}");
            }
        }
    }

    #[test]
    fn test_shake_thash_layout() {
        let params = tiny(HashFamily::Shake);
        let seed = [9u8; 16];
        let engine = Engine::new(params, &seed).unwrap();
        let adrs = Adrs::new(AdrsType::WotsHash).with_layer(1).with_chain(4);
        let input = [5u8; 32];

        let mut out = [0u8; 16];
        engine.thash(&mut out, &input, &adrs);

        let mut hasher = sha3::Shake256::default();
        hasher.update(&seed);
        hasher.update(&adrs.to_bytes());
        hasher.update(&input);
        let mut expected = [0u8; 16];
        hasher.finalize_xof().read(&mut expected);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_inplace_matches_thash() {
        for hash in [HashFamily::Sha2, HashFamily::Shake] {
            let engine = Engine::new(tiny(hash), &[1u8; 16]).unwrap();
            let adrs = Adrs::new(AdrsType::WotsHash).with_hash(3);
            let block = [0x42u8; 16];

            let mut out = [0u8; 16];
            engine.thash(&mut out, &block, &adrs);
            let mut inout = block;
            engine.thash_inplace(&mut inout, &adrs);
            assert_eq!(out, inout);

            let mut prf = [0u8; 16];
            engine.prf(&mut prf, &block, &adrs);
            assert_eq!(prf, out);
        }
    }

    #[test]
    fn test_families_and_seeds_are_separated() {
        let adrs = Adrs::new(AdrsType::Tree);
        let input = [0u8; 32];
        let outputs: Vec<[u8; 16]> = [
            (HashFamily::Sha2, [0u8; 16]),
            (HashFamily::Shake, [0u8; 16]),
            (HashFamily::Shake, [1u8; 16]),
        ]
        .iter()
        .map(|(hash, seed)| {
            let mut out = [0u8; 16];
            Engine::new(tiny(*hash), seed)
                .unwrap()
                .thash(&mut out, &input, &adrs);
            out
        })
        .collect();
        assert_ne!(outputs[0], outputs[1]);
        assert_ne!(outputs[1], outputs[2]);
    }

    #[test]
    fn test_prf_msg_depends_on_opt_rand() {
        for params in [SPHINCS_SHA2_128F, SPHINCS_SHA2_256F, SPHINCS_SHAKE_192F] {
            let n = params.n();
            let engine = Engine::new(params, &vec![0u8; n]).unwrap();
            let sk_prf = vec![1u8; n];
            let a = engine.prf_msg(&sk_prf, &vec![2u8; n], b"message");
            let b = engine.prf_msg(&sk_prf, &vec![3u8; n], b"message");
            assert_eq!(a.len(), n);
            assert_ne!(a, b);
            assert_eq!(a, engine.prf_msg(&sk_prf, &vec![2u8; n], b"message"));
        }
    }

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn test_prf_msg_known_answers() {
        let sk_prf = [0u8; 16];
        let opt_rand = [1u8; 16];
        let message = [2u8; 32];
        for (params, expected) in [
            (SPHINCS_SHAKE_128F, "bc5c062307df0a41aeeae19ad655f7b2"),
            (SPHINCS_SHA2_128F, "6a4b5cf23911d4f3a6591d7003445316"),
        ] {
            let engine = Engine::new(params, &[0u8; 16]).unwrap();
            assert_eq!(engine.prf_msg(&sk_prf, &opt_rand, &message), hex(expected));
        }
    }

    #[test]
    fn test_sha2_h_msg_known_answers() {
        for (params, expected) in [
            (
                SPHINCS_SHA2_128F,
                "56658221f675d907a309255e8faef639d11e6a1118fa05d3bbd26179a7e0a54a7f5b",
            ),
            (
                SPHINCS_SHA2_256F,
                "8c86dfb66392d1b647df0deab90be68fb6f988513e84d3ef75fa68591122bb5d74f6413672db5164e56492b7ca2c2e0335",
            ),
        ] {
            let n = params.n();
            let expected = hex(expected);
            assert_eq!(expected.len(), params.digest_bytes());

            let engine = Engine::new(params, &vec![1u8; n]).unwrap();
            let indexed = engine.h_msg(&vec![0u8; n], &vec![1u8; n], &vec![2u8; n], &[3u8; 32]);

            let (digest, rest) = expected.split_at(params.fors_msg_bytes());
            let (tree, leaf) = rest.split_at((params.tree_bits() + 7) / 8);
            assert_eq!(indexed.digest, digest);
            assert_eq!(
                indexed.idx_tree,
                mask_low_bits(bytes_to_u64(tree), params.tree_bits())
            );
            assert_eq!(
                u64::from(indexed.idx_leaf),
                mask_low_bits(bytes_to_u64(leaf), params.leaf_bits())
            );
        }
    }
}
