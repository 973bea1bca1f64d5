//! # Winternitz One-Time Signature Scheme Plus (W-OTS+)
//!
//! W-OTS+ signs the `n`-byte roots and FORS public keys carried up the hypertree. A key pair
//! is never stored: each chain start is derived with the PRF from the secret seed and an
//! address naming the layer, tree, key pair and chain, so the same address always yields the
//! same key pair and different key pairs never share an input.
//!
//! The public key of a key pair is the tweakable hash, under a `WotsPk` address, of the
//! `len` chain ends. This compressed form is what the Merkle trees of the hypertree use as
//! their leaves.
//!
//! ## Important Note
//!
//! This W-OTS+ implementation is provided to be used inside the hypertree. It is not
//! suggested to be used as a standalone signature scheme.

use crate::adrs::{Adrs, AdrsType};
use crate::hash::Engine;
use crate::params::ParameterSet;
use crate::utils::u64_to_bytes_into;

/// PRF address deriving the secret start of `chain` for the key pair at `base`.
pub(crate) fn prf_adrs(base: Adrs, chain: u32) -> Adrs {
    base.with_type_in_keypair(AdrsType::WotsPrf)
        .with_chain(chain)
}

/// Address of the step leaving position `hash` of `chain`.
pub(crate) fn chain_adrs(base: Adrs, chain: u32, hash: u32) -> Adrs {
    base.with_type_in_keypair(AdrsType::WotsHash)
        .with_chain(chain)
        .with_hash(hash)
}

/// Address compressing the chain ends into the public key.
pub(crate) fn pk_adrs(base: Adrs) -> Adrs {
    base.with_type_in_keypair(AdrsType::WotsPk)
}

/// Converts an array of bytes into `out_len` integers in base `w`, most significant first.
pub(crate) fn base_w(params: &ParameterSet, input: &[u8], out_len: usize) -> Vec<u32> {
    let logw = params.wots_logw();
    let mask = (params.wots_w() - 1) as u32;
    let mut output = Vec::with_capacity(out_len);
    let mut bits = 0;
    let mut total: u32 = 0;
    let mut input_index = 0;

    for _ in 0..out_len {
        if bits == 0 {
            // Load a new byte from input
            total = u32::from(input[input_index]);
            input_index += 1;
            bits += 8;
        }

        bits -= logw;
        output.push((total >> bits) & mask);
    }
    output
}

/// Computes the WOTS+ checksum over a message (in base_w).
fn wots_checksum(params: &ParameterSet, msg_base_w: &[u32]) -> Vec<u32> {
    let w = params.wots_w() as u64;
    let mut csum: u64 = msg_base_w.iter().map(|&m| w - 1 - u64::from(m)).sum();

    // Make sure expected empty zero bits are the least significant bits.
    let csum_bits = params.wots_len2() * params.wots_logw();
    csum <<= (8 - csum_bits % 8) % 8;

    let mut csum_bytes = vec![0u8; (csum_bits + 7) / 8];
    u64_to_bytes_into(&mut csum_bytes, csum);
    base_w(params, &csum_bytes, params.wots_len2())
}

/// Takes a message and derives the matching chain lengths.
pub(crate) fn chain_lengths(params: &ParameterSet, msg: &[u8]) -> Vec<u32> {
    let mut lengths = base_w(params, msg, params.wots_len1());
    let checksum = wots_checksum(params, &lengths);
    lengths.extend(checksum);
    lengths
}

/// W-OTS+ operations over an engine. The key pair is selected by the layer, tree and key pair
/// fields of the address handed to each call; its type and remaining fields are ignored.
#[derive(Clone, Copy, Debug)]
pub struct WotsPlus<'a> {
    engine: &'a Engine,
}

impl<'a> WotsPlus<'a> {
    pub fn new(engine: &'a Engine) -> Self {
        Self { engine }
    }

    /// Generates the compressed public key of the key pair at `adrs`.
    ///
    /// # Arguments
    ///
    /// * `sk_seed` - The `n`-byte secret seed.
    /// * `adrs` - Address carrying the layer, tree and key pair.
    ///
    /// # Returns
    ///
    /// The `n`-byte public key, i.e. the leaf value of this key pair in its Merkle tree.
    pub fn keygen(&self, sk_seed: &[u8], adrs: Adrs) -> Vec<u8> {
        let n = self.engine.n();
        let w = self.engine.params().wots_w();
        let mut pk_buf = vec![0u8; self.engine.params().wots_bytes()];

        for (i, chain) in pk_buf.chunks_exact_mut(n).enumerate() {
            self.engine.prf(chain, sk_seed, &prf_adrs(adrs, i as u32));
            self.gen_chain(chain, i as u32, 0, w - 1, adrs);
        }

        self.compress(&pk_buf, adrs)
    }

    /// Signs the `n`-byte `message` with the key pair at `adrs`.
    ///
    /// # Returns
    ///
    /// The `len * n`-byte signature.
    pub fn sign(&self, message: &[u8], sk_seed: &[u8], adrs: Adrs) -> Vec<u8> {
        let n = self.engine.n();
        let steps = chain_lengths(self.engine.params(), message);
        let mut sig_buf = vec![0u8; self.engine.params().wots_bytes()];

        for (i, chain) in sig_buf.chunks_exact_mut(n).enumerate() {
            self.engine.prf(chain, sk_seed, &prf_adrs(adrs, i as u32));
            self.gen_chain(chain, i as u32, 0, steps[i] as usize, adrs);
        }
        sig_buf
    }

    /// Computes the compressed public key from a W-OTS+ signature and message.
    ///
    /// `signature` must be exactly `len * n` bytes.
    pub fn pk_from_sig(&self, signature: &[u8], message: &[u8], adrs: Adrs) -> Vec<u8> {
        let n = self.engine.n();
        let w = self.engine.params().wots_w();
        let lengths = chain_lengths(self.engine.params(), message);
        let mut pk_buf = signature.to_vec();

        for (i, chain) in pk_buf.chunks_exact_mut(n).enumerate() {
            let start = lengths[i] as usize;
            self.gen_chain(chain, i as u32, start, w - 1 - start, adrs);
        }

        self.compress(&pk_buf, adrs)
    }

    /// Verifies a W-OTS+ signature against a compressed public key.
    pub fn verify(&self, signature: &[u8], message: &[u8], pk: &[u8], adrs: Adrs) -> bool {
        signature.len() == self.engine.params().wots_bytes()
            && self.pk_from_sig(signature, message, adrs) == pk
    }

    /// Computes the chaining function in place.
    ///
    /// Interprets `value` as the `start`-th value of chain `chain` and applies `steps`
    /// calls to F.
    fn gen_chain(&self, value: &mut [u8], chain: u32, start: usize, steps: usize, adrs: Adrs) {
        let w = self.engine.params().wots_w();
        for i in start..(start + steps).min(w) {
            self.engine
                .thash_inplace(value, &chain_adrs(adrs, chain, i as u32));
        }
    }

    fn compress(&self, chain_ends: &[u8], adrs: Adrs) -> Vec<u8> {
        let mut pk = vec![0u8; self.engine.n()];
        self.engine.thash(&mut pk, chain_ends, &pk_adrs(adrs));
        pk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{SPHINCS_SHA2_128F, SPHINCS_SHAKE_128F, SPHINCS_SHAKE_256F};
    use rand::prelude::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_wots_plus() {
        for params in [SPHINCS_SHAKE_128F, SPHINCS_SHA2_128F, SPHINCS_SHAKE_256F] {
            let n = params.n();
            let mut pub_seed = vec![0; n];
            let mut sk_seed = vec![0; n];
            OsRng.fill_bytes(&mut pub_seed);
            OsRng.fill_bytes(&mut sk_seed);

            let engine = Engine::new(params, &pub_seed).unwrap();
            let wp = WotsPlus::new(&engine);
            let adrs = Adrs::new(AdrsType::WotsHash)
                .with_layer(2)
                .with_tree(11)
                .with_keypair(3);

            let pk = wp.keygen(&sk_seed, adrs);

            let mut message = vec![0u8; n];
            OsRng.fill_bytes(&mut message);

            let signature = wp.sign(&message, &sk_seed, adrs);
            assert_eq!(signature.len(), params.wots_bytes());
            assert!(wp.verify(&signature, &message, &pk, adrs));
            assert_eq!(wp.pk_from_sig(&signature, &message, adrs), pk);

            let mut fake_signature = signature.clone();
            fake_signature[0] ^= 1;
            assert!(!wp.verify(&fake_signature, &message, &pk, adrs));
            assert!(!wp.verify(&signature[1..], &message, &pk, adrs));

            // A different key pair of the same tree has a different key.
            let other = adrs.with_keypair(4);
            assert_ne!(wp.keygen(&sk_seed, other), pk);
            assert!(!wp.verify(&signature, &message, &pk, other));

            let engine_same = Engine::new(params, &pub_seed).unwrap();
            assert_eq!(WotsPlus::new(&engine_same).keygen(&sk_seed, adrs), pk);
        }
    }

    #[test]
    fn test_base_w() {
        let params = SPHINCS_SHAKE_128F;
        assert_eq!(base_w(&params, &[0xab, 0x0f], 4), vec![0xa, 0xb, 0x0, 0xf]);
        assert_eq!(base_w(&params, &[0xab, 0x0f], 3), vec![0xa, 0xb, 0x0]);
    }

    #[test]
    fn test_chain_lengths_checksum() {
        let params = SPHINCS_SHAKE_128F;

        // All-zero message: every message digit is 0, the checksum is 32 * 15 = 480 = 0x1e0.
        let zeros = chain_lengths(&params, &[0u8; 16]);
        assert_eq!(zeros.len(), params.wots_len());
        assert!(zeros[..32].iter().all(|&d| d == 0));
        assert_eq!(zeros[32..], [1, 14, 0]);

        // All-ones message: every digit is 15, the checksum is 0.
        let ones = chain_lengths(&params, &[0xffu8; 16]);
        assert!(ones[..32].iter().all(|&d| d == 15));
        assert_eq!(ones[32..], [0, 0, 0]);

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let mut msg = [0u8; 16];
            rng.fill_bytes(&mut msg);
            let lengths = chain_lengths(&params, &msg);
            let csum: u32 = lengths[..32].iter().map(|&d| 15 - d).sum();
            let encoded = lengths[32] * 256 + lengths[33] * 16 + lengths[34];
            assert_eq!(csum, encoded);
        }
    }
}
