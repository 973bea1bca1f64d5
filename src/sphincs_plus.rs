//! # SPHINCS+ keys and key generation
//!
//! [`SphincsPlus`] is the entry point of the crate: it is bound to one [`ParameterSet`] and
//! generates key pairs, from a CSPRNG or from an explicit `3n`-byte seed, and hands out the
//! [`SphincsSigner`] and [`SphincsVerifier`] handles that produce and check signatures.
//!
//! ## Usage Example
//!
//! ```rust
//! use sphincs_core::params::SPHINCS_SHAKE_128F;
//! use sphincs_core::sphincs_plus::SphincsPlus;
//!
//! let sphincs = SphincsPlus::new(SPHINCS_SHAKE_128F);
//! let (pk, sk) = sphincs.keygen().expect("Key generation failed");
//!
//! let message = b"stateless hash-based signature";
//! let signature = sphincs.signer(&sk).unwrap().sign(message);
//! assert!(sphincs.verifier(&pk).unwrap().verify(message, signature.as_ref()));
//! ```
//!
//! ## Byte formats
//!
//! The formats match the SPHINCS+ r3.1 reference implementation:
//!
//! - public key: `pk_seed || pk_root`,
//! - private key: `sk_seed || sk_prf || pk_seed || pk_root`,
//! - signature: `R || FORS signature || hypertree signature`.
//!
//! ## Security Considerations
//!
//! [`PrivateKey`] zeroizes its secret seeds when dropped and never prints them in its
//! `Debug` output. Cloning a private key duplicates the secret material in memory.

use crate::hash::Engine;
use crate::hypertree::Hypertree;
use crate::params::ParameterSet;
use crate::signer::{SphincsSigner, SphincsVerifier};
use crate::utils::split_exact;
use crate::{Error, Result};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A SPHINCS+ public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    params: ParameterSet,
    pk_seed: Vec<u8>,
    pk_root: Vec<u8>,
}

impl PublicKey {
    /// Parses a `2n`-byte public key.
    pub fn from_bytes(params: ParameterSet, bytes: &[u8]) -> Result<Self> {
        let n = params.n();
        let parts = split_exact(bytes, &[n, n])
            .ok_or(Error::BadLength(params.public_key_bytes(), bytes.len()))?;
        Ok(Self {
            params,
            pk_seed: parts[0].to_vec(),
            pk_root: parts[1].to_vec(),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        [self.pk_seed.as_slice(), self.pk_root.as_slice()].concat()
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn pk_seed(&self) -> &[u8] {
        &self.pk_seed
    }

    pub fn pk_root(&self) -> &[u8] {
        &self.pk_root
    }
}

/// A SPHINCS+ private key. It carries a copy of the public key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    #[zeroize(skip)]
    params: ParameterSet,
    sk_seed: Vec<u8>,
    sk_prf: Vec<u8>,
    pk_seed: Vec<u8>,
    pk_root: Vec<u8>,
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("params", &self.params)
            .field("pk_seed", &self.pk_seed)
            .field("pk_root", &self.pk_root)
            .finish_non_exhaustive()
    }
}

impl PrivateKey {
    /// Parses a `4n`-byte private key.
    pub fn from_bytes(params: ParameterSet, bytes: &[u8]) -> Result<Self> {
        let n = params.n();
        let parts = split_exact(bytes, &[n, n, n, n])
            .ok_or(Error::BadLength(params.private_key_bytes(), bytes.len()))?;
        Ok(Self {
            params,
            sk_seed: parts[0].to_vec(),
            sk_prf: parts[1].to_vec(),
            pk_seed: parts[2].to_vec(),
            pk_root: parts[3].to_vec(),
        })
    }

    /// Returns the secret key bytes. The caller is responsible for wiping them.
    pub fn to_bytes(&self) -> Vec<u8> {
        [
            self.sk_seed.as_slice(),
            self.sk_prf.as_slice(),
            self.pk_seed.as_slice(),
            self.pk_root.as_slice(),
        ]
        .concat()
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            params: self.params,
            pk_seed: self.pk_seed.clone(),
            pk_root: self.pk_root.clone(),
        }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub(crate) fn sk_seed(&self) -> &[u8] {
        &self.sk_seed
    }

    pub(crate) fn sk_prf(&self) -> &[u8] {
        &self.sk_prf
    }

    pub(crate) fn pk_seed(&self) -> &[u8] {
        &self.pk_seed
    }

    pub(crate) fn pk_root(&self) -> &[u8] {
        &self.pk_root
    }
}

/// A serialised SPHINCS+ signature of exactly `signature_bytes()` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    params: ParameterSet,
    bytes: Vec<u8>,
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Signature {
    pub fn from_bytes(params: ParameterSet, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != params.signature_bytes() {
            return Err(Error::BadLength(params.signature_bytes(), bytes.len()));
        }
        Ok(Self {
            params,
            bytes: bytes.to_vec(),
        })
    }

    pub(crate) fn from_vec(params: ParameterSet, bytes: Vec<u8>) -> Self {
        debug_assert_eq!(bytes.len(), params.signature_bytes());
        Self { params, bytes }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// SPHINCS+ over one parameter set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SphincsPlus {
    params: ParameterSet,
}

impl SphincsPlus {
    pub fn new(params: ParameterSet) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Generates a key pair seeded from the operating system CSPRNG.
    pub fn keygen(&self) -> Result<(PublicKey, PrivateKey)> {
        self.keygen_with_rng(&mut OsRng)
    }

    /// Generates a key pair seeded from `rng`.
    pub fn keygen_with_rng<R>(&self, rng: &mut R) -> Result<(PublicKey, PrivateKey)>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let mut seed = vec![0u8; self.params.seed_bytes()];
        rng.try_fill_bytes(&mut seed)?;
        let keypair = self.keygen_from_seed(&seed);
        seed.zeroize();
        keypair
    }

    /// Derives a key pair from `sk_seed || sk_prf || pk_seed` (`3n` bytes).
    ///
    /// The public root is the root of the single top-layer tree of the hypertree.
    pub fn keygen_from_seed(&self, seed: &[u8]) -> Result<(PublicKey, PrivateKey)> {
        let n = self.params.n();
        let parts = split_exact(seed, &[n, n, n])
            .ok_or(Error::BadLength(self.params.seed_bytes(), seed.len()))?;
        let (sk_seed, sk_prf, pk_seed) = (parts[0], parts[1], parts[2]);

        let engine = Engine::new(self.params, pk_seed)?;
        let pk_root = Hypertree::new(&engine).root(sk_seed);
        log::debug!("generated SPHINCS+ key pair for {}", self.params);

        let sk = PrivateKey {
            params: self.params,
            sk_seed: sk_seed.to_vec(),
            sk_prf: sk_prf.to_vec(),
            pk_seed: pk_seed.to_vec(),
            pk_root,
        };
        Ok((sk.public_key(), sk))
    }

    /// Signing handle for `sk`, which must belong to this parameter set.
    pub fn signer(&self, sk: &PrivateKey) -> Result<SphincsSigner> {
        if sk.params() != &self.params {
            return Err(Error::ParameterMismatch);
        }
        SphincsSigner::new(sk.clone())
    }

    /// Verification handle for `pk`, which must belong to this parameter set.
    pub fn verifier(&self, pk: &PublicKey) -> Result<SphincsVerifier> {
        if pk.params() != &self.params {
            return Err(Error::ParameterMismatch);
        }
        SphincsVerifier::new(pk.clone())
    }
}
