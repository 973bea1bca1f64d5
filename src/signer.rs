//! # Signing and verification
//!
//! [`SphincsSigner`] and [`SphincsVerifier`] are capability-typed: a signer can only be built
//! from a private key and a verifier only from a public key. Both are immutable and `Sync`,
//! so one handle can serve any number of threads.
//!
//! [`MessageSigner`] wraps the two behind the `init` / `generate_signature` /
//! `verify_signature` interface used by generic message-signer collaborators, where the
//! role is chosen at run time.

use crate::error::VerificationError;
use crate::fors::{self, Fors, ForsSignature};
use crate::hash::{Engine, IndexedDigest};
use crate::hypertree::{HtSignature, Hypertree};
use crate::params::ParameterSet;
use crate::sphincs_plus::{PrivateKey, PublicKey, Signature};
use crate::utils::{split_exact, write_at};
use crate::{Error, Result};
use rand::{CryptoRng, RngCore};

/// A cryptographically secure random source that can be boxed and moved across threads.
pub trait SecureRng: RngCore + CryptoRng + Send {}

impl<T: RngCore + CryptoRng + Send> SecureRng for T {}

/// Produces SPHINCS+ signatures with one private key.
#[derive(Clone, Debug)]
pub struct SphincsSigner {
    key: PrivateKey,
    engine: Engine,
}

impl SphincsSigner {
    pub fn new(key: PrivateKey) -> Result<Self> {
        let engine = Engine::new(*key.params(), key.pk_seed())?;
        Ok(Self { key, engine })
    }

    pub fn params(&self) -> &ParameterSet {
        self.engine.params()
    }

    pub fn public_key(&self) -> PublicKey {
        self.key.public_key()
    }

    /// Deterministic signature: the randomizer is derived with the public seed as
    /// `opt_rand`, so the same message always gives the same signature.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.sign_with_opt_rand(message, self.key.pk_seed())
    }

    /// Randomized signature with `n` bytes of `opt_rand` drawn from `rng`.
    ///
    /// A failing random source fails this call only.
    pub fn sign_with_rng<R>(&self, message: &[u8], rng: &mut R) -> Result<Signature>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let mut opt_rand = vec![0u8; self.engine.n()];
        rng.try_fill_bytes(&mut opt_rand)?;
        Ok(self.sign_with_opt_rand(message, &opt_rand))
    }

    fn sign_with_opt_rand(&self, message: &[u8], opt_rand: &[u8]) -> Signature {
        let params = *self.engine.params();
        let sk_seed = self.key.sk_seed();
        let mut sig = vec![0u8; params.signature_bytes()];
        let mut pos = 0;

        let r = self.engine.prf_msg(self.key.sk_prf(), opt_rand, message);
        write_at(&mut sig, &mut pos, &r);

        let IndexedDigest {
            digest,
            idx_tree,
            idx_leaf,
        } = self
            .engine
            .h_msg(&r, self.key.pk_seed(), self.key.pk_root(), message);

        let fors_adrs = fors::fors_adrs(idx_tree, idx_leaf);
        let fors = Fors::new(&self.engine);
        let fors_sig = fors.sign(&digest, sk_seed, fors_adrs);
        fors_sig.write_to(&mut sig, &mut pos);
        let fors_pk = fors.pk_from_sig(&fors_sig, &digest, fors_adrs);

        Hypertree::new(&self.engine).sign_into(&fors_pk, sk_seed, idx_tree, idx_leaf, &mut sig, &mut pos);
        debug_assert_eq!(pos, params.signature_bytes());

        log::debug!(
            "signed {} byte message with {params} (tree {idx_tree}, leaf {idx_leaf})",
            message.len()
        );
        Signature::from_vec(params, sig)
    }
}

/// Checks SPHINCS+ signatures against one public key.
#[derive(Clone, Debug)]
pub struct SphincsVerifier {
    key: PublicKey,
    engine: Engine,
}

impl SphincsVerifier {
    pub fn new(key: PublicKey) -> Result<Self> {
        let engine = Engine::new(*key.params(), key.pk_seed())?;
        Ok(Self { key, engine })
    }

    pub fn params(&self) -> &ParameterSet {
        self.engine.params()
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.key
    }

    /// Returns whether `signature` is a valid signature on `message`. Never errors: any
    /// malformed input is simply invalid.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        self.verify_detailed(message, signature).is_ok()
    }

    /// Like [`Self::verify`], reporting why a signature was rejected.
    pub fn verify_detailed(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        let params = self.engine.params();
        if signature.len() != params.signature_bytes() {
            log::debug!(
                "rejected signature of {} bytes, expected {}",
                signature.len(),
                params.signature_bytes()
            );
            return Err(VerificationError::BadSignatureLength {
                expected: params.signature_bytes(),
                found: signature.len(),
            }
            .into());
        }

        let parts = split_exact(signature, &[params.n(), params.fors_bytes(), params.ht_bytes()])
            .ok_or(VerificationError::MalformedSignature)?;
        let r = parts[0];
        let fors_sig = ForsSignature::from_bytes(params, parts[1])
            .map_err(|_| VerificationError::MalformedSignature)?;
        let ht_sig = HtSignature::from_bytes(params, parts[2])
            .map_err(|_| VerificationError::MalformedSignature)?;

        let IndexedDigest {
            digest,
            idx_tree,
            idx_leaf,
        } = self
            .engine
            .h_msg(r, self.key.pk_seed(), self.key.pk_root(), message);

        let fors_pk =
            Fors::new(&self.engine).pk_from_sig(&fors_sig, &digest, fors::fors_adrs(idx_tree, idx_leaf));
        let valid = Hypertree::new(&self.engine).verify(
            &fors_pk,
            &ht_sig,
            idx_tree,
            idx_leaf,
            self.key.pk_root(),
        );
        log::debug!("verified signature with {params}: valid = {valid}");

        if valid {
            Ok(())
        } else {
            Err(VerificationError::RootMismatch.into())
        }
    }
}

/// Key material handed to [`MessageSigner::init`].
pub enum KeyParameters {
    /// Private key, deterministic signing.
    Private(PrivateKey),
    /// Private key with a random source, randomized signing.
    PrivateWithRandom(PrivateKey, Box<dyn SecureRng>),
    Public(PublicKey),
}

enum Role {
    Uninitialized,
    Signing {
        signer: SphincsSigner,
        rng: Option<Box<dyn SecureRng>>,
    },
    Verifying(SphincsVerifier),
}

/// A message signer whose role, signing or verifying, is chosen by [`Self::init`].
pub struct MessageSigner {
    role: Role,
}

impl Default for MessageSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSigner {
    pub fn new() -> Self {
        Self {
            role: Role::Uninitialized,
        }
    }

    /// Sets the role and key. Signing requires a private key, verification a public key.
    ///
    /// On error the signer is left uninitialized.
    pub fn init(&mut self, for_signing: bool, key_parameters: KeyParameters) -> Result<()> {
        self.role = Role::Uninitialized;
        self.role = match (for_signing, key_parameters) {
            (true, KeyParameters::Private(key)) => Role::Signing {
                signer: SphincsSigner::new(key)?,
                rng: None,
            },
            (true, KeyParameters::PrivateWithRandom(key, rng)) => Role::Signing {
                signer: SphincsSigner::new(key)?,
                rng: Some(rng),
            },
            (true, KeyParameters::Public(_)) => {
                return Err(Error::WrongKeyType("signing requires a private key"))
            }
            (false, KeyParameters::Public(key)) => Role::Verifying(SphincsVerifier::new(key)?),
            (false, _) => return Err(Error::WrongKeyType("verification requires a public key")),
        };
        Ok(())
    }

    pub fn generate_signature(&mut self, message: &[u8]) -> Result<Vec<u8>> {
        match &mut self.role {
            Role::Uninitialized => Err(Error::Uninitialized),
            Role::Signing {
                signer,
                rng: Some(rng),
            } => Ok(signer.sign_with_rng(message, rng.as_mut())?.into_bytes()),
            Role::Signing { signer, rng: None } => Ok(signer.sign(message).into_bytes()),
            Role::Verifying(_) => Err(Error::WrongRole("initialized for verification")),
        }
    }

    pub fn verify_signature(&self, message: &[u8], signature: &[u8]) -> Result<bool> {
        match &self.role {
            Role::Uninitialized => Err(Error::Uninitialized),
            Role::Verifying(verifier) => Ok(verifier.verify(message, signature)),
            Role::Signing { .. } => Err(Error::WrongRole("initialized for signing")),
        }
    }
}
