mod error;
mod hash;
mod merkle;
mod utils;

pub mod adrs;
pub mod config;
pub mod fors;
pub mod hypertree;
pub mod params;
pub mod signer;
pub mod sphincs_plus;
pub mod wots_plus;

pub use crate::config::ParameterRegistry;
pub use crate::error::{Error, Result, VerificationError};
pub use crate::hash::{Engine, IndexedDigest};
pub use crate::params::{HashFamily, ParameterSet};
pub use crate::signer::{KeyParameters, MessageSigner, SecureRng, SphincsSigner, SphincsVerifier};
pub use crate::sphincs_plus::{PrivateKey, PublicKey, Signature, SphincsPlus};
