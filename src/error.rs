use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid length: expected {0} bytes, found {1} bytes")]
    BadLength(usize, usize),
    #[error("Invalid parameter set: {0}")]
    InvalidParameters(String),
    #[error("Parameter set '{0}' is not registered")]
    UnknownParameterSet(String),
    #[error("Parameter set name '{0}' is already registered")]
    DuplicateParameterSet(String),
    #[error("Failed to load parameter configuration: {0}")]
    Config(String),
    #[error("Key and engine were built for different parameter sets")]
    ParameterMismatch,
    #[error("Wrong key type: {0}")]
    WrongKeyType(&'static str),
    #[error("Operation not permitted in the current role: {0}")]
    WrongRole(&'static str),
    #[error("Signer used before initialization")]
    Uninitialized,
    #[error("Failed to obtain signing randomness: {0}")]
    RandomnessFailure(String),
    #[error("Signature verification failed: {0}")]
    VerificationFailed(#[from] VerificationError),
}

impl From<rand::Error> for Error {
    fn from(e: rand::Error) -> Self {
        Error::RandomnessFailure(e.to_string())
    }
}

#[cfg(feature = "serialization")]
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VerificationError {
    #[error("signature must be {expected} bytes, found {found} bytes")]
    BadSignatureLength { expected: usize, found: usize },
    #[error("malformed signature component")]
    MalformedSignature,
    #[error("recomputed hypertree root does not match the public root")]
    RootMismatch,
}
