use sphincs_core::params::{SPHINCS_SHA2_128F, SPHINCS_SHAKE_128F};
use sphincs_core::{
    Error, KeyParameters, MessageSigner, ParameterRegistry, PrivateKey, SphincsPlus, VerificationError,
};
use rand::rngs::OsRng;

fn main() {
    env_logger::init();

    // Look up a parameter set by name, or use one of the constants directly.
    let registry = ParameterRegistry::standard();
    let params = registry.get("sphincs+-shake-128f-simple").unwrap();
    assert_eq!(params, SPHINCS_SHAKE_128F);

    // Create a key pair.
    let sphincs = SphincsPlus::new(params);
    let (pk, sk) = sphincs.keygen().unwrap();

    // Sign a message, deterministically and with fresh randomness.
    let signer = sphincs.signer(&sk).unwrap();
    let msg1 = "Hi! This is my first SPHINCS+ message!".as_bytes();
    let sig1 = signer.sign(msg1);
    let sig2 = signer.sign_with_rng(msg1, &mut OsRng).unwrap();
    println!("Signature size: {} bytes", sig1.as_ref().len());

    // Anyone holding the public key can verify both signatures.
    let verifier = sphincs.verifier(&pk).unwrap();
    assert!(verifier.verify(msg1, sig1.as_ref()));
    assert!(verifier.verify(msg1, sig2.as_ref()));

    // A signature for another message is rejected, with the reason available.
    let msg2 = "Hi! This is my second SPHINCS+ message!".as_bytes();
    assert_eq!(
        verifier.verify_detailed(msg2, sig1.as_ref()),
        Err(Error::VerificationFailed(VerificationError::RootMismatch))
    );

    // Keys round-trip through their byte form.
    let sk_bytes = sk.to_bytes();
    let restored = PrivateKey::from_bytes(params, &sk_bytes).unwrap();
    assert_eq!(restored.public_key(), pk);

    // The same scheme behind a role-selected signer, with the SHA2 instantiation.
    let sha2 = SphincsPlus::new(SPHINCS_SHA2_128F);
    let (pk, sk) = sha2.keygen().unwrap();

    let mut message_signer = MessageSigner::new();
    message_signer
        .init(true, KeyParameters::PrivateWithRandom(sk, Box::new(OsRng)))
        .unwrap();
    let sig3 = message_signer.generate_signature(msg2).unwrap();

    let mut message_verifier = MessageSigner::new();
    message_verifier
        .init(false, KeyParameters::Public(pk))
        .unwrap();
    assert_eq!(message_verifier.verify_signature(msg2, &sig3), Ok(true));

    println!("Simple SPHINCS+ example finished successfully!");
}
