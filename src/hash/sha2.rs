use crate::adrs::Adrs;
use crate::params::{SHA256_BLOCK_BYTES, SHA512_BLOCK_BYTES};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};
use std::fmt;

/// SHA2 instantiation. Category 1 (`n = 16`) uses SHA-256 throughout; categories 3 and 5
/// switch the multi-block tweakable hash, `PRF_msg` and `H_msg` to SHA-512.
#[derive(Clone)]
pub(crate) struct Sha2Hasher {
    sha256: Sha256,
    sha512: Option<Sha512>,
}

impl fmt::Debug for Sha2Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sha2Hasher")
            .field("sha512", &self.sha512.is_some())
            .finish()
    }
}

impl Sha2Hasher {
    pub(crate) fn new(pub_seed: &[u8], use_sha512: bool) -> Self {
        // block-pad and initialize sha256 and sha512 with pub_seed
        let mut block256 = [0_u8; SHA256_BLOCK_BYTES];
        block256[..pub_seed.len()].copy_from_slice(pub_seed);
        let mut sha256 = Sha256::new();
        sha256.update(block256);

        let sha512 = use_sha512.then(|| {
            let mut block512 = [0_u8; SHA512_BLOCK_BYTES];
            block512[..pub_seed.len()].copy_from_slice(pub_seed);
            let mut sha512 = Sha512::new();
            sha512.update(block512);
            sha512
        });

        Self { sha256, sha512 }
    }

    /// F(PK.seed, ADRS, M1) = SHA-256(BlockPad(PK.seed)||ADRSc||M1)
    fn thash_256(&self, output: &mut [u8], input: &[u8], adrs: &Adrs) {
        let mut hasher = self.sha256.clone();
        hasher.update(adrs.to_compressed());
        hasher.update(input);
        let len = output.len();
        output.copy_from_slice(&hasher.finalize()[..len]);
    }

    /// Tweakable hash over any number of `n`-byte blocks.
    ///
    /// H and T_l use SHA-512(BlockPad(PK.seed)||ADRSc||M) when the SHA-512 state is present,
    /// F always uses SHA-256.
    pub(crate) fn thash(&self, output: &mut [u8], input: &[u8], adrs: &Adrs) {
        match &self.sha512 {
            Some(sha512) if input.len() > output.len() => {
                let mut hasher = sha512.clone();
                hasher.update(adrs.to_compressed());
                hasher.update(input);
                let len = output.len();
                output.copy_from_slice(&hasher.finalize()[..len]);
            }
            _ => self.thash_256(output, input, adrs),
        }
    }

    /// Applies F to a single block, modifying it in place.
    pub(crate) fn thash_inplace(&self, inout: &mut [u8], adrs: &Adrs) {
        let mut hasher = self.sha256.clone();
        hasher.update(adrs.to_compressed());
        hasher.update(&*inout);
        let len = inout.len();
        inout.copy_from_slice(&hasher.finalize()[..len]);
    }

    /// PRF(PK.seed, SK.seed, ADRS) = SHA-256(BlockPad(PK.seed)||ADRSc||SK.seed)
    pub(crate) fn prf(&self, output: &mut [u8], sk_seed: &[u8], adrs: &Adrs) {
        self.thash_256(output, sk_seed, adrs);
    }

    /// PRF_msg(SK.prf, OptRand, M) = HMAC-SHA-X(SK.prf, OptRand||M)
    pub(crate) fn prf_msg(&self, output: &mut [u8], sk_prf: &[u8], opt_rand: &[u8], message: &[u8]) {
        let len = output.len();
        if self.sha512.is_some() {
            let mut mac = <Hmac<Sha512> as Mac>::new_from_slice(sk_prf)
                .expect("HMAC accepts keys of any length");
            mac.update(opt_rand);
            mac.update(message);
            output.copy_from_slice(&mac.finalize().into_bytes()[..len]);
        } else {
            let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(sk_prf)
                .expect("HMAC accepts keys of any length");
            mac.update(opt_rand);
            mac.update(message);
            output.copy_from_slice(&mac.finalize().into_bytes()[..len]);
        }
    }

    /// H_msg(R, PK.seed, PK.root, M) =
    ///     MGF1-SHA-X(R||PK.seed||SHA-X(R||PK.seed||PK.root||M), m)
    pub(crate) fn h_msg(
        &self,
        output: &mut [u8],
        r: &[u8],
        pk_seed: &[u8],
        pk_root: &[u8],
        message: &[u8],
    ) {
        if self.sha512.is_some() {
            Self::h_msg_with::<Sha512>(output, r, pk_seed, pk_root, message);
        } else {
            Self::h_msg_with::<Sha256>(output, r, pk_seed, pk_root, message);
        }
    }

    fn h_msg_with<D: Digest>(
        output: &mut [u8],
        r: &[u8],
        pk_seed: &[u8],
        pk_root: &[u8],
        message: &[u8],
    ) {
        let mut hasher = D::new();
        hasher.update(r);
        hasher.update(pk_seed);
        hasher.update(pk_root);
        hasher.update(message);
        let inner = hasher.finalize();

        let mut mgf_seed = Vec::with_capacity(r.len() + pk_seed.len() + inner.len());
        mgf_seed.extend_from_slice(r);
        mgf_seed.extend_from_slice(pk_seed);
        mgf_seed.extend_from_slice(&inner);
        mgf1::<D>(output, &mgf_seed);
    }
}

/// MGF1 mask generation: `Hash(seed||counter_0) || Hash(seed||counter_1) || ...`, truncated to
/// the output length.
fn mgf1<D: Digest>(output: &mut [u8], seed: &[u8]) {
    for (counter, chunk) in output.chunks_mut(<D as Digest>::output_size()).enumerate() {
        let mut hasher = D::new();
        hasher.update(seed);
        hasher.update((counter as u32).to_be_bytes());
        let len = chunk.len();
        chunk.copy_from_slice(&hasher.finalize()[..len]);
    }
}
