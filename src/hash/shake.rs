use crate::adrs::Adrs;
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};

#[derive(Clone, Debug)]
pub(crate) struct ShakeHasher {
    pub_seed: Vec<u8>,
}

impl ShakeHasher {
    pub(crate) fn new(pub_seed: &[u8]) -> Self {
        Self {
            pub_seed: pub_seed.to_vec(),
        }
    }

    fn shake256(output: &mut [u8], inputs: &[&[u8]]) {
        let mut hasher = Shake256::default();
        for input in inputs {
            hasher.update(input);
        }
        let mut reader = hasher.finalize_xof();
        reader.read(output);
    }

    /// Tweakable hash over any number of `n`-byte blocks (F, H and T_l).
    ///
    /// T_l(PK.seed, ADRS, M) = SHAKE256(PK.seed||ADRS||M, 8n)
    pub(crate) fn thash(&self, output: &mut [u8], input: &[u8], adrs: &Adrs) {
        Self::shake256(output, &[&self.pub_seed, &adrs.to_bytes(), input]);
    }

    /// Applies [`Self::thash`] to a single block, modifying it in place.
    pub(crate) fn thash_inplace(&self, inout: &mut [u8], adrs: &Adrs) {
        let mut hasher = Shake256::default();
        hasher.update(&self.pub_seed);
        hasher.update(&adrs.to_bytes());
        hasher.update(inout);
        let mut reader = hasher.finalize_xof();
        reader.read(inout);
    }

    /// PRF(PK.seed, SK.seed, ADRS) = SHAKE256(PK.seed||ADRS||SK.seed, 8n)
    pub(crate) fn prf(&self, output: &mut [u8], sk_seed: &[u8], adrs: &Adrs) {
        self.thash(output, sk_seed, adrs);
    }

    /// PRF_msg(SK.prf, OptRand, M) = SHAKE256(SK.prf||OptRand||M, 8n)
    pub(crate) fn prf_msg(output: &mut [u8], sk_prf: &[u8], opt_rand: &[u8], message: &[u8]) {
        Self::shake256(output, &[sk_prf, opt_rand, message]);
    }

    /// H_msg(R, PK.seed, PK.root, M) = SHAKE256(R||PK.seed||PK.root||M, 8m)
    pub(crate) fn h_msg(
        output: &mut [u8],
        r: &[u8],
        pk_seed: &[u8],
        pk_root: &[u8],
        message: &[u8],
    ) {
        Self::shake256(output, &[r, pk_seed, pk_root, message]);
    }
}
