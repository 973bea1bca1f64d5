//! Parameter sets of the SPHINCS+ signature scheme.
//!
//! A [`ParameterSet`] fixes the hash family, the security parameter `n`, the hypertree shape
//! (`h`, `d`), the FORS shape (`k` trees of height `a`) and the Winternitz parameter `w`.
//! Every byte size used by the scheme is derived from these values, so two parties agreeing
//! on a parameter set always agree on key and signature layouts.
//!
//! The twelve parameter sets of the SPHINCS+ round 3.1 submission ("simple" variants) are
//! available as constants. Custom sets can be built with [`ParameterSet::new`], which checks
//! that the shape is usable by this implementation.

use crate::{Error, Result};
use std::fmt;

/// Block size of SHA-256 in bytes, used to pad the public seed.
pub const SHA256_BLOCK_BYTES: usize = 64;

/// Block size of SHA-512 in bytes, used to pad the public seed.
pub const SHA512_BLOCK_BYTES: usize = 128;

/// Byte size of a full (uncompressed) address.
pub const ADDR_BYTES: usize = 32;

/// Byte size of a compressed address, used by the SHA2 family.
pub const SHA2_ADDR_BYTES: usize = 22;

/// Hash family instantiating the tweakable hash, PRF, `PRF_msg` and `H_msg`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "lowercase"))]
pub enum HashFamily {
    Sha2,
    Shake,
}

impl fmt::Display for HashFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashFamily::Sha2 => f.write_str("sha2"),
            HashFamily::Shake => f.write_str("shake"),
        }
    }
}

/// An immutable SPHINCS+ parameter set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParameterSet {
    hash: HashFamily,
    n: usize,
    full_height: usize,
    d: usize,
    fors_height: usize,
    fors_trees: usize,
    wots_w: usize,
}

macro_rules! standard_set {
    ($name: ident, $label: expr, $hash: expr, $n: expr, $h: expr, $d: expr, $a: expr, $k: expr) => {
        #[doc = concat!("SPHINCS+ `", $label, "` (simple).")]
        pub const $name: ParameterSet = ParameterSet {
            hash: $hash,
            n: $n,
            full_height: $h,
            d: $d,
            fors_height: $a,
            fors_trees: $k,
            wots_w: 16,
        };
    };
}

standard_set!(SPHINCS_SHA2_128S, "sha2-128s", HashFamily::Sha2, 16, 63, 7, 12, 14);
standard_set!(SPHINCS_SHA2_128F, "sha2-128f", HashFamily::Sha2, 16, 66, 22, 6, 33);
standard_set!(SPHINCS_SHA2_192S, "sha2-192s", HashFamily::Sha2, 24, 63, 7, 14, 17);
standard_set!(SPHINCS_SHA2_192F, "sha2-192f", HashFamily::Sha2, 24, 66, 22, 8, 33);
standard_set!(SPHINCS_SHA2_256S, "sha2-256s", HashFamily::Sha2, 32, 64, 8, 14, 22);
standard_set!(SPHINCS_SHA2_256F, "sha2-256f", HashFamily::Sha2, 32, 68, 17, 9, 35);
standard_set!(SPHINCS_SHAKE_128S, "shake-128s", HashFamily::Shake, 16, 63, 7, 12, 14);
standard_set!(SPHINCS_SHAKE_128F, "shake-128f", HashFamily::Shake, 16, 66, 22, 6, 33);
standard_set!(SPHINCS_SHAKE_192S, "shake-192s", HashFamily::Shake, 24, 63, 7, 14, 17);
standard_set!(SPHINCS_SHAKE_192F, "shake-192f", HashFamily::Shake, 24, 66, 22, 8, 33);
standard_set!(SPHINCS_SHAKE_256S, "shake-256s", HashFamily::Shake, 32, 64, 8, 14, 22);
standard_set!(SPHINCS_SHAKE_256F, "shake-256f", HashFamily::Shake, 32, 68, 17, 9, 35);

/// All standard parameter sets together with their canonical names.
pub const STANDARD_PARAMETER_SETS: [(&str, ParameterSet); 12] = [
    ("sphincs+-sha2-128s-simple", SPHINCS_SHA2_128S),
    ("sphincs+-sha2-128f-simple", SPHINCS_SHA2_128F),
    ("sphincs+-sha2-192s-simple", SPHINCS_SHA2_192S),
    ("sphincs+-sha2-192f-simple", SPHINCS_SHA2_192F),
    ("sphincs+-sha2-256s-simple", SPHINCS_SHA2_256S),
    ("sphincs+-sha2-256f-simple", SPHINCS_SHA2_256F),
    ("sphincs+-shake-128s-simple", SPHINCS_SHAKE_128S),
    ("sphincs+-shake-128f-simple", SPHINCS_SHAKE_128F),
    ("sphincs+-shake-192s-simple", SPHINCS_SHAKE_192S),
    ("sphincs+-shake-192f-simple", SPHINCS_SHAKE_192F),
    ("sphincs+-shake-256s-simple", SPHINCS_SHAKE_256S),
    ("sphincs+-shake-256f-simple", SPHINCS_SHAKE_256F),
];

impl ParameterSet {
    /// Builds a custom parameter set.
    ///
    /// # Arguments
    ///
    /// * `hash` - The hash family.
    /// * `n` - Security parameter in bytes, one of 16, 24 or 32.
    /// * `full_height` - Total hypertree height `h`, a multiple of `d`.
    /// * `d` - Number of hypertree layers.
    /// * `fors_height` - Height `a` of each FORS tree.
    /// * `fors_trees` - Number `k` of FORS trees.
    /// * `wots_w` - Winternitz parameter, one of 4, 16 or 256.
    ///
    /// # Returns
    ///
    /// The parameter set, or [`Error::InvalidParameters`] naming the violated constraint.
    pub fn new(
        hash: HashFamily,
        n: usize,
        full_height: usize,
        d: usize,
        fors_height: usize,
        fors_trees: usize,
        wots_w: usize,
    ) -> Result<Self> {
        let invalid = |reason: String| Err(Error::InvalidParameters(reason));

        if !matches!(n, 16 | 24 | 32) {
            return invalid(format!("n must be 16, 24 or 32, got {n}"));
        }
        if d == 0 || full_height == 0 || full_height % d != 0 {
            return invalid(format!(
                "hypertree height {full_height} must be a positive multiple of the layer count {d}"
            ));
        }
        let tree_height = full_height / d;
        if tree_height > 16 {
            return invalid(format!("subtree height {tree_height} exceeds 16"));
        }
        if full_height - tree_height > 64 {
            return invalid(format!(
                "tree index needs {} bits, at most 64 are supported",
                full_height - tree_height
            ));
        }
        if fors_height == 0 || fors_height > 24 {
            return invalid(format!("FORS height {fors_height} must be in 1..=24"));
        }
        if fors_trees == 0 || (fors_trees as u64) << fors_height > u32::MAX as u64 {
            return invalid(format!(
                "{fors_trees} FORS trees of height {fors_height} do not fit a 32-bit tree index"
            ));
        }
        if !matches!(wots_w, 4 | 16 | 256) {
            return invalid(format!("Winternitz parameter must be 4, 16 or 256, got {wots_w}"));
        }

        Ok(Self {
            hash,
            n,
            full_height,
            d,
            fors_height,
            fors_trees,
            wots_w,
        })
    }

    /// Canonical name if this is one of the standard parameter sets.
    pub fn name(&self) -> Option<&'static str> {
        STANDARD_PARAMETER_SETS
            .iter()
            .find(|(_, set)| set == self)
            .map(|(name, _)| *name)
    }

    pub fn hash(&self) -> HashFamily {
        self.hash
    }

    /// Hash output length in bytes.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Height of the hypertree.
    pub fn full_height(&self) -> usize {
        self.full_height
    }

    /// Number of subtree layers.
    pub fn d(&self) -> usize {
        self.d
    }

    /// Height `h'` of every subtree.
    pub fn tree_height(&self) -> usize {
        self.full_height / self.d
    }

    pub fn fors_height(&self) -> usize {
        self.fors_height
    }

    pub fn fors_trees(&self) -> usize {
        self.fors_trees
    }

    pub fn wots_w(&self) -> usize {
        self.wots_w
    }

    pub fn wots_logw(&self) -> usize {
        self.wots_w.trailing_zeros() as usize
    }

    pub fn wots_len1(&self) -> usize {
        8 * self.n / self.wots_logw()
    }

    /// Number of base-`w` digits needed for the largest checksum `len1 * (w - 1)`.
    pub fn wots_len2(&self) -> usize {
        let mut max_checksum = self.wots_len1() * (self.wots_w - 1);
        let mut digits = 0;
        while max_checksum > 0 {
            max_checksum >>= self.wots_logw();
            digits += 1;
        }
        digits
    }

    pub fn wots_len(&self) -> usize {
        self.wots_len1() + self.wots_len2()
    }

    /// Byte size of a WOTS+ signature (and of an uncompressed WOTS+ public key).
    pub fn wots_bytes(&self) -> usize {
        self.wots_len() * self.n
    }

    /// Number of bits selecting the subtree of the bottom layer.
    pub fn tree_bits(&self) -> usize {
        self.full_height - self.tree_height()
    }

    /// Number of bits selecting the leaf within a subtree.
    pub fn leaf_bits(&self) -> usize {
        self.tree_height()
    }

    /// Byte size of the FORS part of the message digest.
    pub fn fors_msg_bytes(&self) -> usize {
        (self.fors_height * self.fors_trees + 7) / 8
    }

    /// Byte size of the full `H_msg` output.
    pub fn digest_bytes(&self) -> usize {
        self.fors_msg_bytes() + (self.tree_bits() + 7) / 8 + (self.leaf_bits() + 7) / 8
    }

    pub fn fors_bytes(&self) -> usize {
        (self.fors_height + 1) * self.fors_trees * self.n
    }

    /// Byte size of one hypertree layer: a WOTS+ signature and an authentication path.
    pub fn xmss_bytes(&self) -> usize {
        self.wots_bytes() + self.tree_height() * self.n
    }

    pub fn ht_bytes(&self) -> usize {
        self.d * self.xmss_bytes()
    }

    /// Fixed byte size of a signature.
    pub fn signature_bytes(&self) -> usize {
        self.n + self.fors_bytes() + self.ht_bytes()
    }

    pub fn public_key_bytes(&self) -> usize {
        2 * self.n
    }

    pub fn private_key_bytes(&self) -> usize {
        4 * self.n
    }

    /// Byte size of the seed accepted by deterministic key generation.
    pub fn seed_bytes(&self) -> usize {
        3 * self.n
    }

    /// Whether the SHA2 family switches to SHA-512 for multi-block hashing.
    pub(crate) fn uses_sha512(&self) -> bool {
        self.hash == HashFamily::Sha2 && self.n > 16
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(
                f,
                "sphincs+-{}-custom(n={}, h={}, d={}, a={}, k={}, w={})",
                self.hash, self.n, self.full_height, self.d, self.fors_height, self.fors_trees,
                self.wots_w
            ),
        }
    }
}
