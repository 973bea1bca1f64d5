//! Hash addresses (ADRS).
//!
//! Every call to the tweakable hash or the PRF carries an [`Adrs`] naming the exact position
//! of the value being computed: which hypertree layer and tree, which key pair, which chain
//! or tree node. This binds each hash invocation to its place in the structure and keeps
//! unrelated invocations from ever sharing an input prefix.
//!
//! `Adrs` is a plain value. Every setter consumes the address and returns a new one, and a
//! type change through [`Adrs::with_type`] clears everything below the tree address, so a
//! field written for one context can never leak into another.
//!
//! The 32-byte serialisation follows the structure of the
//! [SPHINCS+ v.3.1 submission](https://sphincs.org/data/sphincs+-r3.1-specification.pdf):
//! * `layer address`:    bytes 0..4,
//! * `tree address`:     bytes 4..16, of which bytes 8..16 hold the 64-bit value,
//! * `type`:             bytes 16..20,
//! * `key pair address`: bytes 20..24,
//! * `chain address` or `tree height`: bytes 24..28,
//! * `hash address` or `tree index`:   bytes 28..32.
//!
//! The SHA2 family hashes the 22-byte compressed form
//! `ADRS[3] || ADRS[8..16] || ADRS[19] || ADRS[20..32]`.

use crate::params::{ADDR_BYTES, SHA2_ADDR_BYTES};

/// All 7 types of ADRS defined for SPHINCS+.
/// The corresponding value is set as the `type` in an ADRS.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AdrsType {
    /// 0, used for hashing through a chain.
    #[default]
    WotsHash = 0,
    /// 1, used for compression of the WOTS+ public key.
    WotsPk = 1,
    /// 2, used for the inner nodes of a hypertree subtree.
    Tree = 2,
    /// 3, used for the leaves and inner nodes of a FORS tree.
    ForsTree = 3,
    /// 4, used for compression of the FORS roots.
    ForsRoots = 4,
    /// 5, used for WOTS+ secret key generation (start of each chain).
    WotsPrf = 5,
    /// 6, used for FORS secret key generation.
    ForsPrf = 6,
}

/// A hash address. See the module documentation for the layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Adrs {
    layer: u32,
    tree: u64,
    adrs_type: AdrsType,
    keypair: u32,
    // chain address or tree height
    word1: u32,
    // hash address or tree index
    word2: u32,
}

impl From<AdrsType> for Adrs {
    fn from(adrs_type: AdrsType) -> Self {
        Self::new(adrs_type)
    }
}

impl Adrs {
    /// An all-zero address of the given type (layer 0, tree 0).
    pub fn new(adrs_type: AdrsType) -> Self {
        Self {
            adrs_type,
            ..Self::default()
        }
    }

    /// Specify which level of Merkle tree (the "layer") we're working on.
    #[must_use]
    pub fn with_layer(self, layer: u32) -> Self {
        Self { layer, ..self }
    }

    /// Specify which Merkle tree within the level (the "tree address") we're working on.
    #[must_use]
    pub fn with_tree(self, tree: u64) -> Self {
        Self { tree, ..self }
    }

    /// Switch to another hash context within the same tree: keeps the layer and tree
    /// address and clears everything else.
    #[must_use]
    pub fn with_type(self, adrs_type: AdrsType) -> Self {
        Self {
            layer: self.layer,
            tree: self.tree,
            adrs_type,
            ..Self::default()
        }
    }

    /// Switch to another hash context within the same OTS key pair: keeps the layer, tree
    /// and key pair address and clears the chain/height and hash/index words.
    #[must_use]
    pub fn with_type_in_keypair(self, adrs_type: AdrsType) -> Self {
        Self {
            keypair: self.keypair,
            ..self.with_type(adrs_type)
        }
    }

    /// Specify which Merkle leaf we're working on; that is, which OTS key pair.
    #[must_use]
    pub fn with_keypair(self, keypair: u32) -> Self {
        Self { keypair, ..self }
    }

    /// Specify which chain within the OTS we're working with.
    #[must_use]
    pub fn with_chain(self, chain: u32) -> Self {
        debug_assert!(matches!(
            self.adrs_type,
            AdrsType::WotsHash | AdrsType::WotsPrf
        ));
        Self {
            word1: chain,
            ..self
        }
    }

    /// Specify where in the chain we are.
    #[must_use]
    pub fn with_hash(self, hash: u32) -> Self {
        debug_assert!(matches!(
            self.adrs_type,
            AdrsType::WotsHash | AdrsType::WotsPrf
        ));
        Self {
            word2: hash,
            ..self
        }
    }

    /// Specify the height of the node in the Merkle/FORS tree.
    #[must_use]
    pub fn with_tree_height(self, tree_height: u32) -> Self {
        debug_assert!(self.is_tree_type());
        Self {
            word1: tree_height,
            ..self
        }
    }

    /// Specify the distance from the left edge of the node in the Merkle/FORS tree.
    #[must_use]
    pub fn with_tree_index(self, tree_index: u32) -> Self {
        debug_assert!(self.is_tree_type());
        Self {
            word2: tree_index,
            ..self
        }
    }

    pub fn layer(&self) -> u32 {
        self.layer
    }

    pub fn tree(&self) -> u64 {
        self.tree
    }

    pub fn adrs_type(&self) -> AdrsType {
        self.adrs_type
    }

    pub fn keypair(&self) -> u32 {
        self.keypair
    }

    fn is_tree_type(&self) -> bool {
        matches!(
            self.adrs_type,
            AdrsType::Tree | AdrsType::ForsTree | AdrsType::ForsPrf
        )
    }

    /// The full 32-byte serialisation.
    pub fn to_bytes(&self) -> [u8; ADDR_BYTES] {
        let mut out = [0u8; ADDR_BYTES];
        out[0..4].copy_from_slice(&self.layer.to_be_bytes());
        out[8..16].copy_from_slice(&self.tree.to_be_bytes());
        out[16..20].copy_from_slice(&(self.adrs_type as u32).to_be_bytes());
        out[20..24].copy_from_slice(&self.keypair.to_be_bytes());
        out[24..28].copy_from_slice(&self.word1.to_be_bytes());
        out[28..32].copy_from_slice(&self.word2.to_be_bytes());
        out
    }

    /// The 22-byte compressed serialisation used by the SHA2 family.
    pub fn to_compressed(&self) -> [u8; SHA2_ADDR_BYTES] {
        let full = self.to_bytes();
        let mut out = [0u8; SHA2_ADDR_BYTES];
        out[0] = full[3];
        out[1..9].copy_from_slice(&full[8..16]);
        out[9] = full[19];
        out[10..22].copy_from_slice(&full[20..32]);
        out
    }
}
