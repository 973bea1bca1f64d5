//! # Hypertree
//!
//! A tree of `d` layers of Merkle trees of height `h'`, whose leaves are W-OTS+ public keys.
//! Each tree on layer `i > 0` signs the roots of the trees below it; the single tree of the
//! top layer has the public key root as its root.

use crate::adrs::{Adrs, AdrsType};
use crate::hash::Engine;
use crate::merkle::{compute_root, treehash};
use crate::params::ParameterSet;
use crate::utils::write_at;
use crate::wots_plus::WotsPlus;
use crate::{Error, Result};

/// Tree address of tree `tree` on `layer`.
pub(crate) fn tree_adrs(layer: u32, tree: u64) -> Adrs {
    Adrs::new(AdrsType::Tree).with_layer(layer).with_tree(tree)
}

/// Base address of the W-OTS+ key pair at leaf `keypair` of tree `tree` on `layer`.
pub(crate) fn wots_adrs(layer: u32, tree: u64, keypair: u32) -> Adrs {
    Adrs::new(AdrsType::WotsHash)
        .with_layer(layer)
        .with_tree(tree)
        .with_keypair(keypair)
}

/// Position of the parent tree one layer up: the low `h'` bits of `idx_tree` become the leaf
/// index, the remaining bits the tree index.
pub(crate) fn next_layer(params: &ParameterSet, idx_tree: u64) -> (u64, u32) {
    let h = params.tree_height();
    let idx_leaf = (idx_tree & ((1_u64 << h) - 1)) as u32;
    (idx_tree >> h, idx_leaf)
}

/// Signature of one layer: a W-OTS+ signature and the authentication path of its key pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmssSignature {
    pub wots_sig: Vec<u8>,
    pub auth_path: Vec<u8>,
}

/// A hypertree signature, bottom layer first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HtSignature {
    pub layers: Vec<XmssSignature>,
}

impl HtSignature {
    /// Parses a hypertree signature of exactly `ht_bytes()` bytes.
    pub fn from_bytes(params: &ParameterSet, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != params.ht_bytes() {
            return Err(Error::BadLength(params.ht_bytes(), bytes.len()));
        }
        let layers = bytes
            .chunks_exact(params.xmss_bytes())
            .map(|chunk| {
                let (wots_sig, auth_path) = chunk.split_at(params.wots_bytes());
                XmssSignature {
                    wots_sig: wots_sig.to_vec(),
                    auth_path: auth_path.to_vec(),
                }
            })
            .collect();
        Ok(Self { layers })
    }

    /// Serialises into `buf` at `*pos`, advancing the position.
    pub fn write_to(&self, buf: &mut [u8], pos: &mut usize) {
        for layer in &self.layers {
            write_at(buf, pos, &layer.wots_sig);
            write_at(buf, pos, &layer.auth_path);
        }
    }

    fn is_well_formed(&self, params: &ParameterSet) -> bool {
        let auth_bytes = params.tree_height() * params.n();
        self.layers.len() == params.d()
            && self
                .layers
                .iter()
                .all(|l| l.wots_sig.len() == params.wots_bytes() && l.auth_path.len() == auth_bytes)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Hypertree<'a> {
    engine: &'a Engine,
}

impl<'a> Hypertree<'a> {
    pub fn new(engine: &'a Engine) -> Self {
        Self { engine }
    }

    /// Signs the `n`-byte `value` with the bottom-layer leaf `idx_leaf` of tree `idx_tree`.
    pub fn sign(&self, value: &[u8], sk_seed: &[u8], mut idx_tree: u64, mut idx_leaf: u32) -> HtSignature {
        let params = self.engine.params();
        let wots = WotsPlus::new(self.engine);
        let mut root = value.to_vec();
        let mut layers = Vec::with_capacity(params.d());

        for layer in 0..params.d() as u32 {
            log::trace!("hypertree sign: layer {layer}, tree {idx_tree}, leaf {idx_leaf}");
            let wots_sig = wots.sign(&root, sk_seed, wots_adrs(layer, idx_tree, idx_leaf));
            let (layer_root, auth_path) = treehash(
                self.engine,
                idx_leaf,
                0,
                params.tree_height(),
                tree_adrs(layer, idx_tree),
                |j| wots.keygen(sk_seed, wots_adrs(layer, idx_tree, j)),
            );
            layers.push(XmssSignature { wots_sig, auth_path });

            root = layer_root;
            (idx_tree, idx_leaf) = next_layer(params, idx_tree);
        }

        HtSignature { layers }
    }

    /// Like [`Self::sign`], writing the serialised signature into `buf` at `*pos`.
    pub fn sign_into(
        &self,
        value: &[u8],
        sk_seed: &[u8],
        idx_tree: u64,
        idx_leaf: u32,
        buf: &mut [u8],
        pos: &mut usize,
    ) {
        self.sign(value, sk_seed, idx_tree, idx_leaf)
            .write_to(buf, pos);
    }

    /// Verifies a hypertree signature on `value` against the public key root.
    ///
    /// Returns `false` for signatures with the wrong number or size of layers.
    pub fn verify(
        &self,
        value: &[u8],
        signature: &HtSignature,
        mut idx_tree: u64,
        mut idx_leaf: u32,
        root: &[u8],
    ) -> bool {
        let params = self.engine.params();
        if !signature.is_well_formed(params) {
            return false;
        }

        let wots = WotsPlus::new(self.engine);
        let mut node = value.to_vec();
        for (layer, xmss) in signature.layers.iter().enumerate() {
            let layer = layer as u32;
            log::trace!("hypertree verify: layer {layer}, tree {idx_tree}, leaf {idx_leaf}");
            let leaf = wots.pk_from_sig(&xmss.wots_sig, &node, wots_adrs(layer, idx_tree, idx_leaf));
            node = compute_root(
                self.engine,
                &leaf,
                idx_leaf,
                0,
                &xmss.auth_path,
                tree_adrs(layer, idx_tree),
            );
            (idx_tree, idx_leaf) = next_layer(params, idx_tree);
        }

        node == root
    }

    /// Root of the single tree on the top layer.
    pub fn root(&self, sk_seed: &[u8]) -> Vec<u8> {
        let params = self.engine.params();
        let wots = WotsPlus::new(self.engine);
        let top = params.d() as u32 - 1;
        let (root, _) = treehash(self.engine, 0, 0, params.tree_height(), tree_adrs(top, 0), |j| {
            wots.keygen(sk_seed, wots_adrs(top, 0, j))
        });
        root
    }
}
