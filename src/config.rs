//! Named parameter sets.
//!
//! A [`ParameterRegistry`] maps names to [`ParameterSet`]s. It is an explicit value built by
//! the caller: the standard sets, custom entries, or (with the `serialization` feature) a JSON
//! record such as
//!
//! ```json
//! {
//!   "parameter_sets": [
//!     { "name": "tiny", "hash": "shake", "n": 16, "full_height": 4, "layers": 2,
//!       "fors_height": 3, "fors_trees": 4, "wots_w": 16 }
//!   ]
//! }
//! ```

use crate::params::{ParameterSet, STANDARD_PARAMETER_SETS};
use crate::{Error, Result};
use std::collections::BTreeMap;

#[cfg(feature = "serialization")]
use crate::params::HashFamily;
#[cfg(feature = "serialization")]
use serde::Deserialize;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParameterRegistry {
    entries: BTreeMap<String, ParameterSet>,
}

impl ParameterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The twelve standard "simple" parameter sets under their canonical names,
    /// e.g. `sphincs+-shake-128f-simple`.
    pub fn standard() -> Self {
        Self {
            entries: STANDARD_PARAMETER_SETS
                .iter()
                .map(|(name, params)| (name.to_string(), *params))
                .collect(),
        }
    }

    /// Adds an entry. Names are unique.
    pub fn with_entry(mut self, name: impl Into<String>, params: ParameterSet) -> Result<Self> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(Error::DuplicateParameterSet(name));
        }
        self.entries.insert(name, params);
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Result<ParameterSet> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownParameterSet(name.to_string()))
    }

    /// Registered names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads a registry from a JSON record. Every entry is validated like
    /// [`ParameterSet::new`]; the first invalid or duplicate entry fails the whole load.
    #[cfg(feature = "serialization")]
    pub fn from_json(json: &str) -> Result<Self> {
        let record: RegistryRecord = serde_json::from_str(json)?;
        record
            .parameter_sets
            .into_iter()
            .try_fold(Self::new(), |registry, entry| {
                let params = ParameterSet::new(
                    entry.hash,
                    entry.n,
                    entry.full_height,
                    entry.layers,
                    entry.fors_height,
                    entry.fors_trees,
                    entry.wots_w,
                )?;
                log::debug!("loaded parameter set '{}': {params}", entry.name);
                registry.with_entry(entry.name, params)
            })
    }
}

#[cfg(feature = "serialization")]
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryRecord {
    parameter_sets: Vec<ParameterRecord>,
}

#[cfg(feature = "serialization")]
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ParameterRecord {
    name: String,
    hash: HashFamily,
    n: usize,
    full_height: usize,
    layers: usize,
    fors_height: usize,
    fors_trees: usize,
    wots_w: usize,
}
