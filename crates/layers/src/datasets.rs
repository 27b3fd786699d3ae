use std::collections::BTreeMap;

use formats::{DatasetId, FeatureCollection};

/// Answers whether a dataset has finished loading.
pub trait DatasetAvailability {
    fn is_loaded(&self, id: DatasetId) -> bool;
}

/// Loaded GeoJSON datasets for one map instance.
///
/// A dataset that failed to fetch or parse is simply absent, and the layers
/// drawing from it are left out of the stack.
#[derive(Debug, Default, Clone)]
pub struct Datasets {
    loaded: BTreeMap<DatasetId, FeatureCollection>,
}

impl Datasets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: DatasetId, collection: FeatureCollection) {
        self.loaded.insert(id, collection);
    }

    pub fn get(&self, id: DatasetId) -> Option<&FeatureCollection> {
        self.loaded.get(&id)
    }

    pub fn loaded_ids(&self) -> impl Iterator<Item = DatasetId> + '_ {
        self.loaded.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

impl DatasetAvailability for Datasets {
    fn is_loaded(&self, id: DatasetId) -> bool {
        self.loaded.contains_key(&id)
    }
}

/// Every dataset loaded; handy for table checks that ignore network state.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllLoaded;

impl DatasetAvailability for AllLoaded {
    fn is_loaded(&self, _id: DatasetId) -> bool {
        true
    }
}
