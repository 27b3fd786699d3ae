use serde::{Deserialize, Serialize};

use crate::dataset::DatasetId;
use crate::geojson::{FeatureCollection, GeoJsonError};

pub const MANIFEST_VERSION: &str = "1.0";

/// Index of the data directory, written by the `storyboard` tool and served
/// next to the datasets so clients can cache-bust on `content_hash`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataManifest {
    pub version: String,
    pub datasets: Vec<DatasetEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetEntry {
    pub id: DatasetId,
    pub path: String,
    /// blake3 of the file bytes, hex.
    pub content_hash: String,
    pub feature_count: usize,
    /// `[min_lng, min_lat, max_lng, max_lat]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f64; 4]>,
}

impl DatasetEntry {
    /// Parses `bytes` as GeoJSON and records hash, count and extent.
    pub fn from_bytes(id: DatasetId, bytes: &[u8]) -> Result<Self, GeoJsonError> {
        let text = std::str::from_utf8(bytes).map_err(|e| GeoJsonError::Json(e.to_string()))?;
        let fc = FeatureCollection::from_geojson_str(text)?;
        Ok(Self {
            id,
            path: id.url_path(),
            content_hash: blake3::hash(bytes).to_hex().to_string(),
            feature_count: fc.len(),
            bbox: fc.bounds().map(|b| b.to_bbox()),
        })
    }
}

impl DataManifest {
    pub fn new() -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            datasets: Vec::new(),
        }
    }

    /// Inserts or replaces the entry for `entry.id`, keeping `DatasetId` order.
    pub fn upsert(&mut self, entry: DatasetEntry) {
        self.datasets.retain(|e| e.id != entry.id);
        self.datasets.push(entry);
        self.datasets.sort_by_key(|e| e.id);
    }

    pub fn get(&self, id: DatasetId) -> Option<&DatasetEntry> {
        self.datasets.iter().find(|e| e.id == id)
    }
}

impl Default for DataManifest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{DataManifest, DatasetEntry};
    use crate::dataset::DatasetId;
    use pretty_assertions::assert_eq;

    const RIVERS: &[u8] = br#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"name":"Tukad Badung"},
         "geometry":{"type":"LineString","coordinates":[[115.21,-8.64],[115.20,-8.70]]}}]}"#;

    #[test]
    fn entry_records_hash_count_and_bbox() {
        let entry = DatasetEntry::from_bytes(DatasetId::Rivers, RIVERS).expect("entry");
        assert_eq!(entry.path, "/data/rivers.geojson");
        assert_eq!(entry.feature_count, 1);
        assert_eq!(entry.bbox, Some([115.20, -8.70, 115.21, -8.64]));
        assert_eq!(entry.content_hash, blake3::hash(RIVERS).to_hex().to_string());
    }

    #[test]
    fn upsert_replaces_and_orders_entries() {
        let mut m = DataManifest::new();
        let rivers = DatasetEntry::from_bytes(DatasetId::Rivers, RIVERS).expect("entry");
        let mut points = rivers.clone();
        points.id = DatasetId::FloodPoints;
        m.upsert(rivers.clone());
        m.upsert(points);
        m.upsert(rivers);
        let ids: Vec<_> = m.datasets.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![DatasetId::FloodPoints, DatasetId::Rivers]);
        assert!(m.get(DatasetId::Population).is_none());
    }
}
