//! GeoJSON and translation fetches.

use formats::{DatasetId, FeatureCollection};
use gloo_net::http::Request;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    Network(String),
    Status { url: String, status: u16 },
    Parse(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Network(msg) => write!(f, "network error: {msg}"),
            LoadError::Status { url, status } => write!(f, "{url} answered HTTP {status}"),
            LoadError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

pub async fn fetch_text(url: &str) -> Result<String, LoadError> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| LoadError::Network(e.to_string()))?;
    if !resp.ok() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: resp.status(),
        });
    }
    resp.text()
        .await
        .map_err(|e| LoadError::Network(e.to_string()))
}

/// A fetched dataset: the typed collection for the story and the raw
/// document for the widget.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub id: DatasetId,
    pub collection: FeatureCollection,
    pub raw: Value,
}

pub fn parse_dataset(id: DatasetId, text: &str) -> Result<LoadedDataset, LoadError> {
    let raw: Value = serde_json::from_str(text).map_err(|e| LoadError::Parse(e.to_string()))?;
    let collection =
        FeatureCollection::from_geojson_value(&raw).map_err(|e| LoadError::Parse(e.to_string()))?;
    Ok(LoadedDataset { id, collection, raw })
}

pub async fn fetch_dataset(id: DatasetId) -> Result<LoadedDataset, LoadError> {
    let text = fetch_text(&id.url_path()).await?;
    parse_dataset(id, &text)
}

#[cfg(test)]
mod tests {
    use super::{LoadError, parse_dataset};
    use formats::DatasetId;

    #[test]
    fn parses_feature_collections() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"Ketinggian":"tinggi"},
             "geometry":{"type":"Point","coordinates":[115.21,-8.65]}}]}"#;
        let loaded = parse_dataset(DatasetId::FloodPoints, text).unwrap();
        assert_eq!(loaded.collection.len(), 1);
        assert_eq!(loaded.raw["features"][0]["properties"]["Ketinggian"], "tinggi");
    }

    #[test]
    fn rejects_other_documents() {
        assert!(matches!(
            parse_dataset(DatasetId::Rivers, r#"{"type":"Feature"}"#),
            Err(LoadError::Parse(_))
        ));
        assert!(matches!(
            parse_dataset(DatasetId::Rivers, "<html>"),
            Err(LoadError::Parse(_))
        ));
    }
}
