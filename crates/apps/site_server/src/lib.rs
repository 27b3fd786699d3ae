//! Static host for the story: the built site, its wasm bundle and the
//! GeoJSON datasets under `/data`.

use std::path::{Component, Path, PathBuf};

use axum::body::Body;
use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use formats::{DataManifest, DatasetEntry, DatasetId};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

#[derive(Clone, Debug)]
pub struct SiteState {
    pub site_root: PathBuf,
    pub data_root: PathBuf,
}

pub fn router(state: SiteState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/data/manifest.json", get(get_manifest))
        .route("/data/:file", get(get_dataset))
        .fallback(get_static)
        .layer(CorsLayer::new().allow_origin(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

/// Only the known dataset files are served from the data root.
async fn get_dataset(State(state): State<SiteState>, AxumPath(file): AxumPath<String>) -> Response {
    let Some(id) = DatasetId::ALL.into_iter().find(|d| d.file_name() == file) else {
        debug!(file = %file, "unknown dataset requested");
        return (StatusCode::NOT_FOUND, "not found").into_response();
    };
    serve_file(&state.data_root.join(id.file_name()), "application/geo+json").await
}

async fn get_manifest(State(state): State<SiteState>) -> Response {
    Json(build_manifest(&state.data_root).await).into_response()
}

/// Manifest of the datasets present under `data_root`; unreadable or
/// invalid files are left out.
pub async fn build_manifest(data_root: &Path) -> DataManifest {
    let mut manifest = DataManifest::new();
    for id in DatasetId::ALL {
        let path = data_root.join(id.file_name());
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("dataset missing: {path:?} -> {err}");
                continue;
            }
        };
        match DatasetEntry::from_bytes(id, &bytes) {
            Ok(entry) => manifest.upsert(entry),
            Err(err) => error!("dataset invalid: {path:?} -> {err}"),
        }
    }
    manifest
}

async fn get_static(State(state): State<SiteState>, uri: Uri) -> Response {
    let Some(path) = resolve_static_path(&state.site_root, uri.path()) else {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    };
    let content_type = content_type_for(&path);
    serve_file(&path, content_type).await
}

/// Maps a percent-encoded request path onto `root`. Parent, root and prefix
/// components are rejected after decoding; directory paths resolve to their
/// `index.html`.
pub fn resolve_static_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(request_path).ok()?;
    let relative = decoded.trim_start_matches('/');
    let mut path = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if relative.is_empty() || decoded.ends_with('/') {
        path.push("index.html");
    }
    Some(path)
}

pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("html") => "text/html; charset=utf-8",
        Some("js" | "mjs") => "text/javascript",
        Some("wasm") => "application/wasm",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("geojson") => "application/geo+json",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}

async fn serve_file(path: &Path, content_type: &str) -> Response {
    match tokio::fs::read(path).await {
        Ok(data) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                http::header::CONTENT_TYPE,
                HeaderValue::from_str(content_type)
                    .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
            );
            (StatusCode::OK, headers, Body::from(data)).into_response()
        }
        Err(err) => {
            debug!("file read failed: {path:?} -> {err}");
            (StatusCode::NOT_FOUND, "not found").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{content_type_for, resolve_static_path, router, SiteState};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::path::{Path, PathBuf};
    use tower::ServiceExt;

    const POINTS: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"Ketinggian":"sedang"},
         "geometry":{"type":"Point","coordinates":[115.21,-8.65]}}]}"#;

    fn site() -> (tempfile::TempDir, SiteState) {
        let dir = tempfile::tempdir().unwrap();
        let site_root = dir.path().join("site");
        let data_root = dir.path().join("data");
        std::fs::create_dir_all(&site_root).unwrap();
        std::fs::create_dir_all(&data_root).unwrap();
        std::fs::write(site_root.join("index.html"), "<main></main>").unwrap();
        std::fs::write(data_root.join("flood_points.geojson"), POINTS).unwrap();
        std::fs::write(data_root.join("rivers.geojson"), "not json").unwrap();
        (dir, SiteState { site_root, data_root })
    }

    async fn get(state: SiteState, uri: &str) -> (StatusCode, Option<String>, String) {
        let resp = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(http::header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, String::from_utf8_lossy(&body).into_owned())
    }

    #[test]
    fn static_paths_stay_under_the_root() {
        let root = Path::new("/srv/site");
        assert_eq!(resolve_static_path(root, "/"), Some(PathBuf::from("/srv/site/index.html")));
        assert_eq!(
            resolve_static_path(root, "/pkg/web_bg.wasm"),
            Some(PathBuf::from("/srv/site/pkg/web_bg.wasm"))
        );
        assert_eq!(resolve_static_path(root, "/../etc/passwd"), None);
        assert_eq!(resolve_static_path(root, "/pkg/../../x"), None);
    }

    #[test]
    fn encoded_names_are_decoded_before_the_checks() {
        let root = Path::new("/srv/site");
        assert_eq!(
            resolve_static_path(root, "/img/banjir%20kuta%281%29.jpg"),
            Some(PathBuf::from("/srv/site/img/banjir kuta(1).jpg"))
        );
        assert_eq!(
            resolve_static_path(root, "/caf%C3%A9/"),
            Some(PathBuf::from("/srv/site/café/index.html"))
        );
        assert_eq!(resolve_static_path(root, "/%2e%2e/etc/passwd"), None);
        assert_eq!(resolve_static_path(root, "/pkg%2F..%2F..%2Fx"), None);
        assert_eq!(resolve_static_path(root, "/bad%FF"), None);
    }

    #[test]
    fn wasm_gets_its_mime_type() {
        assert_eq!(content_type_for(Path::new("pkg/web_bg.wasm")), "application/wasm");
        assert_eq!(content_type_for(Path::new("x.GEOJSON")), "application/geo+json");
        assert_eq!(content_type_for(Path::new("LICENSE")), "application/octet-stream");
    }

    #[tokio::test]
    async fn serves_index_and_datasets() {
        let (_dir, state) = site();
        let (status, ct, body) = get(state.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ct.as_deref(), Some("text/html; charset=utf-8"));
        assert_eq!(body, "<main></main>");

        let (status, ct, body) = get(state.clone(), "/data/flood_points.geojson").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ct.as_deref(), Some("application/geo+json"));
        assert!(body.contains("sedang"));

        let (status, _, _) = get(state.clone(), "/data/secrets.geojson").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _, _) = get(state, "/healthz").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn manifest_lists_valid_datasets_only() {
        let (_dir, state) = site();
        let (status, _, body) = get(state, "/data/manifest.json").await;
        assert_eq!(status, StatusCode::OK);
        let manifest: formats::DataManifest = serde_json::from_str(&body).unwrap();
        assert_eq!(manifest.datasets.len(), 1);
        assert_eq!(manifest.datasets[0].id, formats::DatasetId::FloodPoints);
        assert_eq!(manifest.datasets[0].feature_count, 1);
    }
}
