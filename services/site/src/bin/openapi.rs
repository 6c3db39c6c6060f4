//! services/site/src/bin/openapi.rs
//!
//! Writes the OpenAPI document for the site's JSON API.
//!
//! Usage: `openapi [OUTPUT]`. The output path defaults to `openapi.json` in
//! the current directory; missing parent directories are created.

use site_lib::web::rest::ApiDoc;
use std::path::{Path, PathBuf};
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn output_path(arg: Option<String>) -> PathBuf {
    arg.filter(|a| !a.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
}

/// Renders `api_doc` as pretty JSON and writes it to `path`.
fn generate_spec(
    api_doc: utoipa::openapi::OpenApi,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let spec_json = api_doc.to_pretty_json()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, spec_json)?;
    println!("OpenAPI document written to {}", path.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = output_path(std::env::args().nth(1));
    generate_spec(ApiDoc::openapi(), &path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn output_defaults_to_openapi_json() {
        assert_eq!(output_path(None), PathBuf::from("openapi.json"));
        assert_eq!(output_path(Some("  ".to_string())), PathBuf::from("openapi.json"));
        assert_eq!(output_path(Some("docs/api.json".to_string())), PathBuf::from("docs/api.json"));
    }

    #[test]
    fn writes_document_into_nested_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docs").join("api.json");

        generate_spec(ApiDoc::openapi(), &path).unwrap();

        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/api/therapy-analytics/latest"));
        assert!(paths.contains_key("/api/admin/therapy-analytics"));
        assert!(paths.contains_key("/api/admin/login"));
    }
}
