//! Routing model loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::RoutingModel;
use crate::config::validation::validate_model;
use crate::error::ModelError;

/// Parse a snapshot from text in the given format (`toml` or `json`).
pub fn parse_model(content: &str, format: &str) -> Result<RoutingModel, ModelError> {
    let model: RoutingModel = match format {
        "toml" => toml::from_str(content)?,
        "json" => serde_json::from_str(content)?,
        other => return Err(ModelError::UnsupportedFormat(other.to_string())),
    };

    validate_model(&model).map_err(ModelError::Validation)?;

    Ok(model)
}

/// Load and validate a snapshot, picking the format from the extension.
pub fn load_model(path: &Path) -> Result<RoutingModel, ModelError> {
    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let content = fs::read_to_string(path)?;

    let model = parse_model(&content, &format)?;
    tracing::debug!(
        path = %path.display(),
        servers = model.servers.len(),
        backends = model.backends.len(),
        "routing model loaded"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let model = parse_model(
            r#"{"servers":[{"hostname":"foo.bar","locations":[{"path":"/"}]}]}"#,
            "json",
        )
        .unwrap();
        assert_eq!(model.servers[0].hostname, "foo.bar");
    }

    #[test]
    fn test_unsupported_format() {
        let err = parse_model("", "yaml").unwrap_err();
        assert!(matches!(err, ModelError::UnsupportedFormat(f) if f == "yaml"));
    }

    #[test]
    fn test_invalid_protocol_rejected() {
        let err = parse_model(
            r#"
            [[servers]]
            hostname = "foo.bar"
            [[servers.locations]]
            backend_protocol = "SPDY"
            "#,
            "toml",
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Toml(_)));
    }

    #[test]
    fn test_validation_failure() {
        let err = parse_model(
            r#"
            [[servers]]
            hostname = "a"
            [[servers]]
            hostname = "a"
            "#,
            "toml",
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Validation(ref errors) if errors.len() == 1));
    }
}
