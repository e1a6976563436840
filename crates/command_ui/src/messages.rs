use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ACTOR_UNRESOLVED_MESSAGE: &str = "Erreur: Impossible d'obtenir le joueur";

/// User-facing diagnostic texts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MessageCatalog {
    pub actor_unresolved: String,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            actor_unresolved: DEFAULT_ACTOR_UNRESOLVED_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read message catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse message catalog {path} at {location}: {message}")]
    Parse {
        path: PathBuf,
        location: String,
        message: String,
    },
    #[error("invalid message catalog field {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl MessageCatalog {
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_json(path, &raw)
    }

    fn parse_json(path: &Path, raw: &str) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let catalog = serde_path_to_error::deserialize::<_, MessageCatalog>(&mut deserializer)
            .map_err(|error| {
                let location = error.path().to_string();
                ConfigError::Parse {
                    path: path.to_path_buf(),
                    location,
                    message: error.into_inner().to_string(),
                }
            })?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.actor_unresolved.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "actor_unresolved",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use super::*;

    fn write_catalog(value: &serde_json::Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(value.to_string().as_bytes())
            .expect("write catalog");
        file
    }

    #[test]
    fn default_catalog_keeps_original_wording() {
        assert_eq!(
            MessageCatalog::default().actor_unresolved,
            "Erreur: Impossible d'obtenir le joueur"
        );
    }

    #[test]
    fn loads_override_from_json_file() {
        let file = write_catalog(&json!({ "actor_unresolved": "Error: could not get player" }));

        let catalog = MessageCatalog::load_from_path(file.path()).expect("load");

        assert_eq!(catalog.actor_unresolved, "Error: could not get player");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let file = write_catalog(&json!({}));

        let catalog = MessageCatalog::load_from_path(file.path()).expect("load");

        assert_eq!(catalog, MessageCatalog::default());
    }

    #[test]
    fn parse_error_reports_json_path() {
        let file = write_catalog(&json!({ "actor_unresolved": 12 }));

        let err = MessageCatalog::load_from_path(file.path()).expect_err("type mismatch");

        match err {
            ConfigError::Parse { location, .. } => assert_eq!(location, "actor_unresolved"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let file = write_catalog(&json!({ "actor_unresolvd": "typo" }));

        let err = MessageCatalog::load_from_path(file.path()).expect_err("unknown field");

        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn empty_message_is_invalid() {
        let file = write_catalog(&json!({ "actor_unresolved": "   " }));

        let err = MessageCatalog::load_from_path(file.path()).expect_err("empty");

        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "actor_unresolved",
                ..
            }
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = MessageCatalog::load_from_path(&dir.path().join("absent.json"))
            .expect_err("missing");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
