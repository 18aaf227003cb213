//! Batch code configuration — the ordered cannabinoid token table.
//!
//! The token table is a match-priority list, not a set: the decoder takes
//! the first entry the product info starts with. Validation enforces that
//! no entry is shadowed by an earlier entry that is its own prefix.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Separator between the six dash-delimited segments.
pub const SEGMENT_SEPARATOR: char = '-';

/// Separator between the main part and the batch number.
pub const BATCH_NUMBER_SEPARATOR: char = '.';

/// Literal tag preceding the oil batch code. Fixed by existing printed labels.
pub const TAG: &str = "DC";

/// The top-level codec configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CodecConfig {
    /// Known cannabinoid tokens in match-priority order.
    pub cannabinoids: Vec<String>,
}

impl CodecConfig {
    /// Validate the token table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cannabinoids.is_empty() {
            return Err(ConfigError::EmptyTokenTable);
        }

        for (i, token) in self.cannabinoids.iter().enumerate() {
            validate_token(token)?;

            for earlier in &self.cannabinoids[..i] {
                if earlier == token {
                    return Err(ConfigError::DuplicateToken(token.clone()));
                }
                // An earlier prefix would always win, so `token` could never match.
                if token.starts_with(earlier.as_str()) {
                    return Err(ConfigError::ShadowedToken {
                        token: token.clone(),
                        prefix: earlier.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Whether `token` is a member of the cannabinoid table.
    pub fn is_known_cannabinoid(&self, token: &str) -> bool {
        self.cannabinoids.iter().any(|t| t == token)
    }

    /// First table entry that `rest` starts with, in table order.
    pub fn match_cannabinoid(&self, rest: &str) -> Option<&str> {
        self.cannabinoids
            .iter()
            .map(String::as_str)
            .find(|token| rest.starts_with(token))
    }

    /// Load and validate a config file. `.json` files are read as JSON,
    /// everything else as YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config: CodecConfig = if is_json {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else {
            serde_yml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
        };

        config.validate()?;
        tracing::debug!(
            path = %path.display(),
            tokens = config.cannabinoids.len(),
            "loaded batch code config"
        );
        Ok(config)
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        default_config()
    }
}

fn validate_token(token: &str) -> Result<(), ConfigError> {
    let well_formed = !token.is_empty()
        && token.chars().all(|c| c.is_ascii_alphanumeric())
        // A leading digit would be swallowed by the dose run.
        && !token.starts_with(|c: char| c.is_ascii_digit());
    if well_formed {
        Ok(())
    } else {
        Err(ConfigError::InvalidToken(token.to_string()))
    }
}

/// Codec config validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("cannabinoid token table is empty")]
    EmptyTokenTable,

    #[error("cannabinoid token '{0}' must be alphanumeric and start with a letter")]
    InvalidToken(String),

    #[error("cannabinoid token '{0}' appears more than once")]
    DuplicateToken(String),

    #[error("cannabinoid token '{token}' is shadowed by earlier token '{prefix}'")]
    ShadowedToken { token: String, prefix: String },

    #[error("failed to read config: {0}")]
    Io(String),

    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Construct the default CodecConfig used on printed labels.
///
/// Token order: THCO, COMBO, CAF, FS, D9, D8.
pub fn default_config() -> CodecConfig {
    CodecConfig {
        cannabinoids: ["THCO", "COMBO", "CAF", "FS", "D9", "D8"]
            .into_iter()
            .map(String::from)
            .collect(),
    }
}
