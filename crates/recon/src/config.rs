use std::collections::HashMap;

use serde::Deserialize;

use crate::columns::DEFAULT_SIMILARITY_THRESHOLD;
use crate::error::ReconcileError;
use crate::index::DuplicatePolicy;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CompareConfig {
    pub name: String,
    pub before: SourceConfig,
    pub after: SourceConfig,
    #[serde(default)]
    pub pairs: Vec<PairConfig>,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Sources + pairs
// ---------------------------------------------------------------------------

/// One side of the comparison: a workbook or CSV file. Paths are resolved
/// relative to the config file by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub file: String,
}

/// One before-sheet × after-sheet pairing. Sheet names default to the
/// first sheet (and are ignored for CSV sources).
#[derive(Debug, Clone, Deserialize)]
pub struct PairConfig {
    #[serde(default)]
    pub before_sheet: Option<String>,
    #[serde(default)]
    pub after_sheet: Option<String>,
    pub key_column: String,
    /// Caller-confirmed column overrides, "after" name → "before" name.
    /// These replace whatever the automatic resolver would produce.
    #[serde(default)]
    pub columns: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// Matching + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    #[serde(default = "default_threshold")]
    pub similarity_threshold: f64,
    #[serde(default)]
    pub on_duplicate_key: DuplicatePolicy,
}

fn default_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            on_duplicate_key: DuplicatePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Annotated workbook path.
    #[serde(default = "default_output_file")]
    pub file: String,
    /// Optional JSON report path.
    #[serde(default)]
    pub json: Option<String>,
}

fn default_output_file() -> String {
    "comparison_result.xlsx".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: default_output_file(),
            json: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl CompareConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconcileError> {
        let config: CompareConfig =
            toml::from_str(input).map_err(|e| ReconcileError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconcileError> {
        if self.pairs.is_empty() {
            return Err(ReconcileError::ConfigValidation(
                "at least one [[pairs]] entry is required".into(),
            ));
        }

        for (i, pair) in self.pairs.iter().enumerate() {
            if pair.key_column.trim().is_empty() {
                return Err(ReconcileError::ConfigValidation(format!(
                    "pairs[{i}]: key_column must not be empty"
                )));
            }
        }

        let threshold = self.matching.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ReconcileError::ConfigValidation(format!(
                "similarity_threshold must be within 0..=1, got {threshold}"
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
name = "Supplier postload check"

[before]
file = "preload.xlsx"

[after]
file = "postload.xlsx"

[[pairs]]
before_sheet = "Sheet4"
after_sheet = "Suppliers"
key_column = "ALTKN"

[pairs.columns]
"VENDOR_NAME1" = "Vendor Name 1"

[matching]
similarity_threshold = 0.6
on_duplicate_key = "fail"

[output]
file = "result.xlsx"
json = "report.json"
"#;

    #[test]
    fn parse_valid_config() {
        let config = CompareConfig::from_toml(VALID).unwrap();
        assert_eq!(config.name, "Supplier postload check");
        assert_eq!(config.pairs.len(), 1);
        assert_eq!(config.pairs[0].key_column, "ALTKN");
        assert_eq!(config.pairs[0].columns["VENDOR_NAME1"], "Vendor Name 1");
        assert_eq!(config.matching.on_duplicate_key, DuplicatePolicy::Fail);
        assert_eq!(config.output.json.as_deref(), Some("report.json"));
    }

    #[test]
    fn defaults_apply() {
        let input = r#"
name = "Minimal"

[before]
file = "pre.csv"

[after]
file = "post.csv"

[[pairs]]
key_column = "ID"
"#;
        let config = CompareConfig::from_toml(input).unwrap();
        assert_eq!(
            config.matching.similarity_threshold,
            DEFAULT_SIMILARITY_THRESHOLD
        );
        assert_eq!(
            config.matching.on_duplicate_key,
            DuplicatePolicy::LastWins
        );
        assert_eq!(config.output.file, "comparison_result.xlsx");
        assert!(config.pairs[0].before_sheet.is_none());
    }

    #[test]
    fn reject_missing_pairs() {
        let input = r#"
name = "Empty"

[before]
file = "pre.csv"

[after]
file = "post.csv"
"#;
        let err = CompareConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("[[pairs]]"));
    }

    #[test]
    fn reject_blank_key_column() {
        let input = r#"
name = "Bad"

[before]
file = "pre.csv"

[after]
file = "post.csv"

[[pairs]]
key_column = "  "
"#;
        let err = CompareConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("key_column"));
    }

    #[test]
    fn reject_out_of_range_threshold() {
        let input = r#"
name = "Bad"

[before]
file = "pre.csv"

[after]
file = "post.csv"

[[pairs]]
key_column = "ID"

[matching]
similarity_threshold = 1.5
"#;
        let err = CompareConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("similarity_threshold"));
    }

    #[test]
    fn reject_unknown_duplicate_policy() {
        let input = r#"
name = "Bad"

[before]
file = "pre.csv"

[after]
file = "post.csv"

[[pairs]]
key_column = "ID"

[matching]
on_duplicate_key = "first_wins"
"#;
        assert!(CompareConfig::from_toml(input).is_err());
    }
}
