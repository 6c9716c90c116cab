use std::fmt;

/// Which of the two snapshots an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Before,
    After,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Before => "before",
            Side::After => "after",
        }
    }
}

#[derive(Debug)]
pub enum ReconcileError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad threshold, unknown override column, etc.).
    ConfigValidation(String),
    /// The designated key column is absent from a dataset's schema.
    MissingKeyColumn { side: Side, column: String },
    /// Strict duplicate policy: two "before" rows normalized to the same key.
    DuplicateKey { key: String, row: usize },
    /// Raw input could not be shaped into row records.
    MalformedInput(String),
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingKeyColumn { side, column } => {
                write!(f, "{} dataset: missing key column '{column}'", side.as_str())
            }
            Self::DuplicateKey { key, row } => {
                write!(f, "duplicate key '{key}' at before row {row}")
            }
            Self::MalformedInput(msg) => write!(f, "malformed input: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconcileError {}
