//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of
//! the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success, no differences                          |
//! | 1    | Differences found (changed/missing/blank-key)    |
//! | 2    | Usage error (bad args, missing required options) |
//! | 3    | Duplicate keys under --strict-duplicates         |
//! | 4    | Key column missing from a dataset                |
//! | 5    | Input could not be parsed                        |
//! | 6    | Invalid comparison config                        |
//! | 7    | File read/write error                            |

/// Success - comparison ran and found no differences.
pub const EXIT_SUCCESS: u8 = 0;

/// Differences found (changed, missing or blank-key cells).
/// Like `diff(1)`, exit 1 means "the snapshots differ."
pub const EXIT_DIFFS: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Duplicate keys found in the before dataset (strict mode).
pub const EXIT_DUPLICATE_KEY: u8 = 3;

/// Key column absent from one of the datasets.
pub const EXIT_MISSING_KEY: u8 = 4;

/// Parse error reading input files.
pub const EXIT_PARSE: u8 = 5;

/// Comparison config failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 6;

/// File read/write error.
pub const EXIT_IO: u8 = 7;
