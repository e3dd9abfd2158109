//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                       |
//! |------|-----------------------------------------------|
//! | 0    | Success, no discrepancies                     |
//! | 1    | Reconciliation found discrepancies            |
//! | 2    | CLI usage error (bad args, no input given)    |
//! | 3    | I/O error (unreadable input, unwritable out)  |
//! | 4    | Invalid config (TOML parse or validation)     |
//! | 5    | Schema error (required column not found)      |
//! | 6    | Input parse error (undecodable CSV/Excel)     |

/// Success - reconciliation ran and every record is MATCH or OK.
pub const EXIT_SUCCESS: u8 = 0;

/// Discrepancies found. Like `diff(1)`, exit 1 means "the sides differ."
pub const EXIT_DISCREPANCIES: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// I/O error - cannot read an input or write an output file.
pub const EXIT_IO: u8 = 3;

/// Invalid config - TOML parse failure or a validation rule rejected it.
pub const EXIT_CONFIG: u8 = 4;

/// Schema error - a required column was not found in an input table.
pub const EXIT_SCHEMA: u8 = 5;

/// Parse error - an input file could not be decoded.
pub const EXIT_PARSE: u8 = 6;
