//! Ingest-run identifiers.
//!
//! Every ingest invocation gets a fresh ULID so its acknowledgement, log
//! lines, and any skipped-record diagnostics can be correlated. ULIDs sort
//! lexicographically by creation time, which keeps run logs ordered.

use ulid::Ulid;

/// Generate a fresh run id (26 chars, URL-safe, time-ordered).
#[inline]
pub fn generate() -> String {
    Ulid::new().to_string()
}
