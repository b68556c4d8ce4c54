use std::path::PathBuf;

/// A parsed `KEY=VALUE` (or `KEY: VALUE`) entry from a dotenv input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    /// File the entry came from, when parsed through the loader.
    pub source: Option<PathBuf>,
    /// 1-based line number within the input.
    pub line: u32,
}

/// Summary of a load operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Entries written to the host environment.
    pub loaded: usize,
    /// Entries skipped because the key was already set and override mode
    /// was off.
    pub skipped_existing: usize,
    /// Files actually read; missing files skipped by a non-required load
    /// are not counted.
    pub files_read: usize,
}
