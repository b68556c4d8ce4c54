use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::env;
use crate::error::Error;
use crate::model::{Entry, LoadReport};
use crate::parser::parse_with_source;
use crate::store::store;

pub(crate) const DEFAULT_FILE: &str = ".env";

/// Load dotenv files into the host environment with first-wins precedence:
/// keys already present in the environment keep their value.
///
/// An empty `paths` iterator loads the default `.env` file. The cache is
/// rebuilt afterwards so it mirrors the host environment.
pub fn load<I, P>(paths: I) -> Result<LoadReport, Error>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    EnvLoader::new().paths(paths).load()
}

/// Load dotenv files, unconditionally replacing keys that are already set.
pub fn overload<I, P>(paths: I) -> Result<LoadReport, Error>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    EnvLoader::new().paths(paths).override_existing(true).load()
}

/// Builder-style dotenv loader.
#[derive(Debug, Clone)]
pub struct EnvLoader {
    paths: Vec<PathBuf>,
    override_existing: bool,
    required: bool,
}

impl EnvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.paths.push(path.as_ref().to_path_buf());
        self
    }

    pub fn paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.paths
            .extend(paths.into_iter().map(|path| path.as_ref().to_path_buf()));
        self
    }

    /// Replace keys that are already present in the host environment.
    pub fn override_existing(mut self, override_existing: bool) -> Self {
        self.override_existing = override_existing;
        self
    }

    /// When `false`, missing files are skipped instead of aborting the
    /// load. Other errors still abort.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Apply the configured files to the host environment, then rebuild
    /// the process-wide cache so it mirrors the result.
    pub fn load(&self) -> Result<LoadReport, Error> {
        let report = self.apply()?;
        store().reload();
        Ok(report)
    }

    /// Parse the configured files without touching the host environment.
    ///
    /// Later files take precedence over earlier ones for duplicate keys.
    pub fn parse_only(&self) -> Result<Vec<Entry>, Error> {
        let mut merged: Vec<Entry> = Vec::new();
        let mut by_key = HashMap::<String, usize>::new();

        for path in self.effective_paths() {
            let Some(entries) = self.read_entries(&path)? else {
                continue;
            };
            for entry in entries {
                if let Some(existing) = by_key.get(entry.key.as_str()).copied() {
                    merged[existing] = entry;
                } else {
                    by_key.insert(entry.key.clone(), merged.len());
                    merged.push(entry);
                }
            }
        }

        Ok(merged)
    }

    /// Apply files to the host environment without refreshing the cache.
    ///
    /// Files are applied strictly in order, each one fully before the next
    /// is read. The first failure aborts and leaves earlier files applied.
    pub(crate) fn apply(&self) -> Result<LoadReport, Error> {
        let mut report = LoadReport::default();

        for path in self.effective_paths() {
            let Some(entries) = self.read_entries(&path)? else {
                debug!(path = %path.display(), "skipping missing dotenv file");
                continue;
            };
            report.files_read += 1;

            for entry in entries {
                if !self.override_existing && env::contains(&entry.key) {
                    trace!(key = %entry.key, "skipping existing key");
                    report.skipped_existing += 1;
                    continue;
                }
                env::set(&entry.key, &entry.value)?;
                report.loaded += 1;
            }
        }

        Ok(report)
    }

    /// `Ok(None)` means the file is missing and this loader is not
    /// required to find it.
    fn read_entries(&self, path: &Path) -> Result<Option<Vec<Entry>>, Error> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && !self.required => {
                return Ok(None);
            }
            Err(err) => {
                return Err(Error::ReadFile {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        let text = std::str::from_utf8(&bytes)?;
        let entries = parse_with_source(text, Some(path)).map_err(|source| Error::ParseFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(entries))
    }

    fn effective_paths(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![PathBuf::from(DEFAULT_FILE)]
        } else {
            self.paths.clone()
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            override_existing: false,
            required: true,
        }
    }
}
