//! Host process environment access.
//!
//! Every write to the process environment funnels through [`set`], which
//! rejects pairs `std::env::set_var` would panic on.

use std::collections::HashMap;
use std::env;

use crate::error::Error;

/// Whether the host environment defines `key` at all, even as empty.
pub(crate) fn contains(key: &str) -> bool {
    env::var_os(key).is_some()
}

/// Snapshot the full host environment, replacing invalid UTF-8 sequences.
pub(crate) fn snapshot() -> HashMap<String, String> {
    env::vars_os()
        .map(|(key, value)| {
            (
                key.to_string_lossy().into_owned(),
                value.to_string_lossy().into_owned(),
            )
        })
        .collect()
}

/// Write one variable into the host environment.
pub(crate) fn set(key: &str, value: &str) -> Result<(), Error> {
    if key.is_empty() {
        return Err(Error::InvalidVar {
            key: key.to_owned(),
            reason: "key is empty",
        });
    }
    if key.contains('=') {
        return Err(Error::InvalidVar {
            key: key.to_owned(),
            reason: "key contains `=`",
        });
    }
    if key.contains('\0') || value.contains('\0') {
        return Err(Error::InvalidVar {
            key: key.to_owned(),
            reason: "key or value contains a NUL byte",
        });
    }

    // SAFETY: this is the crate's only process-environment write. Callers
    // of the loading API and `must_set` must not race these writes with
    // foreign code reading the environment concurrently.
    unsafe { env::set_var(key, value) };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::set;
    use crate::error::Error;

    #[test]
    fn rejects_unrepresentable_pairs() {
        for (key, value) in [("", "x"), ("A=B", "x"), ("NUL\0KEY", "x"), ("OK", "nul\0")] {
            match set(key, value) {
                Err(Error::InvalidVar { .. }) => {}
                other => panic!("expected InvalidVar for {key:?}: {other:?}"),
            }
        }
    }
}
