//! Load `.env` files into the process environment and read them back
//! through a typed, process-wide cache.
//!
//! [`load`] applies files with first-wins precedence (existing environment
//! values are kept); [`overload`] replaces them. Both refresh the cache,
//! which is bootstrapped on first use from the default `.env` file plus a
//! snapshot of the host environment. Typed accessors ([`get`],
//! [`get_bool`], [`get_int`], [`get_duration`]) read through the cache;
//! [`set`] writes the cache only, [`must_set`] writes through to the host
//! environment, and [`reload`] rebuilds the cache from it. [`marshal`]
//! re-emits the current environment in the same file format.
//!
//! Writes to the process environment go through a single internal choke
//! point. Callers must not race loads or [`must_set`] against foreign
//! code that reads the environment outside this crate.

mod env;
mod error;
mod loader;
mod marshal;
mod model;
mod parser;
mod store;
mod typed;

pub use error::{Error, ParseError, ParseErrorKind};
pub use loader::{EnvLoader, load, overload};
pub use marshal::marshal;
pub use model::{Entry, LoadReport};
pub use parser::{parse_bytes, parse_reader, parse_str};
pub use store::{must_set, reload, set};
pub use typed::{get, get_bool, get_duration, get_int, is_set, must_get};
