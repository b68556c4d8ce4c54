//! Typed read access over the environment cache.
//!
//! All accessors read through the process-wide store, which mirrors the
//! host environment after every load or reload. An empty value is
//! indistinguishable from an unset key.

use std::num::ParseIntError;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;
use crate::store::store;

/// The exact literals treated as boolean true by [`get_bool`].
const TRUTHY: [&str; 6] = ["true", "1", "t", "T", "TRUE", "True"];

/// Read `key` from the cache, falling back to `default` when the key is
/// unset or holds an empty value.
pub fn get(key: &str, default: &str) -> String {
    match store().get(key) {
        Some(value) if !value.is_empty() => value,
        _ => default.to_owned(),
    }
}

/// Whether `key` is set to a non-empty value.
pub fn is_set(key: &str) -> bool {
    !get(key, "").is_empty()
}

/// Read `key`, erroring when it is unset or empty.
pub fn must_get(key: &str) -> Result<String, Error> {
    match store().get(key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::NotPresent(key.to_owned())),
    }
}

/// Read `key` as a boolean.
///
/// Exactly the literals `true`, `1`, `t`, `T`, `TRUE`, and `True` are
/// truthy. Any other value, including `false`, yields `default`.
pub fn get_bool(key: &str, default: bool) -> bool {
    let value = get(key, "");
    if TRUTHY.contains(&value.as_str()) {
        true
    } else {
        default
    }
}

/// Read `key` as an integer of type `T`.
///
/// The `FromStr` impl of the requested type carries its width and
/// signedness, so one parse routine covers `i8` through `u128` plus the
/// platform-width types. An unset or empty key yields `default`; a value
/// that does not parse for the requested type, including one that
/// overflows it, is an error.
pub fn get_int<T>(key: &str, default: T) -> Result<T, Error>
where
    T: FromStr<Err = ParseIntError>,
{
    let value = get(key, "");
    if value.is_empty() {
        return Ok(default);
    }
    value.parse().map_err(|source| Error::IntFormat {
        key: key.to_owned(),
        value,
        source,
    })
}

/// Read `key` as a duration literal such as `3s`, `500ms`, or `1h30m`.
///
/// An unset or empty key yields `default`; a malformed literal is an
/// error.
pub fn get_duration(key: &str, default: Duration) -> Result<Duration, Error> {
    let value = get(key, "");
    if value.is_empty() {
        return Ok(default);
    }
    parse_duration(&value).map_err(|reason| Error::DurationFormat {
        key: key.to_owned(),
        value,
        reason,
    })
}

/// Parse a duration literal: one or more integer magnitudes each followed
/// by a unit (`ns`, `us`/`µs`, `ms`, `s`, `m`, `h`), or the bare literal
/// `0`.
fn parse_duration(input: &str) -> Result<Duration, &'static str> {
    if input.is_empty() {
        return Err("empty literal");
    }
    if input == "0" {
        return Ok(Duration::ZERO);
    }

    let mut rest = input;
    let mut total = Duration::ZERO;

    while !rest.is_empty() {
        let digits_end = rest
            .find(|ch: char| !ch.is_ascii_digit())
            .ok_or("missing unit suffix")?;
        if digits_end == 0 {
            return Err("expected a digit");
        }

        let magnitude: u64 = rest[..digits_end]
            .parse()
            .map_err(|_| "magnitude out of range")?;
        rest = &rest[digits_end..];

        let (unit, tail) = split_unit(rest).ok_or("unknown unit suffix")?;
        rest = tail;

        let segment = match unit {
            "ns" => Duration::from_nanos(magnitude),
            "us" | "µs" => Duration::from_micros(magnitude),
            "ms" => Duration::from_millis(magnitude),
            "s" => Duration::from_secs(magnitude),
            "m" => Duration::from_secs(
                magnitude.checked_mul(60).ok_or("duration overflows")?,
            ),
            "h" => Duration::from_secs(
                magnitude.checked_mul(3_600).ok_or("duration overflows")?,
            ),
            _ => return Err("unknown unit suffix"),
        };
        total = total.checked_add(segment).ok_or("duration overflows")?;
    }

    Ok(total)
}

// Multi-character units come first so `ms` is not read as `m` + garbage.
fn split_unit(rest: &str) -> Option<(&'static str, &str)> {
    for unit in ["ns", "us", "µs", "ms", "s", "m", "h"] {
        if let Some(tail) = rest.strip_prefix(unit) {
            return Some((unit, tail));
        }
    }
    None
}
