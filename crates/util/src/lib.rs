//! Small helpers shared by the framework crates.

use std::fmt::Display;
use std::panic::Location;

/// Extension for results whose failure is not fatal to the caller.
///
/// A failed value is logged at `warn` (with the caller's location) and turned into `None`,
/// so configuration and lookup code can keep going with whatever it already has.
pub trait ResultExt<T> {
    /// Log the error and discard it.
    fn log_err(self) -> Option<T>;

    /// Log the error with an extra context line and discard it.
    fn log_err_with(self, context: &str) -> Option<T>;
}

impl<T, E: Display> ResultExt<T> for Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let caller = Location::caller();
                tracing::warn!("{}:{}: {err}", caller.file(), caller.line());
                None
            }
        }
    }

    #[track_caller]
    fn log_err_with(self, context: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let caller = Location::caller();
                tracing::warn!("{}:{}: {context}: {err}", caller.file(), caller.line());
                None
            }
        }
    }
}

/// Split a comma separated attribute into trimmed, non-empty parts.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_err_keeps_ok_values() {
        let ok: Result<u8, String> = Ok(3);
        assert_eq!(ok.log_err(), Some(3));

        let err: Result<u8, String> = Err("boom".into());
        assert_eq!(err.log_err_with("parsing"), None);
    }

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(split_list(" a, b,,c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }
}
