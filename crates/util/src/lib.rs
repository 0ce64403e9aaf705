//! Small cross-cutting helpers shared by every crate in the workspace.
//!
//! Mirrors the source's `log.go` (`LOG`/`DEBUG`/`INFO`/`WARN`/`ERROR` wrappers)
//! and `utils.go` (`isEmpty`), but routes logging through the `log` facade
//! instead of `fmt.Printf` so a host binary can plug in any subscriber.

/// Logs at `debug` level, matching the source's `DEBUG(msg, args...)`.
#[macro_export]
macro_rules! riptide_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

/// Logs at `info` level, matching the source's `INFO(msg, args...)`.
#[macro_export]
macro_rules! riptide_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

/// Logs at `warn` level, matching the source's `WARN(msg, args...)`.
#[macro_export]
macro_rules! riptide_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

/// Logs at `error` level, matching the source's `ERROR(msg, args...)`.
#[macro_export]
macro_rules! riptide_error {
    ($($arg:tt)*) => { log::error!($($arg)*) };
}

/// Reports whether a value equals its type's default ("zero") value.
///
/// Generalizes the source's `isEmpty[T comparable](v T) bool`, which compares
/// `v` against the type's zero value. Used by the Bloom filter's option
/// builder to detect an unset parameter before a `WithCalculated*` step runs.
pub fn is_empty<T: Default + PartialEq>(v: &T) -> bool {
    *v == T::default()
}
