//! Run-mode detection from the process environment.

/// Returns `true` when the process runs in debug mode.
///
/// Debug mode is on when `DEBUG=true` or `MODE=DEBUG` is set.
pub fn debug_mode() -> bool {
    debug_mode_from(std::env::var("DEBUG").ok(), std::env::var("MODE").ok())
}

fn debug_mode_from(debug: Option<String>, mode: Option<String>) -> bool {
    debug.as_deref() == Some("true") || mode.as_deref() == Some("DEBUG")
}

/// Name of the default environment: `development` in debug mode, else `production`.
pub fn env_name() -> &'static str {
    if debug_mode() {
        "development"
    } else {
        "production"
    }
}
