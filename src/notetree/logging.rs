//! Logging bootstrap for the binary.
//!
//! The library only talks to the `log` facade. The CLI installs a stderr logger
//! once per process; `RUST_LOG` overrides the level picked from flags.

use flexi_logger::{Logger, LoggerHandle};
use once_cell::sync::OnceCell;

static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();

const LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Level used when no flag asks for more or less output.
pub fn default_log_level() -> &'static str {
    "warn"
}

/// Map a requested level to one flexi_logger accepts.
pub fn normalize_level(level: &str) -> Result<&'static str, String> {
    let wanted = level.trim().to_ascii_lowercase();
    LEVELS
        .iter()
        .find(|l| **l == wanted)
        .copied()
        .ok_or_else(|| format!("unsupported log level `{}`", level))
}

/// Start the stderr logger. Repeated calls are no-ops.
pub fn init_logging(level: &str) -> Result<(), String> {
    let level = normalize_level(level)?;
    LOGGER
        .get_or_try_init(|| {
            Logger::try_with_env_or_str(level)
                .map_err(|err| format!("invalid log level `{level}`: {err}"))?
                .log_to_stderr()
                .format(flexi_logger::colored_default_format)
                .start()
                .map_err(|err| format!("failed to start logger: {err}"))
        })
        .map(|_| ())
}
