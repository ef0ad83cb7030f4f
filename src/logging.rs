//! Internal logging helpers for structured rowdex events.

/// Single logging target for rowdex.
pub(crate) const LOG_TARGET: &str = "rowdex";

macro_rules! rowdex_log {
    ($level:expr, $event:expr, $fmt:expr $(, $args:expr)* $(,)?) => {{
        if log::log_enabled!($level) {
            log::log!(
                target: crate::logging::LOG_TARGET,
                $level,
                "event={} {}",
                $event,
                format_args!($fmt $(, $args)*)
            );
        }
    }};
}

pub(crate) use rowdex_log;
