//! Internal logging helpers for structured row-encoding events.

/// Single logging target for graphrow.
pub(crate) const LOG_TARGET: &str = "graphrow";

macro_rules! graphrow_log {
    ($level:expr, $event:expr, $fmt:expr $(, $args:expr)* $(,)?) => {{
        if log::log_enabled!(target: crate::logging::LOG_TARGET, $level) {
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

pub(crate) use graphrow_log;
