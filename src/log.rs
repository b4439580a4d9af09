//! Internal logging macros.
//!
//! With the `log` feature enabled these forward to the [`log`](https://docs.rs/log) facade,
//! otherwise they only type-check their arguments and emit nothing.
//! `warning!` can't be called `warn!`, that name clashes with the built-in lint attribute.

#[cfg(feature = "log")]
macro_rules! debug {
    ($($arg:tt)*) => { ::log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! debug {
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

#[cfg(feature = "log")]
macro_rules! info {
    ($($arg:tt)*) => { ::log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! info {
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

#[cfg(feature = "log")]
macro_rules! warning {
    ($($arg:tt)*) => { ::log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! warning {
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

pub(crate) use debug;
pub(crate) use info;
pub(crate) use warning;
