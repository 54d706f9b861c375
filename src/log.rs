//! Logging macros that forward to `defmt` when the feature is enabled.
//!
//! Without the feature the macros evaluate and discard their arguments, so
//! call sites compile identically in both builds.

#[cfg(feature = "defmt")]
macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        ::defmt::trace!($s $(, $x)*)
    };
}

#[cfg(not(feature = "defmt"))]
macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        let _ = ($( & $x ),*);
    }};
}

#[cfg(feature = "defmt")]
macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        ::defmt::debug!($s $(, $x)*)
    };
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        let _ = ($( & $x ),*);
    }};
}

#[cfg(feature = "defmt")]
macro_rules! warn_ {
    ($s:literal $(, $x:expr)* $(,)?) => {
        ::defmt::warn!($s $(, $x)*)
    };
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn_ {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        let _ = ($( & $x ),*);
    }};
}

pub(crate) use debug;
pub(crate) use trace;
pub(crate) use warn_ as warn;
