//! Error handling primitives for the MAX31865 driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// The provided configuration parameters are invalid.
    InvalidConfig,
    /// The configuration register did not read back the value written to it.
    ConfigMismatch {
        /// Value written to the configuration register.
        wrote: u8,
        /// Value the read-back returned.
        read: u8,
    },
    /// The requested acquisition is not valid in the current conversion mode.
    ModeMismatch,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
