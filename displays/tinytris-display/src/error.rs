//! Display error type

use tinytris_hal::BusError;

/// Errors from the display driver and renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// The bus transaction failed
    Bus(BusError),
    /// Page or column range outside the panel, or reversed
    InvalidWindow,
}

impl From<BusError> for DisplayError {
    fn from(error: BusError) -> Self {
        DisplayError::Bus(error)
    }
}
