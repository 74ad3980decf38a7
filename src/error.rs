use displaydoc::Display;

pub type Result<T> = core::result::Result<T, StripError>;

/// Errors reported by the strip controller and the color converter.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum StripError {
    /// invalid color format "{0}": expected exactly six hex digits
    InvalidColorFormat(String),
    /// invalid brightness "{0}": expected an integer
    InvalidBrightnessFormat(String),
    /// brightness {0} is out of range 0..=255
    BrightnessOutOfRange(i64),
    /// strip must have at least one led
    InvalidLedCount,
    /// led strip hardware unavailable: {0}
    HardwareUnavailable(String),
}

impl std::error::Error for StripError {}

impl StripError {
    pub fn hardware(err: anyhow::Error) -> Self {
        Self::HardwareUnavailable(format!("{err:#}"))
    }
}
