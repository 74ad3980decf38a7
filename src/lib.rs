pub use error::{Result, StripError};

pub mod color;
pub mod driver;
pub mod error;
pub mod handler;
pub mod status;
pub mod strip;
pub mod ws2812;
