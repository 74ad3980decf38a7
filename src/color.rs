use crate::{Result, StripError};

pub type RgbColor = (u8, u8, u8);

/// A color packed in the channel order of WS281x driver chips, `0x00GGRRBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GrbColor(u32);

impl GrbColor {
    pub const OFF: GrbColor = GrbColor(0);

    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> GrbColor {
        GrbColor(((green as u32) << 16) | ((red as u32) << 8) | blue as u32)
    }

    pub const fn from_packed(value: u32) -> GrbColor {
        GrbColor(value & 0x00FF_FFFF)
    }

    pub const fn packed(self) -> u32 {
        self.0
    }

    pub const fn to_rgb(self) -> RgbColor {
        let green = (self.0 >> 16) as u8;
        let red = (self.0 >> 8) as u8;
        let blue = self.0 as u8;
        (red, green, blue)
    }

    pub fn to_rgb_hex(self) -> String {
        let (red, green, blue) = self.to_rgb();
        format!("{red:02X}{green:02X}{blue:02X}")
    }
}

impl From<RgbColor> for GrbColor {
    fn from((red, green, blue): RgbColor) -> Self {
        GrbColor::from_rgb(red, green, blue)
    }
}

/// Converts a web-style `RRGGBB` hex string (no `#`, any case) into a packed GRB value.
pub fn rgb_hex_to_grb(hex: &str) -> Result<GrbColor> {
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(StripError::InvalidColorFormat(hex.to_owned()));
    }

    let channel = |range: core::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| StripError::InvalidColorFormat(hex.to_owned()))
    };

    Ok(GrbColor::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
