use std::sync::{Arc, Mutex, MutexGuard};

use log::{error, info};

use crate::{color::GrbColor, driver::StripDriver, Result, StripError};

pub const DEFAULT_BRIGHTNESS: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripMode {
    /// The last render reflects the pixel buffer.
    Active,
    /// The hardware was reset, the pixel buffer is stale.
    Cleared,
}

pub type SharedLedStrip<D> = Arc<Mutex<LedStrip<D>>>;

/// Owns the pixel buffer of a single strip and the driver handle that renders it.
pub struct LedStrip<D> {
    driver: D,
    pixels: Vec<GrbColor>,
    brightness: u8,
    mode: StripMode,
}

impl<D: StripDriver> LedStrip<D> {
    pub fn new(mut driver: D, led_count: usize) -> Result<LedStrip<D>> {
        if led_count == 0 {
            return Err(StripError::InvalidLedCount);
        }

        driver.init(led_count).map_err(StripError::hardware)?;
        info!("Initialized led strip with {led_count} leds");

        Ok(LedStrip {
            driver,
            pixels: vec![GrbColor::OFF; led_count],
            brightness: DEFAULT_BRIGHTNESS,
            mode: StripMode::Cleared,
        })
    }

    pub fn into_shared(self) -> SharedLedStrip<D> {
        Arc::new(Mutex::new(self))
    }

    pub fn set_color(&mut self, color: GrbColor) -> Result<()> {
        self.pixels.fill(color);
        self.render()
    }

    pub fn set_brightness(&mut self, level: i64) -> Result<()> {
        let level = checked_brightness(level)?;

        self.driver
            .set_brightness(level)
            .map_err(StripError::hardware)
            .inspect_err(|e| error!("Failed to set brightness: {e}"))?;
        self.brightness = level;

        Ok(())
    }

    pub fn render(&mut self) -> Result<()> {
        let led_count = self.led_count();
        let mut frame = Vec::with_capacity(led_count);
        frame.extend(self.pixels.iter().copied().take(led_count));

        self.driver
            .render(&frame)
            .map_err(StripError::hardware)
            .inspect_err(|e| error!("Failed to render frame: {e}"))?;
        self.mode = StripMode::Active;

        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.driver
            .reset()
            .map_err(StripError::hardware)
            .inspect_err(|e| error!("Failed to reset strip: {e}"))?;
        self.mode = StripMode::Cleared;

        Ok(())
    }

    pub fn stop(&mut self) -> Result<()> {
        info!("Stopping led strip");
        self.clear()
    }

    pub fn led_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn pixels(&self) -> &[GrbColor] {
        &self.pixels
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn mode(&self) -> StripMode {
        self.mode
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
}

pub fn checked_brightness(level: i64) -> Result<u8> {
    u8::try_from(level).map_err(|_| StripError::BrightnessOutOfRange(level))
}

/// Locks a shared strip, reporting a poisoned lock as unavailable hardware.
pub fn lock_strip<D>(strip: &Mutex<LedStrip<D>>) -> Result<MutexGuard<'_, LedStrip<D>>> {
    strip
        .lock()
        .map_err(|_| StripError::HardwareUnavailable("led strip lock poisoned".to_owned()))
}
