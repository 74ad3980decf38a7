use core::fmt::Debug;

use anyhow::{anyhow, Result};
use smart_leds::{brightness, SmartLedsWrite, RGB8};

use crate::{color::GrbColor, driver::StripDriver, strip::DEFAULT_BRIGHTNESS};

/// Strip driver over any `smart-leds` writer, opened lazily on `init`.
pub struct SmartLedsDriver<W, O> {
    open: O,
    led_strip: Option<W>,
    frame: Vec<RGB8>,
    brightness: u8,
}

impl<W, O> SmartLedsDriver<W, O>
where
    W: SmartLedsWrite<Color = RGB8>,
    W::Error: Debug,
    O: FnMut() -> Result<W>,
{
    pub fn new(open: O) -> SmartLedsDriver<W, O> {
        SmartLedsDriver {
            open,
            led_strip: None,
            frame: Vec::new(),
            brightness: DEFAULT_BRIGHTNESS,
        }
    }

    pub fn led_strip(&self) -> Option<&W> {
        self.led_strip.as_ref()
    }

    fn write_frame(&mut self) -> Result<()> {
        let led_strip = self
            .led_strip
            .as_mut()
            .ok_or_else(|| anyhow!("led strip is not initialized"))?;

        led_strip
            .write(brightness(self.frame.iter().copied(), self.brightness))
            .map_err(|e| anyhow!("Failed to write to led strip: {e:?}"))
    }
}

impl<W, O> StripDriver for SmartLedsDriver<W, O>
where
    W: SmartLedsWrite<Color = RGB8>,
    W::Error: Debug,
    O: FnMut() -> Result<W>,
{
    fn init(&mut self, led_count: usize) -> Result<()> {
        self.led_strip = Some((self.open)()?);
        self.frame = vec![RGB8::default(); led_count];

        Ok(())
    }

    fn render(&mut self, frame: &[GrbColor]) -> Result<()> {
        self.frame.clear();
        self.frame.extend(frame.iter().map(|pixel| to_rgb8(*pixel)));

        self.write_frame()
    }

    fn set_brightness(&mut self, level: u8) -> Result<()> {
        self.brightness = level;
        // No global brightness register on ws2812, the last frame is pushed again.
        self.write_frame()
    }

    fn reset(&mut self) -> Result<()> {
        self.frame.fill(RGB8::default());
        self.write_frame()
    }
}

pub fn to_rgb8(pixel: GrbColor) -> RGB8 {
    let (red, green, blue) = pixel.to_rgb();
    RGB8::new(red, green, blue)
}

/// WS2812 strip on an RMT channel of the ESP32.
#[cfg(target_os = "espidf")]
pub fn ws2812_driver(ch_num: u8, gpio: u32) -> impl StripDriver + Send {
    use anyhow::Context;
    use log::info;
    use ws2812_esp32_rmt_driver::Ws2812Esp32Rmt;

    SmartLedsDriver::new(move || {
        let led_strip = Ws2812Esp32Rmt::new(ch_num, gpio)
            .with_context(|| format!("Failed to open rmt channel {ch_num} on gpio {gpio}"))?;
        info!("WS2812 strip ready on rmt channel {ch_num}, gpio {gpio}");
        Ok(led_strip)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct FrameRecorder {
        frames: Vec<Vec<RGB8>>,
    }

    impl SmartLedsWrite for FrameRecorder {
        type Error = ();
        type Color = RGB8;

        fn write<T, I>(&mut self, iterator: T) -> core::result::Result<(), ()>
        where
            T: IntoIterator<Item = I>,
            I: Into<RGB8>,
        {
            self.frames.push(iterator.into_iter().map(Into::into).collect());
            Ok(())
        }
    }

    fn driver() -> SmartLedsDriver<FrameRecorder, impl FnMut() -> Result<FrameRecorder>> {
        let mut driver = SmartLedsDriver::new(|| Ok(FrameRecorder::default()));
        driver.init(3).unwrap();
        driver
    }

    fn frames<O>(driver: &SmartLedsDriver<FrameRecorder, O>) -> &[Vec<RGB8>]
    where
        O: FnMut() -> Result<FrameRecorder>,
    {
        &driver.led_strip().unwrap().frames
    }

    #[test]
    fn grb_pixels_unpack_to_rgb() {
        assert_eq!(to_rgb8(GrbColor::from_packed(0x00FF00)), RGB8::new(255, 0, 0));
        assert_eq!(to_rgb8(GrbColor::from_packed(0xFF0000)), RGB8::new(0, 255, 0));
        assert_eq!(to_rgb8(GrbColor::from_rgb(0x94, 0x00, 0xD3)), RGB8::new(0x94, 0, 0xD3));
    }

    #[test]
    fn render_writes_unpacked_frame() {
        let mut driver = driver();

        driver.render(&[GrbColor::from_rgb(255, 0, 0); 3]).unwrap();

        assert_eq!(frames(&driver), &[vec![RGB8::new(255, 0, 0); 3]]);
    }

    #[test]
    fn brightness_change_resends_scaled_last_frame() {
        let mut driver = driver();
        driver.render(&[GrbColor::from_rgb(200, 100, 0); 3]).unwrap();

        driver.set_brightness(0).unwrap();
        driver.set_brightness(DEFAULT_BRIGHTNESS).unwrap();

        let frames = frames(&driver);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1], vec![RGB8::new(0, 0, 0); 3]);
        assert_eq!(frames[2], frames[0]);
    }

    #[test]
    fn reset_writes_dark_frame() {
        let mut driver = driver();
        driver.render(&[GrbColor::from_rgb(1, 2, 3); 3]).unwrap();

        driver.reset().unwrap();

        assert_eq!(frames(&driver).last(), Some(&vec![RGB8::default(); 3]));
    }

    #[test]
    fn writes_before_init_fail() {
        let mut driver = SmartLedsDriver::new(|| Ok(FrameRecorder::default()));

        assert!(driver.render(&[GrbColor::OFF]).is_err());
        assert!(driver.set_brightness(10).is_err());
    }

    #[test]
    fn open_failure_surfaces_from_init() {
        let mut driver: SmartLedsDriver<FrameRecorder, _> =
            SmartLedsDriver::new(|| Err(anyhow!("rmt channel already in use")));

        let err = driver.init(3).unwrap_err();

        assert_eq!(err.to_string(), "rmt channel already in use");
        assert!(driver.led_strip().is_none());
    }
}
