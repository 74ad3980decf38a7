use anyhow::Result;

use crate::color::GrbColor;

/// Capability interface of the physical strip driver.
///
/// Implementations own exactly one peripheral; callers serialize access.
pub trait StripDriver {
    /// One-time setup of the peripheral for `led_count` pixels.
    fn init(&mut self, led_count: usize) -> Result<()>;

    /// Pushes a full frame to the hardware.
    fn render(&mut self, frame: &[GrbColor]) -> Result<()>;

    /// Sets the global brightness applied on top of the pixel colors.
    fn set_brightness(&mut self, level: u8) -> Result<()>;

    /// Turns all leds off.
    fn reset(&mut self) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod mock {
    use anyhow::{bail, Result};

    use super::StripDriver;
    use crate::color::GrbColor;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum DriverCall {
        Init(usize),
        Render(Vec<GrbColor>),
        SetBrightness(u8),
        Reset,
    }

    #[derive(Debug, Default)]
    pub(crate) struct RecordingDriver {
        pub(crate) calls: Vec<DriverCall>,
        pub(crate) fail: bool,
    }

    impl RecordingDriver {
        pub(crate) fn failing() -> Self {
            Self {
                calls: Vec::new(),
                fail: true,
            }
        }

        pub(crate) fn frames(&self) -> Vec<&[GrbColor]> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    DriverCall::Render(frame) => Some(frame.as_slice()),
                    _ => None,
                })
                .collect()
        }

        fn record(&mut self, call: DriverCall) -> Result<()> {
            if self.fail {
                bail!("ws281x peripheral not present");
            }
            self.calls.push(call);
            Ok(())
        }
    }

    impl StripDriver for RecordingDriver {
        fn init(&mut self, led_count: usize) -> Result<()> {
            // Init always succeeds so failing drivers can still be wrapped in a strip.
            self.calls.push(DriverCall::Init(led_count));
            Ok(())
        }

        fn render(&mut self, frame: &[GrbColor]) -> Result<()> {
            self.record(DriverCall::Render(frame.to_vec()))
        }

        fn set_brightness(&mut self, level: u8) -> Result<()> {
            self.record(DriverCall::SetBrightness(level))
        }

        fn reset(&mut self) -> Result<()> {
            self.record(DriverCall::Reset)
        }
    }

    pub(crate) struct BrokenInitDriver;

    impl StripDriver for BrokenInitDriver {
        fn init(&mut self, _led_count: usize) -> Result<()> {
            bail!("rmt channel already in use")
        }

        fn render(&mut self, _frame: &[GrbColor]) -> Result<()> {
            Ok(())
        }

        fn set_brightness(&mut self, _level: u8) -> Result<()> {
            Ok(())
        }

        fn reset(&mut self) -> Result<()> {
            Ok(())
        }
    }
}
