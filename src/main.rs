use anyhow::Result;

#[cfg(target_os = "espidf")]
mod http_server;
#[cfg(target_os = "espidf")]
mod wifi_control;

#[toml_cfg::toml_config]
pub struct Config {
    #[default("")]
    wifi_ssid: &'static str,
    #[default("")]
    wifi_psk: &'static str,
    #[default(6)]
    led_strip_gpio: u32,
    #[default(0)]
    led_strip_rmt_channel: u8,
    #[default(14)]
    num_leds: usize,
    #[default(80)]
    http_port: u16,
}

#[cfg(target_os = "espidf")]
fn main() -> Result<()> {
    use std::{thread::sleep, time::Duration};

    use anyhow::Context;
    use esp_idf_hal::prelude::Peripherals;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use led_strip_server::{handler::control_url, strip::LedStrip, ws2812::ws2812_driver};
    use log::info;

    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let app_config = CONFIG;

    let driver = ws2812_driver(app_config.led_strip_rmt_channel, app_config.led_strip_gpio);
    let strip = LedStrip::new(driver, app_config.num_leds)
        .context("Failed to initialize led strip")?
        .into_shared();

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;

    let wifi_connection = wifi_control::connect_to_wifi(
        app_config.wifi_ssid,
        app_config.wifi_psk,
        peripherals.modem,
        sysloop,
    )?;

    let _server = http_server::start_http_server(app_config.http_port, strip)?;

    info!(
        "LED strip control page at {}",
        control_url(wifi_connection.ip, app_config.http_port)
    );

    loop {
        sleep(Duration::from_secs(1));
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() -> Result<()> {
    let app_config = CONFIG;

    anyhow::bail!(
        "led-strip-server drives a {}-led WS2812 strip on gpio {} and only runs on ESP-IDF targets",
        app_config.num_leds,
        app_config.led_strip_gpio
    )
}
