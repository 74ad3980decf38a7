use std::net::Ipv4Addr;

use anyhow::{anyhow, bail, Result};
use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
use esp_idf_hal::{modem::Modem, peripheral::Peripheral};
use esp_idf_svc::{
    eventloop::EspSystemEventLoop, nvs::EspDefaultNvsPartition, wifi::BlockingWifi, wifi::EspWifi,
};
use heapless::String;
use log::info;

/// Station connection kept alive for the lifetime of the http server.
pub struct WifiConnection {
    _wifi: Box<EspWifi<'static>>,
    pub ip: Ipv4Addr,
}

pub fn connect_to_wifi(
    ssid: &'static str,
    pwd: &'static str,
    modem: impl Peripheral<P = Modem> + 'static,
    sysloop: EspSystemEventLoop,
) -> Result<WifiConnection> {
    info!("Starting wifi connection process");

    check_credentials_not_empty(ssid, pwd)?;

    let nvs = EspDefaultNvsPartition::take()?;
    let mut esp_wifi = EspWifi::new(modem, sysloop.clone(), Some(nvs))?;
    let mut wifi = BlockingWifi::wrap(&mut esp_wifi, sysloop)?;

    wifi.set_configuration(&Configuration::Client(ClientConfiguration::default()))?;

    info!("Starting WiFi");
    wifi.start()?;

    info!("Scanning...");
    let ap_infos = wifi.scan()?;
    let channel = ap_infos
        .into_iter()
        .find(|a| a.ssid == ssid)
        .map(|ap_match| {
            info!(
                "Found configured access point {} on channel {}",
                ssid, ap_match.channel
            );
            ap_match.channel
        });
    if channel.is_none() {
        info!(
            "Configured access point {} not found during scanning, will go with unknown channel",
            ssid
        );
    }

    let wifi_ssid = String::<32>::try_from(ssid).map_err(|e| anyhow!("Invalid ssid: {:?}", e))?;
    let wifi_psk = String::<64>::try_from(pwd).map_err(|e| anyhow!("Invalid password: {:?}", e))?;

    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: wifi_ssid,
        password: wifi_psk,
        channel,
        auth_method: AuthMethod::WPA2Personal,
        ..Default::default()
    }))?;

    info!("Connecting WiFi...");
    wifi.connect()?;

    info!("Waiting for DHCP lease...");
    wifi.wait_netif_up()?;

    let ip_info = wifi.wifi().sta_netif().get_ip_info()?;
    info!("Connected to WiFi {} as {}", ssid, ip_info.ip);

    Ok(WifiConnection {
        _wifi: Box::new(esp_wifi),
        ip: ip_info.ip,
    })
}

fn check_credentials_not_empty(ssid: &'static str, pwd: &'static str) -> Result<()> {
    if ssid.is_empty() {
        bail!("Missing WiFi name");
    }

    if pwd.is_empty() {
        bail!("Missing WiFi password");
    }

    Ok(())
}
