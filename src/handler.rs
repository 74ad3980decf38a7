use std::{net::Ipv4Addr, sync::Mutex};

use log::{error, info, warn};
use serde::Deserialize;

use crate::{
    color::rgb_hex_to_grb,
    driver::StripDriver,
    status::{BrightnessValue, Status},
    strip::{checked_brightness, lock_strip, LedStrip},
    Result, StripError,
};

pub const INDEX_HTML: &str = include_str!("index.html");
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Control requests are tiny JSON objects; anything larger is rejected up front.
pub const MAX_BODY_LEN: usize = 512;

const FALLBACK_ERROR_BODY: &[u8] = br#"{"success":false,"error":"internal error"}"#;

/// Body of `POST /set`.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct SetRequest {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub brightness: Option<BrightnessValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn rejected(status: u16, error: impl ToString) -> Reply {
        Reply::json(status, &Status::failed(error))
    }

    fn json(status: u16, message: &Status) -> Reply {
        match message.to_message() {
            Ok(body) => Reply { status, body },
            Err(e) => {
                error!("Failed to encode reply: {e:#}");
                Reply {
                    status: 500,
                    body: FALLBACK_ERROR_BODY.to_vec(),
                }
            }
        }
    }
}

/// Checks a declared `Content-Length` before a buffer is allocated for it.
pub fn checked_body_len(content_len: Option<u64>) -> core::result::Result<usize, Reply> {
    let len = content_len.unwrap_or(0);
    if len > MAX_BODY_LEN as u64 {
        warn!("Rejected request body of {len} bytes");
        return Err(Reply::rejected(
            413,
            format!("request body larger than {MAX_BODY_LEN} bytes"),
        ));
    }
    Ok(len as usize)
}

/// Address of the control page served on `ip:port`.
pub fn control_url(ip: Ipv4Addr, port: u16) -> String {
    match port {
        80 => format!("http://{ip}/"),
        port => format!("http://{ip}:{port}/"),
    }
}

/// Handles a raw `POST /set` body against the shared strip.
pub fn handle_set<D: StripDriver>(strip: &Mutex<LedStrip<D>>, body: &[u8]) -> Reply {
    let request: SetRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected malformed request body: {e}");
            return Reply::json(400, &Status::failed(format!("malformed request body: {e}")));
        }
    };

    match apply(strip, &request) {
        Ok(()) => Reply::json(200, &Status::applied(request.color, request.brightness)),
        Err(e) => {
            warn!("Failed to apply request: {e}");
            Reply::json(500, &Status::failed(e))
        }
    }
}

/// Validates every field first so a bad brightness never leaves a half-applied request.
pub fn apply<D: StripDriver>(strip: &Mutex<LedStrip<D>>, request: &SetRequest) -> Result<()> {
    let color = request
        .color
        .as_deref()
        .filter(|hex| !hex.is_empty())
        .map(|hex| rgb_hex_to_grb(hex).map(|grb| (hex, grb)))
        .transpose()?;
    let brightness = request
        .brightness
        .as_ref()
        .map(parse_brightness)
        .transpose()?
        .flatten();

    let mut strip = lock_strip(strip)?;

    if let Some((hex, grb)) = color {
        info!("Setting color to {hex} (grb {:06X})", grb.packed());
        strip.set_color(grb)?;
    }
    if let Some(level) = brightness {
        info!("Setting brightness to {level}");
        strip.set_brightness(i64::from(level))?;
    }

    Ok(())
}

/// Empty strings count as absent, anything else must be an integer in range.
fn parse_brightness(value: &BrightnessValue) -> Result<Option<u8>> {
    let level = match value {
        BrightnessValue::Number(level) => *level,
        BrightnessValue::Text(text) if text.trim().is_empty() => return Ok(None),
        BrightnessValue::Text(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| StripError::InvalidBrightnessFormat(text.clone()))?,
    };
    checked_brightness(level).map(Some)
}
