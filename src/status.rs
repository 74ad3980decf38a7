use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::to_string;

/// Brightness as sent by the control page: a string from form inputs, or a plain number.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum BrightnessValue {
    Number(i64),
    Text(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<BrightnessValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Status {
    pub fn applied(color: Option<String>, brightness: Option<BrightnessValue>) -> Status {
        Status {
            success: true,
            color,
            brightness,
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Status {
        Status {
            success: false,
            color: None,
            brightness: None,
            error: Some(error.to_string()),
        }
    }

    pub fn to_message(&self) -> Result<Vec<u8>> {
        Ok(to_string(self)?.into_bytes())
    }
}
