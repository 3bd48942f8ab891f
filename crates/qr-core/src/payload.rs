//! Payload strings for each QR type
//!
//! Only presence is checked; values are inserted verbatim.

use crate::error::QrError;
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum WifiSecurity {
    #[default]
    Wpa,
    Wep,
    NoPass,
}

impl WifiSecurity {
    fn as_str(self) -> &'static str {
        match self {
            WifiSecurity::Wpa => "WPA",
            WifiSecurity::Wep => "WEP",
            WifiSecurity::NoPass => "nopass",
        }
    }
}

impl FromStr for WifiSecurity {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "wpa" | "wpa2" => Ok(WifiSecurity::Wpa),
            "wep" => Ok(WifiSecurity::Wep),
            "nopass" | "none" => Ok(WifiSecurity::NoPass),
            other => Err(QrError::ValidationError(format!(
                "Unknown WiFi security '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrPayload {
    Url {
        url: String,
    },
    Text {
        text: String,
    },
    Wifi {
        ssid: String,
        password: String,
        security: WifiSecurity,
        hidden: bool,
    },
    Email {
        address: String,
        subject: String,
        body: String,
    },
    Sms {
        phone: String,
        message: String,
    },
    Phone {
        phone: String,
    },
    VCard {
        name: String,
        phone: String,
        email: String,
        company: String,
        title: String,
        website: String,
    },
    Geo {
        lat: String,
        lon: String,
    },
    Event {
        title: String,
        start: String,
        end: String,
        location: String,
    },
}

/// Type names accepted by [`QrPayload::from_fields`]
pub const KINDS: [&str; 9] = [
    "url", "text", "wifi", "email", "sms", "phone", "vcard", "geo", "event",
];

impl QrPayload {
    /// Build a payload from form fields; `kind` is one of [`KINDS`]
    pub fn from_fields(kind: &str, fields: &HashMap<String, String>) -> Result<Self, QrError> {
        let get = |key: &str| fields.get(key).map(|v| v.trim().to_string()).unwrap_or_default();

        let payload = match kind.trim().to_lowercase().as_str() {
            "url" => QrPayload::Url { url: get("url") },
            "text" => QrPayload::Text {
                // Text keeps its inner whitespace and line breaks
                text: fields.get("text").cloned().unwrap_or_default(),
            },
            "wifi" => QrPayload::Wifi {
                ssid: get("ssid"),
                password: get("password"),
                security: get("security").parse()?,
                hidden: matches!(get("hidden").to_lowercase().as_str(), "true" | "on" | "1" | "yes"),
            },
            "email" => QrPayload::Email {
                address: get("address"),
                subject: get("subject"),
                body: get("body"),
            },
            "sms" => QrPayload::Sms {
                phone: get("phone"),
                message: get("message"),
            },
            "phone" | "tel" => QrPayload::Phone { phone: get("phone") },
            "vcard" => QrPayload::VCard {
                name: get("name"),
                phone: get("phone"),
                email: get("email"),
                company: get("company"),
                title: get("title"),
                website: get("website"),
            },
            "geo" => QrPayload::Geo {
                lat: get("lat"),
                lon: get("lon"),
            },
            "event" => QrPayload::Event {
                title: get("title"),
                start: get("start"),
                end: get("end"),
                location: get("location"),
            },
            other => {
                return Err(QrError::ValidationError(format!(
                    "Unknown QR type '{}' (expected one of: {})",
                    other,
                    KINDS.join(", ")
                )))
            }
        };
        Ok(payload)
    }

    /// Human-readable type label, stored in history
    pub fn label(&self) -> &'static str {
        match self {
            QrPayload::Url { .. } => "URL/Website",
            QrPayload::Text { .. } => "Text",
            QrPayload::Wifi { .. } => "WiFi",
            QrPayload::Email { .. } => "Email",
            QrPayload::Sms { .. } => "SMS",
            QrPayload::Phone { .. } => "Phone",
            QrPayload::VCard { .. } => "vCard",
            QrPayload::Geo { .. } => "Maps Location",
            QrPayload::Event { .. } => "Event Calendar",
        }
    }

    /// The string encoded into the symbol
    pub fn encode(&self) -> Result<String, QrError> {
        let data = match self {
            QrPayload::Url { url } => {
                require("url", url)?;
                url.clone()
            }
            QrPayload::Text { text } => {
                require("text", text.trim())?;
                text.clone()
            }
            QrPayload::Wifi {
                ssid,
                password,
                security,
                hidden,
            } => {
                require("ssid", ssid)?;
                format!(
                    "WIFI:T:{};S:{};P:{};H:{};;",
                    security.as_str(),
                    ssid,
                    password,
                    hidden
                )
            }
            QrPayload::Email {
                address,
                subject,
                body,
            } => {
                require("address", address)?;
                format!("mailto:{}?subject={}&body={}", address, subject, body)
            }
            QrPayload::Sms { phone, message } => {
                require("phone", phone)?;
                format!("sms:{}?body={}", phone, message)
            }
            QrPayload::Phone { phone } => {
                require("phone", phone)?;
                format!("tel:{}", phone)
            }
            QrPayload::VCard {
                name,
                phone,
                email,
                company,
                title,
                website,
            } => {
                require("name", name)?;
                format!(
                    "BEGIN:VCARD\nVERSION:3.0\nFN:{}\nTEL:{}\nEMAIL:{}\nORG:{}\nTITLE:{}\nURL:{}\nEND:VCARD",
                    name, phone, email, company, title, website
                )
            }
            QrPayload::Geo { lat, lon } => {
                require("lat", lat)?;
                require("lon", lon)?;
                format!("geo:{},{}", lat, lon)
            }
            QrPayload::Event {
                title,
                start,
                end,
                location,
            } => {
                require("title", title)?;
                require("start", start)?;
                format!(
                    "BEGIN:VEVENT\nSUMMARY:{}\nDTSTART:{}\nDTEND:{}\nLOCATION:{}\nEND:VEVENT",
                    title, start, end, location
                )
            }
        };
        Ok(data)
    }
}

fn require(field: &str, value: &str) -> Result<(), QrError> {
    if value.is_empty() {
        Err(QrError::ValidationError(format!("'{}' is required", field)))
    } else {
        Ok(())
    }
}
