use serde::Serialize;

/// A ready-made payload offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QrTemplate {
    pub name: &'static str,
    pub payload: &'static str,
}

pub const TEMPLATES: [QrTemplate; 5] = [
    QrTemplate {
        name: "WhatsApp Business",
        payload: "https://wa.me/628123456789?text=Halo,%20saya%20tertarik%20dengan%20produk%20Anda",
    },
    QrTemplate {
        name: "Email Signature",
        payload: "mailto:contact@example.com?subject=Inquiry",
    },
    QrTemplate {
        name: "WiFi Login",
        payload: "WIFI:T:WPA;S:MyNetwork;P:MyPassword;H:false;;",
    },
    QrTemplate {
        name: "Google Maps",
        payload: "geo:-6.2088,106.8456",
    },
    QrTemplate {
        name: "Event Registration",
        payload: "https://eventbrite.com/e/example-event",
    },
];

pub fn template(index: usize) -> Option<&'static QrTemplate> {
    TEMPLATES.get(index)
}
