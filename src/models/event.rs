use serde::{Deserialize, Serialize};

/// An organized activity members participate in, carrying the styling
/// applied to its certificates. All styling fields are optional; the
/// renderer falls back to the default template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub organized_by: String,
    pub date: String,
    pub purpose: Option<String>,
    pub certificate_url: Option<String>,
    pub certificate_background_color: Option<String>,
    pub certificate_text_color: Option<String>,
    pub organizer_sign_url: Option<String>,
    pub qr_code_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    pub name: String,
    pub organized_by: String,
    pub date: String,
    pub purpose: Option<String>,
    pub certificate_url: Option<String>,
    pub certificate_background_color: Option<String>,
    pub certificate_text_color: Option<String>,
    pub organizer_sign_url: Option<String>,
    pub qr_code_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    pub name: Option<String>,
    pub organized_by: Option<String>,
    pub date: Option<String>,
    pub purpose: Option<String>,
    pub certificate_url: Option<String>,
    pub certificate_background_color: Option<String>,
    pub certificate_text_color: Option<String>,
    pub organizer_sign_url: Option<String>,
    pub qr_code_url: Option<String>,
}
