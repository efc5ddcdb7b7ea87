//! Certificate rendering: projects a member and their resolved event onto
//! the visual template and emits a standalone downloadable SVG document.
//!
//! Every styling input is optional. Missing colors fall back to the default
//! palette, a missing background image leaves the solid background, a
//! missing signature leaves the signature line empty, and a missing QR
//! image delegates to an external QR renderer fed the verification URL.
//! The render itself can never fail on absent assets.

use crate::models::event::Event;
use crate::models::member::Member;

const DEFAULT_BACKGROUND: &str = "#f6fbf4";
const DEFAULT_TEXT: &str = "#1f2d24";
const DEFAULT_PRIMARY: &str = "#2f7d46";
const ORGANIZATION: &str = "Green Environmental Society";

/// External QR renderer used when the event supplies no custom QR image.
const QR_RENDER_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Resolved inputs for one certificate render.
pub struct CertificateView {
    pub member_name: String,
    pub member_id: String,
    pub role: String,
    pub event_name: String,
    pub event_date: String,
    pub organized_by: String,
    pub background_color: String,
    pub text_color: String,
    pub primary_color: String,
    pub background_url: Option<String>,
    pub sign_url: Option<String>,
    pub qr_url: String,
}

impl CertificateView {
    /// Build the view from a member, their (possibly unresolved) event and
    /// the public verification URL. Unresolved event fields render as "N/A".
    pub fn new(member: &Member, event: Option<&Event>, verification_url: &str) -> Self {
        let text_color = event
            .and_then(|e| e.certificate_text_color.clone())
            .filter(|c| !c.is_empty());

        Self {
            member_name: member.user_name.clone(),
            member_id: member.id.clone(),
            role: member.role.to_string(),
            event_name: event
                .map(|e| e.name.clone())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "N/A".to_string()),
            event_date: event
                .map(|e| format_date(&e.date))
                .unwrap_or_else(|| "N/A".to_string()),
            organized_by: event
                .map(|e| e.organized_by.clone())
                .filter(|o| !o.is_empty())
                .unwrap_or_else(|| "N/A".to_string()),
            background_color: event
                .and_then(|e| e.certificate_background_color.clone())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string()),
            primary_color: text_color
                .clone()
                .unwrap_or_else(|| DEFAULT_PRIMARY.to_string()),
            text_color: text_color.unwrap_or_else(|| DEFAULT_TEXT.to_string()),
            background_url: event
                .and_then(|e| e.certificate_url.clone())
                .filter(|u| !u.is_empty()),
            sign_url: event
                .and_then(|e| e.organizer_sign_url.clone())
                .filter(|u| !u.is_empty()),
            qr_url: event
                .and_then(|e| e.qr_code_url.clone())
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| {
                    format!(
                        "{QR_RENDER_URL}?size=160x160&data={}",
                        percent_encode(verification_url)
                    )
                }),
        }
    }

    /// Render the certificate as a standalone SVG document.
    pub fn render_svg(&self) -> String {
        let background_image = self
            .background_url
            .as_deref()
            .map(|url| {
                format!(
                    r#"<image href="{}" x="0" y="0" width="900" height="600" preserveAspectRatio="xMidYMid slice"/><rect x="0" y="0" width="900" height="600" fill="rgba(0,0,0,0.3)"/>"#,
                    xml_escape(url)
                )
            })
            .unwrap_or_default();

        let signature = self
            .sign_url
            .as_deref()
            .map(|url| {
                format!(
                    r#"<image href="{}" x="110" y="462" width="160" height="48" preserveAspectRatio="xMidYMid meet"/>"#,
                    xml_escape(url)
                )
            })
            .unwrap_or_default();

        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="900" height="600" viewBox="0 0 900 600" font-family="Georgia, serif">
  <rect width="900" height="600" fill="{bg}"/>
  {background_image}
  <rect x="14" y="14" width="872" height="572" fill="none" stroke="{primary}" stroke-width="4" rx="10"/>
  <text x="60" y="70" font-size="26" font-weight="bold" fill="{primary}">{organization}</text>
  <image href="{qr}" x="756" y="44" width="84" height="84"/>
  <text x="798" y="148" font-size="13" font-weight="bold" fill="{text}" text-anchor="middle">Verification ID</text>
  <text x="798" y="166" font-size="13" fill="{text}" text-anchor="middle">{member_id}</text>
  <text x="450" y="220" font-size="18" fill="{text}" text-anchor="middle">This certificate is proudly presented to</text>
  <text x="450" y="275" font-size="44" font-weight="bold" fill="{primary}" text-anchor="middle">{member_name}</text>
  <text x="450" y="315" font-size="18" fill="{text}" text-anchor="middle">for their active role as a</text>
  <text x="450" y="355" font-size="26" font-weight="bold" fill="{text}" text-anchor="middle">{role}</text>
  <text x="450" y="392" font-size="18" fill="{text}" text-anchor="middle">in the</text>
  <text x="450" y="432" font-size="30" font-weight="bold" fill="{primary}" text-anchor="middle">{event_name}</text>
  {signature}
  <line x1="90" y1="520" x2="290" y2="520" stroke="{text}" stroke-width="1"/>
  <text x="190" y="540" font-size="13" font-weight="bold" fill="{text}" text-anchor="middle">Organizer's Signature</text>
  <text x="190" y="558" font-size="13" fill="{text}" text-anchor="middle">{organized_by}</text>
  <line x1="610" y1="520" x2="810" y2="520" stroke="{text}" stroke-width="1"/>
  <text x="710" y="540" font-size="13" font-weight="bold" fill="{text}" text-anchor="middle">Event Date</text>
  <text x="710" y="558" font-size="13" fill="{text}" text-anchor="middle">{event_date}</text>
</svg>
"#,
            bg = xml_escape(&self.background_color),
            primary = xml_escape(&self.primary_color),
            text = xml_escape(&self.text_color),
            organization = ORGANIZATION,
            qr = xml_escape(&self.qr_url),
            member_id = xml_escape(&self.member_id),
            member_name = xml_escape(&self.member_name),
            role = xml_escape(&self.role),
            event_name = xml_escape(&self.event_name),
            organized_by = xml_escape(&self.organized_by),
            event_date = xml_escape(&self.event_date),
        )
    }
}

/// Format an ISO date (`2024-08-15`) as `August 15, 2024`; anything that
/// does not parse is shown verbatim.
pub fn format_date(date: &str) -> String {
    match chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::member::Role;

    fn member() -> Member {
        Member {
            id: "GES101".to_string(),
            user_name: "Ahmed Khan".to_string(),
            father_name: "Zahid Khan".to_string(),
            cnic: "42201-1234567-1".to_string(),
            event: "Annual Tree Plantation 2024".to_string(),
            role: Role::Participant,
            approved: true,
            created_at: "2024-08-15T00:00:00".to_string(),
        }
    }

    fn event() -> Event {
        Event {
            id: "evt-1".to_string(),
            name: "Annual Tree Plantation 2024".to_string(),
            organized_by: "Green Environmental Society".to_string(),
            date: "2024-08-15".to_string(),
            purpose: None,
            certificate_url: None,
            certificate_background_color: None,
            certificate_text_color: None,
            organizer_sign_url: None,
            qr_code_url: None,
        }
    }

    #[test]
    fn test_missing_event_renders_na() {
        let view = CertificateView::new(&member(), None, "http://localhost/verify/GES101");
        assert_eq!(view.event_name, "N/A");
        assert_eq!(view.event_date, "N/A");
        assert_eq!(view.organized_by, "N/A");
        let svg = view.render_svg();
        assert!(svg.contains("N/A"));
        assert!(svg.contains("Ahmed Khan"));
    }

    #[test]
    fn test_default_styling_applied() {
        let view = CertificateView::new(&member(), Some(&event()), "http://localhost/verify/GES101");
        assert_eq!(view.background_color, DEFAULT_BACKGROUND);
        assert_eq!(view.text_color, DEFAULT_TEXT);
        assert!(view.background_url.is_none());
        assert!(view.sign_url.is_none());
    }

    #[test]
    fn test_custom_text_color_drives_primary() {
        let mut e = event();
        e.certificate_text_color = Some("#112233".to_string());
        let view = CertificateView::new(&member(), Some(&e), "http://localhost/verify/GES101");
        assert_eq!(view.text_color, "#112233");
        assert_eq!(view.primary_color, "#112233");
    }

    #[test]
    fn test_qr_falls_back_to_external_renderer() {
        let view = CertificateView::new(&member(), Some(&event()), "http://localhost/verify/GES101");
        assert!(view.qr_url.starts_with(QR_RENDER_URL));
        assert!(view.qr_url.contains("http%3A%2F%2Flocalhost%2Fverify%2FGES101"));
    }

    #[test]
    fn test_custom_qr_wins() {
        let mut e = event();
        e.qr_code_url = Some("https://cdn.example.org/qr.png".to_string());
        let view = CertificateView::new(&member(), Some(&e), "http://localhost/verify/GES101");
        assert_eq!(view.qr_url, "https://cdn.example.org/qr.png");
    }

    #[test]
    fn test_svg_escapes_member_fields() {
        let mut m = member();
        m.user_name = "A & B <script>".to_string();
        let svg = CertificateView::new(&m, Some(&event()), "http://localhost/verify/GES101")
            .render_svg();
        assert!(svg.contains("A &amp; B &lt;script&gt;"));
        assert!(!svg.contains("<script>"));
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-08-15"), "August 15, 2024");
        assert_eq!(format_date("not-a-date"), "not-a-date");
    }

    #[test]
    fn test_empty_styling_strings_treated_as_absent() {
        let mut e = event();
        e.certificate_background_color = Some(String::new());
        e.qr_code_url = Some(String::new());
        let view = CertificateView::new(&member(), Some(&e), "http://localhost/verify/GES101");
        assert_eq!(view.background_color, DEFAULT_BACKGROUND);
        assert!(view.qr_url.starts_with(QR_RENDER_URL));
    }
}
