use cs_core::{PlaceholderKey, ProspectField};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Prospect details handed to the tool when a call is opened from a CRM link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProspectInfo {
    pub name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub account_id: Option<String>,
    pub contact_id: Option<String>,
}

impl ProspectInfo {
    pub fn field(&self, field: ProspectField) -> Option<&str> {
        match field {
            ProspectField::Name => self.name.as_deref(),
            ProspectField::Title => self.title.as_deref(),
            ProspectField::Company => self.company.as_deref(),
            ProspectField::Industry => self.industry.as_deref(),
            ProspectField::Benefit | ProspectField::Pain => None,
        }
    }

    pub fn account_name(&self) -> Option<&str> {
        self.company.as_deref()
    }

    pub fn contact_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Placeholder values for every populated prospect field.
    pub fn substitutions(&self) -> Vec<(PlaceholderKey, String)> {
        ProspectField::ALL
            .iter()
            .filter_map(|field| {
                self.field(*field)
                    .map(|value| (field.key(), value.to_string()))
            })
            .collect()
    }
}

/// Reads `name`, `title`, `company`, `industry`, `phone`, `email`,
/// `accountId` and `contactId` from a URL query string.
///
/// Empty values count as absent and unknown parameters are ignored.
pub fn prospect_from_query(query: &str) -> ProspectInfo {
    let mut info = ProspectInfo::default();
    let query = query.strip_prefix('?').unwrap_or(query);
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(raw_key);
        let value = decode_component(raw_value);
        let slot = match key.as_str() {
            "name" => &mut info.name,
            "title" => &mut info.title,
            "company" => &mut info.company,
            "industry" => &mut info.industry,
            "phone" => &mut info.phone,
            "email" => &mut info.email,
            "accountId" => &mut info.account_id,
            "contactId" => &mut info.contact_id,
            _ => {
                debug!(key = %key, "ignoring prospect query parameter");
                continue;
            }
        };
        // First occurrence wins.
        if slot.is_none() && !value.is_empty() {
            *slot = Some(value);
        }
    }
    info
}

/// Form-style decoding: `+` is a space and malformed escapes are kept as-is.
fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0usize;
    while index < bytes.len() {
        match bytes[index] {
            b'+' => decoded.push(b' '),
            b'%' if index + 2 < bytes.len() => {
                match (hex_value(bytes[index + 1]), hex_value(bytes[index + 2])) {
                    (Some(high), Some(low)) => {
                        decoded.push(high * 16 + low);
                        index += 2;
                    }
                    _ => decoded.push(b'%'),
                }
            }
            byte => decoded.push(byte),
        }
        index += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
