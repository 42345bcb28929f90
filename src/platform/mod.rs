//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Credentials handed over by the login redirect
//! - HTTP calls to the music and score services
//! - The fixed-interval tick timer

#[cfg(target_arch = "wasm32")]
pub mod http;
#[cfg(target_arch = "wasm32")]
pub mod timer;

/// Token and user id placed in the page URL by the external login flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub user_id: String,
}

impl Credentials {
    /// Parse `access_token` and `user_id` out of a query string (with or
    /// without the leading `?`). Both must be present and non-empty.
    /// Values are form-decoded (`%XX` escapes and `+` for space).
    pub fn from_query(query: &str) -> Option<Self> {
        let mut access_token = None;
        let mut user_id = None;

        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let value = decode_query_value(value);
            if value.is_empty() {
                continue;
            }
            match key {
                "access_token" => access_token = Some(value),
                "user_id" => user_id = Some(value),
                _ => {}
            }
        }

        Some(Self {
            access_token: access_token?,
            user_id: user_id?,
        })
    }

    /// Read credentials from the current page URL and strip them from the
    /// address bar
    #[cfg(target_arch = "wasm32")]
    pub fn from_location() -> Option<Self> {
        let window = web_sys::window()?;
        let search = window.location().search().ok()?;
        let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
        let creds = Self {
            access_token: params.get("access_token").filter(|v| !v.is_empty())?,
            user_id: params.get("user_id").filter(|v| !v.is_empty())?,
        };

        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some("/"));
        }
        log::info!("Credentials found for user {}", creds.user_id);
        Some(creds)
    }
}

/// Decode one `application/x-www-form-urlencoded` value. Malformed escapes
/// are kept as literal text.
pub fn decode_query_value(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 2;
                    }
                    _ => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Percent-encode a query value. Unreserved characters pass through.
pub fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

fn hex_value(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

/// Playback device id published by the page's player script, if any
#[cfg(target_arch = "wasm32")]
pub fn playback_device_id() -> Option<String> {
    let window = web_sys::window()?;
    js_sys::Reflect::get(&window, &wasm_bindgen::JsValue::from_str("snakeifyDeviceId"))
        .ok()?
        .as_string()
        .filter(|id| !id.is_empty())
}

/// Milliseconds since the epoch, used to seed the session RNG
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query() {
        let creds = Credentials::from_query("?access_token=BQDx-9_z&user_id=42").unwrap();
        assert_eq!(creds.access_token, "BQDx-9_z");
        assert_eq!(creds.user_id, "42");

        let creds = Credentials::from_query("user_id=7&foo=bar&access_token=abc").unwrap();
        assert_eq!(creds.user_id, "7");
    }

    #[test]
    fn test_from_query_missing_parts() {
        assert!(Credentials::from_query("").is_none());
        assert!(Credentials::from_query("?access_token=abc").is_none());
        assert!(Credentials::from_query("?access_token=&user_id=1").is_none());
    }

    #[test]
    fn test_from_query_decodes_values() {
        let creds = Credentials::from_query("?access_token=a%2Bb%2Fc&user_id=jo+doe").unwrap();
        assert_eq!(creds.access_token, "a+b/c");
        assert_eq!(creds.user_id, "jo doe");

        let creds = Credentials::from_query("access_token=x%3d%3D&user_id=%C3%A9").unwrap();
        assert_eq!(creds.access_token, "x==");
        assert_eq!(creds.user_id, "é");
    }

    #[test]
    fn test_decode_keeps_malformed_escapes() {
        assert_eq!(decode_query_value("100%"), "100%");
        assert_eq!(decode_query_value("%zz1"), "%zz1");
        assert_eq!(decode_query_value("%4"), "%4");
    }

    #[test]
    fn test_encode_query_value() {
        assert_eq!(encode_query_value("user-1_a.b~"), "user-1_a.b~");
        assert_eq!(encode_query_value("jo doe&x=1"), "jo%20doe%26x%3D1");
        assert_eq!(decode_query_value(&encode_query_value("a+b/c é")), "a+b/c é");
    }
}
