//! Playback sinks
//!
//! The engine only ever asks a sink to play, pause or resume. Calls are
//! fire-and-forget: failures are logged by the sink and never reach the game.

/// Something that can play a track by URI
pub trait PlaybackSink {
    fn play(&self, uri: &str);
    fn pause(&self);
    fn resume(&self);

    /// Short label for logs
    fn name(&self) -> &'static str;
}

/// Does nothing (native builds, no player available)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPlayback;

impl PlaybackSink for NullPlayback {
    fn play(&self, uri: &str) {
        log::debug!("(no player) play {}", uri);
    }

    fn pause(&self) {
        log::debug!("(no player) pause");
    }

    fn resume(&self) {
        log::debug!("(no player) resume");
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

/// `spotify:track:ID` -> `ID`
pub fn track_id_from_uri(uri: &str) -> Option<&str> {
    uri.strip_prefix("spotify:track:").filter(|id| !id.is_empty())
}

/// Embed player URL for a track URI
pub fn embed_url(uri: &str) -> Option<String> {
    track_id_from_uri(uri)
        .map(|id| format!("https://open.spotify.com/embed/track/{}?utm_source=generator&theme=0", id))
}

const PLAYER_URL: &str = "https://api.spotify.com/v1/me/player";

/// Web API player endpoint for `action` on one device
pub fn player_url(action: &str, device_id: &str) -> String {
    format!(
        "{}/{}?device_id={}",
        PLAYER_URL,
        action,
        crate::platform::encode_query_value(device_id)
    )
}

#[cfg(target_arch = "wasm32")]
pub use web::{ConnectPlayback, EmbedPlayback};

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast;
    use web_sys::HtmlIFrameElement;

    use super::{PlaybackSink, embed_url, player_url};
    use crate::platform::http;

    /// Drives a Spotify Connect device through the Web API
    pub struct ConnectPlayback {
        device_id: String,
        access_token: String,
    }

    impl ConnectPlayback {
        pub fn new(device_id: String, access_token: String) -> Self {
            Self {
                device_id,
                access_token,
            }
        }

        fn put(&self, call: &'static str, action: &str, body: Option<String>) {
            let url = player_url(action, &self.device_id);
            http::send_and_forget(call, "PUT", url, Some(self.access_token.clone()), body);
        }
    }

    impl PlaybackSink for ConnectPlayback {
        fn play(&self, uri: &str) {
            log::info!("Playing {} on device {}", uri, self.device_id);
            let body = serde_json::json!({ "uris": [uri] }).to_string();
            self.put("play", "play", Some(body));
        }

        fn pause(&self) {
            self.put("pause", "pause", None);
        }

        fn resume(&self) {
            self.put("resume", "play", None);
        }

        fn name(&self) -> &'static str {
            "connect"
        }
    }

    /// Fallback for accounts without a playback device: swaps the track in an
    /// embed iframe. The embed cannot be paused from outside.
    pub struct EmbedPlayback {
        iframe_id: &'static str,
    }

    impl EmbedPlayback {
        pub fn new(iframe_id: &'static str) -> Self {
            Self { iframe_id }
        }
    }

    impl PlaybackSink for EmbedPlayback {
        fn play(&self, uri: &str) {
            let Some(url) = embed_url(uri) else {
                log::warn!("Cannot embed {}", uri);
                return;
            };
            let frame = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id(self.iframe_id))
                .and_then(|el| el.dyn_into::<HtmlIFrameElement>().ok());
            match frame {
                Some(frame) => {
                    frame.set_src(&url);
                    frame.set_class_name("");
                }
                None => log::warn!("Embed frame #{} missing", self.iframe_id),
            }
        }

        fn pause(&self) {}

        fn resume(&self) {}

        fn name(&self) -> &'static str {
            "embed"
        }
    }
}
