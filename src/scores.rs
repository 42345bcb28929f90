//! Session summaries and score submission
//!
//! A finished run is reported once, fire-and-forget, to the score service.

use serde::{Deserialize, Serialize};

use crate::platform::encode_query_value;
use crate::sim::EatenRecord;

/// One eaten song in the submitted summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EatenSongEntry {
    /// 1-based eating order
    pub order: u32,
    pub title: String,
    pub artist: String,
    pub cover_url: Option<String>,
    pub preview_url: Option<String>,
    pub spotify_uri: String,
}

/// What gets posted when a run ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u32,
    pub eaten_songs: Vec<EatenSongEntry>,
}

impl SessionSummary {
    pub fn from_history(score: u32, history: &[EatenRecord]) -> Self {
        let eaten_songs = history
            .iter()
            .map(|record| EatenSongEntry {
                order: record.order,
                title: record.track.name.clone(),
                artist: record.track.artist.clone(),
                cover_url: record.artwork_url.clone(),
                preview_url: record.track.preview_url.clone(),
                spotify_uri: record.track.uri.clone(),
            })
            .collect();
        Self { score, eaten_songs }
    }
}

/// Receives finished sessions
pub trait ScoreSink {
    fn submit(&self, user_id: &str, summary: &SessionSummary);
}

/// Logs the summary and keeps nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullScoreSink;

impl ScoreSink for NullScoreSink {
    fn submit(&self, user_id: &str, summary: &SessionSummary) {
        log::info!(
            "Session for {} ended: score {}, {} songs",
            user_id,
            summary.score,
            summary.eaten_songs.len()
        );
    }
}

/// Submission endpoint for one user
pub fn score_url(api_base_url: &str, user_id: &str) -> String {
    format!(
        "{}/score?user_id={}",
        api_base_url.trim_end_matches('/'),
        encode_query_value(user_id)
    )
}

/// POSTs `{api_base_url}/score?user_id=…`
#[cfg(target_arch = "wasm32")]
pub struct HttpScoreSink {
    api_base_url: String,
}

#[cfg(target_arch = "wasm32")]
impl HttpScoreSink {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreSink for HttpScoreSink {
    fn submit(&self, user_id: &str, summary: &SessionSummary) {
        let body = match serde_json::to_string(summary) {
            Ok(body) => body,
            Err(e) => {
                log::error!("Failed to encode session summary: {}", e);
                return;
            }
        };
        let url = score_url(&self.api_base_url, user_id);
        log::info!("Submitting score {} for user {}", summary.score, user_id);
        crate::platform::http::send_and_forget("submit_score", "POST", url, None, Some(body));
    }
}

/// Game-over taunt for a final score
pub fn verdict(score: u32) -> &'static str {
    match score {
        0 => "MY GRANDMA PLAYS BETTER",
        1..=9 => "ARE YOU EVEN TRYING?",
        10..=29 => "NOT BAD, BUT NOT GREAT",
        30..=49 => "GETTING THERE... SLOWLY",
        50..=99 => "DJ SNAKE IN THE HOUSE!",
        _ => "GODLIKE STATUS",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::TrackQueue;
    use crate::sim::queue::tests::track;
    use std::rc::Rc;

    #[test]
    fn test_score_url_encodes_user() {
        assert_eq!(
            score_url("http://localhost:8000/", "user-1"),
            "http://localhost:8000/score?user_id=user-1"
        );
        assert_eq!(
            score_url("https://api.test", "jo doe&admin=1"),
            "https://api.test/score?user_id=jo%20doe%26admin%3D1"
        );
    }

    #[test]
    fn test_summary_from_history() {
        let mut queue = TrackQueue::new();
        let mut t = track("a");
        t.preview_url = Some("https://p.test/a".to_string());
        queue.record_eaten(Rc::new(t), Some("https://img.test/a/64".to_string()));
        queue.record_eaten(Rc::new(track("b")), None);

        let summary = SessionSummary::from_history(2, queue.history());
        assert_eq!(summary.score, 2);
        assert_eq!(summary.eaten_songs.len(), 2);
        assert_eq!(
            summary.eaten_songs[0],
            EatenSongEntry {
                order: 1,
                title: "Song a".to_string(),
                artist: "Artist a".to_string(),
                cover_url: Some("https://img.test/a/64".to_string()),
                preview_url: Some("https://p.test/a".to_string()),
                spotify_uri: "spotify:track:a".to_string(),
            }
        );
        assert_eq!(summary.eaten_songs[1].order, 2);
    }

    #[test]
    fn test_wire_field_names() {
        let summary = SessionSummary {
            score: 1,
            eaten_songs: vec![EatenSongEntry {
                order: 1,
                title: "t".to_string(),
                artist: "a".to_string(),
                cover_url: None,
                preview_url: None,
                spotify_uri: "spotify:track:x".to_string(),
            }],
        };
        let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["score"], 1);
        let song = &json["eaten_songs"][0];
        for key in ["order", "title", "artist", "cover_url", "preview_url", "spotify_uri"] {
            assert!(song.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_verdict_thresholds() {
        assert_eq!(verdict(0), "MY GRANDMA PLAYS BETTER");
        assert_eq!(verdict(9), "ARE YOU EVEN TRYING?");
        assert_eq!(verdict(10), "NOT BAD, BUT NOT GREAT");
        assert_eq!(verdict(49), "GETTING THERE... SLOWLY");
        assert_eq!(verdict(99), "DJ SNAKE IN THE HOUSE!");
        assert_eq!(verdict(100), "GODLIKE STATUS");
    }
}
