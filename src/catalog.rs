//! Track source: the user's saved tracks from the Spotify Web API

use serde::Deserialize;

use crate::error::GameError;
use crate::sim::{Artwork, Track};

/// First page of the saved-tracks listing
pub const SAVED_TRACKS_URL: &str = "https://api.spotify.com/v1/me/tracks?limit=50";

#[derive(Debug, Deserialize)]
struct SavedTracksPage {
    #[serde(default)]
    items: Vec<SavedTrackItem>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SavedTrackItem {
    track: Option<ApiTrack>,
}

#[derive(Debug, Deserialize)]
struct ApiTrack {
    /// Null for local files
    id: Option<String>,
    name: String,
    uri: String,
    preview_url: Option<String>,
    #[serde(default)]
    artists: Vec<ApiArtist>,
    album: Option<ApiAlbum>,
}

#[derive(Debug, Deserialize)]
struct ApiArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiAlbum {
    #[serde(default)]
    images: Vec<ApiImage>,
}

#[derive(Debug, Deserialize)]
struct ApiImage {
    url: String,
    width: Option<u32>,
    height: Option<u32>,
}

impl From<ApiTrack> for Track {
    fn from(t: ApiTrack) -> Self {
        Track {
            id: t.id.unwrap_or_else(|| t.uri.clone()),
            name: t.name,
            artist: t
                .artists
                .into_iter()
                .next()
                .map(|a| a.name)
                .unwrap_or_else(|| "Unknown Artist".to_string()),
            artwork: t
                .album
                .map(|a| a.images)
                .unwrap_or_default()
                .into_iter()
                .map(|i| Artwork {
                    url: i.url,
                    width: i.width,
                    height: i.height,
                })
                .collect(),
            uri: t.uri,
            preview_url: t.preview_url,
        }
    }
}

/// Decode one page into tracks plus the URL of the following page.
/// Items without a track are dropped.
pub fn parse_saved_tracks_page(json: &str) -> Result<(Vec<Track>, Option<String>), GameError> {
    let page: SavedTracksPage = serde_json::from_str(json)?;
    let tracks = page
        .items
        .into_iter()
        .filter_map(|item| item.track)
        .map(Track::from)
        .collect();
    Ok((tracks, page.next))
}

/// Pull up to `TRACK_BATCH_LIMIT` saved tracks, following pagination.
///
/// A failing page ends the walk; whatever was collected so far is returned.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_tracks(access_token: &str) -> Vec<Track> {
    use crate::consts::TRACK_BATCH_LIMIT;
    use crate::platform::http;

    let mut tracks: Vec<Track> = Vec::new();
    let mut url = Some(SAVED_TRACKS_URL.to_string());

    while let Some(page_url) = url.take() {
        if tracks.len() >= TRACK_BATCH_LIMIT {
            break;
        }
        log::info!("Fetching tracks from {}", page_url);
        let body = match http::send("fetch_tracks", "GET", &page_url, Some(access_token), None).await
        {
            Ok(body) => body,
            Err(e) => {
                log::error!("{}", e);
                break;
            }
        };
        match parse_saved_tracks_page(&body) {
            Ok((page, next)) => {
                log::info!("Fetched {} tracks", page.len());
                tracks.extend(page);
                url = next;
            }
            Err(e) => {
                log::error!("{}", e);
                break;
            }
        }
    }

    tracks.truncate(TRACK_BATCH_LIMIT);
    tracks
}
