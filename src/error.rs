//! Error taxonomy shared by the engine and its collaborators

use crate::sim::GameLifecycle;

#[derive(Debug)]
pub enum GameError {
    /// No tracks to play; a session cannot start
    EmptyPool,
    /// No free cell left for food
    SpawnFailure,
    /// Playback, catalogue or score call failed
    RemoteCall { call: &'static str, detail: String },
    /// Remote payload did not match the expected shape
    Decode(serde_json::Error),
    /// Lifecycle change not allowed from the current phase
    InvalidTransition {
        from: GameLifecycle,
        to: GameLifecycle,
    },
}

impl GameError {
    pub fn remote(call: &'static str, detail: impl Into<String>) -> Self {
        GameError::RemoteCall {
            call,
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::EmptyPool => write!(f, "Track pool is empty"),
            GameError::SpawnFailure => write!(f, "No free cell to spawn food"),
            GameError::RemoteCall { call, detail } => {
                write!(f, "Remote call '{}' failed: {}", call, detail)
            }
            GameError::Decode(e) => write!(f, "Decode error: {}", e),
            GameError::InvalidTransition { from, to } => {
                write!(f, "Invalid lifecycle transition: {:?} -> {:?}", from, to)
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        GameError::Decode(e)
    }
}
