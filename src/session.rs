//! One game session: store, queue, RNG and the collaborators they talk to
//!
//! The sim produces events; the session turns them into playback and score
//! calls and hands them back to the caller for anything visual.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::error::GameError;
use crate::input::InputController;
use crate::playback::{NullPlayback, PlaybackSink};
use crate::scores::{NullScoreSink, ScoreSink, SessionSummary};
use crate::sim::tick::spawn_food;
use crate::sim::{Direction, GameEvent, GameLifecycle, GameState, Track, TrackQueue, tick};

pub struct Session {
    pub state: GameState,
    pub queue: TrackQueue,
    input: InputController,
    rng: Pcg32,
    playback: Box<dyn PlaybackSink>,
    scores: Box<dyn ScoreSink>,
    user_id: Option<String>,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self {
            state: GameState::new(),
            queue: TrackQueue::new(),
            input: InputController::new(),
            rng: Pcg32::seed_from_u64(seed),
            playback: Box::new(NullPlayback),
            scores: Box::new(NullScoreSink),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_scores(mut self, scores: Box<dyn ScoreSink>) -> Self {
        self.scores = scores;
        self
    }

    /// Choose the player for the next run
    pub fn set_playback(&mut self, playback: Box<dyn PlaybackSink>) {
        log::info!("Playback via {}", playback.name());
        self.playback = playback;
    }

    /// Hand over the fetched pool. Empty pools are ignored.
    pub fn load_tracks(&mut self, tracks: Vec<Track>) {
        self.queue.initialize(tracks);
        self.state.touch();
    }

    /// Idle -> Playing: place the first food and start the current track
    pub fn start(&mut self) -> Result<Vec<GameEvent>, GameError> {
        let current = self.queue.current().cloned().ok_or(GameError::EmptyPool)?;
        self.state.transition(GameLifecycle::Playing)?;
        self.state.set_paused(false);
        log::info!("Session started on '{}' by {}", current.name, current.artist);

        let mut events = vec![GameEvent::TrackChanged {
            track: current.clone(),
        }];
        spawn_food(&mut self.state, current, &mut self.rng, &mut events);
        self.dispatch(&events);
        Ok(events)
    }

    /// Run one tick and forward its side effects
    pub fn step(&mut self) -> Vec<GameEvent> {
        let events = tick(&mut self.state, &mut self.queue, &mut self.rng);
        self.dispatch(&events);
        events
    }

    /// Request a new heading; false if it would reverse the snake
    pub fn steer(&mut self, direction: Direction) -> bool {
        self.input.steer(&mut self.state, direction)
    }

    /// Flip pause while playing. Returns the new pause flag.
    pub fn toggle_pause(&mut self) -> Option<bool> {
        if self.state.lifecycle != GameLifecycle::Playing {
            return None;
        }
        let paused = !self.state.paused;
        self.state.set_paused(paused);
        if paused {
            self.playback.pause();
        } else {
            self.playback.resume();
        }
        log::info!("{}", if paused { "Paused" } else { "Resumed" });
        Some(paused)
    }

    /// GameOver -> Idle with a fresh board; the pool is kept
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.state.reset_game()?;
        self.queue.clear_history();
        log::info!("Session reset");
        Ok(())
    }

    /// The tick timer should exist exactly while this is true
    pub fn wants_timer(&self) -> bool {
        self.state.is_running()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_history(self.state.score, self.queue.history())
    }

    /// True if `url` is the cover of the track playing in a live run.
    /// Colour samples for anything else are stale.
    pub fn is_current_artwork(&self, url: &str) -> bool {
        self.state.lifecycle == GameLifecycle::Playing
            && self
                .queue
                .current()
                .and_then(|track| track.largest_artwork())
                .is_some_and(|current| current == url)
    }

    pub fn set_background(&mut self, css_color: impl Into<String>) {
        self.state.set_bg_color(css_color);
    }

    fn dispatch(&self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::TrackChanged { track } => self.playback.play(&track.uri),
                GameEvent::GameOver { score } => {
                    self.playback.pause();
                    match &self.user_id {
                        Some(user_id) => self.scores.submit(user_id, &self.summary()),
                        None => log::info!("Game over with {} points (not signed in)", score),
                    }
                }
                GameEvent::FoodSpawned { .. } | GameEvent::TrackEaten { .. } => {}
            }
        }
    }
}
