//! Snakeify entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlImageElement, KeyboardEvent, TouchEvent};

    use snakeify::assets::AssetCache;
    use snakeify::input::{Command, SwipeTracker, map_key};
    use snakeify::palette::dominant_color;
    use snakeify::platform::timer::Interval;
    use snakeify::platform::{Credentials, now_ms, playback_device_id};
    use snakeify::playback::{ConnectPlayback, EmbedPlayback, PlaybackSink};
    use snakeify::renderer::{CanvasRenderer, build_scene};
    use snakeify::scores::{HttpScoreSink, verdict};
    use snakeify::sim::{GameEvent, GameLifecycle};
    use snakeify::{Session, Settings, catalog};

    /// Side length of the offscreen canvas used for colour sampling
    const PALETTE_SAMPLE_SIZE: u32 = 64;

    /// Everything the page needs, shared between event handlers
    struct App {
        session: Session,
        settings: Settings,
        credentials: Option<Credentials>,
        assets: AssetCache<HtmlImageElement>,
        renderer: CanvasRenderer,
        swipe: SwipeTracker,
        /// Exists exactly while the session wants ticks
        timer: Option<Interval>,
        /// Cancelled timers whose callbacks may still be on the stack
        retired_timers: Vec<Interval>,
        /// (state revision, asset generation) of the last frame drawn
        last_drawn: Option<(u64, u64)>,
        status: String,
    }

    type Shared = Rc<RefCell<App>>;

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Snakeify starting...");

        let settings = Settings::load();
        let credentials = Credentials::from_location();

        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let side = snakeify::renderer::scene::board_size() as u32;
        canvas.set_width(side);
        canvas.set_height(side);
        let renderer = CanvasRenderer::new(&canvas).expect("Failed to create 2d context");

        let seed = now_ms() as u64;
        let mut session = Session::new(seed)
            .with_scores(Box::new(HttpScoreSink::new(settings.api_base_url.clone())));
        if let Some(creds) = &credentials {
            session = session.with_user(creds.user_id.clone());
        }
        log::info!("Session seeded with {}", seed);

        let status = if credentials.is_some() {
            "LOADING YOUR SONGS..."
        } else {
            "LOG IN TO PLAY"
        };

        let app = Rc::new(RefCell::new(App {
            session,
            swipe: SwipeTracker::new(settings.swipe_threshold_px),
            settings,
            credentials: credentials.clone(),
            assets: AssetCache::new(),
            renderer,
            timer: None,
            retired_timers: Vec::new(),
            last_drawn: None,
            status: status.to_string(),
        }));

        setup_keyboard(app.clone());
        setup_touch(&canvas, app.clone());
        setup_buttons(app.clone());
        setup_auto_pause(app.clone());

        if let Some(creds) = credentials {
            let app = app.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let tracks = catalog::fetch_tracks(&creds.access_token).await;
                let mut a = app.borrow_mut();
                a.status = if tracks.is_empty() {
                    "NO SAVED SONGS FOUND".to_string()
                } else {
                    "READY?".to_string()
                };
                a.session.load_tracks(tracks);
            });
        }

        request_animation_frame(app);
        log::info!("Snakeify running!");
    }

    // ------------------------------------------------------------------
    // Session control
    // ------------------------------------------------------------------

    fn start_game(app: &Shared) {
        let result = {
            let mut a = app.borrow_mut();
            let playback: Box<dyn PlaybackSink> = match (playback_device_id(), &a.credentials) {
                (Some(device), Some(creds)) => {
                    Box::new(ConnectPlayback::new(device, creds.access_token.clone()))
                }
                _ => Box::new(EmbedPlayback::new("embed-player")),
            };
            a.session.set_playback(playback);
            a.session.start()
        };

        match result {
            Ok(events) => after_events(app, &events),
            Err(e) => {
                log::warn!("Cannot start: {}", e);
                app.borrow_mut().status = "NO SONGS TO PLAY YET".to_string();
            }
        }
        reconcile_timer(app);
    }

    fn toggle_pause(app: &Shared) {
        app.borrow_mut().session.toggle_pause();
        reconcile_timer(app);
    }

    fn on_tick(app: &Shared) {
        let events = app.borrow_mut().session.step();
        after_events(app, &events);
        reconcile_timer(app);
    }

    /// Create or tear down the tick timer so it matches the session phase
    fn reconcile_timer(app: &Shared) {
        let mut a = app.borrow_mut();
        let wants = a.session.wants_timer();

        if wants && a.timer.is_none() {
            let weak: Weak<RefCell<App>> = Rc::downgrade(app);
            let period = a.settings.effective_tick_interval_ms();
            match Interval::new(period, move || {
                if let Some(app) = weak.upgrade() {
                    on_tick(&app);
                }
            }) {
                Ok(timer) => a.timer = Some(timer),
                Err(e) => log::error!("Failed to start tick timer: {:?}", e),
            }
        } else if !wants {
            if let Some(mut timer) = a.timer.take() {
                timer.cancel();
                a.retired_timers.push(timer);
            }
        }
    }

    /// Preload artwork and refresh the palette for what the sim reported
    fn after_events(app: &Shared, events: &[GameEvent]) {
        let mut palette_url = None;
        let pending = {
            let mut a = app.borrow_mut();
            for event in events {
                match event {
                    GameEvent::FoodSpawned {
                        artwork_url: Some(url),
                        ..
                    } => {
                        a.assets.request(url);
                    }
                    GameEvent::TrackChanged { track } if a.settings.adaptive_background => {
                        palette_url = track.largest_artwork().map(str::to_string);
                    }
                    _ => {}
                }
            }
            a.assets.drain_pending()
        };

        for url in pending {
            load_artwork(app, url);
        }
        if let Some(url) = palette_url {
            sample_palette(app, url);
        }
    }

    // ------------------------------------------------------------------
    // Images
    // ------------------------------------------------------------------

    fn new_image(url: &str) -> Option<HtmlImageElement> {
        let img = HtmlImageElement::new().ok()?;
        img.set_cross_origin(Some("anonymous"));
        img.set_src(url);
        Some(img)
    }

    fn load_artwork(app: &Shared, url: String) {
        let Some(img) = new_image(&url) else {
            app.borrow_mut().assets.mark_failed(&url);
            return;
        };

        let onload = {
            let app = app.clone();
            let url = url.clone();
            let img = img.clone();
            Closure::<dyn FnMut()>::new(move || {
                app.borrow_mut().assets.mark_ready(&url, img.clone());
            })
        };
        let onerror = {
            let app = app.clone();
            Closure::<dyn FnMut()>::new(move || {
                app.borrow_mut().assets.mark_failed(&url);
            })
        };
        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();
    }

    fn sample_palette(app: &Shared, url: String) {
        let Some(img) = new_image(&url) else { return };

        let onload = {
            let app = app.clone();
            let img = img.clone();
            Closure::<dyn FnMut()>::new(move || {
                if !app.borrow().session.is_current_artwork(&url) {
                    log::debug!("Dropping stale colour sample for {}", url);
                    return;
                }
                match read_pixels(&img) {
                    Ok(pixels) => {
                        if let Some(color) = dominant_color(&pixels) {
                            app.borrow_mut().session.set_background(color.to_css());
                        }
                    }
                    Err(e) => log::warn!("Colour extraction failed: {:?}", e),
                }
            })
        };
        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();
    }

    /// Draw the image small on an offscreen canvas and read back RGBA
    fn read_pixels(img: &HtmlImageElement) -> Result<Vec<u8>, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        canvas.set_width(PALETTE_SAMPLE_SIZE);
        canvas.set_height(PALETTE_SAMPLE_SIZE);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<web_sys::CanvasRenderingContext2d>()?;

        let side = PALETTE_SAMPLE_SIZE as f64;
        ctx.draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, side, side)?;
        Ok(ctx.get_image_data(0.0, 0.0, side, side)?.data().0)
    }

    // ------------------------------------------------------------------
    // Frame loop and HUD
    // ------------------------------------------------------------------

    fn request_animation_frame(app: Shared) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(app: Shared) {
        {
            let mut a = app.borrow_mut();
            a.retired_timers.clear();

            let key = (a.session.state.revision, a.assets.generation());
            if a.last_drawn != Some(key) {
                let cmds = build_scene(
                    &a.session.state,
                    &a.session.queue,
                    &a.assets,
                    a.settings.show_grid,
                );
                a.renderer.draw(&cmds, &a.assets);
                update_hud(&a);
                a.last_drawn = Some(key);
            }
        }

        request_animation_frame(app);
    }

    fn element(id: &str) -> Option<web_sys::Element> {
        web_sys::window()?.document()?.get_element_by_id(id)
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(id: &str, visible: bool) {
        if let Some(el) = element(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn update_hud(app: &App) {
        let state = &app.session.state;

        set_text("hud-score", &state.score.to_string());

        if let Some(track) = app.session.queue.current() {
            set_text("track-title", &track.name);
            set_text("track-artist", &track.artist);
            if let (Some(el), Some(url)) = (element("track-art"), track.smallest_artwork()) {
                let _ = el.set_attribute("src", url);
            }
        }

        set_text("pause-btn", if state.paused { "RESUME" } else { "PAUSE" });
        set_visible("pause-btn", state.lifecycle == GameLifecycle::Playing);
        set_visible(
            "start-btn",
            state.lifecycle == GameLifecycle::Idle && !app.session.queue.is_empty(),
        );
        set_text("status", &app.status);
        set_visible("status", state.lifecycle == GameLifecycle::Idle);

        let over = state.lifecycle == GameLifecycle::GameOver;
        set_visible("game-over", over);
        if over {
            set_text("final-score", &state.score.to_string());
            set_text("verdict", verdict(state.score));
        }

        if let Some(body) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
        {
            let _ = body.style().set_property("background-color", &state.bg_color);
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    fn setup_keyboard(app: Shared) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            match map_key(&event.key()) {
                Some(Command::Steer(direction)) => {
                    event.prevent_default();
                    app.borrow_mut().session.steer(direction);
                }
                Some(Command::TogglePause) => {
                    event.prevent_default();
                    toggle_pause(&app);
                }
                Some(Command::ToggleGrid) => {
                    let mut a = app.borrow_mut();
                    a.settings.toggle_grid();
                    a.last_drawn = None;
                }
                None => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_touch(canvas: &HtmlCanvasElement, app: Shared) {
        // Touch start - remember where the swipe began
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    app.borrow_mut()
                        .swipe
                        .begin(touch.client_x() as f64, touch.client_y() as f64);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move - keep the page from scrolling
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end - classify and steer
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                let Some(touch) = event.changed_touches().get(0) else {
                    a.swipe.cancel();
                    return;
                };
                if let Some(direction) = a
                    .swipe
                    .end(touch.client_x() as f64, touch.client_y() as f64)
                {
                    a.session.steer(direction);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(id: &str, handler: impl FnMut() + 'static) {
        let Some(btn) = element(id) else {
            log::warn!("Button #{} missing", id);
            return;
        };
        let mut handler = handler;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(app: Shared) {
        {
            let app = app.clone();
            on_click("start-btn", move || start_game(&app));
        }
        {
            let app = app.clone();
            on_click("pause-btn", move || toggle_pause(&app));
        }
        {
            let app = app.clone();
            on_click("reset-btn", move || {
                if let Err(e) = app.borrow_mut().session.reset() {
                    log::warn!("Reset refused: {}", e);
                }
                reconcile_timer(&app);
            });
        }
        on_click("quit-btn", || {
            if let Some(window) = web_sys::window() {
                let _ = window.location().reload();
            }
        });
    }

    fn setup_auto_pause(app: Shared) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let should_pause = {
                let a = app.borrow();
                a.settings.auto_pause_on_blur && a.session.state.is_running()
            };
            if should_pause {
                toggle_pause(&app);
                log::info!("Auto-paused (window blur)");
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Snakeify (native) starting...");
    log::info!("Native mode runs a headless autopilot - build for wasm32 to play in the browser");

    let settings = snakeify::Settings::load();
    let seed = snakeify::platform::now_ms() as u64;
    let session = headless::run(seed, 2_000);

    log::info!(
        "Autopilot finished after scoring {} ({:?}, {} ms ticks)",
        session.state.score,
        session.state.lifecycle,
        settings.effective_tick_interval_ms()
    );
    match serde_json::to_string_pretty(&session.summary()) {
        Ok(json) => log::info!("Session summary:\n{}", json),
        Err(e) => log::error!("Failed to encode summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Greedy autopilot used by the native build
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use snakeify::consts::GRID_SIZE;
    use snakeify::sim::{Artwork, Direction, GameLifecycle, Position, Track, wrap_position};
    use snakeify::{GameError, Session};

    const DIRECTIONS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    fn demo_pool() -> Vec<Track> {
        (1..=8)
            .map(|i| Track {
                id: format!("demo{}", i),
                name: format!("Demo Track {}", i),
                artist: "Headless Band".to_string(),
                artwork: vec![Artwork {
                    url: format!("https://example.invalid/art/{}.jpg", i),
                    width: Some(64),
                    height: Some(64),
                }],
                uri: format!("spotify:track:demo{}", i),
                preview_url: None,
            })
            .collect()
    }

    /// Shortest wrapped distance between two cells
    fn distance(a: Position, b: Position) -> i32 {
        let axis = |p: i32, q: i32| {
            let d = (p - q).abs();
            d.min(GRID_SIZE - d)
        };
        axis(a.x, b.x) + axis(a.y, b.y)
    }

    /// Safe move closest to the food, if any
    fn choose(session: &Session) -> Option<Direction> {
        let state = &session.state;
        let head = state.head();
        let target = state.food.as_ref().map(|f| f.pos).unwrap_or(head);

        DIRECTIONS
            .into_iter()
            .filter(|&d| d == state.heading || d.turns_from(state.heading))
            .map(|d| (d, wrap_position(head + d.delta())))
            .filter(|&(_, next)| !state.is_occupied(next))
            .min_by_key(|&(_, next)| distance(next, target))
            .map(|(d, _)| d)
    }

    pub fn run(seed: u64, max_ticks: u32) -> Session {
        let mut session = Session::new(seed).with_user("headless");
        session.load_tracks(demo_pool());

        if let Err(e) = session.start() {
            match e {
                GameError::EmptyPool => log::error!("No tracks to play"),
                other => log::error!("{}", other),
            }
            return session;
        }

        for _ in 0..max_ticks {
            if let Some(direction) = choose(&session) {
                if direction != session.state.direction {
                    session.steer(direction);
                }
            }
            session.step();
            if session.state.lifecycle == GameLifecycle::GameOver {
                break;
            }
        }
        session
    }

}
