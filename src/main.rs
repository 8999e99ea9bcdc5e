//! Postman Panic entry point
//!
//! Web: wires DOM input to a session and mirrors its snapshot into the page.
//! Native: plays a headless game with a simple autopilot and logs the run.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, KeyboardEvent, MouseEvent};

    use postman_panic::audio::{AudioManager, MusicPlayer};
    use postman_panic::consts::MAX_FRAME_MS;
    use postman_panic::input::{button_name, direction_for_button, direction_for_key};
    use postman_panic::sim::{GameStatus, Position, Snapshot};
    use postman_panic::{Ruleset, Session, Settings, Tuning};

    const MUSIC_SRC: &str = "/Speedy Delivery.mp3";

    /// Game instance holding all state
    struct Game {
        session: Session<AudioManager>,
        music: MusicPlayer,
        settings: Settings,
        last_time: f64,
        /// Sub-millisecond remainder carried between frames
        carry_ms: f64,
        last_status: GameStatus,
    }

    impl Game {
        fn new(settings: Settings, seed: u64) -> Self {
            let tuning = Tuning::for_ruleset(settings.ruleset);
            let mut audio = AudioManager::new();
            audio.apply(&settings);
            let music = MusicPlayer::new(MUSIC_SRC, &settings);
            Self {
                session: Session::new(tuning, seed, audio),
                music,
                settings,
                last_time: 0.0,
                carry_ms: 0.0,
                last_status: GameStatus::Idle,
            }
        }

        /// Feed elapsed frame time to the session
        fn update(&mut self, time: f64) {
            let elapsed = if self.last_time > 0.0 {
                (time - self.last_time).clamp(0.0, MAX_FRAME_MS)
            } else {
                0.0
            };
            self.last_time = time;

            self.carry_ms += elapsed;
            let whole = self.carry_ms.floor();
            self.carry_ms -= whole;

            for event in self.session.advance(whole as u64) {
                log::debug!("{:?}", event);
            }
            self.sync_music();
        }

        /// Music plays only while the game does
        fn sync_music(&mut self) {
            let status = self.session.status();
            if status != self.last_status {
                self.music.set_playing(status == GameStatus::Playing);
                self.last_status = status;
            }
        }

        fn toggle_mute(&mut self) {
            self.settings.toggle_mute();
            self.session.audio_mut().apply(&self.settings);
            self.music.apply(&self.settings);
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Position a sprite element in field units
    fn place(document: &Document, id: &str, pos: Position, class: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute(
                "style",
                &format!("left: {:.1}px; top: {:.1}px;", pos.x, pos.y),
            );
            let _ = el.set_attribute("class", class);
        }
    }

    /// Mirror the snapshot into the page
    fn render(document: &Document, snap: &Snapshot, settings: &Settings) {
        set_text(document, "#hud-score .hud-value", &snap.state.score.to_string());
        set_text(document, "#hud-lives .hud-value", &snap.state.lives.to_string());
        set_text(document, "#hud-level .hud-value", &snap.state.level.to_string());

        match &snap.objective {
            Some(line) => {
                set_text(document, "#objective", line);
                set_visible(document, "objective", true);
            }
            None => set_visible(document, "objective", false),
        }

        set_visible(document, "start-screen", snap.state.status == GameStatus::Idle);
        set_visible(document, "game-over", snap.state.status == GameStatus::GameOver);
        if snap.state.status == GameStatus::GameOver {
            set_text(document, "#final-score", &snap.state.score.to_string());
        }
        set_text(document, "#mute-btn", if settings.muted { "🔇" } else { "🔊" });

        let mut player_class = format!("sprite player facing-{}", button_name(snap.player.facing));
        if snap.player.invulnerable {
            player_class.push_str(" invulnerable");
        }
        place(document, "player", snap.player.pos, &player_class);
        place(document, "post-office", snap.post_office, "sprite post-office");

        for parcel in &snap.parcels {
            let class = if parcel.collected {
                "sprite parcel hidden"
            } else if snap.nearby_parcels.contains(&parcel.id) {
                "sprite parcel nearby"
            } else {
                "sprite parcel"
            };
            place(document, &format!("parcel-{}", parcel.id), parcel.pos, class);
        }
        for obstacle in &snap.obstacles {
            let class = format!("sprite obstacle {:?}", obstacle.kind).to_lowercase();
            place(document, &format!("obstacle-{}", obstacle.id), obstacle.pos, &class);
        }
    }

    /// `?ruleset=classic` selects the alternate balance
    fn settings_from_location(window: &web_sys::Window) -> Settings {
        let mut settings = Settings::default();
        let search = window.location().search().unwrap_or_default();
        let requested = search
            .trim_start_matches('?')
            .split('&')
            .find_map(|kv| kv.strip_prefix("ruleset="));
        if let Some(name) = requested {
            match name.parse::<Ruleset>() {
                Ok(ruleset) => settings.ruleset = ruleset,
                Err(e) => log::warn!("{}, using {}", e, settings.ruleset.as_str()),
            }
        }
        settings
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Postman Panic starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let settings = settings_from_location(&window);
        let seed = js_sys::Date::now() as u64;
        log::info!(
            "Session seeded with {} ({} rules)",
            seed,
            settings.ruleset.as_str()
        );
        let game = Rc::new(RefCell::new(Game::new(settings, seed)));

        {
            let g = game.borrow();
            render(&document, &g.session.snapshot(), &g.settings);
        }

        setup_keyboard(&window, game.clone())?;
        setup_dpad(&document, game.clone())?;
        setup_buttons(&document, game.clone())?;

        request_animation_frame(game);

        log::info!("Postman Panic running!");
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if let Some(direction) = direction_for_key(&event.key()) {
                event.prevent_default();
                game.borrow_mut().session.steer(direction);
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// One listener on the pad; buttons carry `data-direction`
    fn setup_dpad(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let Some(pad) = document.get_element_by_id("dpad") else {
            return Ok(());
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let direction = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-direction]").ok().flatten())
                .and_then(|el| el.get_attribute("data-direction"))
                .and_then(|name| direction_for_button(&name));
            if let Some(direction) = direction {
                game.borrow_mut().session.steer(direction);
            }
        });
        pad.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn on_click(
        document: &Document,
        id: &str,
        game: Rc<RefCell<Game>>,
        action: fn(&mut Game),
    ) -> Result<(), JsValue> {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("#{} not found", id);
            return Ok(());
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            action(&mut game.borrow_mut());
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        on_click(document, "start-btn", game.clone(), |g| {
            // First user gesture: audio may start now
            g.session.audio().resume();
            g.session.start();
            g.sync_music();
        })?;
        on_click(document, "restart-btn", game.clone(), |g| {
            g.session.restart();
            g.sync_music();
        })?;
        on_click(document, "mute-btn", game, Game::toggle_mute)?;
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                render(&document, &g.session.snapshot(), &g.settings);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match headless::Options::from_args(&args) {
        Ok(options) => headless::run(options),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("usage: postman-panic [--ruleset magnetic|classic] [--tuning FILE] [--seed N] [--seconds N]");
            std::process::exit(2);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use postman_panic::audio::LogSink;
    use postman_panic::sim::{Direction, GameEvent, GameStatus, Snapshot};
    use postman_panic::{ConfigError, Ruleset, Session, Tuning};

    pub struct Options {
        tuning: Tuning,
        seed: u64,
        seconds: u64,
    }

    fn value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    fn number(args: &[String], flag: &'static str, default: u64) -> Result<u64, ConfigError> {
        value(args, flag).map_or(Ok(default), |v| {
            v.parse().map_err(|_| ConfigError::Invalid {
                field: flag,
                reason: "must be a whole number",
            })
        })
    }

    impl Options {
        pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
            let ruleset = value(args, "--ruleset")
                .map(str::parse::<Ruleset>)
                .transpose()?
                .unwrap_or_default();

            let tuning = match value(args, "--tuning") {
                Some(path) => {
                    let json = std::fs::read_to_string(path).map_err(|_| ConfigError::Invalid {
                        field: "--tuning",
                        reason: "file could not be read",
                    })?;
                    Tuning::from_json(&json)?
                }
                None => Tuning::for_ruleset(ruleset),
            };

            Ok(Self {
                tuning,
                seed: number(args, "--seed", 1)?,
                seconds: number(args, "--seconds", 60)?,
            })
        }
    }

    /// Head for the nearest parcel, or the post office once all are in
    fn autopilot(snap: &Snapshot) -> Direction {
        let here = snap.player.pos;
        let target = if snap.all_collected {
            snap.post_office
        } else {
            snap.parcels
                .iter()
                .filter(|p| !p.collected)
                .map(|p| p.pos)
                .min_by(|a, b| a.distance(here).total_cmp(&b.distance(here)))
                .unwrap_or(snap.post_office)
        };

        let offset = target - here;
        if offset.x.abs() > offset.y.abs() {
            if offset.x > 0.0 { Direction::Right } else { Direction::Left }
        } else if offset.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    pub fn run(options: Options) {
        log::info!("Postman Panic (native) starting...");
        log::info!("Native mode plays headless with an autopilot - serve the wasm build to play");

        let period = options.tuning.tick_period_ms;
        let mut session = Session::new(options.tuning, options.seed, LogSink);
        session.start();

        let end_ms = options.seconds * 1000;
        while session.now_ms() < end_ms && session.status() == GameStatus::Playing {
            let direction = autopilot(&session.snapshot());
            session.steer(direction);
            for event in session.advance(period) {
                match event {
                    GameEvent::Delivered { level, score } => {
                        log::info!("Reached level {} with {} points", level, score)
                    }
                    GameEvent::ObstacleHit { lives, .. } => log::info!("Ouch! {} lives left", lives),
                    other => log::debug!("{:?}", other),
                }
            }
        }

        let state = session.world().state;
        println!(
            "Finished after {:.1}s: {:?}, level {}, score {}, lives {}",
            session.now_ms() as f64 / 1000.0,
            state.status,
            state.level,
            state.score,
            state.lives
        );
    }
}
