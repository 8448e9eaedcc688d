//! Craft Runner entry point
//!
//! On the web: wires keyboard events into a [`Session`], drives it from
//! `requestAnimationFrame` and hands each frame's state to the page's
//! renderer. Natively: runs a headless scripted playthrough of a generated
//! level and logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use craft_runner::consts::*;
    use craft_runner::level::{ProceduralSource, StaticSource};
    use craft_runner::platform::action_for_code;
    use craft_runner::sim::{GameEvent, SoundCue};
    use craft_runner::{GameCallbacks, Session, Settings};

    // Page hooks: the renderer, audio and optional host-provided config
    #[wasm_bindgen(inline_js = "
        export function render_frame(json) {
            if (window.craftRender) window.craftRender(JSON.parse(json));
        }

        export function play_sfx(name) {
            if (window.craftSound) window.craftSound(name);
        }

        export function host_settings() {
            return window.craftSettings ? JSON.stringify(window.craftSettings) : undefined;
        }

        export function host_level_text() {
            const text = window.craftLevelText;
            window.craftLevelText = undefined;
            return text;
        }
    ")]
    extern "C" {
        fn render_frame(json: &str);
        fn play_sfx(name: &str);
        fn host_settings() -> Option<String>;
        fn host_level_text() -> Option<String>;
    }

    /// Forwards simulation events to the page
    struct PageCallbacks;

    impl GameCallbacks for PageCallbacks {
        fn on_score(&mut self, delta: u64) {
            log::debug!("+{delta}");
        }

        fn on_game_over(&mut self) {
            log::info!("Game over");
            show("game-over");
        }

        fn on_win(&mut self, score: u64) {
            log::info!("Victory with score {score}");
            set_text("#win-score", &score.to_string());
            show("win");
        }

        fn on_event(&mut self, event: &GameEvent) {
            match event {
                GameEvent::Sound(cue) => play_sfx(sound_name(*cue)),
                GameEvent::BossEncounter => show("hud-boss"),
                _ => {}
            }
        }
    }

    fn sound_name(cue: SoundCue) -> &'static str {
        match cue {
            SoundCue::Jump => "JUMP",
            SoundCue::Shoot => "SHOOT",
            SoundCue::Dig => "DIG",
            SoundCue::Hurt => "HURT",
            SoundCue::Explode => "EXPLODE",
            SoundCue::Win => "WIN",
        }
    }

    fn show(id: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            let _ = el.set_attribute("class", "");
        }
    }

    fn hide(id: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            let _ = el.set_attribute("class", "hidden");
        }
    }

    fn set_text(selector: &str, text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.query_selector(selector).ok().flatten())
        {
            el.set_text_content(Some(text));
        }
    }

    /// Game instance holding the session and frame timing
    struct Game {
        session: Session,
        accumulator: f32,
        last_time: f64,
        callbacks: PageCallbacks,
    }

    impl Game {
        fn new(settings: Settings, seed: u64) -> Self {
            let mut session = Session::new(settings, seed);
            if let Some(text) = host_level_text() {
                session.install_from(&mut StaticSource::new(text));
            }
            Self {
                session,
                accumulator: 0.0,
                last_time: 0.0,
                callbacks: PageCallbacks,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.session.tick(&mut self.callbacks);
                self.accumulator -= SIM_DT;
                substeps += 1;
                if !self.session.is_running() {
                    break;
                }
            }
        }

        fn render(&self) {
            match self.session.snapshot_json() {
                Ok(json) => render_frame(&json),
                Err(e) => log::warn!("Snapshot failed: {e}"),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let state = self.session.state();
            set_text("#hud-score .hud-value", &state.score.to_string());
            set_text(
                "#hud-health .hud-value",
                &format!("{}/{}", state.player.health.max(0), state.player.max_health),
            );
            set_text("#hud-fly .hud-value", if state.player.flying { "ON" } else { "OFF" });
            if let Some(boss) = state.level.live_boss() {
                set_text("#hud-boss .hud-value", &format!("{}/{}", boss.hp, boss.max_hp));
            } else if !state.boss_active {
                hide("hud-boss");
            }
        }

        /// Throw away the current world and start a new generated level
        fn restart(&mut self) {
            self.session.install_from(&mut ProceduralSource);
            self.accumulator = 0.0;
            self.last_time = 0.0;
            hide("game-over");
            hide("win");
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("logger init failed: {e}").into());
        }

        log::info!("Craft Runner starting...");

        let settings = match host_settings().map(|json| Settings::from_json(&json)) {
            Some(Ok(settings)) => settings,
            Some(Err(e)) => {
                log::warn!("Ignoring host settings: {e}");
                Settings::default()
            }
            None => Settings::default(),
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(settings, seed)));
        log::info!("Game initialized with seed: {}", seed);

        hide("loading");
        show("hud");

        setup_input_handlers(game.clone());

        let generation = game.borrow().session.generation();
        request_animation_frame(game, generation);
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let code = event.code();
                if code == "KeyR" {
                    let finished = !game.borrow().session.is_running();
                    if finished {
                        game.borrow_mut().restart();
                        let generation = game.borrow().session.generation();
                        request_animation_frame(game.clone(), generation);
                    }
                    return;
                }
                if let Some(action) = action_for_code(&code) {
                    event.prevent_default();
                    game.borrow_mut().session.key_down(action);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(action) = action_for_code(&event.code()) {
                    game.borrow_mut().session.key_up(action);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, generation: u64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, generation, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, generation: u64, time: f64) {
        {
            let mut g = game.borrow_mut();

            // A level install since this frame was scheduled owns the loop now
            if g.session.generation() != generation {
                return;
            }

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();

            if !g.session.is_running() {
                log::info!("Run finished, press R for a new level");
                return;
            }
        }

        request_animation_frame(game, generation);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Craft Runner (native) starting...");

    match headless::run(std::env::args().skip(1).collect()) {
        Ok(outcome) => println!("{outcome}"),
        Err(e) => {
            log::error!("{e}");
            eprintln!("usage: craft-runner [difficulty] [biome] [length] [seed]");
            std::process::exit(2);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless playthrough with a scripted player
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use craft_runner::sim::{GameEvent, GamePhase};
    use craft_runner::{Action, Biome, Difficulty, GameCallbacks, Session, Settings};

    /// Two minutes of play at 60 ticks per second
    const MAX_TICKS: u32 = 60 * 120;

    #[derive(Default)]
    struct Tally {
        kills: u32,
        blocks_removed: u32,
        boss_seen: bool,
    }

    impl GameCallbacks for Tally {
        fn on_score(&mut self, delta: u64) {
            self.kills += 1;
            log::debug!("Kill worth {delta}");
        }

        fn on_event(&mut self, event: &GameEvent) {
            match event {
                GameEvent::BlockRemoved { .. } => self.blocks_removed += 1,
                GameEvent::BossEncounter => {
                    self.boss_seen = true;
                    log::info!("Boss encountered");
                }
                _ => {}
            }
        }
    }

    fn parse_args(args: &[String]) -> Result<(Settings, u64), String> {
        let mut settings = Settings::default();
        if let Some(name) = args.first() {
            settings.difficulty =
                Difficulty::from_name(name).ok_or_else(|| format!("unknown difficulty '{name}'"))?;
        }
        if let Some(name) = args.get(1) {
            settings.biome = Biome::from_name(name).ok_or_else(|| format!("unknown biome '{name}'"))?;
        }
        if let Some(len) = args.get(2) {
            settings.length_multiplier = len.parse().map_err(|e| format!("bad length '{len}': {e}"))?;
        }
        settings.validate().map_err(|e| e.to_string())?;
        let seed = match args.get(3) {
            Some(s) => s.parse().map_err(|e| format!("bad seed '{s}': {e}"))?,
            None => 1,
        };
        Ok((settings, seed))
    }

    pub fn run(args: Vec<String>) -> Result<String, String> {
        let (settings, seed) = parse_args(&args)?;
        log::info!(
            "Headless run: {} {} x{} seed {}",
            settings.difficulty.as_str(),
            settings.biome.as_str(),
            settings.length_multiplier,
            seed
        );

        let mut session = Session::new(settings, seed);
        let mut tally = Tally::default();
        session.key_down(Action::Right);
        session.key_down(Action::ToggleFly);

        let mut ticks = 0;
        while session.is_running() && ticks < MAX_TICKS {
            // Shoot in bursts, fly over pits and lava
            if ticks % 20 == 0 {
                session.key_down(Action::Attack);
            } else if ticks % 20 == 10 {
                session.key_up(Action::Attack);
            }
            if session.state().player.pos.y > 200.0 {
                session.key_down(Action::Up);
            } else {
                session.key_up(Action::Up);
            }
            session.tick(&mut tally);
            ticks += 1;
        }

        let state = session.state();
        let result = match state.phase {
            GamePhase::Won => "won",
            GamePhase::GameOver | GamePhase::Dying { .. } => "died",
            GamePhase::Playing => "timed out",
        };
        Ok(format!(
            "{result} after {ticks} ticks: score {}, {} kills, {} blocks removed, boss {}, reached x={:.0}/{:.0}",
            state.score,
            tally.kills,
            tally.blocks_removed,
            if tally.boss_seen { "seen" } else { "not seen" },
            state.player.pos.x,
            state.level.map_width
        ))
    }

}
