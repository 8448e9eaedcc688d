//! Host-facing game session
//!
//! Owns one simulation instance plus the input state between ticks. The host
//! feeds key events, calls [`Session::tick`] once per frame and receives
//! notifications through [`GameCallbacks`]. Installing a level replaces the
//! whole world and bumps [`Session::generation`] so stale frame callbacks can
//! tell they belong to an old world.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::level::{LevelSource, ProceduralSource, default_level, load_or_default};
use crate::platform::Action;
use crate::settings::{Settings, SettingsError};
use crate::sim::{self, GameEvent, GamePhase, GameState, LevelData, TickInput};

/// Notifications from the simulation to the host UI
pub trait GameCallbacks {
    /// Points gained from a kill
    fn on_score(&mut self, _delta: u64) {}
    /// The death delay ran out; fires once per run
    fn on_game_over(&mut self) {}
    /// The player entered the open portal
    fn on_win(&mut self, _score: u64) {}
    /// Every event, including the ones above
    fn on_event(&mut self, _event: &GameEvent) {}
}

/// Callbacks that ignore everything
impl GameCallbacks for () {}

/// One frame handed to the renderer
#[derive(Serialize)]
struct Frame<'a> {
    #[serde(flatten)]
    state: &'a GameState,
    background: &'static str,
    player_colors: [&'static str; 2],
    enemy_colors: Vec<&'static str>,
}

pub struct Session {
    settings: Settings,
    state: GameState,
    held: HashSet<Action>,
    fly_latch: bool,
    rng: Pcg32,
    generation: u64,
}

impl Session {
    /// Start a session on a freshly generated level
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = GameState::new(default_level(settings.biome, &mut rng), &settings, seed);
        let mut session = Self {
            settings,
            state,
            held: HashSet::new(),
            fly_latch: false,
            rng,
            generation: 0,
        };
        session.install_from(&mut ProceduralSource);
        session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Change settings and regenerate the level
    pub fn set_settings(&mut self, settings: Settings) -> Result<(), SettingsError> {
        settings.validate()?;
        self.settings = settings;
        self.install_from(&mut ProceduralSource);
        Ok(())
    }

    /// Install a level from raw rows (falls back to the default level)
    pub fn install_rows<S: AsRef<str>>(&mut self, rows: &[S]) {
        let level = load_or_default(rows, self.settings.biome, &mut self.rng);
        self.install(level);
    }

    /// Install a level from a source (falls back to the default level)
    pub fn install_from(&mut self, source: &mut dyn LevelSource) {
        match source.rows(&self.settings, &mut self.rng) {
            Ok(rows) => self.install_rows(&rows),
            Err(err) => {
                log::warn!("Level source '{}' failed: {err}; using default level", source.name());
                let level = default_level(self.settings.biome, &mut self.rng);
                self.install(level);
            }
        }
    }

    fn install(&mut self, level: LevelData) {
        log::info!(
            "Installing {} level: {} blocks, {} enemies, {:.0}px wide",
            self.settings.biome.as_str(),
            level.blocks.len(),
            level.enemies.len(),
            level.map_width
        );
        let seed = self.rng.random();
        self.state = GameState::new(level, &self.settings, seed);
        self.fly_latch = false;
        self.generation += 1;
    }

    /// Incremented on every level install
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key_down(&mut self, action: Action) {
        if action == Action::ToggleFly {
            // Key repeat must not toggle again
            if self.held.insert(action) {
                self.fly_latch = true;
            }
            return;
        }
        self.held.insert(action);
    }

    pub fn key_up(&mut self, action: Action) {
        self.held.remove(&action);
    }

    /// Snapshot of the held keys for the next tick
    pub fn input(&self) -> TickInput {
        let held = |a| self.held.contains(&a);
        TickInput {
            left: held(Action::Left),
            right: held(Action::Right),
            up: held(Action::Up),
            down: held(Action::Down),
            jump: held(Action::Jump),
            attack: held(Action::Attack),
            dig: held(Action::Dig),
            toggle_fly: self.fly_latch,
        }
    }

    /// Advance one frame and dispatch the resulting events
    pub fn tick(&mut self, callbacks: &mut impl GameCallbacks) {
        let input = self.input();
        self.fly_latch = false;
        sim::tick(&mut self.state, &input);

        for event in self.state.drain_events() {
            match event {
                GameEvent::ScoreDelta(delta) => callbacks.on_score(delta),
                GameEvent::GameOver => callbacks.on_game_over(),
                GameEvent::Win { score } => callbacks.on_win(score),
                _ => {}
            }
            callbacks.on_event(&event);
        }
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// False once the run has ended; the host stops scheduling frames
    pub fn is_running(&self) -> bool {
        !matches!(self.state.phase, GamePhase::GameOver | GamePhase::Won)
    }

    /// Render state for a JS-side renderer
    ///
    /// The game state plus the cosmetic draw data that isn't part of the
    /// simulation: sky colour, the character's palette and one colour per
    /// enemy in `level.enemies` order.
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        let (body, legs) = self.settings.character.colors();
        let frame = Frame {
            state: &self.state,
            background: self.settings.biome.background(),
            player_colors: [body, legs],
            enemy_colors: self.state.level.enemies.iter().map(|e| e.config().color).collect(),
        };
        serde_json::to_string(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{LevelSourceError, StaticSource};
    use crate::settings::{Biome, Character, Difficulty};

    #[derive(Default)]
    struct Recorder {
        scores: Vec<u64>,
        game_overs: u32,
        wins: Vec<u64>,
        events: usize,
    }

    impl GameCallbacks for Recorder {
        fn on_score(&mut self, delta: u64) {
            self.scores.push(delta);
        }
        fn on_game_over(&mut self) {
            self.game_overs += 1;
        }
        fn on_win(&mut self, score: u64) {
            self.wins.push(score);
        }
        fn on_event(&mut self, _event: &GameEvent) {
            self.events += 1;
        }
    }

    struct FailingSource;

    impl LevelSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        fn rows(&mut self, _: &Settings, _: &mut Pcg32) -> Result<Vec<String>, LevelSourceError> {
            Err(LevelSourceError::Unavailable("offline".into()))
        }
    }

    #[test]
    fn test_new_session_generates_level() {
        let settings = Settings::new(Difficulty::Easy, Biome::Plains, Character::Alex);
        let session = Session::new(settings, 1);
        assert_eq!(session.generation(), 1);
        assert_eq!(session.state().level.map_width, 150.0 * crate::consts::TILE_SIZE);
        assert_eq!(session.state().player.max_health, 20);
        assert!(session.is_running());
    }

    #[test]
    fn test_failing_source_installs_default() {
        let mut session = Session::new(Settings::default(), 2);
        session.install_from(&mut FailingSource);
        assert_eq!(session.generation(), 2);
        assert_eq!(session.state().level.map_width, 80.0 * crate::consts::TILE_SIZE);
    }

    #[test]
    fn test_garbage_rows_install_default() {
        let mut session = Session::new(Settings::default(), 3);
        session.install_rows(&["nonsense"]);
        assert_eq!(session.state().level.map_width, 80.0 * crate::consts::TILE_SIZE);
        session.install_from(&mut StaticSource::new("no level here"));
        assert_eq!(session.state().level.map_width, 80.0 * crate::consts::TILE_SIZE);
    }

    #[test]
    fn test_fly_toggle_latches_once() {
        let mut session = Session::new(Settings::default(), 4);
        session.key_down(Action::ToggleFly);
        session.key_down(Action::ToggleFly);
        session.tick(&mut ());
        assert!(session.state().player.flying);
        session.tick(&mut ());
        assert!(session.state().player.flying);
        session.key_up(Action::ToggleFly);
        session.key_down(Action::ToggleFly);
        session.tick(&mut ());
        assert!(!session.state().player.flying);
    }

    #[test]
    fn test_held_keys_map_to_input() {
        let mut session = Session::new(Settings::default(), 5);
        session.key_down(Action::Right);
        session.key_down(Action::Attack);
        let input = session.input();
        assert!(input.right && input.attack && !input.left);
        session.key_up(Action::Right);
        assert!(!session.input().right);
    }

    #[test]
    fn test_game_over_callback_fires_once() {
        let mut session = Session::new(Settings::default(), 6);
        session.state_mut().player.pos.y = 2000.0;
        let mut recorder = Recorder::default();
        let mut ticks = 0;
        while session.is_running() && ticks < 500 {
            session.tick(&mut recorder);
            ticks += 1;
        }
        assert!(!session.is_running());
        assert_eq!(recorder.game_overs, 1);
        assert!(recorder.wins.is_empty());
        assert!(recorder.events > 0);
    }

    #[test]
    fn test_score_callbacks() {
        let mut session = Session::new(Settings::default(), 7);
        session.state_mut().add_score(100);
        let mut recorder = Recorder::default();
        session.tick(&mut recorder);
        assert_eq!(recorder.scores.first(), Some(&100));
        assert_eq!(session.score(), recorder.scores.iter().sum::<u64>());
    }

    #[test]
    fn test_snapshot_json() {
        let session = Session::new(Settings::default(), 8);
        let json = session.snapshot_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["level"]["blocks"].is_array());
        assert_eq!(value["phase"], "Playing");
    }

    #[test]
    fn test_snapshot_carries_draw_colors() {
        let settings = Settings::new(Difficulty::Normal, Biome::Nether, Character::Creeper);
        let session = Session::new(settings, 10);
        let value: serde_json::Value = serde_json::from_str(&session.snapshot_json().unwrap()).unwrap();
        assert_eq!(value["background"], Biome::Nether.background());
        assert_eq!(value["player_colors"][0], Character::Creeper.colors().0);
        assert_eq!(value["player_colors"][1], Character::Creeper.colors().1);

        let enemies = &session.state().level.enemies;
        let colors = value["enemy_colors"].as_array().unwrap();
        assert_eq!(colors.len(), enemies.len());
        for (enemy, color) in enemies.iter().zip(colors) {
            assert_eq!(color, enemy.config().color);
        }
    }

    #[test]
    fn test_set_settings_validates() {
        let mut session = Session::new(Settings::default(), 9);
        assert!(session.set_settings(Settings::default().with_length(0)).is_err());
        assert_eq!(session.generation(), 1);
        session
            .set_settings(Settings::new(Difficulty::Hard, Biome::Nether, Character::Blaze))
            .unwrap();
        assert_eq!(session.generation(), 2);
        assert_eq!(session.state().player.max_health, 5);
    }
}
