/// MenuController: the main-menu state machine.
///
/// Sole writer of `MenuState`. Input handlers and `on_tick` are called
/// synchronously from the game loop, never concurrently.
///
/// ## Screen phases
///
///   Active ──(idle timeout | confirm)──▶ Transitioning
///
/// `Transitioning` is terminal for this instance. The idle counter stops
/// there; input handlers keep working. Leaving it means building a new
/// controller (screen re-entry), which starts from fresh defaults.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::domain::debounce::{Direction, RepeatGuard};
use crate::domain::entry::{MenuEntries, MenuEntry, SceneId};
use crate::domain::state::{MenuState, PointerActivity, ScreenPhase};
use crate::error::{MenuError, MenuResult};
use crate::sim::router::{SceneRouter, TransitionMode};
use crate::sim::surface::{Icon, PresentationSurface};

/// Everything the menu needs at construction.
#[derive(Clone, Debug)]
pub struct MenuSettings {
    /// `(display name, target scene)` in board order.
    pub entries: Vec<(String, String)>,
    pub music_enabled: bool,
    /// Idle transition fires once `idle_ticks` exceeds this.
    pub idle_timeout_ticks: u32,
    pub debounce: Duration,
    /// Cursor offset per menu row, in surface units.
    pub cursor_step: i32,
    pub music_volume: f32,
    pub idle_scene: String,
    pub menu_track: String,
}

pub const DEFAULT_GAMES: [&str; 8] = [
    "Pong",
    "Tank Battle",
    "Pac Man",
    "Asteroids",
    "Missle Command",
    "Legend of Zelda",
    "Tetris",
    "AI Game 1",
];

impl Default for MenuSettings {
    fn default() -> Self {
        MenuSettings {
            entries: DEFAULT_GAMES
                .iter()
                .map(|g| (g.to_string(), g.to_string()))
                .collect(),
            music_enabled: true,
            idle_timeout_ticks: 1000,
            debounce: Duration::from_millis(250),
            cursor_step: 2,
            music_volume: 0.6,
            idle_scene: "LeaderBoard".into(),
            menu_track: "Main_Menu".into(),
        }
    }
}

pub struct MenuController<P, R> {
    entries: MenuEntries,
    state: MenuState,
    repeat: RepeatGuard,
    idle_timeout: u32,
    cursor_step: i32,
    music_volume: f32,
    idle_scene: SceneId,
    menu_track: String,
    track_started: bool,
    surface: P,
    router: R,
}

impl<P: PresentationSurface, R: SceneRouter> MenuController<P, R> {
    /// Enter the menu screen.
    ///
    /// Fails only on configuration the screen cannot be built from.
    /// Syncs the audio icons to the initial music flag and, if music is on,
    /// starts the menu track.
    pub fn new(settings: &MenuSettings, surface: P, router: R) -> MenuResult<Self> {
        let entries = MenuEntries::new(settings.entries.iter().cloned())?;
        if !(0.0..=1.0).contains(&settings.music_volume) {
            return Err(MenuError::VolumeOutOfRange(settings.music_volume));
        }
        if settings.cursor_step < 1 {
            return Err(MenuError::InvalidCursorStep(settings.cursor_step));
        }

        let mut ctl = MenuController {
            entries,
            state: MenuState::new(settings.music_enabled),
            repeat: RepeatGuard::new(settings.debounce),
            idle_timeout: settings.idle_timeout_ticks,
            cursor_step: settings.cursor_step,
            music_volume: settings.music_volume,
            idle_scene: SceneId::new(settings.idle_scene.as_str()),
            menu_track: settings.menu_track.clone(),
            track_started: false,
            surface,
            router,
        };
        ctl.apply_music_state();
        info!(entries = ctl.entries.len(), music = ctl.state.music_enabled, "menu entered");
        Ok(ctl)
    }

    // ── Game loop ──

    /// One fixed game-loop step.
    pub fn on_tick(&mut self) {
        if self.state.phase == ScreenPhase::Transitioning {
            return;
        }

        self.state.idle_ticks += 1;
        if self.state.idle_ticks > self.idle_timeout {
            info!(ticks = self.state.idle_ticks, scene = %self.idle_scene, "idle timeout");
            self.router.route(&self.idle_scene, TransitionMode::Immediate);
            self.state.reset_idle();
            self.state.splash_pending = false;
            self.state.phase = ScreenPhase::Transitioning;
        }
    }

    // ── Input ──

    /// Raw directional signal at `now`. Returns whether it passed the
    /// repeat guard. Accepted input at a boundary still resets idle time.
    pub fn on_directional_input(&mut self, dir: Direction, now: Instant) -> bool {
        if !self.repeat.admit(dir, now) {
            return false;
        }
        self.state.reset_idle();

        let moved = match dir {
            Direction::Up if self.state.selected > 0 => {
                self.state.selected -= 1;
                self.surface.move_cursor_by(-self.cursor_step);
                true
            }
            Direction::Down if self.state.selected < self.entries.last_index() => {
                self.state.selected += 1;
                self.surface.move_cursor_by(self.cursor_step);
                true
            }
            _ => false,
        };

        if moved {
            debug!(?dir, selected = self.state.selected, "cursor moved");
        }
        true
    }

    /// Request the selected entry's scene. Every call issues a request;
    /// the router decides what to do with duplicates.
    pub fn on_confirm(&mut self) {
        self.state.reset_idle();
        let target = self.selected_entry().target.clone();
        info!(scene = %target, "entry confirmed");
        self.router.route(&target, TransitionMode::Queued);
        self.state.phase = ScreenPhase::Transitioning;
    }

    pub fn on_pointer_activity(&mut self, kind: PointerActivity) {
        self.state.reset_idle();
        self.state.splash_pending = false;
        if kind == PointerActivity::Press {
            self.toggle_music();
        }
    }

    /// Dedicated mute key or button: counts as player input.
    pub fn on_mute_input(&mut self) {
        self.state.reset_idle();
        self.toggle_music();
    }

    pub fn toggle_music(&mut self) {
        self.state.music_enabled = !self.state.music_enabled;
        info!(enabled = self.state.music_enabled, "music toggled");
        self.apply_music_state();
    }

    // ── Accessors ──

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn entries(&self) -> &MenuEntries {
        &self.entries
    }

    pub fn selected_entry(&self) -> &MenuEntry {
        self.entries.get(self.state.selected)
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    pub fn router_mut(&mut self) -> &mut R {
        &mut self.router
    }

    // ── Internal ──

    /// Volume and icons always follow `music_enabled` as a pair.
    fn apply_music_state(&mut self) {
        if self.state.music_enabled {
            if !self.track_started {
                self.surface.play_looped_track(&self.menu_track);
                self.track_started = true;
            }
            self.surface.set_audio_volume(self.music_volume);
            self.surface.set_icon_visible(Icon::AudioOn, true);
            self.surface.set_icon_visible(Icon::Muted, false);
        } else {
            self.surface.set_audio_volume(0.0);
            self.surface.set_icon_visible(Icon::Muted, true);
            self.surface.set_icon_visible(Icon::AudioOn, false);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Clone, Debug, PartialEq)]
    enum Cmd {
        MoveCursor(i32),
        Icon(Icon, bool),
        Volume(f32),
        Play(String),
    }

    /// Records every command and tracks the resulting surface state.
    #[derive(Debug, Default)]
    struct RecordingSurface {
        log: Vec<Cmd>,
        cursor: i32,
        volume: f32,
        audio_icon: bool,
        muted_icon: bool,
    }

    impl RecordingSurface {
        fn moves(&self) -> Vec<i32> {
            self.log
                .iter()
                .filter_map(|c| match c {
                    Cmd::MoveCursor(d) => Some(*d),
                    _ => None,
                })
                .collect()
        }
    }

    impl PresentationSurface for RecordingSurface {
        fn move_cursor_by(&mut self, delta: i32) {
            self.cursor += delta;
            self.log.push(Cmd::MoveCursor(delta));
        }
        fn set_icon_visible(&mut self, icon: Icon, visible: bool) {
            match icon {
                Icon::AudioOn => self.audio_icon = visible,
                Icon::Muted => self.muted_icon = visible,
            }
            self.log.push(Cmd::Icon(icon, visible));
        }
        fn set_audio_volume(&mut self, level: f32) {
            self.volume = level;
            self.log.push(Cmd::Volume(level));
        }
        fn play_looped_track(&mut self, track: &str) {
            self.log.push(Cmd::Play(track.to_string()));
        }
    }

    #[derive(Debug, Default)]
    struct RecordingRouter {
        requests: Vec<(String, TransitionMode)>,
    }

    impl SceneRouter for RecordingRouter {
        fn route(&mut self, scene: &SceneId, mode: TransitionMode) {
            self.requests.push((scene.as_str().to_string(), mode));
        }
    }

    type TestMenu = MenuController<RecordingSurface, RecordingRouter>;

    fn settings(n: usize) -> MenuSettings {
        MenuSettings {
            entries: (0..n).map(|i| (format!("Game {i}"), format!("scene{i}"))).collect(),
            ..MenuSettings::default()
        }
    }

    fn menu(s: &MenuSettings) -> TestMenu {
        MenuController::new(s, RecordingSurface::default(), RecordingRouter::default()).unwrap()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Feed `dirs` spaced far enough apart to always pass the repeat guard.
    fn press_all(m: &mut TestMenu, t0: Instant, dirs: &[Direction]) {
        for (i, d) in dirs.iter().enumerate() {
            assert!(m.on_directional_input(*d, t0 + ms(300 * i as u64)));
        }
    }

    // ── Construction ──

    #[test]
    fn empty_menu_is_invalid_configuration() {
        let s = settings(0);
        let err = TestMenu::new(&s, RecordingSurface::default(), RecordingRouter::default())
            .err()
            .unwrap();
        assert_eq!(err, MenuError::EmptyMenu);
    }

    #[test]
    fn volume_outside_unit_range_is_rejected() {
        let s = MenuSettings { music_volume: 1.5, ..settings(3) };
        let err = TestMenu::new(&s, RecordingSurface::default(), RecordingRouter::default())
            .err()
            .unwrap();
        assert_eq!(err, MenuError::VolumeOutOfRange(1.5));
    }

    #[test]
    fn non_positive_cursor_step_is_rejected() {
        for step in [0, -2] {
            let s = MenuSettings { cursor_step: step, ..settings(3) };
            let err = TestMenu::new(&s, RecordingSurface::default(), RecordingRouter::default())
                .err()
                .unwrap();
            assert_eq!(err, MenuError::InvalidCursorStep(step));
        }
    }

    #[test]
    fn entering_with_music_starts_track_and_shows_audio_icon() {
        let m = menu(&settings(3));
        assert_eq!(
            m.surface().log,
            vec![
                Cmd::Play("Main_Menu".into()),
                Cmd::Volume(0.6),
                Cmd::Icon(Icon::AudioOn, true),
                Cmd::Icon(Icon::Muted, false),
            ]
        );
        let st = m.state();
        assert_eq!(st.selected, 0);
        assert_eq!(st.idle_ticks, 0);
        assert!(st.splash_pending);
        assert_eq!(st.phase, ScreenPhase::Active);
    }

    #[test]
    fn entering_without_music_shows_muted_icon_and_plays_nothing() {
        let s = MenuSettings { music_enabled: false, ..settings(3) };
        let m = menu(&s);
        assert!(!m.surface().log.iter().any(|c| matches!(c, Cmd::Play(_))));
        assert!(m.surface().muted_icon);
        assert!(!m.surface().audio_icon);
    }

    // ── Navigation ──

    #[test]
    fn three_downs_select_fourth_entry() {
        let s = settings(8);
        let mut m = menu(&s);
        let t0 = Instant::now();
        press_all(&mut m, t0, &[Direction::Down; 3]);
        assert_eq!(m.state().selected, 3);
        assert_eq!(m.surface().moves(), vec![2, 2, 2]);
        assert_eq!(m.surface().cursor, 3 * s.cursor_step);
        assert_eq!(m.selected_entry().target.as_str(), "scene3");
    }

    #[test]
    fn up_at_top_is_accepted_but_does_nothing() {
        let mut m = menu(&settings(4));
        for _ in 0..5 {
            m.on_tick();
        }
        assert!(m.on_directional_input(Direction::Up, Instant::now()));
        assert_eq!(m.state().selected, 0);
        assert!(m.surface().moves().is_empty());
        assert_eq!(m.state().idle_ticks, 0);
    }

    #[test]
    fn down_at_bottom_is_accepted_but_does_nothing() {
        let mut m = menu(&settings(2));
        let t0 = Instant::now();
        press_all(&mut m, t0, &[Direction::Down, Direction::Down, Direction::Down]);
        assert_eq!(m.state().selected, 1);
        assert_eq!(m.surface().moves(), vec![2]);
    }

    #[test]
    fn selection_stays_in_range_for_any_sequence() {
        for n in 1..=5 {
            let mut m = menu(&settings(n));
            let t0 = Instant::now();
            // Deterministic pseudo-random walk.
            let mut seed: u32 = 7 + n as u32;
            for i in 0..200u64 {
                seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
                let dir = if (seed >> 16) & 1 == 0 { Direction::Up } else { Direction::Down };
                m.on_directional_input(dir, t0 + ms(300 * i));
                assert!(m.state().selected < n);
                assert_eq!(m.surface().cursor, m.state().selected as i32 * 2);
            }
        }
    }

    #[test]
    fn single_entry_menu_never_moves() {
        let mut m = menu(&settings(1));
        press_all(&mut m, Instant::now(), &[Direction::Down, Direction::Up]);
        assert_eq!(m.state().selected, 0);
        assert!(m.surface().moves().is_empty());
    }

    #[test]
    fn held_key_repeats_at_debounce_rate() {
        let mut m = menu(&settings(8));
        let t0 = Instant::now();
        // Raw signal every 16 ms for 600 ms: accepted at 0, 256 (first >= 250), 512.
        let accepted = (0..=37u64)
            .filter(|i| m.on_directional_input(Direction::Down, t0 + ms(i * 16)))
            .count();
        assert_eq!(accepted, 3);
        assert_eq!(m.state().selected, 3);
    }

    #[test]
    fn dropped_input_does_not_reset_idle() {
        let mut m = menu(&settings(8));
        let t0 = Instant::now();
        m.on_directional_input(Direction::Down, t0);
        m.on_tick();
        m.on_tick();
        assert!(!m.on_directional_input(Direction::Down, t0 + ms(50)));
        assert_eq!(m.state().idle_ticks, 2);
    }

    #[test]
    fn opposite_direction_is_not_debounced() {
        let mut m = menu(&settings(8));
        let t0 = Instant::now();
        assert!(m.on_directional_input(Direction::Down, t0));
        assert!(m.on_directional_input(Direction::Up, t0 + ms(10)));
        assert_eq!(m.state().selected, 0);
        assert_eq!(m.surface().moves(), vec![2, -2]);
    }

    // ── Idle timeout ──

    #[test]
    fn idle_ticks_count_up_by_one() {
        let mut m = menu(&settings(3));
        for expected in 1..=10 {
            m.on_tick();
            assert_eq!(m.state().idle_ticks, expected);
        }
    }

    #[test]
    fn idle_timeout_fires_once_after_threshold() {
        let mut m = menu(&settings(8));
        for _ in 0..1000 {
            m.on_tick();
        }
        assert!(m.router_mut().requests.is_empty());

        m.on_tick();
        assert_eq!(
            m.router_mut().requests,
            vec![("LeaderBoard".to_string(), TransitionMode::Immediate)]
        );
        assert_eq!(m.state().idle_ticks, 0);
        assert!(!m.state().splash_pending);
        assert_eq!(m.state().phase, ScreenPhase::Transitioning);

        for _ in 0..5000 {
            m.on_tick();
        }
        assert_eq!(m.router_mut().requests.len(), 1);
        assert_eq!(m.state().idle_ticks, 0);
    }

    #[test]
    fn custom_threshold_and_idle_scene() {
        let s = MenuSettings {
            idle_timeout_ticks: 3,
            idle_scene: "Attract".into(),
            ..settings(2)
        };
        let mut m = menu(&s);
        for _ in 0..4 {
            m.on_tick();
        }
        assert_eq!(
            m.router_mut().requests,
            vec![("Attract".to_string(), TransitionMode::Immediate)]
        );
    }

    #[test]
    fn input_postpones_idle_timeout() {
        let s = MenuSettings { idle_timeout_ticks: 10, ..settings(3) };
        let mut m = menu(&s);
        let t0 = Instant::now();
        for _ in 0..10 {
            m.on_tick();
        }
        m.on_directional_input(Direction::Down, t0);
        for _ in 0..10 {
            m.on_tick();
        }
        m.on_pointer_activity(PointerActivity::Move);
        for _ in 0..10 {
            m.on_tick();
        }
        assert!(m.router_mut().requests.is_empty());
        assert_eq!(m.state().idle_ticks, 10);
    }

    // ── Confirm ──

    #[test]
    fn confirm_routes_to_selected_scene() {
        let mut m = menu(&settings(8));
        press_all(&mut m, Instant::now(), &[Direction::Down, Direction::Down]);
        m.on_tick();
        m.on_confirm();
        assert_eq!(
            m.router_mut().requests,
            vec![("scene2".to_string(), TransitionMode::Queued)]
        );
        assert_eq!(m.state().idle_ticks, 0);
        assert_eq!(m.state().phase, ScreenPhase::Transitioning);
    }

    #[test]
    fn rapid_confirms_each_issue_a_request() {
        let mut m = menu(&settings(3));
        m.on_confirm();
        m.on_confirm();
        m.on_confirm();
        assert_eq!(m.router_mut().requests.len(), 3);
    }

    #[test]
    fn confirm_stops_idle_counter() {
        let s = MenuSettings { idle_timeout_ticks: 2, ..settings(3) };
        let mut m = menu(&s);
        m.on_confirm();
        for _ in 0..10 {
            m.on_tick();
        }
        assert_eq!(m.router_mut().requests.len(), 1);
    }

    // ── Pointer and music ──

    #[test]
    fn pointer_press_mutes_music() {
        let mut m = menu(&settings(3));
        m.on_tick();
        m.on_pointer_activity(PointerActivity::Press);
        let st = m.state();
        assert!(!st.music_enabled);
        assert_eq!(st.idle_ticks, 0);
        assert!(!st.splash_pending);
        let surf = m.surface();
        assert_eq!(surf.volume, 0.0);
        assert!(surf.muted_icon);
        assert!(!surf.audio_icon);
    }

    #[test]
    fn pointer_move_does_not_toggle_music() {
        let mut m = menu(&settings(3));
        m.on_pointer_activity(PointerActivity::Move);
        assert!(m.state().music_enabled);
        assert!(!m.state().splash_pending);
        assert_eq!(m.surface().volume, 0.6);
    }

    #[test]
    fn mute_input_postpones_idle_timeout() {
        let s = MenuSettings { idle_timeout_ticks: 5, ..settings(3) };
        let mut m = menu(&s);
        for i in 0..20 {
            m.on_tick();
            if i % 2 == 1 {
                m.on_mute_input();
            }
        }
        assert!(m.router_mut().requests.is_empty());
        assert_eq!(m.state().phase, ScreenPhase::Active);
        assert!(m.state().music_enabled);
    }

    #[test]
    fn toggle_music_twice_restores_pairing() {
        for start in [true, false] {
            let s = MenuSettings { music_enabled: start, ..settings(3) };
            let mut m = menu(&s);
            m.toggle_music();
            m.toggle_music();
            let surf = m.surface();
            assert_eq!(m.state().music_enabled, start);
            assert_eq!(surf.audio_icon, start);
            assert_eq!(surf.muted_icon, !start);
            assert_eq!(surf.volume, if start { 0.6 } else { 0.0 });
        }
    }

    #[test]
    fn unmuting_starts_track_only_once() {
        let s = MenuSettings { music_enabled: false, ..settings(3) };
        let mut m = menu(&s);
        for _ in 0..4 {
            m.toggle_music();
        }
        let plays = m
            .surface()
            .log
            .iter()
            .filter(|c| matches!(c, Cmd::Play(_)))
            .count();
        assert_eq!(plays, 1);
    }

    #[test]
    fn unmute_uses_configured_volume() {
        let s = MenuSettings { music_volume: 0.25, ..settings(3) };
        let mut m = menu(&s);
        m.toggle_music();
        m.toggle_music();
        assert_eq!(m.surface().volume, 0.25);
    }
}
