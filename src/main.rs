/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

use config::LauncherConfig;
use domain::debounce::Direction;
use domain::entry::SceneId;
use domain::state::PointerActivity;
use error::MenuResult;
use sim::controller::MenuController;
use sim::router::{SceneQueue, TransitionMode};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::{MenuFrame, Renderer, Screen};
use ui::sound::SoundEngine;
use ui::view::TerminalSurface;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// Overrides the config.toml search with an explicit file.
const CONFIG_ENV: &str = "ARCADE_LAUNCHER_CONFIG";

/// Scene screens blink their prompt every this many ticks.
const BLINK_TICKS: u32 = 30;

type Menu<'a> = MenuController<TerminalSurface<'a>, SceneQueue>;

/// What the launcher is showing right now.
enum Stage<'a> {
    Menu { ctl: Menu<'a>, entered: Instant },
    Scene { scene: SceneId, ticks: u32 },
}

fn main() -> Result<()> {
    setup_panic_hook();
    let _log_guard = init_logging()?;

    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => LauncherConfig::load_from(Path::new(&path)),
        None => LauncherConfig::load(),
    };
    let sound = SoundEngine::new();

    // Configuration problems surface before the terminal is taken over.
    let stage = match enter_menu(&config, sound.as_ref()) {
        Ok(stage) => stage,
        Err(e) => {
            error!("menu construction failed: {e}");
            return Err(e).context("cannot start the main menu");
        }
    };

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        let _ = renderer.cleanup();
        return Err(e).context("terminal init failed");
    }

    let result = game_loop(&mut renderer, stage, &config, sound.as_ref());

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = &result {
        error!("launcher stopped: {e:#}");
    }
    result
}

/// Restore the terminal before the default hook prints the panic.
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::event::DisableMouseCapture,
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));
}

/// File logging: the terminal itself is owned by the renderer.
fn init_logging() -> Result<WorkerGuard> {
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default())
        .join("arcade-launcher");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("cannot create log directory {}", log_dir.display()))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let file_appender = tracing_appender::rolling::never(&log_dir, "launcher.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    Ok(guard)
}

/// Fresh menu screen instance: new state, new router.
fn enter_menu<'a>(config: &LauncherConfig, sound: Option<&'a SoundEngine>) -> MenuResult<Stage<'a>> {
    let ctl = MenuController::new(&config.menu, TerminalSurface::new(sound), SceneQueue::new())?;
    Ok(Stage::Menu { ctl, entered: Instant::now() })
}

fn game_loop<'a>(
    renderer: &mut Renderer,
    mut stage: Stage<'a>,
    config: &LauncherConfig,
    sound: Option<&'a SoundEngine>,
) -> Result<()> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.tick_rate_ms);

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || gp.quit_pressed() {
            break;
        }

        match &mut stage {
            Stage::Menu { ctl, .. } => {
                if kb.any_pressed(KEYS_QUIT) {
                    break;
                }
                feed_menu_input(ctl, &kb, &gp);
            }
            Stage::Scene { scene, .. } => {
                let any_input = kb.any_key_pressed() || kb.pointer_pressed() || gp.activity();
                if any_input {
                    info!(scene = %scene, "returning to menu");
                    stage = enter_menu(config, sound)?;
                    kb.release_all();
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            match &mut stage {
                Stage::Menu { ctl, .. } => ctl.on_tick(),
                Stage::Scene { ticks, .. } => *ticks = ticks.wrapping_add(1),
            }
            last_tick = Instant::now();
        }

        // Immediate transitions take effect before this frame is drawn,
        // queued ones at the frame boundary after it.
        apply_transition(&mut stage, TransitionMode::Immediate);
        render_stage(renderer, &stage, config)?;
        apply_transition(&mut stage, TransitionMode::Queued);

        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn apply_transition(stage: &mut Stage<'_>, due: TransitionMode) {
    let Stage::Menu { ctl, .. } = stage else { return };
    let is_due = ctl.router_mut().pending().map_or(false, |t| t.mode == due);
    if !is_due {
        return;
    }
    if let Some(t) = ctl.router_mut().take() {
        info!(scene = %t.scene, mode = ?t.mode, "leaving menu");
        *stage = Stage::Scene { scene: t.scene, ticks: 0 };
    }
}

fn render_stage(renderer: &mut Renderer, stage: &Stage<'_>, config: &LauncherConfig) -> Result<()> {
    let screen = match stage {
        Stage::Menu { ctl, entered } => Screen::Menu(MenuFrame {
            title: &config.title,
            entries: ctl.entries(),
            selected: ctl.state().selected,
            view: ctl.surface().view(),
            row_step: config.menu.cursor_step,
            since_entry: entered.elapsed(),
        }),
        Stage::Scene { scene, ticks } => Screen::Scene {
            scene,
            blink: (ticks / BLINK_TICKS) % 2 == 0,
        },
    };
    renderer.render(&screen).context("render failed")
}

// ── Key Constants ──

const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_MUTE: &[KeyCode] = &[KeyCode::Char('m'), KeyCode::Char('M')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

/// Translate this frame's raw input into menu events.
///
/// Held directions are reported every frame; the controller's repeat guard
/// decides which of them count.
fn feed_menu_input(ctl: &mut Menu<'_>, kb: &InputState, gp: &GamepadState) {
    let now = Instant::now();
    if kb.any_held(KEYS_UP) || gp.up_held() {
        ctl.on_directional_input(Direction::Up, now);
    }
    if kb.any_held(KEYS_DOWN) || gp.down_held() {
        ctl.on_directional_input(Direction::Down, now);
    }

    if kb.pointer_pressed() {
        ctl.on_pointer_activity(PointerActivity::Press);
    } else if kb.pointer_moved() {
        ctl.on_pointer_activity(PointerActivity::Move);
    }

    if kb.any_pressed(KEYS_MUTE) || gp.mute_pressed() {
        ctl.on_mute_input();
    }
    if kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed() {
        ctl.on_confirm();
    }
}
