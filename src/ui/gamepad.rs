/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Menu up / down
///   Start / A             →  Confirm
///   Y                     →  Toggle music
///   Select                →  Quit

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER" => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
#[derive(Debug, PartialEq)]
struct ActionMap {
    confirm: Vec<Btn>,
    mute: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            confirm: vec![Btn::Start, Btn::A],
            mute: vec![Btn::Y],
            quit: vec![Btn::Select],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    just_pressed: [bool; BTN_COUNT],
    dpad_up: bool,
    dpad_down: bool,
    stick_y: f32,

    /// Any button, d-pad or stick event since the last `update()`.
    activity: bool,

    action_map: ActionMap,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg_attr(not(feature = "gamepad"), allow(unused_mut))]
        let mut gp = Self::offline();
        #[cfg(feature = "gamepad")]
        {
            gp.gilrs = Gilrs::new().ok();
        }
        gp
    }

    /// State with no backend attached; never reports input.
    fn offline() -> Self {
        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: None,
            just_pressed: [false; BTN_COUNT],
            dpad_up: false,
            dpad_down: false,
            stick_y: 0.0,
            activity: false,
            action_map: ActionMap::default(),
        }
    }

    /// Load button mapping from config. Lists with no recognised names keep
    /// the default binding.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let map = &mut self.action_map;
        let cf = parse_list(&cfg.confirm);
        if !cf.is_empty() { map.confirm = cf; }
        let mu = parse_list(&cfg.mute);
        if !mu.is_empty() { map.mute = mu; }
        let qu = parse_list(&cfg.quit);
        if !qu.is_empty() { map.quit = qu; }
    }

    pub fn update(&mut self) {
        self.just_pressed = [false; BTN_COUNT];
        self.activity = false;

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.activity = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(Axis::LeftStickY, value, _) => {
                    if value.abs() > STICK_DEADZONE {
                        self.activity = true;
                    }
                    self.stick_y = value;
                }
                EventType::Disconnected => {
                    self.dpad_up = false;
                    self.dpad_down = false;
                    self.stick_y = 0.0;
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, pressed: bool) {
        match gilrs_btn {
            Button::DPadUp => self.dpad_up = pressed,
            Button::DPadDown => self.dpad_down = pressed,
            other => {
                if let Some(btn) = Btn::from_gilrs(other) {
                    if pressed {
                        self.just_pressed[btn as usize] = true;
                    }
                }
            }
        }
    }

    // ── Action queries (config-driven) ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.just_pressed[b as usize])
    }

    pub fn confirm_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.confirm)
    }
    pub fn mute_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.mute)
    }
    pub fn quit_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.quit)
    }

    // Direction (continuous, held)
    pub fn up_held(&self) -> bool {
        self.dpad_up || self.stick_y > STICK_DEADZONE
    }
    pub fn down_held(&self) -> bool {
        self.dpad_down || self.stick_y < -STICK_DEADZONE
    }

    pub fn activity(&self) -> bool {
        self.activity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn button_names_are_case_insensitive_with_aliases() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("Back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("north"), Some(Btn::Y));
        assert_eq!(Btn::from_name("Turbo"), None);
    }

    #[test]
    fn config_overrides_mapping() {
        let mut gp = GamepadState::offline();
        gp.load_button_config(&GamepadConfig {
            confirm: names(&["B"]),
            mute: names(&["X", "R1"]),
            quit: names(&["Start"]),
        });
        assert_eq!(gp.action_map.confirm, vec![Btn::B]);
        assert_eq!(gp.action_map.mute, vec![Btn::X, Btn::R1]);
        assert_eq!(gp.action_map.quit, vec![Btn::Start]);
    }

    #[test]
    fn unknown_names_keep_default_binding() {
        let mut gp = GamepadState::offline();
        gp.load_button_config(&GamepadConfig {
            confirm: names(&["Turbo"]),
            mute: vec![],
            quit: names(&["Select"]),
        });
        assert_eq!(gp.action_map, ActionMap::default());
    }

    #[test]
    fn stick_past_deadzone_counts_as_direction() {
        let mut gp = GamepadState::offline();
        gp.stick_y = -0.8;
        assert!(gp.down_held());
        assert!(!gp.up_held());
        gp.stick_y = 0.1;
        assert!(!gp.down_held() && !gp.up_held());
    }
}
