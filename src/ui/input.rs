/// Keyboard and mouse state tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Continuous directional signal while a key is held (the menu's repeat
///     guard turns it into a timed auto-repeat)
///   - Edge-triggered confirm / mute (only fire on initial press)
///   - Pointer activity from terminal mouse reports
///
/// Terminals rarely report key Release events, so a key counts as released
/// once no Press/Repeat has arrived for `HOLD_TIMEOUT`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};

const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the last drain.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for Ctrl+C detection.
    raw_events: Vec<KeyEvent>,

    pointer_moved: bool,
    pointer_pressed: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            pointer_moved: false,
            pointer_pressed: false,
        }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();
        self.pointer_moved = false;
        self.pointer_pressed = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => self.on_key(key, Instant::now()),
                Ok(Event::Mouse(mouse)) => match mouse.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => self.pointer_moved = true,
                    MouseEventKind::Down(_) => self.pointer_pressed = true,
                    _ => {}
                },
                _ => {}
            }
        }

        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant) {
        self.raw_events.push(key);
        if key.kind == KeyEventKind::Release {
            return;
        }
        let was_held = self.is_held_at(key.code, now);
        self.last_active.insert(key.code, now);
        if !was_held {
            self.fresh_presses.push(key.code);
        }
    }

    /// Forget every held key. A key still down across a screen change must
    /// be pressed again before it counts.
    pub fn release_all(&mut self) {
        self.last_active.clear();
        self.fresh_presses.clear();
    }

    /// Is any of these keys held? Used for directional input.
    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        let now = Instant::now();
        codes.iter().any(|c| self.is_held_at(*c, now))
    }

    /// Was any of these keys freshly pressed this frame? (edge trigger)
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.fresh_presses.contains(c))
    }

    /// Any fresh key press at all this frame.
    pub fn any_key_pressed(&self) -> bool {
        !self.fresh_presses.is_empty()
    }

    pub fn pointer_moved(&self) -> bool {
        self.pointer_moved
    }

    pub fn pointer_pressed(&self) -> bool {
        self.pointer_pressed
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    // ── Internal ──

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active
            .get(&code)
            .map(|t| now.saturating_duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn first_press_is_fresh_repeat_is_not() {
        let mut kb = InputState::new();
        let t0 = Instant::now();
        kb.on_key(press(KeyCode::Down), t0);
        assert!(kb.any_pressed(&[KeyCode::Down]));

        kb.fresh_presses.clear();
        kb.on_key(press(KeyCode::Down), t0 + Duration::from_millis(30));
        assert!(!kb.any_pressed(&[KeyCode::Down]));
        assert!(kb.any_held(&[KeyCode::Down]));
    }

    #[test]
    fn release_events_are_ignored() {
        let mut kb = InputState::new();
        let mut ev = press(KeyCode::Up);
        ev.kind = KeyEventKind::Release;
        kb.on_key(ev, Instant::now());
        assert!(!kb.any_key_pressed());
        assert!(!kb.any_held(&[KeyCode::Up]));
    }

    #[test]
    fn release_all_drops_held_keys() {
        let mut kb = InputState::new();
        let t0 = Instant::now();
        kb.on_key(press(KeyCode::Down), t0);
        assert!(kb.any_held(&[KeyCode::Down]));

        kb.release_all();
        assert!(!kb.any_held(&[KeyCode::Down]));
        assert!(!kb.any_key_pressed());

        // The next report of the same key is a fresh press again.
        kb.on_key(press(KeyCode::Down), t0 + Duration::from_millis(20));
        assert!(kb.any_pressed(&[KeyCode::Down]));
    }

    #[test]
    fn ctrl_c_is_detected() {
        let mut kb = InputState::new();
        kb.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Instant::now());
        assert!(kb.ctrl_c_pressed());
    }
}
