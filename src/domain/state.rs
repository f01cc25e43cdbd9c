/// Mutable per-screen menu state.
///
/// Created fresh on every screen entry; never persisted.

/// Screen-level phase. `Transitioning` is terminal for one screen instance.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ScreenPhase {
    Active,
    Transitioning,
}

/// Kind of pointer activity reported by the input layer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PointerActivity {
    Move,
    Press,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MenuState {
    pub selected: usize,
    pub idle_ticks: u32,
    pub music_enabled: bool,
    /// Cleared by pointer activity or when the idle screen is shown.
    pub splash_pending: bool,
    pub phase: ScreenPhase,
}

impl MenuState {
    pub fn new(music_enabled: bool) -> Self {
        MenuState {
            selected: 0,
            idle_ticks: 0,
            music_enabled,
            splash_pending: true,
            phase: ScreenPhase::Active,
        }
    }

    pub fn reset_idle(&mut self) {
        self.idle_ticks = 0;
    }
}
