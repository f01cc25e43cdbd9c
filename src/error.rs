/// Menu construction errors.
///
/// Runtime input never fails: selection is clamped and the idle counter is
/// just a counter. The only failure mode is a configuration the menu screen
/// cannot be built from, and that is fatal for the screen.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MenuError {
    /// The entry list was empty, so there is nothing to select.
    #[error("invalid menu configuration: the entry list is empty")]
    EmptyMenu,

    /// Default music volume must be a level in 0.0..=1.0.
    #[error("invalid menu configuration: music volume {0} is outside 0.0..=1.0")]
    VolumeOutOfRange(f32),

    /// Each menu row must move the cursor by at least one surface unit.
    #[error("invalid menu configuration: cursor step {0} must be at least 1")]
    InvalidCursorStep(i32),
}

pub type MenuResult<T> = Result<T, MenuError>;
