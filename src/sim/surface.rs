/// Presentation surface consumed by the menu controller.
///
/// The controller never draws or plays anything itself: it issues these
/// commands and the UI layer decides what they look and sound like.

/// Audio state icons shown in the corner of the menu board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Icon {
    AudioOn,
    Muted,
}

pub trait PresentationSurface {
    /// Move the selection cursor by `delta` surface units (negative = up).
    fn move_cursor_by(&mut self, delta: i32);

    fn set_icon_visible(&mut self, icon: Icon, visible: bool);

    /// Music volume, 0.0 (silent) to 1.0.
    fn set_audio_volume(&mut self, level: f32);

    /// Start `track` looping. Calling it for a track that is already
    /// looping must not restart it.
    fn play_looped_track(&mut self, track: &str);
}
