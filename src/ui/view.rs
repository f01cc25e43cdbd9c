/// Terminal presentation surface.
///
/// Holds what the renderer needs to draw the menu board (cursor offset,
/// icon visibility) and forwards audio commands to the sound engine.

use tracing::trace;

use crate::sim::surface::{Icon, PresentationSurface};
use crate::ui::sound::SoundEngine;

/// Renderer-facing snapshot of the menu board.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuView {
    /// Cursor offset in rows from the first entry.
    pub cursor_offset: i32,
    pub audio_icon: bool,
    pub muted_icon: bool,
    pub volume: f32,
}

impl Default for MenuView {
    fn default() -> Self {
        MenuView {
            cursor_offset: 0,
            audio_icon: true,
            muted_icon: false,
            volume: 0.0,
        }
    }
}

pub struct TerminalSurface<'a> {
    view: MenuView,
    sound: Option<&'a SoundEngine>,
}

impl<'a> TerminalSurface<'a> {
    pub fn new(sound: Option<&'a SoundEngine>) -> Self {
        TerminalSurface {
            view: MenuView::default(),
            sound,
        }
    }

    pub fn view(&self) -> &MenuView {
        &self.view
    }
}

impl PresentationSurface for TerminalSurface<'_> {
    fn move_cursor_by(&mut self, delta: i32) {
        self.view.cursor_offset += delta;
    }

    fn set_icon_visible(&mut self, icon: Icon, visible: bool) {
        match icon {
            Icon::AudioOn => self.view.audio_icon = visible,
            Icon::Muted => self.view.muted_icon = visible,
        }
    }

    fn set_audio_volume(&mut self, level: f32) {
        self.view.volume = level;
        if let Some(sfx) = self.sound {
            sfx.set_music_volume(level);
        }
    }

    fn play_looped_track(&mut self, track: &str) {
        trace!(track, "play looped track");
        if let Some(sfx) = self.sound {
            sfx.play_looped(track);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_update_view_without_audio_device() {
        let mut s = TerminalSurface::new(None);
        s.move_cursor_by(2);
        s.move_cursor_by(2);
        s.move_cursor_by(-2);
        s.set_icon_visible(Icon::Muted, true);
        s.set_icon_visible(Icon::AudioOn, false);
        s.set_audio_volume(0.0);
        s.play_looped_track("Main_Menu");

        assert_eq!(
            s.view(),
            &MenuView {
                cursor_offset: 2,
                audio_icon: false,
                muted_icon: true,
                volume: 0.0,
            }
        );
    }
}
