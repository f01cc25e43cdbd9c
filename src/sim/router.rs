/// Scene routing: where the menu hands control over to another screen.
///
/// One interface covers both call sites:
///   - confirm   → `Queued`: applied at the next frame boundary, and ignored
///                 while another transition is already pending
///   - idle      → `Immediate`: bypasses the queue and replaces a pending
///                 queued transition

use tracing::{debug, info};

use crate::domain::entry::SceneId;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransitionMode {
    Queued,
    Immediate,
}

pub trait SceneRouter {
    fn route(&mut self, scene: &SceneId, mode: TransitionMode);
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Transition {
    pub scene: SceneId,
    pub mode: TransitionMode,
}

/// Single-slot router used by the game loop.
///
/// Holds at most one pending transition; the loop drains it with `take()`
/// once per frame.
#[derive(Debug, Default)]
pub struct SceneQueue {
    pending: Option<Transition>,
}

impl SceneQueue {
    pub fn new() -> Self {
        SceneQueue { pending: None }
    }

    pub fn pending(&self) -> Option<&Transition> {
        self.pending.as_ref()
    }

    pub fn take(&mut self) -> Option<Transition> {
        self.pending.take()
    }
}

impl SceneRouter for SceneQueue {
    fn route(&mut self, scene: &SceneId, mode: TransitionMode) {
        let replace = match (&self.pending, mode) {
            (None, _) => true,
            (Some(p), TransitionMode::Immediate) => p.mode == TransitionMode::Queued,
            (Some(_), TransitionMode::Queued) => false,
        };

        if replace {
            info!(scene = %scene, ?mode, "transition requested");
            self.pending = Some(Transition { scene: scene.clone(), mode });
        } else {
            debug!(scene = %scene, ?mode, "transition already pending, request ignored");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(s: &str) -> SceneId {
        SceneId::new(s)
    }

    #[test]
    fn first_request_is_kept() {
        let mut q = SceneQueue::new();
        q.route(&scene("Pong"), TransitionMode::Queued);
        let t = q.take().unwrap();
        assert_eq!(t.scene, scene("Pong"));
        assert_eq!(t.mode, TransitionMode::Queued);
        assert!(q.take().is_none());
    }

    #[test]
    fn repeated_confirm_is_ignored_while_pending() {
        let mut q = SceneQueue::new();
        q.route(&scene("Pong"), TransitionMode::Queued);
        q.route(&scene("Tetris"), TransitionMode::Queued);
        assert_eq!(q.pending().unwrap().scene, scene("Pong"));
    }

    #[test]
    fn immediate_overrides_queued() {
        let mut q = SceneQueue::new();
        q.route(&scene("Pong"), TransitionMode::Queued);
        q.route(&scene("LeaderBoard"), TransitionMode::Immediate);
        let t = q.take().unwrap();
        assert_eq!(t.scene, scene("LeaderBoard"));
        assert_eq!(t.mode, TransitionMode::Immediate);
    }

    #[test]
    fn queued_does_not_override_immediate() {
        let mut q = SceneQueue::new();
        q.route(&scene("LeaderBoard"), TransitionMode::Immediate);
        q.route(&scene("Pong"), TransitionMode::Queued);
        q.route(&scene("Other"), TransitionMode::Immediate);
        assert_eq!(q.take().unwrap().scene, scene("LeaderBoard"));
    }
}
