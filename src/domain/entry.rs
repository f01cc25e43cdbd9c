/// Menu entries: the fixed, ordered board of game titles.
///
/// `MenuEntries` can only be built from a non-empty list, so every
/// `selected` index the controller holds is backed by a real entry.

use std::fmt;

use crate::error::{MenuError, MenuResult};

/// Identifier of a destination scene (a game, or the leaderboard).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct SceneId(String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        SceneId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MenuEntry {
    pub display_name: String,
    pub target: SceneId,
    pub ordinal: usize,
}

/// Non-empty, immutable list of entries with ordinals 0..N-1.
#[derive(Clone, Debug)]
pub struct MenuEntries {
    entries: Vec<MenuEntry>,
}

impl MenuEntries {
    /// Build from `(display name, target scene)` pairs in board order.
    pub fn new<I, N, S>(pairs: I) -> MenuResult<Self>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let entries: Vec<MenuEntry> = pairs
            .into_iter()
            .enumerate()
            .map(|(ordinal, (name, scene))| MenuEntry {
                display_name: name.into(),
                target: SceneId::new(scene),
                ordinal,
            })
            .collect();

        if entries.is_empty() {
            return Err(MenuError::EmptyMenu);
        }
        Ok(MenuEntries { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Highest valid index. Never underflows: the list is non-empty.
    pub fn last_index(&self) -> usize {
        self.entries.len() - 1
    }

    /// Entry at `index`, clamped to the last entry.
    pub fn get(&self, index: usize) -> &MenuEntry {
        &self.entries[index.min(self.last_index())]
    }

    pub fn iter(&self) -> impl Iterator<Item = &MenuEntry> {
        self.entries.iter()
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
