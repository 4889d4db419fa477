//! Mission state kept in the hidden `/.game_states` directory.
//!
//! The narrative layer records which missions have been completed inside the
//! player's own filesystem so that progress survives restarts. Access goes
//! through [`GameStates`] and [`GameStatesMut`] only, so mission ids never
//! collide with user-visible paths.

use crate::error::{PathError, ShellError};
use crate::host::Host;
use crate::tree::{Filesystem, FsNode};

/// Name of the hidden directory at the root of the player's filesystem.
pub const GAME_STATES_DIR: &str = ".game_states";

fn states_path() -> String {
    format!("/{}", GAME_STATES_DIR)
}

/// Read-only view of the mission flags.
pub struct GameStates<'a> {
    fs: &'a Filesystem,
}

impl<'a> GameStates<'a> {
    pub(crate) fn new(fs: &'a Filesystem) -> Self {
        Self { fs }
    }

    /// Whether `mission_id` has been recorded as complete.
    pub fn is_completed(&self, mission_id: &str) -> bool {
        matches!(
            self.fs
                .get_node(&states_path())
                .and_then(|n| n.as_dir())
                .and_then(|d| d.get(mission_id)),
            Some(FsNode::Flag(true))
        )
    }

    /// Every recorded mission and its completion flag.
    pub fn missions(&self) -> Vec<(String, bool)> {
        match self.fs.get_node(&states_path()).and_then(|n| n.as_dir()) {
            Some(dir) => dir
                .iter()
                .map(|(id, node)| (id.clone(), matches!(node, FsNode::Flag(true))))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Mutable access to the mission flags.
pub struct GameStatesMut<'a> {
    fs: &'a mut Filesystem,
}

impl<'a> GameStatesMut<'a> {
    pub(crate) fn new(fs: &'a mut Filesystem) -> Self {
        Self { fs }
    }

    pub fn set(&mut self, mission_id: &str, completed: bool) -> Result<(), PathError> {
        self.fs
            .add_file(&states_path(), mission_id, FsNode::Flag(completed))
    }

    pub fn clear(&mut self) {
        self.fs.root_dir_mut().remove(GAME_STATES_DIR);
    }
}

/// One scripted mission's completion status, stored on the player host.
#[derive(Debug, Clone)]
pub struct Mission {
    id: String,
    complete: bool,
}

impl Mission {
    /// Load the mission's state from `host`, recording it if it was absent.
    pub fn load(id: impl Into<String>, host: &mut Host) -> Result<Self, ShellError> {
        let id = id.into();
        let complete = host.is_mission_completed(&id);
        host.update_mission_state(&id, complete)?;
        Ok(Self { id, complete })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn succeed(&mut self, host: &mut Host) -> Result<(), ShellError> {
        self.complete = true;
        host.update_mission_state(&self.id, true)
    }

    pub fn fail(&mut self, host: &mut Host) -> Result<(), ShellError> {
        self.complete = false;
        host.update_mission_state(&self.id, false)
    }
}
