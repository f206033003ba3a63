//! Participants and the acting user.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Unique identifier for a participant (a registered user id).
pub type PlayerId = Uuid;

/// Role of a user, supplied by the identity layer.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Player,
    Admin,
    Master,
}

impl Role {
    /// Admin and Master may manage any tournament.
    pub fn is_elevated(self) -> bool {
        matches!(self, Role::Admin | Role::Master)
    }
}

/// The user performing an operation. Threaded explicitly into every mutation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: PlayerId,
    #[serde(default)]
    pub role: Role,
}

impl Actor {
    pub fn new(id: PlayerId, role: Role) -> Self {
        Self { id, role }
    }

    /// A regular player.
    pub fn player(id: PlayerId) -> Self {
        Self::new(id, Role::Player)
    }
}

/// Elevated roles granted by server configuration. Everyone else is a Player.
#[derive(Clone, Debug, Default)]
pub struct RoleDirectory {
    admins: HashSet<PlayerId>,
    masters: HashSet<PlayerId>,
}

impl RoleDirectory {
    pub fn new<A, M>(admins: A, masters: M) -> Self
    where
        A: IntoIterator<Item = PlayerId>,
        M: IntoIterator<Item = PlayerId>,
    {
        Self {
            admins: admins.into_iter().collect(),
            masters: masters.into_iter().collect(),
        }
    }

    /// Build from comma-separated id lists (as read from the environment).
    /// Entries that are not valid ids are skipped with a warning.
    pub fn from_lists(admins: &str, masters: &str) -> Self {
        Self::new(parse_ids(admins), parse_ids(masters))
    }

    /// Master takes precedence when an id is listed twice.
    pub fn role_of(&self, id: PlayerId) -> Role {
        if self.masters.contains(&id) {
            Role::Master
        } else if self.admins.contains(&id) {
            Role::Admin
        } else {
            Role::Player
        }
    }

    pub fn actor(&self, id: PlayerId) -> Actor {
        Actor::new(id, self.role_of(id))
    }
}

fn parse_ids(list: &str) -> Vec<PlayerId> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match Uuid::parse_str(s) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("Ignoring invalid user id {:?} in role list: {}", s, e);
                None
            }
        })
        .collect()
}
