//! Resolution of raw in-game names to league players.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::models::{Player, PlayerId};

/// Label given to an in-game name that matches no nickname.
pub fn unknown_label(raw: &str) -> String {
    format!("{} (unknown)", raw)
}

/// Result of resolving an in-game name.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedPlayer<'a> {
    Known(&'a Player),
    /// No nickname matched; keeps the raw name
    Unknown(String),
}

impl ResolvedPlayer<'_> {
    pub fn id(&self) -> Option<PlayerId> {
        match self {
            ResolvedPlayer::Known(p) => Some(p.id),
            ResolvedPlayer::Unknown(_) => None,
        }
    }

    /// Name used to group statistics.
    pub fn display_name(&self) -> String {
        match self {
            ResolvedPlayer::Known(p) => p.name.clone(),
            ResolvedPlayer::Unknown(raw) => unknown_label(raw),
        }
    }
}

/// A nickname claimed by more than one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NickConflict {
    /// Lower-cased nickname
    pub nick: String,

    /// Claiming players, lowest id first. The first one wins resolution.
    pub players: Vec<PlayerId>,
}

/// Case-insensitive nickname index.
///
/// When several players share a nickname, the one with the lowest id (the earliest
/// registered) wins, whatever order the players are supplied in.
#[derive(Debug, Default)]
pub struct NicknameResolver<'a> {
    index: HashMap<String, &'a Player>,
}

impl<'a> NicknameResolver<'a> {
    /// Build the index from the known players.
    pub fn new(players: &'a [Player]) -> Self {
        let mut sorted: Vec<&Player> = players.iter().collect();
        sorted.sort_by_key(|p| p.id);

        let mut index = HashMap::new();
        for player in sorted {
            for nick in &player.nicks {
                index.entry(nick.to_lowercase()).or_insert(player);
            }
        }

        Self { index }
    }

    /// Resolve a raw in-game name.
    pub fn resolve(&self, raw: &str) -> ResolvedPlayer<'a> {
        match self.index.get(&raw.to_lowercase()) {
            Some(player) => ResolvedPlayer::Known(player),
            None => {
                debug!("No player found for in-game name {:?}", raw);
                ResolvedPlayer::Unknown(raw.to_string())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// List every nickname claimed by more than one player.
pub fn nick_conflicts(players: &[Player]) -> Vec<NickConflict> {
    let mut claims: HashMap<String, Vec<PlayerId>> = HashMap::new();
    for player in players {
        for nick in &player.nicks {
            let owners = claims.entry(nick.to_lowercase()).or_default();
            if !owners.contains(&player.id) {
                owners.push(player.id);
            }
        }
    }

    let mut conflicts: Vec<NickConflict> = claims
        .into_iter()
        .filter(|(_, owners)| owners.len() > 1)
        .map(|(nick, mut players)| {
            players.sort();
            NickConflict { nick, players }
        })
        .collect();
    conflicts.sort_by(|a, b| a.nick.cmp(&b.nick));
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players() -> Vec<Player> {
        vec![
            Player::new(1.into(), "Alice").with_nicks(["Ali", "AliceGK"]),
            Player::new(2.into(), "Bob").with_nicks(["bobby"]),
        ]
    }

    #[test]
    fn test_resolve_known_case_insensitive() {
        let players = players();
        let resolver = NicknameResolver::new(&players);

        let resolved = resolver.resolve("ALI");
        assert_eq!(resolved.id(), Some(1.into()));
        assert_eq!(resolved.display_name(), "Alice");

        assert_eq!(resolver.resolve("Bobby").id(), Some(2.into()));
    }

    #[test]
    fn test_resolve_is_exact() {
        let players = players();
        let resolver = NicknameResolver::new(&players);

        assert_eq!(resolver.resolve("Al").id(), None);
        assert_eq!(resolver.resolve("Ali ").id(), None);
    }

    #[test]
    fn test_resolve_unknown_placeholder() {
        let players = players();
        let resolver = NicknameResolver::new(&players);

        let resolved = resolver.resolve("ghost");
        assert_eq!(resolved, ResolvedPlayer::Unknown("ghost".to_string()));
        assert_eq!(resolved.display_name(), "ghost (unknown)");
    }

    #[test]
    fn test_shared_nick_lowest_id_wins() {
        let players = vec![
            Player::new(7.into(), "Late").with_nicks(["shared"]),
            Player::new(3.into(), "Early").with_nicks(["SHARED"]),
        ];
        let resolver = NicknameResolver::new(&players);

        assert_eq!(resolver.resolve("Shared").id(), Some(3.into()));
    }

    #[test]
    fn test_shared_nick_independent_of_input_order() {
        let a = Player::new(3.into(), "Early").with_nicks(["shared"]);
        let b = Player::new(7.into(), "Late").with_nicks(["shared"]);
        let forward = vec![a.clone(), b.clone()];
        let backward = vec![b, a];

        assert_eq!(
            NicknameResolver::new(&forward).resolve("shared").id(),
            NicknameResolver::new(&backward).resolve("shared").id()
        );
    }

    #[test]
    fn test_nick_conflicts() {
        let players = vec![
            Player::new(2.into(), "B").with_nicks(["x", "y"]),
            Player::new(1.into(), "A").with_nicks(["X"]),
            Player::new(3.into(), "C").with_nicks(["z"]),
        ];

        let conflicts = nick_conflicts(&players);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].nick, "x");
        assert_eq!(conflicts[0].players, vec![PlayerId::new(1), PlayerId::new(2)]);
    }

    #[test]
    fn test_empty_resolver() {
        let resolver = NicknameResolver::new(&[]);
        assert!(resolver.is_empty());
        assert_eq!(resolver.resolve("anyone").id(), None);
    }
}
