//! Minimal identities for players and teams.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of entity a reference points at.
///
/// Player ids and team ids live in separate identity spaces: the same
/// number may name a player and a team, and the two are never compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Player,
    Team,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Player => write!(f, "player"),
            EntityKind::Team => write!(f, "team"),
        }
    }
}

/// The identity needed to track or favorite a player or team.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityRef {
    pub id: u32,
    pub name: String,
}

impl EntityRef {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Parse an `id:name` pair as given on the command line.
    ///
    /// A bare id is accepted and named `#<id>`.
    pub fn parse_pair(s: &str) -> Option<Self> {
        let s = s.trim();
        let (id_str, name) = match s.split_once(':') {
            Some((id, name)) => (id, name.trim().to_string()),
            None => (s, String::new()),
        };
        let id: u32 = id_str.trim().parse().ok()?;
        let name = if name.is_empty() {
            format!("#{}", id)
        } else {
            name
        };
        Some(Self { id, name })
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair_with_name() {
        let r = EntityRef::parse_pair("2544:LeBron James").unwrap();
        assert_eq!(r, EntityRef::new(2544, "LeBron James"));
    }

    #[test]
    fn test_parse_pair_bare_id() {
        let r = EntityRef::parse_pair(" 1610612747 ").unwrap();
        assert_eq!(r.id, 1610612747);
        assert_eq!(r.name, "#1610612747");
    }

    #[test]
    fn test_parse_pair_invalid() {
        assert!(EntityRef::parse_pair("abc:Someone").is_none());
        assert!(EntityRef::parse_pair("").is_none());
    }

    #[test]
    fn test_entity_ref_rejects_unknown_fields() {
        let parsed = serde_json::from_str::<EntityRef>(r#"{"id": 1, "name": "A", "extra": true}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_entity_kind_serialization() {
        assert_eq!(serde_json::to_string(&EntityKind::Team).unwrap(), "\"team\"");
        assert_eq!(format!("{}", EntityKind::Player), "player");
    }
}
