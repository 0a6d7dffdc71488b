//! Cached resource types.

use crate::RecordId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A resource item that can be cached and paged.
///
/// Records are stored as JSON alongside their id; the id must be stable
/// across fetches so merges can overwrite and reconcile by key.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Stable identifier of this record.
    fn id(&self) -> RecordId;
}

/// A post in the general feed or in "my posts".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post identifier.
    pub id: RecordId,
    /// Identifier of the author (a [`User`] id).
    pub author_id: RecordId,
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
    /// Unix timestamp of creation.
    pub created_at: i64,
}

impl Record for Post {
    fn id(&self) -> RecordId {
        self.id
    }
}

/// An entry of the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Avatar location, if the user has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Record for User {
    fn id(&self) -> RecordId {
        self.id
    }
}

/// The resource streams served by the engine.
///
/// Each kind owns an independent partition of the local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// The general post feed.
    Feed,
    /// Posts authored by the signed-in user.
    MyPosts,
    /// The user directory.
    Directory,
}

impl ResourceKind {
    /// All kinds, in a stable order.
    pub const ALL: [ResourceKind; 3] = [Self::Feed, Self::MyPosts, Self::Directory];

    /// Partition key used by the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::MyPosts => "my_posts",
            Self::Directory => "directory",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feed" => Ok(Self::Feed),
            "my_posts" | "my-posts" => Ok(Self::MyPosts),
            "directory" | "users" => Ok(Self::Directory),
            other => Err(format!("unknown resource kind: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_aliases() {
        assert_eq!("my-posts".parse::<ResourceKind>(), Ok(ResourceKind::MyPosts));
        assert_eq!("users".parse::<ResourceKind>(), Ok(ResourceKind::Directory));
        assert!("timeline".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn kind_round_trips_through_as_str() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.as_str().parse::<ResourceKind>(), Ok(kind));
        }
    }

    #[test]
    fn user_without_avatar_omits_field() {
        let user = User {
            id: RecordId::new(7),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            avatar_url: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("avatar_url"));
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }
}
