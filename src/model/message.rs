use chrono::{DateTime, Utc};

use super::{user, Snowflake};

pub type Id = Snowflake;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Id,
    pub author: Author,
    /// `None` for top-level messages. Assigned once at creation; a message
    /// never moves to another parent.
    pub parent_message_id: Option<Id>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub edited: bool,
    pub likes: Vec<user::Id>,
    /// Tombstone flag. Deleted messages keep their id and parent so the
    /// thread structure survives; content is cleared.
    pub deleted: bool,
}

impl Message {
    pub fn liked_by(&self, user: &user::Id) -> bool {
        self.likes.contains(user)
    }
}

/// Author as resolved by the store at read time. A message whose account has
/// since been deleted keeps its author id but renders anonymously.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: user::Id,
    pub display_name: String,
    pub role: user::Role,
}

impl Author {
    pub fn anonymous(id: user::Id) -> Author {
        Author {
            id,
            display_name: "Anonymous".to_string(),
            role: user::Role::Member,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == user::Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::user::Role;
    use chrono::TimeZone;

    fn flake(n: i64) -> Snowflake {
        Snowflake::try_from((n << 20) | (1 << 12) | 1).expect("valid snowflake bits")
    }

    #[test]
    fn serializes_with_wire_names() {
        let message = Message {
            id: flake(2),
            author: Author {
                id: flake(1),
                display_name: "Priya".to_string(),
                role: Role::Admin,
            },
            parent_message_id: None,
            content: "AS 22 applies here".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            edited: false,
            likes: vec![flake(1)],
            deleted: false,
        };

        let value = serde_json::to_value(&message).expect("message serializes");

        // Ids cross the wire as strings, field names as camelCase.
        assert!(value["id"].is_string());
        assert!(value.get("parentMessageId").is_some());
        assert_eq!(value["author"]["displayName"], "Priya");
        assert_eq!(value["author"]["role"], "admin");
        assert_eq!(value["likes"][0], value["author"]["id"]);
        assert!(message.author.is_admin());
    }

    #[test]
    fn liked_by_checks_membership() {
        let user = flake(7);
        let other = flake(8);
        let message = Message {
            id: flake(9),
            author: Author::anonymous(flake(1)),
            parent_message_id: None,
            content: "hello".to_string(),
            timestamp: Utc::now(),
            edited: false,
            likes: vec![user.clone()],
            deleted: false,
        };

        assert!(message.liked_by(&user));
        assert!(!message.liked_by(&other));
    }
}
