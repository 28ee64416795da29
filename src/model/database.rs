use std::collections::HashMap;

use chrono::Utc;
use log::{debug, info, trace};
use rusqlite::{Connection, OptionalExtension, Result as SqlResult, Row};

use crate::auth::permissions;

use super::{discussion, message, session, user, Author, Discussion, Message, Session, Snowflake, User};

const DB_PATH: &str = "./agora.sqlite3";

/// Failure taxonomy for message mutations. Everything here is recoverable
/// client-side by refetching the discussion.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("message content must not be empty")]
    EmptyContent,
    #[error("parent message does not exist in this discussion")]
    InvalidParent,
    #[error("requester may not modify this message")]
    Forbidden,
    #[error("discussion or message not found")]
    NotFound,
    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

pub struct Database {
    conn: Connection,
}

/// Build the database.
impl Database {
    pub fn build() -> SqlResult<Database> {
        let conn = Connection::open(DB_PATH)?;
        Database::init_schema(&conn)?;
        Ok(Database { conn })
    }

    #[cfg(test)]
    pub fn build_in_memory() -> SqlResult<Database> {
        let conn = Connection::open_in_memory()?;
        Database::init_schema(&conn)?;
        Ok(Database { conn })
    }

    fn init_schema(conn: &Connection) -> SqlResult<()> {
        trace!("Opened database connection.");
        trace!("Initializing database...");

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id       INT PRIMARY KEY,
                name     TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                role     TEXT NOT NULL
            )",
            (),
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS sessions (
                id    INT PRIMARY KEY,
                token INT NOT NULL,
                user  INT NOT NULL,
                FOREIGN KEY(user) REFERENCES users(id)
            )",
            (),
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS discussions (
                id        INT PRIMARY KEY,
                item_type TEXT NOT NULL,
                item_id   TEXT NOT NULL,
                UNIQUE(item_type, item_id)
            )",
            (),
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS messages (
                id         INT PRIMARY KEY,
                discussion INT NOT NULL,
                author     INT NOT NULL,
                parent     INT,
                content    TEXT NOT NULL,
                created_at TEXT NOT NULL,
                edited     INT NOT NULL DEFAULT 0,
                deleted    INT NOT NULL DEFAULT 0,
                FOREIGN KEY(discussion) REFERENCES discussions(id)
            )",
            (),
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS likes (
                message INT NOT NULL,
                user    INT NOT NULL,
                UNIQUE(message, user)
            )",
            (),
        )?;

        info!("Finished initializing database");

        Ok(())
    }
}

/// User stuff
impl Database {
    pub fn add_user(&self, user: User) -> SqlResult<()> {
        debug!("Adding user {} to database", user.id);
        self.conn.execute(
            "INSERT INTO users (id, name, password, role) VALUES (?1, ?2, ?3, ?4)",
            (user.id.id(), user.name, user.password, user.role.as_str()),
        )?;
        Ok(())
    }

    pub fn get_user(&self, id: &user::Id) -> SqlResult<Option<User>> {
        debug!("Getting user {}", id);
        self.conn
            .query_row(
                "SELECT id, name, password, role FROM users WHERE id=?1",
                (id.id(),),
                map_user,
            )
            .optional()
    }

    pub fn get_user_by_name(&self, name: &str) -> SqlResult<Option<User>> {
        debug!("Getting user (name: {})", name);
        self.conn
            .query_row(
                "SELECT id, name, password, role FROM users WHERE name=?1",
                (name,),
                map_user,
            )
            .optional()
    }
}

/// Session stuff
impl Database {
    pub fn add_session(&self, session: Session) -> SqlResult<()> {
        debug!("Adding session {}", session.id);
        self.conn.execute(
            "INSERT INTO sessions (id, token, user) VALUES (?1, ?2, ?3)",
            (session.id.id(), session.token, session.user_id.id()),
        )?;
        Ok(())
    }

    pub fn get_session_from_token(&self, token: session::Token) -> SqlResult<Option<Session>> {
        trace!("Getting session from token");
        self.conn
            .query_row(
                "SELECT id, token, user FROM sessions WHERE token=?1",
                (token,),
                |row| {
                    Ok(Session {
                        id: snowflake_column(row, 0)?,
                        token: row.get(1)?,
                        user_id: snowflake_column(row, 2)?,
                    })
                },
            )
            .optional()
    }

    pub fn delete_session(&self, id: &session::Id) -> SqlResult<()> {
        debug!("Deleting session {}", id);
        self.conn
            .execute("DELETE FROM sessions WHERE id=?1", (id.id(),))?;
        Ok(())
    }
}

/// Discussion stuff
impl Database {
    pub fn create_discussion(&self, discussion: &Discussion) -> SqlResult<()> {
        debug!(
            "Creating discussion {} for {} {}",
            discussion.id, discussion.item_type, discussion.item_id
        );
        self.conn.execute(
            "INSERT INTO discussions (id, item_type, item_id) VALUES (?1, ?2, ?3)",
            (
                discussion.id.id(),
                discussion.item_type.as_str(),
                discussion.item_id.as_str(),
            ),
        )?;
        Ok(())
    }

    pub fn get_discussion(
        &self,
        item_type: discussion::ItemType,
        item_id: &str,
    ) -> SqlResult<Option<discussion::Id>> {
        trace!("Looking up discussion for {} {}", item_type, item_id);
        self.conn
            .query_row(
                "SELECT id FROM discussions WHERE item_type=?1 AND item_id=?2",
                (item_type.as_str(), item_id),
                |row| snowflake_column(row, 0),
            )
            .optional()
    }
}

/// Messages stuff
impl Database {
    /// The flat message list of a discussion, oldest first. Tombstoned
    /// messages are included so the reply tree keeps its shape.
    pub fn get_messages(&self, discussion: &discussion::Id) -> SqlResult<Vec<Message>> {
        trace!("Getting messages for discussion {}", discussion);

        let mut stmt = self.conn.prepare(
            "SELECT m.id, m.parent, m.content, m.created_at, m.edited, m.deleted,
                    m.author, u.name, u.role
             FROM messages m
             LEFT JOIN users u ON u.id = m.author
             WHERE m.discussion = ?1
             ORDER BY m.created_at ASC, m.id ASC",
        )?;
        let mut messages = stmt
            .query_map((discussion.id(),), map_message)?
            .collect::<SqlResult<Vec<_>>>()?;

        let likes = self.get_likes(discussion)?;
        for message in &mut messages {
            if let Some(users) = likes.get(&message.id) {
                message.likes = users.clone();
            }
        }

        Ok(messages)
    }

    pub fn get_message(
        &self,
        discussion: &discussion::Id,
        id: &message::Id,
    ) -> SqlResult<Option<Message>> {
        trace!("Getting message {} in discussion {}", id, discussion);

        let message = self
            .conn
            .query_row(
                "SELECT m.id, m.parent, m.content, m.created_at, m.edited, m.deleted,
                        m.author, u.name, u.role
                 FROM messages m
                 LEFT JOIN users u ON u.id = m.author
                 WHERE m.discussion = ?1 AND m.id = ?2",
                (discussion.id(), id.id()),
                map_message,
            )
            .optional()?;

        let Some(mut message) = message else {
            return Ok(None);
        };

        let mut stmt = self
            .conn
            .prepare("SELECT user FROM likes WHERE message=?1 ORDER BY rowid ASC")?;
        message.likes = stmt
            .query_map((id.id(),), |row| snowflake_column(row, 0))?
            .collect::<SqlResult<Vec<_>>>()?;

        Ok(Some(message))
    }

    /// Appends a message. The parent, when given, must already exist in the
    /// same discussion; parents are assigned exactly once, here.
    pub fn post_message(
        &self,
        discussion: &discussion::Id,
        id: message::Id,
        author: &user::Id,
        content: &str,
        parent: Option<&message::Id>,
    ) -> Result<(), StoreError> {
        if content.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }

        if let Some(parent) = parent {
            let owner: Option<i64> = self
                .conn
                .query_row(
                    "SELECT discussion FROM messages WHERE id=?1",
                    (parent.id(),),
                    |row| row.get(0),
                )
                .optional()?;
            if owner != Some(discussion.id()) {
                return Err(StoreError::InvalidParent);
            }
        }

        debug!("Adding message {} to discussion {}", id, discussion);

        self.conn.execute(
            "INSERT INTO messages (id, discussion, author, parent, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                id.id(),
                discussion.id(),
                author.id(),
                parent.map(|parent| parent.id()),
                content,
                Utc::now(),
            ),
        )?;

        Ok(())
    }

    /// Replaces a message's content. Author-only: admins moderate with
    /// [`delete_message`](Self::delete_message), they do not rewrite what
    /// someone else said.
    pub fn edit_message(
        &self,
        discussion: &discussion::Id,
        id: &message::Id,
        new_content: &str,
        requester: &User,
    ) -> Result<(), StoreError> {
        if new_content.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }

        let message = self.get_message(discussion, id)?.ok_or(StoreError::NotFound)?;
        if message.deleted {
            return Err(StoreError::NotFound);
        }
        if !permissions::can_edit(&message, requester) {
            return Err(StoreError::Forbidden);
        }

        debug!("User {} editing message {}", requester.id, id);

        self.conn.execute(
            "UPDATE messages SET content=?1, edited=1 WHERE id=?2",
            (new_content, id.id()),
        )?;

        Ok(())
    }

    /// Tombstones a message: content cleared, id and parent kept so replies
    /// are not orphaned. With `cascade`, every transitive reply is
    /// tombstoned in the same call.
    pub fn delete_message(
        &self,
        discussion: &discussion::Id,
        id: &message::Id,
        requester: &User,
        cascade: bool,
    ) -> Result<(), StoreError> {
        let message = self.get_message(discussion, id)?.ok_or(StoreError::NotFound)?;
        if message.deleted {
            return Err(StoreError::NotFound);
        }
        if !permissions::can_modify(&message, requester) {
            return Err(StoreError::Forbidden);
        }

        let mut doomed = vec![id.clone()];
        if cascade {
            doomed.extend(self.descendants_of(discussion, id)?);
        }

        debug!(
            "User {} deleting {} message(s) rooted at {} (cascade: {})",
            requester.id,
            doomed.len(),
            id,
            cascade
        );

        let mut stmt = self
            .conn
            .prepare("UPDATE messages SET deleted=1, content='' WHERE id=?1")?;
        for target in &doomed {
            stmt.execute((target.id(),))?;
        }

        Ok(())
    }

    /// Idempotent like toggle: a second toggle by the same user undoes the
    /// first.
    pub fn toggle_like(
        &self,
        discussion: &discussion::Id,
        id: &message::Id,
        user: &user::Id,
    ) -> Result<(), StoreError> {
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM messages WHERE discussion=?1 AND id=?2",
                (discussion.id(), id.id()),
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::NotFound);
        }

        let removed = self.conn.execute(
            "DELETE FROM likes WHERE message=?1 AND user=?2",
            (id.id(), user.id()),
        )?;
        if removed == 0 {
            debug!("User {} liking message {}", user, id);
            self.conn.execute(
                "INSERT INTO likes (message, user) VALUES (?1, ?2)",
                (id.id(), user.id()),
            )?;
        } else {
            debug!("User {} unliking message {}", user, id);
        }

        Ok(())
    }

    /// All transitive replies of `root`, gathered with a worklist over the
    /// flat parent links so nesting depth never grows the call stack.
    fn descendants_of(
        &self,
        discussion: &discussion::Id,
        root: &message::Id,
    ) -> SqlResult<Vec<message::Id>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, parent FROM messages WHERE discussion=?1 AND parent IS NOT NULL",
        )?;
        let rows = stmt.query_map((discussion.id(),), |row| {
            Ok((snowflake_column(row, 0)?, snowflake_column(row, 1)?))
        })?;

        let mut children: HashMap<message::Id, Vec<message::Id>> = HashMap::new();
        for row in rows {
            let (child, parent) = row?;
            children.entry(parent).or_default().push(child);
        }

        let mut found = Vec::new();
        let mut frontier = vec![root.clone()];
        while let Some(parent) = frontier.pop() {
            if let Some(replies) = children.remove(&parent) {
                found.extend(replies.iter().cloned());
                frontier.extend(replies);
            }
        }

        Ok(found)
    }

    fn get_likes(
        &self,
        discussion: &discussion::Id,
    ) -> SqlResult<HashMap<message::Id, Vec<user::Id>>> {
        let mut stmt = self.conn.prepare(
            "SELECT l.message, l.user FROM likes l
             JOIN messages m ON m.id = l.message
             WHERE m.discussion = ?1
             ORDER BY l.rowid ASC",
        )?;
        let rows = stmt.query_map((discussion.id(),), |row| {
            Ok((snowflake_column(row, 0)?, snowflake_column(row, 1)?))
        })?;

        let mut likes: HashMap<message::Id, Vec<user::Id>> = HashMap::new();
        for row in rows {
            let (message, user) = row?;
            likes.entry(message).or_default().push(user);
        }
        Ok(likes)
    }
}

fn map_user(row: &Row) -> SqlResult<User> {
    Ok(User {
        id: snowflake_column(row, 0)?,
        name: row.get(1)?,
        password: row.get(2)?,
        role: role_column(row, 3)?,
    })
}

fn map_message(row: &Row) -> SqlResult<Message> {
    trace!("Mapping db row to message");

    let author_id = snowflake_column(row, 6)?;
    let author = match row.get::<usize, Option<String>>(7)? {
        Some(display_name) => Author {
            id: author_id,
            display_name,
            role: role_column(row, 8)?,
        },
        // The account is gone; the message outlives it.
        None => Author::anonymous(author_id),
    };

    Ok(Message {
        id: snowflake_column(row, 0)?,
        author,
        parent_message_id: optional_snowflake_column(row, 1)?,
        content: row.get(2)?,
        timestamp: row.get(3)?,
        edited: row.get(4)?,
        likes: Vec::new(),
        deleted: row.get(5)?,
    })
}

fn role_column(row: &Row, index: usize) -> SqlResult<user::Role> {
    let raw: String = row.get(index)?;
    user::Role::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Text,
            format!("unknown role {raw:?}").into(),
        )
    })
}

fn snowflake_column(row: &Row, index: usize) -> SqlResult<Snowflake> {
    let raw: i64 = row.get(index)?;
    Snowflake::try_from(raw).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Integer,
            format!("invalid snowflake {raw}: {err}").into(),
        )
    })
}

fn optional_snowflake_column(row: &Row, index: usize) -> SqlResult<Option<Snowflake>> {
    match row.get::<usize, Option<i64>>(index)? {
        Some(raw) => {
            let snowflake = Snowflake::try_from(raw).map_err(|err| {
                rusqlite::Error::FromSqlConversionFailure(
                    index,
                    rusqlite::types::Type::Integer,
                    format!("invalid snowflake {raw}: {err}").into(),
                )
            })?;
            Ok(Some(snowflake))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{user::Role, ItemType};

    struct Fixture {
        db: Database,
        cloud: crate::Snowcloud,
    }

    impl Fixture {
        fn new() -> Fixture {
            Fixture {
                db: Database::build_in_memory().expect("in-memory database builds"),
                cloud: crate::Snowcloud::new(crate::PRIMARY_ID, crate::EPOCH)
                    .expect("snowcloud config is valid"),
            }
        }

        fn flake(&self) -> Snowflake {
            self.cloud.next_id().expect("generates a snowflake").into()
        }

        fn user(&self, name: &str, role: Role) -> User {
            let user = User {
                id: self.flake(),
                name: name.to_string(),
                password: "$argon2id$stub".to_string(),
                role,
            };
            self.db.add_user(user.clone()).expect("user inserts");
            user
        }

        fn discussion(&self, item_id: &str) -> discussion::Id {
            let discussion = Discussion {
                id: self.flake(),
                item_type: ItemType::Question,
                item_id: item_id.to_string(),
            };
            self.db
                .create_discussion(&discussion)
                .expect("discussion inserts");
            discussion.id
        }

        fn post(
            &self,
            discussion: &discussion::Id,
            author: &User,
            content: &str,
            parent: Option<&message::Id>,
        ) -> message::Id {
            let id = self.flake();
            self.db
                .post_message(discussion, id.clone(), &author.id, content, parent)
                .expect("message posts");
            id
        }
    }

    #[test]
    fn two_posters_to_one_discussion_both_land() {
        let f = Fixture::new();
        let asha = f.user("asha", Role::Member);
        let ravi = f.user("ravi", Role::Member);
        let d = f.discussion("q-101");

        let first = f.post(&d, &asha, "Is sec 44AD applicable?", None);
        let second = f.post(&d, &ravi, "Yes, if turnover is under the limit.", None);

        let messages = f.db.get_messages(&d).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, first);
        assert_eq!(messages[1].id, second);
        assert_eq!(messages[0].author.display_name, "asha");
        assert!(!messages[0].edited);
        assert!(!messages[0].deleted);
    }

    #[test]
    fn blank_content_is_rejected() {
        let f = Fixture::new();
        let asha = f.user("asha", Role::Member);
        let d = f.discussion("q-101");

        let result = f.db.post_message(&d, f.flake(), &asha.id, "   \n\t", None);

        assert!(matches!(result, Err(StoreError::EmptyContent)));
        assert!(f.db.get_messages(&d).unwrap().is_empty());
    }

    #[test]
    fn parent_must_exist_in_the_same_discussion() {
        let f = Fixture::new();
        let asha = f.user("asha", Role::Member);
        let d1 = f.discussion("q-101");
        let d2 = f.discussion("q-202");
        let elsewhere = f.post(&d2, &asha, "different thread", None);

        let unknown = f.flake();
        let result = f
            .db
            .post_message(&d1, f.flake(), &asha.id, "reply", Some(&unknown));
        assert!(matches!(result, Err(StoreError::InvalidParent)));

        let result = f
            .db
            .post_message(&d1, f.flake(), &asha.id, "reply", Some(&elsewhere));
        assert!(matches!(result, Err(StoreError::InvalidParent)));
    }

    #[test]
    fn edit_by_author_sets_flag_and_replaces_content() {
        let f = Fixture::new();
        let asha = f.user("asha", Role::Member);
        let d = f.discussion("q-101");
        let id = f.post(&d, &asha, "orignal", None);

        f.db.edit_message(&d, &id, "original, corrected", &asha)
            .expect("author edits own message");

        let message = f.db.get_message(&d, &id).unwrap().unwrap();
        assert!(message.edited);
        assert_eq!(message.content, "original, corrected");
    }

    #[test]
    fn edit_by_non_author_is_forbidden_even_for_admins() {
        let f = Fixture::new();
        let asha = f.user("asha", Role::Member);
        let ravi = f.user("ravi", Role::Member);
        let mod_user = f.user("moderator", Role::Admin);
        let d = f.discussion("q-101");
        let id = f.post(&d, &asha, "my words", None);

        let result = f.db.edit_message(&d, &id, "changed", &ravi);
        assert!(matches!(result, Err(StoreError::Forbidden)));

        // Admins delete, they do not rewrite.
        let result = f.db.edit_message(&d, &id, "changed", &mod_user);
        assert!(matches!(result, Err(StoreError::Forbidden)));

        let message = f.db.get_message(&d, &id).unwrap().unwrap();
        assert_eq!(message.content, "my words");
        assert!(!message.edited);
    }

    #[test]
    fn tombstone_delete_leaves_replies_attached() {
        let f = Fixture::new();
        let asha = f.user("asha", Role::Member);
        let d = f.discussion("q-101");
        let a = f.post(&d, &asha, "A", None);
        let b = f.post(&d, &asha, "B", Some(&a));
        let c = f.post(&d, &asha, "C", Some(&b));

        f.db.delete_message(&d, &a, &asha, false)
            .expect("author deletes own message");

        let messages = f.db.get_messages(&d).unwrap();
        let get = |id: &message::Id| messages.iter().find(|m| m.id == *id).unwrap();

        assert!(get(&a).deleted);
        assert_eq!(get(&a).content, "");
        assert!(!get(&b).deleted);
        assert_eq!(get(&b).content, "B");
        assert!(!get(&c).deleted);
        assert_eq!(get(&b).parent_message_id, Some(a.clone()));
        assert_eq!(get(&c).parent_message_id, Some(b.clone()));
    }

    #[test]
    fn cascade_delete_tombstones_the_whole_subtree() {
        let f = Fixture::new();
        let asha = f.user("asha", Role::Member);
        let d = f.discussion("q-101");
        let a = f.post(&d, &asha, "A", None);
        let b = f.post(&d, &asha, "B", Some(&a));
        let c = f.post(&d, &asha, "C", Some(&b));
        let unrelated = f.post(&d, &asha, "other", None);

        f.db.delete_message(&d, &a, &asha, true).expect("cascade delete");

        let messages = f.db.get_messages(&d).unwrap();
        let get = |id: &message::Id| messages.iter().find(|m| m.id == *id).unwrap();

        assert!(get(&a).deleted);
        assert!(get(&b).deleted);
        assert!(get(&c).deleted);
        assert!(!get(&unrelated).deleted);
    }

    #[test]
    fn delete_authority_is_author_or_admin() {
        let f = Fixture::new();
        let asha = f.user("asha", Role::Member);
        let ravi = f.user("ravi", Role::Member);
        let mod_user = f.user("moderator", Role::Admin);
        let d = f.discussion("q-101");

        let first = f.post(&d, &asha, "first", None);
        let result = f.db.delete_message(&d, &first, &ravi, false);
        assert!(matches!(result, Err(StoreError::Forbidden)));

        f.db.delete_message(&d, &first, &mod_user, false)
            .expect("admin moderates");
        assert!(f.db.get_message(&d, &first).unwrap().unwrap().deleted);
    }

    #[test]
    fn mutating_a_tombstone_reports_not_found() {
        let f = Fixture::new();
        let asha = f.user("asha", Role::Member);
        let d = f.discussion("q-101");
        let id = f.post(&d, &asha, "gone soon", None);
        f.db.delete_message(&d, &id, &asha, false).unwrap();

        let result = f.db.edit_message(&d, &id, "resurrect", &asha);
        assert!(matches!(result, Err(StoreError::NotFound)));

        let result = f.db.delete_message(&d, &id, &asha, false);
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[test]
    fn toggle_like_round_trips() {
        let f = Fixture::new();
        let asha = f.user("asha", Role::Member);
        let ravi = f.user("ravi", Role::Member);
        let d = f.discussion("q-101");
        let id = f.post(&d, &asha, "useful answer", None);

        f.db.toggle_like(&d, &id, &ravi.id).unwrap();
        let message = f.db.get_message(&d, &id).unwrap().unwrap();
        assert!(message.liked_by(&ravi.id));
        assert_eq!(message.likes.len(), 1);

        f.db.toggle_like(&d, &id, &ravi.id).unwrap();
        let message = f.db.get_message(&d, &id).unwrap().unwrap();
        assert!(message.likes.is_empty());
    }

    #[test]
    fn liking_an_unknown_message_reports_not_found() {
        let f = Fixture::new();
        let asha = f.user("asha", Role::Member);
        let d = f.discussion("q-101");

        let unknown = f.flake();
        let result = f.db.toggle_like(&d, &unknown, &asha.id);
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[test]
    fn deleted_account_resolves_to_anonymous_author() {
        let f = Fixture::new();
        let d = f.discussion("q-101");

        // Author id without a users row, as after account deletion.
        let ghost = f.flake();
        f.db.post_message(&d, f.flake(), &ghost, "who said this?", None)
            .unwrap();

        let messages = f.db.get_messages(&d).unwrap();
        assert_eq!(messages[0].author.display_name, "Anonymous");
        assert_eq!(messages[0].author.role, Role::Member);
        assert_eq!(messages[0].author.id, ghost);
    }

    #[test]
    fn session_round_trip() {
        let f = Fixture::new();
        let asha = f.user("asha", Role::Member);
        let session = Session::generate(f.flake(), asha.id);

        f.db.add_session(session.clone()).unwrap();
        let found = f
            .db
            .get_session_from_token(session.token)
            .unwrap()
            .expect("session is stored");
        assert_eq!(found.id, session.id);

        f.db.delete_session(&session.id).unwrap();
        assert!(f.db.get_session_from_token(session.token).unwrap().is_none());
    }
}
