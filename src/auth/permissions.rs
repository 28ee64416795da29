//! Who may do what to a message.
//!
//! Deletion falls to the author or any admin. Editing stays author-only:
//! admins moderate, they do not impersonate authorship.

use crate::model::{user::Role, Message, User};

pub fn can_modify(message: &Message, user: &User) -> bool {
    user.role == Role::Admin || message.author.id == user.id
}

pub fn can_edit(message: &Message, user: &User) -> bool {
    message.author.id == user.id
}
