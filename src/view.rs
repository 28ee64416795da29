//! Client-side state for one open discussion.
//!
//! The server answers every mutation with the authoritative flat message
//! list, and the view swaps its copy wholesale instead of patching entries,
//! so local state can never drift from the store. Composition state lives
//! only here and reaches the server solely as the `parentMessageId` of a
//! submitted message.

use crate::model::{
    message,
    thread::{build_thread, ThreadNode},
    Message,
};

#[derive(Debug, Default)]
struct Composer {
    replying_to: Option<message::Id>,
    draft: String,
}

#[derive(Debug, Default)]
pub struct DiscussionView {
    messages: Vec<Message>,
    composer: Composer,
    closed: bool,
}

/// What the delete confirmation should say.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeletePrompt {
    /// No replies; plain confirmation.
    MessageOnly,
    /// Replies exist; the user chooses between tombstone-only and cascade.
    WithReplies { direct_replies: usize },
}

/// A composed message ready to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub content: String,
    pub parent_message_id: Option<message::Id>,
}

impl DiscussionView {
    pub fn new() -> DiscussionView {
        DiscussionView::default()
    }

    /// Marks the view closed (navigated away). Responses landing after this
    /// are discarded by [`reconcile`](Self::reconcile).
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_open(&self) -> bool {
        !self.closed
    }

    /// Replaces the whole message list with a server response. Returns
    /// whether the response was applied; a closed view drops it.
    pub fn reconcile(&mut self, authoritative: Vec<Message>) -> bool {
        if self.closed {
            return false;
        }
        self.messages = authoritative;
        true
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The reply forest for rendering.
    pub fn thread(&self) -> Vec<ThreadNode> {
        build_thread(self.messages.clone())
    }

    pub fn begin_reply(&mut self, parent: message::Id) {
        self.composer.replying_to = Some(parent);
    }

    pub fn cancel_reply(&mut self) {
        self.composer = Composer::default();
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.composer.draft = draft.into();
    }

    pub fn draft(&self) -> &str {
        &self.composer.draft
    }

    pub fn replying_to(&self) -> Option<&message::Id> {
        self.composer.replying_to.as_ref()
    }

    /// The message to send, or `None` while the draft is blank.
    pub fn submission(&self) -> Option<Submission> {
        if self.composer.draft.trim().is_empty() {
            return None;
        }
        Some(Submission {
            content: self.composer.draft.clone(),
            parent_message_id: self.composer.replying_to.clone(),
        })
    }

    /// Applies the server's response to a successful post and clears the
    /// composer. On failure the caller skips this, so the draft survives for
    /// manual retry.
    pub fn complete_submission(&mut self, authoritative: Vec<Message>) -> bool {
        let applied = self.reconcile(authoritative);
        if applied {
            self.composer = Composer::default();
        }
        applied
    }

    /// Which confirmation to show before deleting `message`. Replies make
    /// the choice between tombstone-only and cascade explicit.
    pub fn delete_prompt(&self, message: &message::Id) -> DeletePrompt {
        let direct_replies = self
            .messages
            .iter()
            .filter(|m| m.parent_message_id.as_ref() == Some(message))
            .count();

        if direct_replies == 0 {
            DeletePrompt::MessageOnly
        } else {
            DeletePrompt::WithReplies { direct_replies }
        }
    }
}
