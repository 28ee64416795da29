//! Rebuilds the reply forest from a discussion's flat message list.
//!
//! Storage stays flat and every read reconstructs the tree; that keeps
//! mutations single-row and sidesteps keeping materialized tree pointers
//! consistent under concurrent writers. The rebuild is one pass plus sorts.

use std::collections::{HashMap, HashSet};

use super::{message, Message};

#[derive(Clone, Debug)]
pub struct ThreadNode {
    pub message: Message,
    pub replies: Vec<ThreadNode>,
}

/// Builds the reply forest for a discussion.
///
/// Messages whose declared parent is missing from the list degrade to
/// top-level nodes instead of being dropped. Top-level messages and every
/// reply list are ordered by (timestamp, id).
pub fn build_thread(messages: Vec<Message>) -> Vec<ThreadNode> {
    let ids: HashSet<message::Id> = messages.iter().map(|m| m.id.clone()).collect();

    let mut children: HashMap<message::Id, Vec<Message>> = HashMap::new();
    let mut roots: Vec<Message> = Vec::new();
    for message in messages {
        let parent = message
            .parent_message_id
            .clone()
            .filter(|parent| *parent != message.id && ids.contains(parent));
        match parent {
            Some(parent) => children.entry(parent).or_default().push(message),
            None => roots.push(message),
        }
    }

    roots.sort_by(chronological);
    for replies in children.values_mut() {
        replies.sort_by(chronological);
    }

    roots
        .into_iter()
        .map(|root| assemble(root, &mut children))
        .collect()
}

fn chronological(a: &Message, b: &Message) -> std::cmp::Ordering {
    a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id))
}

/// Assembles the subtree rooted at `root` with an explicit stack, so thread
/// depth never grows the call stack.
fn assemble(root: Message, children: &mut HashMap<message::Id, Vec<Message>>) -> ThreadNode {
    let pending = children.remove(&root.id).unwrap_or_default();
    let mut stack = vec![(
        ThreadNode {
            message: root,
            replies: Vec::new(),
        },
        pending.into_iter(),
    )];

    loop {
        let (_, remaining) = stack.last_mut().expect("stack starts non-empty");
        match remaining.next() {
            Some(child) => {
                let pending = children.remove(&child.id).unwrap_or_default();
                stack.push((
                    ThreadNode {
                        message: child,
                        replies: Vec::new(),
                    },
                    pending.into_iter(),
                ));
            }
            None => {
                let (node, _) = stack.pop().expect("stack starts non-empty");
                match stack.last_mut() {
                    Some((parent, _)) => parent.replies.push(node),
                    None => return node,
                }
            }
        }
    }
}

/// Pre-order walk of the forest, yielding every message id once.
pub fn thread_ids(forest: &[ThreadNode]) -> Vec<message::Id> {
    let mut ids = Vec::new();
    let mut stack: Vec<&ThreadNode> = forest.iter().rev().collect();
    while let Some(node) = stack.pop() {
        ids.push(node.message.id.clone());
        stack.extend(node.replies.iter().rev());
    }
    ids
}
