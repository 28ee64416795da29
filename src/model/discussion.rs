use std::fmt::{Display, Formatter};

use super::Snowflake;

pub type Id = Snowflake;

/// The kind of content item a discussion hangs off of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Question,
    Resource,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Question => "question",
            ItemType::Resource => "resource",
        }
    }

    pub fn parse(value: &str) -> Option<ItemType> {
        match value {
            "question" => Some(ItemType::Question),
            "resource" => Some(ItemType::Resource),
            _ => None,
        }
    }
}

impl Display for ItemType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One comment thread, keyed by the item it discusses. Created lazily on the
/// first message post and never deleted.
#[derive(Clone, Debug)]
pub struct Discussion {
    pub id: Id,
    pub item_type: ItemType,
    pub item_id: String,
}
