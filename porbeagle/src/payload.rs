//! The message shape handed to a delivery client.

use serde::{Deserialize, Serialize};

use crate::error::PayloadError;
use crate::types::{Component, Embed, Snowflake};
use crate::view::MessageView;

pub const MAX_CONTENT_LENGTH: usize = 2000;
pub const MAX_EMBEDS: usize = 10;
pub const MAX_ACTION_ROWS: usize = 5;
pub const MAX_ROW_COMPONENTS: usize = 5;
pub const MAX_STICKERS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sticker_ids: Vec<Snowflake>,
}

impl MessagePayload {
    /// Compose the payload of `view`.
    pub fn from_view<V, TSelf, TModel>(view: &V) -> Self
    where
        V: MessageView<TSelf, TModel> + ?Sized,
    {
        Self {
            content: view.text(),
            embeds: view.embeds(),
            components: view.components(),
            sticker_ids: view.stickers(),
        }
    }

    /// Check the payload against the platform's message limits.
    pub fn validate(&self) -> Result<(), PayloadError> {
        let content_len = self.content.as_deref().map_or(0, |c| c.chars().count());
        if content_len == 0
            && self.embeds.is_empty()
            && self.components.is_empty()
            && self.sticker_ids.is_empty()
        {
            return Err(PayloadError::Empty);
        }
        if content_len > MAX_CONTENT_LENGTH {
            return Err(PayloadError::ContentTooLong {
                len: content_len,
                max: MAX_CONTENT_LENGTH,
            });
        }
        if self.embeds.len() > MAX_EMBEDS {
            return Err(PayloadError::TooManyEmbeds {
                count: self.embeds.len(),
                max: MAX_EMBEDS,
            });
        }
        if self.sticker_ids.len() > MAX_STICKERS {
            return Err(PayloadError::TooManyStickers {
                count: self.sticker_ids.len(),
                max: MAX_STICKERS,
            });
        }
        if self.components.len() > MAX_ACTION_ROWS {
            return Err(PayloadError::TooManyActionRows {
                count: self.components.len(),
                max: MAX_ACTION_ROWS,
            });
        }

        for (index, component) in self.components.iter().enumerate() {
            let Component::ActionRow(row) = component else {
                return Err(PayloadError::ComponentOutsideRow { index });
            };
            if row.is_empty() {
                return Err(PayloadError::EmptyActionRow { row: index });
            }
            if row.len() > MAX_ROW_COMPONENTS {
                return Err(PayloadError::TooManyRowComponents {
                    row: index,
                    count: row.len(),
                    max: MAX_ROW_COMPONENTS,
                });
            }
            if row
                .components
                .iter()
                .any(|c| matches!(c, Component::ActionRow(_)))
            {
                return Err(PayloadError::NestedActionRow { row: index });
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
