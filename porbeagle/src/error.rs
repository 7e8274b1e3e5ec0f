use thiserror::Error;

/// A message payload that the platform would reject.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Message has no content, embeds, components or stickers")]
    Empty,

    #[error("Content is {len} characters long, at most {max} are allowed")]
    ContentTooLong { len: usize, max: usize },

    #[error("Too many embeds ({count}, at most {max})")]
    TooManyEmbeds { count: usize, max: usize },

    #[error("Too many action rows ({count}, at most {max})")]
    TooManyActionRows { count: usize, max: usize },

    #[error("Action row {row} has {count} components, at most {max} are allowed")]
    TooManyRowComponents { row: usize, count: usize, max: usize },

    #[error("Action row {row} is empty")]
    EmptyActionRow { row: usize },

    #[error("Action row {row} contains another action row")]
    NestedActionRow { row: usize },

    #[error("Top-level component {index} is not an action row")]
    ComponentOutsideRow { index: usize },

    #[error("Too many stickers ({count}, at most {max})")]
    TooManyStickers { count: usize, max: usize },
}
