use crate::types::{Component, Embed, Snowflake};

/// Message parts collected from a view's fields.
///
/// Implemented by the generated companion of every view declaration; there
/// is normally no reason to implement it by hand.
pub trait ViewParts {
    fn stickers(&self) -> Vec<Snowflake>;

    fn embeds(&self) -> Vec<Embed>;

    /// One `Component::ActionRow` per declared row index, ascending.
    fn components(&self) -> Vec<Component>;
}

/// A composable message.
///
/// Implementing `MessageView<Self, M>` additionally generates
/// `fn create(vm: M) -> Self`, built through the view's `From<M>`
/// implementation.
pub trait MessageView<TSelf = Self, TModel = ()>: ViewParts {
    /// Plain message content.
    fn text(&self) -> Option<String> {
        None
    }
}
