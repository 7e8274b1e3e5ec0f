//! # porbeagle-macros
//!
//! The `DiscordView` derive marker. It generates nothing itself: the
//! companion `ViewParts` implementation comes from `porbeagle-codegen` at
//! build time. The derive registers the `#[sticker]` and `#[action_row(n)]`
//! helper attributes and rejects malformed helper arguments where they are
//! written.
//!
//! ```rust,ignore
//! use porbeagle::{Button, DiscordView, Embed, MessageView, Snowflake};
//!
//! #[derive(Clone, DiscordView)]
//! pub struct Greeting {
//!     #[sticker]
//!     wave: Snowflake,
//!     card: Embed,
//!     #[action_row(0)]
//!     accept: Button,
//! }
//!
//! impl MessageView for Greeting {}
//! ```

mod view_derive;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Marks a struct as a message view.
///
/// Field attributes:
/// - `#[sticker]` - the `Snowflake` field is sent as a sticker id
/// - `#[action_row(n)]` - the field is a component of action row `n`
///
/// `Embed` fields need no attribute.
#[proc_macro_derive(DiscordView, attributes(sticker, action_row))]
pub fn discord_view_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match view_derive::validate(&input) {
        Ok(()) => TokenStream::new(),
        Err(e) => e.to_compile_error().into(),
    }
}
