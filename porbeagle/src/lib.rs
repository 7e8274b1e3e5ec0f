//! # porbeagle
//!
//! Declarative message views for Discord bots.
//!
//! A view is a plain struct whose fields are the parts of a message. Fields
//! typed [`Embed`] become embeds, `#[sticker]` [`Snowflake`] fields become
//! sticker ids and `#[action_row(n)]` fields become the components of action
//! row `n`. The [`ViewParts`] implementation that collects them is generated
//! at build time by `porbeagle-codegen`.
//!
//! ## Features
//!
//! - **`macros`** (default) - the `DiscordView` derive marker
//!
//! ## Example
//!
//! ```rust,ignore
//! // build.rs
//! fn main() {
//!     porbeagle_codegen::Builder::new().generate().unwrap();
//! }
//!
//! // src/lib.rs
//! use porbeagle::{Button, ButtonStyle, DiscordView, Embed, MessagePayload, MessageView};
//!
//! #[derive(Clone, DiscordView)]
//! pub struct Poll {
//!     question: Embed,
//!     #[action_row(0)]
//!     yes: Button,
//!     #[action_row(0)]
//!     no: Button,
//! }
//!
//! impl MessageView for Poll {}
//!
//! porbeagle::include_views!();
//!
//! let payload = MessagePayload::from_view(&poll);
//! payload.validate()?;
//! ```

pub mod error;
pub mod payload;
pub mod types;
pub mod view;

pub use error::PayloadError;
pub use payload::MessagePayload;
pub use types::{
    ActionRow, Button, ButtonStyle, Component, Embed, EmbedField, SelectMenu, SelectOption,
    Snowflake,
};
pub use view::{MessageView, ViewParts};

#[cfg(feature = "macros")]
pub use porbeagle_macros::DiscordView;

/// Include the generated companions of the views declared in one module.
///
/// Expands to an `include!` of the module manifest that `porbeagle-codegen`
/// writes into `OUT_DIR`. Invoke it inside every module that declares views,
/// naming that module's path from the crate root:
///
/// ```rust,ignore
/// // src/lib.rs
/// porbeagle::include_views!();
///
/// // src/views/welcome.rs
/// porbeagle::include_views!(views::welcome);
/// ```
#[macro_export]
macro_rules! include_views {
    () => {
        include!(concat!(env!("OUT_DIR"), "/porbeagle_views.rs"));
    };
    ($($segment:ident)::+) => {
        include!(concat!(
            env!("OUT_DIR"),
            "/porbeagle_views",
            $("/", stringify!($segment),)+
            ".rs"
        ));
    };
}
