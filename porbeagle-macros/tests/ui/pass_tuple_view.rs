use porbeagle::{Button, DiscordView, Snowflake};

#[derive(DiscordView)]
pub struct Compact(#[sticker] Snowflake, #[action_row(0)] Button);

#[derive(DiscordView)]
pub struct Empty;

fn main() {}
