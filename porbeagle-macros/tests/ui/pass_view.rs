use porbeagle::{Button, ButtonStyle, DiscordView, Embed, Snowflake};

#[derive(Debug, Clone, DiscordView)]
pub struct Greeting {
    pub text: String,
    #[sticker]
    pub wave: Snowflake,
    pub card: Embed,
    #[action_row(1)]
    pub rules: Button,
    #[action_row(0)]
    pub accept: Button,
}

fn main() {
    let view = Greeting {
        text: "hi".to_string(),
        wave: Snowflake::new(1),
        card: Embed::default(),
        rules: Button::link("Rules", "https://example.com"),
        accept: Button::new("accept", "Accept", ButtonStyle::Primary),
    };
    let _ = view.clone();
}
