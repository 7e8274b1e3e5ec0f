use porbeagle::{Button, ButtonStyle, Embed, MessageView, Snowflake};

use super::super::models::Member;

#[derive(Debug, Clone, porbeagle::DiscordView)]
pub struct Welcome {
    pub text: Option<String>,
    #[sticker]
    pub wave: Snowflake,
    pub card: Embed,
    pub footer: Embed,
    #[action_row(1)]
    pub rules: Button,
    #[action_row(0)]
    pub accept: Button,
    #[action_row(0)]
    pub decline: Button,
    pub raw_id: Snowflake,
}

impl From<Member> for Welcome {
    fn from(member: Member) -> Self {
        Self {
            text: Some(format!("Welcome, {}!", member.name)),
            wave: Snowflake::new(5456508906066544),
            card: Embed::default().title(member.name),
            footer: Embed::default(),
            rules: Button::link("Rules", "https://example.com/rules"),
            accept: Button::new("accept", "Accept", ButtonStyle::Success),
            decline: Button::new("decline", "Decline", ButtonStyle::Danger),
            raw_id: Snowflake::new(1),
        }
    }
}

impl MessageView<Self, Member> for Welcome {
    fn text(&self) -> Option<String> {
        self.text.clone()
    }
}

porbeagle::include_views!(views::welcome);
