mod welcome;

pub use welcome::Welcome;

use porbeagle::{DiscordView, Embed, MessageView};

/// A view without any generated parts besides the empty collections.
#[derive(Debug, Clone, DiscordView)]
pub struct Notice {
    pub text: String,
}

impl MessageView for Notice {
    fn text(&self) -> Option<String> {
        Some(self.text.clone())
    }
}

/// Marked but never implements the capability, so nothing is generated.
#[derive(DiscordView)]
pub struct Draft {
    pub embed: Embed,
}

porbeagle::include_views!(views);

#[cfg(test)]
mod tests {
    #[derive(porbeagle::DiscordView)]
    pub struct Hidden;
}
