//! The `/enhancedcompass` command: parsing, dispatch and tab completion.
mod completion;
mod dispatch;
mod parser;

pub(crate) use completion::complete;
pub(crate) use dispatch::dispatch;
pub use parser::{CompassCommand, Verb};

use crate::message::{Message, TextColor};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Help menu lines. The reload entry only shows for callers allowed to use it.
pub fn help_lines(show_reload: bool) -> Vec<Message> {
    let entry = |usage: &str, description: &str| {
        Message::text(usage, TextColor::Yellow).then(description, TextColor::Gray)
    };

    let mut lines = vec![
        Message::text(RULE, TextColor::Gold),
        Message::text("Enhanced Compass Commands", TextColor::Gold).bold(),
        Message::text(RULE, TextColor::Gold),
        entry("/enhancedcompass help", " - Show this help menu"),
        entry("/enhancedcompass <structure>", " - Point compass to nearest structure"),
        entry("/enhancedcompass biome <biome>", " - Point compass to nearest biome"),
        entry("/enhancedcompass village", " - Point compass to nearest village of any type"),
        entry("/enhancedcompass anything", " - Point compass to nearest enabled structure"),
        entry("/enhancedcompass current", " - Show current compass target"),
    ];
    if show_reload {
        lines.push(entry("/enhancedcompass reload", " - Reload configuration"));
    }
    lines.push(Message::text(RULE, TextColor::Gold));

    lines
}
