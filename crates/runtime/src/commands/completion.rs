//! Tab completion for the compass command.

use compass_core::{CategoryId, CategoryKind, Settings};
use strum::IntoEnumIterator;

use super::parser::Verb;
use crate::context::PluginContext;
use crate::host::{CommandSender, Permission};

/// Suggestions for the argument currently being typed (the last one).
pub(crate) fn complete<S: AsRef<str>>(
    ctx: &PluginContext,
    sender: CommandSender,
    args: &[S],
) -> Vec<String> {
    match args {
        [] => first_argument(ctx, sender, ""),
        [prefix] => first_argument(ctx, sender, prefix.as_ref()),
        [verb, prefix] if verb.as_ref().eq_ignore_ascii_case(Verb::Biome.as_ref()) => {
            let candidates = category_keys(ctx, sender, CategoryKind::Biome);
            filter_sorted(candidates, prefix.as_ref())
        }
        _ => Vec::new(),
    }
}

fn first_argument(ctx: &PluginContext, sender: CommandSender, prefix: &str) -> Vec<String> {
    let allow_reload = match sender {
        CommandSender::Console => true,
        CommandSender::Player(id) => ctx.server.has_permission(id, Permission::Reload),
    };

    let mut candidates: Vec<String> = Verb::iter()
        .filter(|verb| *verb != Verb::Reload || allow_reload)
        .map(|verb| verb.to_string())
        .collect();
    candidates.extend(category_keys(ctx, sender, CategoryKind::Structure));

    filter_sorted(candidates, prefix)
}

/// Enabled ids for the player's dimension, or the whole registry for the
/// console.
fn category_keys(ctx: &PluginContext, sender: CommandSender, kind: CategoryKind) -> Vec<String> {
    let categories: Vec<CategoryId> = match sender {
        CommandSender::Console => ctx.locators.for_kind(kind).known_categories(),
        CommandSender::Player(id) => match ctx.server.player(id) {
            Some(view) => ctx.settings().enabled_categories(view.dimension, kind),
            None => Vec::new(),
        },
    };

    categories.iter().map(CategoryId::key).collect()
}

fn filter_sorted(candidates: Vec<String>, prefix: &str) -> Vec<String> {
    let prefix = prefix.to_lowercase();
    let mut matches: Vec<String> = candidates
        .into_iter()
        .filter(|candidate| candidate.to_lowercase().starts_with(&prefix))
        .collect();
    matches.sort();
    matches.dedup();
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_is_case_insensitive_and_sorted() {
        let candidates = vec![
            "village".to_string(),
            "village_plains".to_string(),
            "current".to_string(),
            "village".to_string(),
        ];

        assert_eq!(
            filter_sorted(candidates, "VIL"),
            vec!["village".to_string(), "village_plains".to_string()]
        );
    }
}
