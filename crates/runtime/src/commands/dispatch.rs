//! Executes parsed commands against the worker's state.
//!
//! Every path ends in a message to the sender or a log line; nothing here
//! returns an error to the caller.

use compass_core::{
    CategoryId, CategoryKind, LocateQuery, SearchLane, SearchRadius, Settings, Target,
    VILLAGE_CATEGORIES, nearest_of,
};
use tracing::{debug, warn};

use super::help_lines;
use super::parser::CompassCommand;
use crate::context::{Announce, PluginContext};
use crate::host::{CommandSender, Permission, PlayerView};
use crate::message::{Message, TextColor};
use crate::search::{SingleSearch, locate_caught};

/// Handles one command. Returns a search that must continue off the worker.
pub(crate) fn dispatch<S: AsRef<str>>(
    ctx: &mut PluginContext,
    sender: CommandSender,
    args: &[S],
) -> Option<SingleSearch> {
    let command = CompassCommand::parse(args);

    match command {
        Some(CompassCommand::Reload) => {
            reload(ctx, sender);
            return None;
        }
        Some(CompassCommand::Help) => {
            help(ctx, sender);
            return None;
        }
        _ => {}
    }

    let Some(id) = sender.player_id() else {
        ctx.send(
            &sender,
            Message::error(
                "This command can only be used by players (except /enhancedcompass reload).",
            ),
        );
        return None;
    };

    let Some(view) = ctx.server.player(id) else {
        debug!(target: "compass::command", player = %id, "command from offline player ignored");
        return None;
    };

    if !ctx.server.has_permission(id, Permission::Use) {
        ctx.send(
            &sender,
            Message::error("You don't have permission to use enhanced compass features."),
        );
        return None;
    }

    if ctx.settings().is_world_blacklisted(&view.location.world) {
        ctx.send(&sender, Message::error("Enhanced compass is disabled in this world."));
        return None;
    }

    match command {
        None | Some(CompassCommand::Help) | Some(CompassCommand::Reload) => {
            help(ctx, sender);
            None
        }
        Some(CompassCommand::Current) => {
            current(ctx, &view);
            None
        }
        Some(CompassCommand::Biome(None)) => {
            biome_usage(ctx, &view);
            None
        }
        Some(CompassCommand::Biome(Some(name))) => single(ctx, &view, CategoryKind::Biome, &name),
        Some(CompassCommand::Village) => {
            village(ctx, &view);
            None
        }
        Some(CompassCommand::Anything) => {
            anything(ctx, &view);
            None
        }
        Some(CompassCommand::Structure(name)) => single(ctx, &view, CategoryKind::Structure, &name),
    }
}

fn reload(ctx: &PluginContext, sender: CommandSender) {
    if let Some(id) = sender.player_id()
        && !ctx.server.has_permission(id, Permission::Reload)
    {
        ctx.send(
            &sender,
            Message::error("You don't have permission to reload the configuration."),
        );
        return;
    }

    match ctx.reload() {
        Ok(()) => ctx.send(
            &sender,
            Message::success("EnhancedCompass configuration reloaded!"),
        ),
        Err(error) => {
            warn!(target: "compass::config", %error, "configuration reload failed");
            ctx.send(
                &sender,
                Message::error(format!("Failed to reload configuration: {error}")),
            );
        }
    }
}

fn help(ctx: &PluginContext, sender: CommandSender) {
    let show_reload = match sender {
        CommandSender::Console => true,
        CommandSender::Player(id) => ctx.server.has_permission(id, Permission::Reload),
    };

    for line in help_lines(show_reload) {
        ctx.send(&sender, line);
    }
}

fn current(ctx: &PluginContext, view: &PlayerView) {
    let Some(target) = ctx.targets.get(view.id) else {
        ctx.send_player(view.id, Message::notice("You don't have a compass target set."));
        return;
    };

    ctx.send_player(
        view.id,
        Message::success("Current target: ").then(target.display_name(), TextColor::Aqua),
    );

    match target.distance_from(&view.location) {
        Some(distance) => ctx.send_player(view.id, Message::distance(distance)),
        None => ctx.send_player(view.id, Message::error("Target is in a different dimension.")),
    }
}

fn query(view: &PlayerView, category: CategoryId, radius: SearchRadius) -> LocateQuery {
    LocateQuery {
        origin: view.location.clone(),
        dimension: view.dimension,
        category,
        radius,
    }
}

/// Validates and announces a single-category search, then runs it on the
/// lane its kind calls for. Background searches are returned to the worker.
fn single(
    ctx: &mut PluginContext,
    view: &PlayerView,
    kind: CategoryKind,
    raw: &str,
) -> Option<SingleSearch> {
    let input = raw.to_lowercase();
    let category = validate(ctx, view, kind, &input)?;

    ctx.send_player(
        view.id,
        Message::notice(format!("Searching for nearest {}...", kind.labelled(&category))),
    );

    let search = SingleSearch {
        player: view.id,
        kind,
        query: query(view, category, ctx.settings().search_radius()),
    };

    match kind.lane() {
        SearchLane::Background => Some(search),
        SearchLane::Inline => {
            let completion = search.run(ctx.locators.for_kind(kind).as_ref());
            ctx.complete_search(completion);
            None
        }
    }
}

fn biome_usage(ctx: &PluginContext, view: &PlayerView) {
    ctx.send_player(
        view.id,
        Message::error("Usage: /enhancedcompass biome <biome_name>"),
    );
    ctx.send_player(
        view.id,
        Message::notice("Use tab completion to see available biomes."),
    );
}

/// Gate for single-category searches: enabled for the player's dimension,
/// then known to the locator.
fn validate(
    ctx: &PluginContext,
    view: &PlayerView,
    kind: CategoryKind,
    input: &str,
) -> Option<CategoryId> {
    let noun = kind.noun();

    let category = CategoryId::new(input).ok();
    let enabled = category
        .as_ref()
        .is_some_and(|category| ctx.settings().is_enabled(view.dimension, kind, category));

    if category.is_some() && !enabled {
        ctx.send_player(
            view.id,
            Message::error(format!(
                "This {noun} type is not enabled in the current world type."
            )),
        );
        return None;
    }

    match category {
        Some(category) if ctx.locators.for_kind(kind).recognizes(&category) => Some(category),
        _ => {
            ctx.send_player(view.id, Message::error(format!("Invalid {noun} type: {input}")));
            ctx.send_player(
                view.id,
                Message::notice(format!("Use tab completion to see available {noun}s.")),
            );
            None
        }
    }
}

fn village(ctx: &mut PluginContext, view: &PlayerView) {
    ctx.send_player(
        view.id,
        Message::notice("Searching for nearest village of any type..."),
    );

    let settings = ctx.settings();
    let radius = settings.search_radius();
    let locator = ctx.locators.for_kind(CategoryKind::Structure).clone();

    let candidates = VILLAGE_CATEGORIES
        .iter()
        .filter_map(|raw| CategoryId::new(raw).ok())
        .filter(|category| settings.is_enabled(view.dimension, CategoryKind::Structure, category))
        .filter(|category| locator.recognizes(category));

    let nearest = nearest_of(&view.location, candidates, |candidate| {
        locate_caught(locator.as_ref(), &query(view, candidate.clone(), radius))
    });

    let Some(nearest) = nearest else {
        ctx.send_player(
            view.id,
            Message::error(format!(
                "No villages found within {} blocks.",
                radius.blocks()
            )),
        );
        return;
    };

    let target = Target::structure(nearest.category, nearest.location);
    ctx.finalize(view.id, target, Some(nearest.distance), Announce::Found);
}

fn anything(ctx: &mut PluginContext, view: &PlayerView) {
    let settings = ctx.settings();
    let enabled = settings.enabled_categories(view.dimension, CategoryKind::Structure);

    if enabled.is_empty() {
        ctx.send_player(
            view.id,
            Message::error("No structures are enabled in this world type."),
        );
        return;
    }

    ctx.send_player(
        view.id,
        Message::notice("Searching for nearest structure of any type..."),
    );

    let radius = settings.search_radius();
    let locator = ctx.locators.for_kind(CategoryKind::Structure).clone();
    let candidates = enabled
        .into_iter()
        .filter(|category| locator.recognizes(category));

    let nearest = nearest_of(&view.location, candidates, |candidate| {
        locate_caught(locator.as_ref(), &query(view, candidate.clone(), radius))
    });

    let Some(nearest) = nearest else {
        ctx.send_player(
            view.id,
            Message::error(format!(
                "No structures found within {} blocks.",
                radius.blocks()
            )),
        );
        return;
    };

    let target = Target::structure(nearest.category, nearest.location);
    ctx.finalize(view.id, target, Some(nearest.distance), Announce::Found);
}
