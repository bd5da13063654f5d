//! One pass of the overlay refresh loop.

use tracing::trace;

use crate::context::PluginContext;
use crate::host::Permission;
use crate::message::format_blocks;
use crate::overlay::NOT_IN_SAME_REGION;

/// Shows, updates or hides each online player's overlay.
///
/// Only letting go of the compass removes an overlay. A held compass with no
/// target, or without [`Permission::Use`], leaves whatever is on screen as is.
pub(crate) fn refresh(ctx: &mut PluginContext) {
    for id in ctx.server.online_players() {
        let Some(view) = ctx.server.player(id) else {
            continue;
        };

        if !view.holding_compass {
            ctx.overlays.remove(id);
            continue;
        }

        let Some(target) = ctx.targets.get(id) else {
            continue;
        };
        if !ctx.server.has_permission(id, Permission::Use) {
            continue;
        }

        ctx.overlays.ensure(id);
        let name = target.display_name();
        match target.distance_from(&view.location) {
            Some(distance) => ctx.overlays.update(id, &name, &format_blocks(distance), true),
            None => ctx.overlays.update(id, &name, NOT_IN_SAME_REGION, false),
        }
    }

    trace!(target: "compass::refresh", overlays = ctx.overlays.len(), "refresh pass done");
}
