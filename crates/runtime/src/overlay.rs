//! Per-player status bar showing the target name and live distance.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use compass_core::PlayerId;
use tracing::debug;

use crate::host::OverlayClient;
use crate::message::{Span, TextColor};

/// Text shown instead of a distance when the target lies in another world.
pub const NOT_IN_SAME_REGION: &str = "Not in same region";

/// Identifies one overlay instance for the lifetime of the worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OverlayId(u64);

impl OverlayId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarColor {
    Blue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarStyle {
    /// One continuous bar.
    Progress,
}

/// Color roles used in the overlay title.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accent {
    Ok,
    Value,
    Warning,
}

impl Accent {
    pub const fn color(self) -> TextColor {
        match self {
            Accent::Ok => TextColor::Aqua,
            Accent::Value => TextColor::Yellow,
            Accent::Warning => TextColor::Red,
        }
    }
}

/// Client-visible overlay state.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    pub id: OverlayId,
    pub title: Vec<Span>,
    /// Fill level in `0.0..=1.0`. Held at full; the bar only carries a label.
    pub progress: f32,
    pub color: BarColor,
    pub style: BarStyle,
}

impl Overlay {
    fn new(id: OverlayId) -> Self {
        Self {
            id,
            title: Vec::new(),
            progress: 1.0,
            color: BarColor::Blue,
            style: BarStyle::Progress,
        }
    }

    /// Title with colors stripped.
    pub fn title_text(&self) -> String {
        self.title.iter().map(|span| span.text.as_str()).collect()
    }
}

/// Owns every live overlay and mirrors changes to the client.
pub struct OverlayManager {
    client: Arc<dyn OverlayClient>,
    overlays: HashMap<PlayerId, Overlay>,
    next_id: u64,
}

impl OverlayManager {
    pub fn new(client: Arc<dyn OverlayClient>) -> Self {
        Self {
            client,
            overlays: HashMap::new(),
            next_id: 0,
        }
    }

    /// Returns the player's overlay, creating and showing one if needed.
    pub fn ensure(&mut self, player: PlayerId) -> OverlayId {
        if let Some(existing) = self.overlays.get(&player) {
            return existing.id;
        }

        self.next_id += 1;
        let overlay = Overlay::new(OverlayId(self.next_id));
        let id = overlay.id;
        self.client.show(player, &overlay);
        self.overlays.insert(player, overlay);

        debug!(target: "compass::overlay", %player, %id, "overlay created");
        id
    }

    /// Rewrites the title. Does nothing when the player has no overlay.
    ///
    /// `primary` and the separator use the ok accent when `in_same_region`,
    /// the warning accent otherwise. `detail` uses the value accent or the
    /// warning accent respectively.
    pub fn update(&mut self, player: PlayerId, primary: &str, detail: &str, in_same_region: bool) {
        let Some(overlay) = self.overlays.get_mut(&player) else {
            return;
        };

        let (label, value) = if in_same_region {
            (Accent::Ok, Accent::Value)
        } else {
            (Accent::Warning, Accent::Warning)
        };

        overlay.title = vec![
            Span::new(primary, label.color()),
            Span::new(" - ", label.color()),
            Span::new(detail, value.color()),
        ];
        overlay.progress = 1.0;

        self.client.refresh(player, overlay);
    }

    /// Hides and drops the player's overlay. Safe to call repeatedly.
    pub fn remove(&mut self, player: PlayerId) -> bool {
        let Some(overlay) = self.overlays.remove(&player) else {
            return false;
        };

        self.client.hide(player, overlay.id);
        debug!(target: "compass::overlay", %player, id = %overlay.id, "overlay removed");
        true
    }

    /// Hides every overlay, leaving none orphaned on clients.
    pub fn hide_all(&mut self) -> usize {
        let count = self.overlays.len();
        for (player, overlay) in self.overlays.drain() {
            self.client.hide(player, overlay.id);
        }
        count
    }

    pub fn get(&self, player: PlayerId) -> Option<&Overlay> {
        self.overlays.get(&player)
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }
}
