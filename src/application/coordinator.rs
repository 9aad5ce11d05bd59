use super::ports::RendererHandle;
use crate::config::LinkedGroupsConfig;
use crate::domain::{
    chart::{ZoomWindow, compute_focused_window},
    logging::{LogComponent, get_logger},
    widget::ChartPayload,
};
use std::collections::HashMap;

/// Which linked group a widget follows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Membership {
    /// Shares one focus window computed from the group's data.
    FixedFocus(String),
    /// Only mirrors pan/zoom gestures of its peers.
    PeerTimeseries(String),
}

impl Membership {
    pub fn group_id(&self) -> &str {
        match self {
            Membership::FixedFocus(id) | Membership::PeerTimeseries(id) => id,
        }
    }
}

/// Window a fixed-focus group shares and the dataset it was computed from
#[derive(Debug, Clone, PartialEq)]
struct GroupFocus {
    signature: String,
    window: Option<ZoomWindow>,
}

/// Координатор связанных групп: общее окно фокуса и синхронизация жестов
pub struct LinkedGroupCoordinator {
    groups: LinkedGroupsConfig,
    focus: HashMap<String, GroupFocus>,
}

impl LinkedGroupCoordinator {
    pub fn new(groups: LinkedGroupsConfig) -> Self {
        Self { groups, focus: HashMap::new() }
    }

    fn fixed_focus_group(&self, widget_id: &str) -> Option<String> {
        match self.membership(widget_id)? {
            Membership::FixedFocus(group_id) => Some(group_id),
            Membership::PeerTimeseries(_) => None,
        }
    }

    pub fn membership(&self, widget_id: &str) -> Option<Membership> {
        if let Some(group) = self.groups.fixed_focus.iter().find(|g| g.contains(widget_id)) {
            return Some(Membership::FixedFocus(group.id.clone()));
        }
        self.groups
            .peer_timeseries
            .iter()
            .find(|g| g.contains(widget_id))
            .map(|group| Membership::PeerTimeseries(group.id.clone()))
    }

    /// Current focus window of the widget's fixed-focus group.
    ///
    /// Each group keeps its own window. It is recomputed from `payload`
    /// only when the group has nothing cached or its cached window came
    /// from a different dataset signature. `None` for widgets outside a
    /// fixed-focus group.
    pub fn focus_window_for(&mut self, widget_id: &str, payload: &ChartPayload) -> Option<ZoomWindow> {
        let group_id = self.fixed_focus_group(widget_id)?;
        let signature = payload.signature();
        let cached = self
            .focus
            .get(&group_id)
            .filter(|focus| focus.window.is_some() && focus.signature == signature);
        if let Some(focus) = cached {
            return focus.window;
        }

        let window = compute_focused_window(payload);
        get_logger().debug(
            LogComponent::Application("LinkedGroups"),
            &format!("🎯 Focus for {} in {} recomputed: {:?}", widget_id, group_id, window),
        );
        self.focus.insert(group_id, GroupFocus { signature, window });
        window
    }

    /// Cached window of the widget's fixed-focus group, if any.
    pub fn current_focus(&self, widget_id: &str) -> Option<ZoomWindow> {
        let group_id = self.fixed_focus_group(widget_id)?;
        self.focus.get(&group_id).and_then(|focus| focus.window)
    }

    /// Joins the renderer to its sync group; fixed-focus members also jump
    /// to the current window.
    pub fn attach(&self, widget_id: &str, renderer: &mut dyn RendererHandle, focus: Option<ZoomWindow>) {
        let Some(membership) = self.membership(widget_id) else {
            return;
        };
        renderer.join_group(membership.group_id());
        if let (Membership::FixedFocus(_), Some(window)) = (&membership, focus) {
            renderer.dispatch_zoom(window);
        }
    }

    /// Other members of the widget's group.
    pub fn peers(&self, widget_id: &str) -> Vec<String> {
        self.groups
            .all_groups()
            .find(|group| group.contains(widget_id))
            .map(|group| group.members.iter().filter(|member| *member != widget_id).cloned().collect())
            .unwrap_or_default()
    }

    pub fn reset(&mut self) {
        self.focus.clear();
    }
}
