use crate::dom::{Dom, Marker};

#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent<N> {
    pub target: N,
    pub ctrl_key: bool,
    pub meta_key: bool,
}

impl<N> ClickEvent<N> {
    pub fn new(target: N) -> Self {
        Self {
            target,
            ctrl_key: false,
            meta_key: false,
        }
    }
}

/// What the handlers asked the host to do with the browser event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickRoute {
    Navigation,
    MarkRead,
}

/// Document-level click listeners, in registration order. Every entry is
/// checked independently, so one click can hit several routes.
pub const CLICK_ROUTES: &[(Marker, ClickRoute)] = &[
    (Marker::Tag("a"), ClickRoute::Navigation),
    (Marker::Class("mark-read-btn"), ClickRoute::MarkRead),
];

/// Routes whose marker matches the target or one of its ancestors, paired
/// with the matching element.
pub fn route_click<D: Dom>(dom: &D, target: &D::Node) -> Vec<(ClickRoute, D::Node)> {
    CLICK_ROUTES
        .iter()
        .filter_map(|(marker, route)| dom.closest(target, *marker).map(|node| (*route, node)))
        .collect()
}
