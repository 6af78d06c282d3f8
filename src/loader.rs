//! Full-page loading overlay.

use crate::dom::{Dom, Marker, Mutation};
use crate::events::ClickEvent;
use std::time::Duration;

pub const LOADER_ID: &str = "loader";

/// Time between the fade starting and the overlay leaving the layout.
pub const FADE_OUT: Duration = Duration::from_millis(300);

pub fn locate<D: Dom>(dom: &D) -> Option<D::Node> {
    dom.element_by_id(LOADER_ID)
}

/// Whether the click looks like it starts a full page navigation.
///
/// Only the nearest `<a>` counts. Fragment links, links with a target, and
/// ctrl/meta clicks are left alone; anything else with an `href` qualifies,
/// even links whose handlers never navigate.
pub fn is_navigation_click<D: Dom>(dom: &D, event: &ClickEvent<D::Node>) -> bool {
    let Some(link) = dom.closest(&event.target, Marker::Tag("a")) else {
        return false;
    };
    let Some(href) = dom.attribute(&link, "href") else {
        return false;
    };
    let has_target = dom
        .attribute(&link, "target")
        .is_some_and(|target| !target.is_empty());

    !href.is_empty() && !href.starts_with('#') && !has_target && !event.ctrl_key && !event.meta_key
}

pub fn show<N: Clone>(loader: &N) -> Vec<Mutation<N>> {
    vec![
        Mutation::SetStyle {
            node: loader.clone(),
            property: "display",
            value: "flex".to_string(),
        },
        Mutation::SetStyle {
            node: loader.clone(),
            property: "opacity",
            value: "1".to_string(),
        },
    ]
}

pub fn fade_out<N: Clone>(loader: &N) -> Vec<Mutation<N>> {
    vec![Mutation::SetStyle {
        node: loader.clone(),
        property: "opacity",
        value: "0".to_string(),
    }]
}

pub fn hide<N: Clone>(loader: &N) -> Vec<Mutation<N>> {
    vec![Mutation::SetStyle {
        node: loader.clone(),
        property: "display",
        value: "none".to_string(),
    }]
}

pub fn plan_click<D: Dom>(
    dom: &D,
    loader: &D::Node,
    event: &ClickEvent<D::Node>,
) -> Vec<Mutation<D::Node>> {
    if is_navigation_click(dom, event) {
        show(loader)
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{el, MemoryDom, NodeId};

    fn page(link: crate::dom::Fragment) -> (MemoryDom, NodeId, NodeId) {
        let mut dom = MemoryDom::with_body([el("div").id(LOADER_ID), link]);
        let loader = locate(&dom).unwrap();
        let body = dom.body();
        let anchor = dom.children(body)[1];
        let inner = dom.append(anchor, &el("span").text("Open"));
        (dom, loader, inner)
    }

    fn click(target: NodeId) -> ClickEvent<NodeId> {
        ClickEvent::new(target)
    }

    #[test]
    fn plain_link_shows_overlay() {
        let (mut dom, loader, inner) = page(el("a").attr("href", "/grievances/4/"));
        let mutations = plan_click(&dom, &loader, &click(inner));
        dom.apply_all(mutations);
        assert_eq!(dom.style(loader, "display").as_deref(), Some("flex"));
        assert_eq!(dom.style(loader, "opacity").as_deref(), Some("1"));
    }

    #[test]
    fn fragment_links_are_exempt() {
        let (dom, loader, inner) = page(el("a").attr("href", "#details"));
        assert!(plan_click(&dom, &loader, &click(inner)).is_empty());
    }

    #[test]
    fn targeted_links_are_exempt() {
        let (dom, loader, inner) =
            page(el("a").attr("href", "/report.pdf").attr("target", "_blank"));
        assert!(plan_click(&dom, &loader, &click(inner)).is_empty());
    }

    #[test]
    fn empty_target_attribute_still_navigates() {
        let (dom, _, inner) = page(el("a").attr("href", "/x").attr("target", ""));
        assert!(is_navigation_click(&dom, &click(inner)));
    }

    #[test]
    fn modifier_clicks_are_exempt() {
        let (dom, _, inner) = page(el("a").attr("href", "/grievances/"));
        let mut ctrl = click(inner);
        ctrl.ctrl_key = true;
        assert!(!is_navigation_click(&dom, &ctrl));
        let mut meta = click(inner);
        meta.meta_key = true;
        assert!(!is_navigation_click(&dom, &meta));
    }

    #[test]
    fn anchors_without_href_and_non_links_are_ignored() {
        let (dom, _, inner) = page(el("a"));
        assert!(!is_navigation_click(&dom, &click(inner)));

        let (dom, loader, _) = page(el("button"));
        assert!(plan_click(&dom, &loader, &click(dom.body())).is_empty());
    }

    #[test]
    fn load_fades_then_hides() {
        let (mut dom, loader, _) = page(el("a"));
        dom.apply_all(fade_out(&loader));
        assert_eq!(dom.style(loader, "opacity").as_deref(), Some("0"));
        assert_eq!(dom.style(loader, "display"), None);
        dom.apply_all(hide(&loader));
        assert_eq!(dom.style(loader, "display").as_deref(), Some("none"));
    }
}
