use crate::config::{DisplayConfig, FailurePolicy};
use crate::page::{Document, ElementPath, NodeId};
use crate::room::RoomId;
use crate::viewer_count::fetch_viewer_count::DisplayValue;

pub const OVERLAY_ID: &str = "viewer-count-display";
pub const FAILED_LABEL: &str = "获取失败";

const BASE_STYLE: [(&str, &str); 8] = [
    ("display", "inline-block"),
    ("background-color", "rgba(0, 0, 0, 0.7)"),
    ("color", "red"),
    ("padding", "5px 10px"),
    ("border-radius", "5px"),
    ("font-size", "16px"),
    ("z-index", "9999"),
    ("cursor", "pointer"),
];

const HOVER_STYLE: [(&str, &str); 2] = [
    ("background-color", "rgba(0, 0, 0, 0.9)"),
    ("text-decoration", "underline"),
];

/// Result of one fetch cycle, as far as the overlay is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Count { room_id: RoomId, value: DisplayValue },
    Failed,
}

pub fn format_viewer_count(value: &DisplayValue) -> String {
    match value {
        DisplayValue::Text(count) => format!("观看人数: {}", count),
        DisplayValue::Unknown => String::new(),
    }
}

pub fn stats_link(stats_url: &str, room_id: &RoomId) -> String {
    format!(
        "{}/?id={}",
        stats_url.trim_end_matches('/'),
        urlencoding::encode(room_id.as_str())
    )
}

/// Replaces the overlay in `document` according to `outcome`.
///
/// Any existing overlay is removed first, so the document never holds more
/// than one. Returns the new overlay node, if one was created.
pub fn render(document: &mut Document, outcome: &RenderOutcome, display: &DisplayConfig) -> Option<NodeId> {
    for existing in document.elements_by_id(OVERLAY_ID) {
        document.remove(existing);
    }

    let overlay = match outcome {
        RenderOutcome::Failed => match display.failure_policy {
            FailurePolicy::Remove => return None,
            FailurePolicy::Label => {
                let overlay = create_overlay(document);
                document.set_text(overlay, FAILED_LABEL);
                overlay
            }
        },
        RenderOutcome::Count { room_id, value } => {
            let overlay = create_overlay(document);
            if let Some(element) = document.element_mut(overlay) {
                element.set_attribute("href", &stats_link(&display.stats_url, room_id));
                element.set_attribute("target", "_blank");
                element.set_attribute("rel", "noopener");
                for (property, declaration) in HOVER_STYLE {
                    element.hover_style.insert(property.to_string(), declaration.to_string());
                }
            }
            document.set_text(overlay, &format_viewer_count(value));
            overlay
        }
    };

    place_overlay(document, overlay, &display.anchor_path);
    Some(overlay)
}

fn create_overlay(document: &mut Document) -> NodeId {
    let overlay = document.create_element("a");
    if let Some(element) = document.element_mut(overlay) {
        element.set_attribute("id", OVERLAY_ID);
        for (property, declaration) in BASE_STYLE {
            element.set_style(property, declaration);
        }
    }
    overlay
}

fn place_overlay(document: &mut Document, overlay: NodeId, anchor_path: &ElementPath) {
    match anchor_path.evaluate(document) {
        Some(anchor) => {
            if let Some(element) = document.element_mut(anchor) {
                element.set_style("position", "relative");
            }
            if let Some(element) = document.element_mut(overlay) {
                element.set_style("margin-left", "10px");
            }
            document.append_child(anchor, overlay);
        }
        None => {
            if let Some(element) = document.element_mut(overlay) {
                element.set_style("position", "fixed");
                element.set_style("top", "75px");
                element.set_style("right", "50px");
            }
            let parent = document.body().unwrap_or_else(|| document.root());
            document.append_child(parent, overlay);
        }
    }
}
