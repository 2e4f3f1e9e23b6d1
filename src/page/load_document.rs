use std::path::Path;

use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Node};

use crate::page::document::{Document, NodeId};

/// Builds a `Document` from an HTML snapshot of the host page.
///
/// Comments, doctype and whitespace-only text nodes are dropped. Inline
/// `style` attributes are split into declarations.
pub fn load_document(html_content: &str) -> Document {
    let html = Html::parse_document(html_content);
    let root_element = html.root_element();

    let mut document = Document::with_root(root_element.value().name());
    let root = document.root();
    copy_attributes(&mut document, root, root_element.value());
    copy_children(&mut document, root, root_element);

    document
}

pub async fn load_document_file(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read page snapshot {}", path.display()))?;
    Ok(load_document(&content))
}

fn copy_children(document: &mut Document, parent: NodeId, source: ElementRef<'_>) {
    for child in source.children() {
        match child.value() {
            Node::Element(element) => {
                let node = document.create_element(element.name());
                copy_attributes(document, node, element);
                document.append_child(parent, node);
                if let Some(child) = ElementRef::wrap(child) {
                    copy_children(document, node, child);
                }
            }
            Node::Text(text) => {
                let text: &str = text;
                if !text.trim().is_empty() {
                    let node = document.create_text(text);
                    document.append_child(parent, node);
                }
            }
            _ => {}
        }
    }
}

fn copy_attributes(document: &mut Document, node: NodeId, source: &scraper::node::Element) {
    if let Some(target) = document.element_mut(node) {
        for (name, value) in source.attrs() {
            if name == "style" {
                target.apply_style_attribute(value);
            } else {
                target.set_attribute(name, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::element_path::ElementPath;

    #[test]
    fn html5_parser_adds_missing_structure() {
        let document = load_document("<p>hi</p>");
        assert_eq!(
            document.outer_html(document.root()),
            "<html><head></head><body><p>hi</p></body></html>"
        );
    }

    #[test]
    fn keeps_attributes_and_styles() {
        let document = load_document(
            r#"<html><body><div id="app" class="x" style="color: blue">text</div></body></html>"#,
        );
        let app = document.get_element_by_id("app").unwrap();
        let element = document.element(app).unwrap();
        assert_eq!(element.attributes.get("class").map(String::as_str), Some("x"));
        assert_eq!(element.style.get("color").map(String::as_str), Some("blue"));
        assert!(!element.attributes.contains_key("style"));
        assert_eq!(document.text_content(app), "text");
    }

    #[test]
    fn custom_elements_are_reachable_by_path() {
        let document = load_document(
            r#"<body><div></div><div><pace-island><div id="target"></div></pace-island></div></body>"#,
        );
        let path = ElementPath::parse("/html/body/div[2]/pace-island/div").unwrap();
        let found = path.evaluate(&document).unwrap();
        assert_eq!(document.element(found).unwrap().id(), Some("target"));
    }

    #[test]
    fn demo_snapshot_has_default_anchor() {
        let document = load_document(include_str!("../../demos/live_room.html"));
        let path = ElementPath::parse(crate::config::config::DEFAULT_ANCHOR_PATH).unwrap();
        let found = path.evaluate(&document).unwrap();
        assert_eq!(document.element(found).unwrap().id(), Some("room-title"));
    }

    #[tokio::test]
    async fn missing_snapshot_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_document_file(dir.path().join("missing.html")).await;
        assert!(result.is_err());
    }
}
