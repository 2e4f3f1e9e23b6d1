use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::Deserialize;

use crate::page::document::{Document, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    tag: String,
    /// 1-based position among same-tag siblings.
    position: Option<usize>,
}

/// Absolute structural path such as `/html/body/div[2]/main/div[1]`.
///
/// Each step walks the child axis. A bare tag keeps every matching child,
/// `tag[n]` keeps the n-th matching child of each parent. Evaluation
/// returns the first node of the final set in document order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct ElementPath {
    steps: Vec<Step>,
}

impl ElementPath {
    pub fn parse(path: &str) -> Result<Self> {
        let rest = path
            .strip_prefix('/')
            .ok_or_else(|| anyhow!("Element path must be absolute: {}", path))?;

        let step_re = Regex::new(r"^([A-Za-z][A-Za-z0-9-]*)(?:\[(\d+)\])?$")
            .context("Failed to compile regex")?;

        let steps = rest
            .split('/')
            .map(|raw| {
                let caps = step_re
                    .captures(raw)
                    .ok_or_else(|| anyhow!("Invalid step `{}` in element path {}", raw, path))?;
                let position = match caps.get(2) {
                    Some(index) => {
                        let index: usize = index.as_str().parse()?;
                        if index == 0 {
                            return Err(anyhow!("Element path positions start at 1: {}", path));
                        }
                        Some(index)
                    }
                    None => None,
                };
                Ok(Step {
                    tag: caps[1].to_ascii_lowercase(),
                    position,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { steps })
    }

    pub fn evaluate(&self, document: &Document) -> Option<NodeId> {
        let mut steps = self.steps.iter();
        let first = steps.next()?;

        // The document root is the only child of the (implicit) document node.
        let root = document.root();
        let root_tag = document.element(root)?.tag.as_str();
        if root_tag != first.tag || first.position.map_or(false, |p| p != 1) {
            return None;
        }

        let mut current = vec![root];
        for step in steps {
            current = current
                .into_iter()
                .flat_map(|parent| {
                    let matching: Vec<NodeId> = document
                        .child_elements(parent)
                        .filter(|child| {
                            document.element(*child).map(|e| e.tag.as_str()) == Some(step.tag.as_str())
                        })
                        .collect();
                    match step.position {
                        Some(position) => matching.get(position - 1).copied().into_iter().collect(),
                        None => matching,
                    }
                })
                .collect();

            if current.is_empty() {
                return None;
            }
        }

        current.into_iter().next()
    }
}

impl TryFrom<String> for ElementPath {
    type Error = anyhow::Error;

    fn try_from(path: String) -> Result<Self> {
        Self::parse(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(document: &mut Document, parent: NodeId, tag: &str, id: &str) -> NodeId {
        let node = document.create_element(tag);
        document.element_mut(node).unwrap().set_attribute("id", id);
        document.append_child(parent, node);
        node
    }

    #[test]
    fn parses_steps_with_positions() {
        let path = ElementPath::parse("/html/body/div[2]/pace-island/div").unwrap();
        assert_eq!(path.steps.len(), 5);
        assert_eq!(path.steps[2].position, Some(2));
        assert_eq!(path.steps[3].tag, "pace-island");
    }

    #[test]
    fn rejects_relative_and_malformed_paths() {
        assert!(ElementPath::parse("html/body").is_err());
        assert!(ElementPath::parse("/html//body").is_err());
        assert!(ElementPath::parse("/html/div[0]").is_err());
        assert!(ElementPath::parse("/html/div[x]").is_err());
    }

    #[test]
    fn positional_step_counts_same_tag_siblings_only() {
        let mut document = Document::empty();
        let body = document.body().unwrap();
        element(&mut document, body, "span", "s1");
        element(&mut document, body, "div", "d1");
        let d2 = element(&mut document, body, "div", "d2");

        let path = ElementPath::parse("/html/body/div[2]").unwrap();
        assert_eq!(path.evaluate(&document), Some(d2));
    }

    #[test]
    fn bare_step_searches_every_candidate() {
        let mut document = Document::empty();
        let body = document.body().unwrap();
        // First div has no <main>, second does: XPath keeps both candidates.
        element(&mut document, body, "div", "empty");
        let second = element(&mut document, body, "div", "full");
        let main = element(&mut document, second, "main", "main");

        let path = ElementPath::parse("/html/body/div/main").unwrap();
        assert_eq!(path.evaluate(&document), Some(main));
    }

    #[test]
    fn missing_anchor_is_none() {
        let document = Document::empty();
        let path = ElementPath::parse("/html/body/div[2]/main").unwrap();
        assert_eq!(path.evaluate(&document), None);

        let wrong_root = ElementPath::parse("/body").unwrap();
        assert_eq!(wrong_root.evaluate(&document), None);
    }
}
