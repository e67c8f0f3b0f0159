//! The isolated, measurable node tree a renderer exposes after painting.
//!
//! The tree is small: a tag, class list, attributes, own text, a laid-out height
//! and vertical padding per node. The geometry probe only ever reads heights and padding
//! and uses tags, classes and heading text to locate fragments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceNode {
    pub tag: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub height_px: f32,
    #[serde(default)]
    pub padding_top_px: f32,
    #[serde(default)]
    pub padding_bottom_px: f32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<SurfaceNode>,
}

impl SurfaceNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_height(mut self, height_px: f32) -> Self {
        self.height_px = height_px;
        self
    }

    pub fn with_padding(mut self, top_px: f32, bottom_px: f32) -> Self {
        self.padding_top_px = top_px;
        self.padding_bottom_px = bottom_px;
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: SurfaceNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = SurfaceNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Substring class match, like a `[class*="…"]` selector.
    pub fn class_contains(&self, fragment: &str) -> bool {
        self.classes.iter().any(|c| c.contains(fragment))
    }

    /// All descendants (not `self`) in document order.
    pub fn descendants(&self) -> Vec<&SurfaceNode> {
        let mut out = Vec::new();
        let mut stack: Vec<&SurfaceNode> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    pub fn find_all<P>(&self, predicate: P) -> Vec<&SurfaceNode>
    where
        P: Fn(&SurfaceNode) -> bool,
    {
        self.descendants()
            .into_iter()
            .filter(|n| predicate(n))
            .collect()
    }

    pub fn find_first<P>(&self, predicate: P) -> Option<&SurfaceNode>
    where
        P: Fn(&SurfaceNode) -> bool,
    {
        self.descendants().into_iter().find(|n| predicate(n))
    }

    /// Own text followed by every descendant's text, space separated.
    pub fn text_content(&self) -> String {
        std::iter::once(self)
            .chain(self.descendants())
            .map(|n| n.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
