//! Fluent element builder
//!
//! Builders describe a subtree; [`ElementTree::build`](crate::tree::ElementTree::build)
//! turns one into nodes.
//!
//! ```rust
//! use folio_layout::{div, el, ElementTree};
//!
//! let mut tree = ElementTree::new();
//! let root = tree.build(
//!     div()
//!         .class("header-nav")
//!         .child(el("a").attr("href", "#work").class("header-link").text("WORK")),
//! );
//! assert_eq!(
//!     tree.render_html(root),
//!     r##"<div class="header-nav"><a href="#work" class="header-link">WORK</a></div>"##
//! );
//! ```

use folio_core::Rect;
use indexmap::IndexMap;
use smallvec::SmallVec;

/// A child of an element under construction
#[derive(Clone, Debug)]
pub enum BuilderChild {
    Element(ElementBuilder),
    Text(String),
}

/// Description of an element and its subtree
#[derive(Clone, Debug)]
pub struct ElementBuilder {
    pub(crate) tag: String,
    pub(crate) classes: SmallVec<[String; 4]>,
    pub(crate) attributes: IndexMap<String, String>,
    pub(crate) style: IndexMap<String, String>,
    pub(crate) bounds: Option<Rect>,
    pub(crate) children: Vec<BuilderChild>,
}

/// Start an element with the given tag
pub fn el(tag: impl Into<String>) -> ElementBuilder {
    ElementBuilder {
        tag: tag.into(),
        classes: SmallVec::new(),
        attributes: IndexMap::new(),
        style: IndexMap::new(),
        bounds: None,
        children: Vec::new(),
    }
}

/// Start a `<div>`
pub fn div() -> ElementBuilder {
    el("div")
}

impl ElementBuilder {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Add one or more space-separated classes
    pub fn class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            if !self.classes.iter().any(|c| c == class) {
                self.classes.push(class.to_string());
            }
        }
        self
    }

    /// Add `class` only when `enabled`
    pub fn class_if(self, class: &str, enabled: bool) -> Self {
        if enabled {
            self.class(class)
        } else {
            self
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Inline style declaration
    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    /// Document-space bounds for visibility and hit testing
    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Append a text child
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(BuilderChild::Text(text.into()));
        self
    }

    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.children.push(BuilderChild::Element(child));
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = ElementBuilder>,
    {
        self.children
            .extend(children.into_iter().map(BuilderChild::Element));
        self
    }
}
