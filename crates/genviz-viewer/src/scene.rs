//! Retained SVG element tree.
//!
//! Viewers render into a `Scene`: an owned tree of SVG elements with
//! attributes and classes. The scene is what highlight events mutate
//! (toggling `hovering`/`active` classes) and what export serializes.
//! Markup is produced as a plain string with `std::fmt::Write`.

use std::fmt::Write;

use genviz_core::event_bus::{HighlightAction, HighlightEvent, HighlightTarget};

/// Class every genviz root carries; stylesheet rules scoped to the widget
/// family select on it.
pub const WIDGET_CLASS: &str = "genviz";

/// Selector prefix identifying rules scoped to the widget family.
pub const SCOPE_SELECTOR: &str = ".genviz";

/// Class marking the whole viewer as participating in a hover.
pub const HOVERING_CLASS: &str = "hovering";

/// Class marking an element as actively highlighted.
pub const ACTIVE_CLASS: &str = "active";

/// Attribute tagging an element with its gene identifier.
pub const GENE_ATTR: &str = "data-gene";

/// Attribute tagging an element with its family identifier.
pub const FAMILY_ATTR: &str = "data-family";

/// A single element in the rendered tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    classes: Vec<String>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// A new element with the given tag and nothing else.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            classes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// The element's tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    /// Read an attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Add or remove a class.
    pub fn set_class(&mut self, name: &str, on: bool) -> &mut Self {
        if on {
            if !self.has_class(name) {
                self.classes.push(name.to_string());
            }
        } else {
            self.classes.retain(|c| c != name);
        }
        self
    }

    /// Whether the element carries the class.
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }

    /// Set the element's text content.
    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    /// Append a child and return a reference to it.
    pub fn append(&mut self, child: Element) -> &mut Element {
        let idx = self.children.len();
        self.children.push(child);
        &mut self.children[idx]
    }

    /// The element's children.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Mutable access to the element's children.
    pub fn children_mut(&mut self) -> &mut [Element] {
        &mut self.children
    }

    /// Visit this element and every descendant, depth-first.
    pub fn visit<F: FnMut(&Element)>(&self, f: &mut F) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// Visit this element and every descendant mutably, depth-first.
    pub fn visit_mut<F: FnMut(&mut Element)>(&mut self, f: &mut F) {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }

    /// Count descendants (including self) matching a predicate.
    pub fn count_matching<F: Fn(&Element) -> bool>(&self, pred: F) -> usize {
        let mut count = 0;
        self.visit(&mut |el| {
            if pred(el) {
                count += 1;
            }
        });
        count
    }

    /// Append a declaration to the element's inline `style` attribute.
    pub fn add_style(&mut self, property: &str, value: &str) {
        let declaration = format!("{property}: {value};");
        match self.attrs.iter_mut().find(|(n, _)| n == "style") {
            Some((_, style)) => {
                style.push(' ');
                style.push_str(&declaration);
            }
            None => self.attrs.push(("style".to_string(), declaration)),
        }
    }

    /// Serialize the element and its subtree as markup.
    pub fn to_markup(&self) -> String {
        // ~64 chars per element is a decent starting estimate.
        let mut out = String::with_capacity(64 * (1 + self.count_matching(|_| true)));
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape_attr(&self.classes.join(" ")));
        }
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
        }
        if self.text.is_none() && self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape_text(text));
        }
        for child in &self.children {
            child.write_markup(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

/// One compound selector: optional tag plus any number of class and
/// attribute requirements, all of which must hold on a single element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimpleSelector {
    tag: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
}

impl SimpleSelector {
    fn matches(&self, el: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if el.tag() != tag {
                return false;
            }
        }
        if !self.classes.iter().all(|c| el.has_class(c)) {
            return false;
        }
        self.attrs
            .iter()
            .all(|(name, value)| el.attr(name) == Some(value.as_str()))
    }
}

/// A descendant-combinator chain of simple selectors, e.g.
/// `.genviz .gene circle` or `[data-gene='g1']`.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    parts: Vec<SimpleSelector>,
}

impl Selector {
    /// Parse a single selector. Returns None for empty or malformed input.
    pub fn parse(input: &str) -> Option<Selector> {
        let mut parts = Vec::new();
        for word in input.split_whitespace() {
            parts.push(parse_simple(word)?);
        }
        if parts.is_empty() {
            return None;
        }
        Some(Selector { parts })
    }

    /// Parse a comma-separated selector list, dropping malformed entries.
    pub fn parse_list(input: &str) -> Vec<Selector> {
        input.split(',').filter_map(Selector::parse).collect()
    }

    /// Apply `f` to every element in `root`'s subtree matching this
    /// selector (root itself included).
    pub fn apply<F: FnMut(&mut Element)>(&self, root: &mut Element, f: &mut F) {
        walk(root, &self.parts, &[0], f);
    }

    /// Count matches in `root`'s subtree.
    pub fn count(&self, root: &Element) -> usize {
        let mut root = root.clone();
        let mut count = 0;
        self.apply(&mut root, &mut |_| count += 1);
        count
    }
}

/// Recursive descendant-combinator walk. `active` holds the chain
/// positions still reachable at this depth; matching the final position
/// fires the callback, matching an earlier one unlocks the next position
/// for every descendant.
fn walk<F: FnMut(&mut Element)>(
    el: &mut Element,
    parts: &[SimpleSelector],
    active: &[usize],
    f: &mut F,
) {
    let mut fire = false;
    let mut next_active: Vec<usize> = active.to_vec();
    for &pos in active {
        if parts[pos].matches(el) {
            if pos + 1 == parts.len() {
                fire = true;
            } else if !next_active.contains(&(pos + 1)) {
                next_active.push(pos + 1);
            }
        }
    }
    if fire {
        f(el);
    }
    for child in el.children_mut() {
        walk(child, parts, &next_active, f);
    }
}

fn parse_simple(word: &str) -> Option<SimpleSelector> {
    let mut selector = SimpleSelector::default();
    let mut rest = word;

    // Leading tag name, up to the first '.' or '['.
    let tag_end = rest.find(['.', '[']).unwrap_or(rest.len());
    if tag_end > 0 {
        selector.tag = Some(rest[..tag_end].to_string());
        rest = &rest[tag_end..];
    }

    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix('.') {
            let end = tail.find(['.', '[']).unwrap_or(tail.len());
            if end == 0 {
                return None;
            }
            selector.classes.push(tail[..end].to_string());
            rest = &tail[end..];
        } else if let Some(tail) = rest.strip_prefix('[') {
            let end = tail.find(']')?;
            let body = &tail[..end];
            let (name, value) = body.split_once('=')?;
            let value = value.trim_matches(|c| c == '\'' || c == '"');
            selector
                .attrs
                .push((name.trim().to_string(), value.to_string()));
            rest = &tail[end + 1..];
        } else {
            return None;
        }
    }

    Some(selector)
}

/// The rendered tree a viewer owns: an `<svg class="genviz">` root and
/// its subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    root: Element,
}

impl Scene {
    /// A new scene: an empty root sized to the given pixel dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        let mut root = Element::new("svg");
        root.set_class(WIDGET_CLASS, true);
        root.set_attr("width", fmt_px(width));
        root.set_attr("height", fmt_px(height));
        Self { root }
    }

    /// The root element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Mutable access to the root element.
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// The root's rendered width attribute, if numeric.
    pub fn width(&self) -> Option<f64> {
        self.root.attr("width").and_then(|w| w.parse().ok())
    }

    /// Toggle the viewer-wide hovering state.
    pub fn set_hovering(&mut self, on: bool) {
        self.root.set_class(HOVERING_CLASS, on);
    }

    /// Whether the viewer-wide hovering state is set.
    pub fn is_hovering(&self) -> bool {
        self.root.has_class(HOVERING_CLASS)
    }

    /// Whether any element in the scene is actively highlighted.
    pub fn any_active(&self) -> bool {
        self.root.count_matching(|el| el.has_class(ACTIVE_CLASS)) > 0
    }

    /// Identifiers of actively highlighted genes, in document order.
    pub fn active_genes(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.root.visit(&mut |el| {
            if el.has_class(ACTIVE_CLASS) {
                if let Some(gene) = el.attr(GENE_ATTR) {
                    out.push(gene.to_string());
                }
            }
        });
        out
    }

    /// Apply a highlight event to this scene.
    ///
    /// Targets are resolved by `data-gene` or `data-family` tags. Select
    /// marks resolved elements (and the whole viewer) active; deselect
    /// clears them. A target that resolves to nothing still toggles the
    /// viewer-wide hovering state: that dims the rest of this viewer while
    /// some other viewer shows the feature.
    pub fn apply(&mut self, event: &HighlightEvent) {
        let on = match event.action {
            HighlightAction::Select => true,
            HighlightAction::Deselect => false,
        };
        if on {
            self.set_hovering(true);
        }

        let (attr, ids) = match &event.target {
            HighlightTarget::Genes(ids) => (GENE_ATTR, ids),
            HighlightTarget::Families(ids) => (FAMILY_ATTR, ids),
        };
        self.root.visit_mut(&mut |el| {
            if let Some(value) = el.attr(attr) {
                if ids.iter().any(|id| id == value) {
                    el.set_class(ACTIVE_CLASS, on);
                }
            }
        });

        if !on {
            self.set_hovering(false);
        }
    }

    /// Serialize the scene as SVG markup.
    pub fn to_markup(&self) -> String {
        self.root.to_markup()
    }
}

/// Format a pixel dimension without trailing zeros for whole numbers.
pub fn fmt_px(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}
