//! Stylesheet access and export-time style inlining.
//!
//! Live rendering leaves presentation to host stylesheets; export has no
//! host, so `inline_copy` bakes the widget-scoped rules into a clone of
//! the scene as inline `style` attributes. Stylesheet access goes through
//! the `StyleSource` capability so viewers never touch host documents
//! directly.

use thiserror::Error;

use crate::scene::{Scene, Selector, SCOPE_SELECTOR};

/// A stylesheet refused to reveal its rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StyleAccessError {
    /// The sheet's origin forbids reading its rules.
    #[error("stylesheet '{origin}' is not readable from this origin")]
    Opaque {
        /// Where the sheet was loaded from.
        origin: String,
    },
}

/// One parsed style rule: a selector string and its declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    selector: String,
    declarations: Vec<(String, String)>,
}

impl StyleRule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            declarations: Vec::new(),
        }
    }

    /// Add a declaration, builder style.
    pub fn declare(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.declarations.push((property.into(), value.into()));
        self
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn declarations(&self) -> &[(String, String)] {
        &self.declarations
    }

    /// Whether the rule's selector list contains a widget-scoped entry.
    pub fn is_scoped(&self) -> bool {
        self.selector
            .split(',')
            .any(|s| s.trim_start().starts_with(SCOPE_SELECTOR))
    }
}

/// A stylesheet held by the host. Cross-origin sheets exist but refuse
/// to enumerate their rules.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    origin: String,
    rules: Option<Vec<StyleRule>>,
}

impl StyleSheet {
    /// A readable sheet with the given rules.
    pub fn readable(origin: impl Into<String>, rules: Vec<StyleRule>) -> Self {
        Self {
            origin: origin.into(),
            rules: Some(rules),
        }
    }

    /// An opaque sheet: present, but its rules cannot be read.
    pub fn opaque(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            rules: None,
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The sheet's rules, or `StyleAccessError::Opaque`.
    pub fn rules(&self) -> Result<&[StyleRule], StyleAccessError> {
        self.rules
            .as_deref()
            .ok_or_else(|| StyleAccessError::Opaque {
                origin: self.origin.clone(),
            })
    }
}

/// Capability viewers use to read the styles that apply to them.
pub trait StyleSource: Send + Sync {
    /// Rules whose selector list includes an entry scoped to `scope`.
    fn scoped_rules(&self, scope: &str) -> Vec<StyleRule>;
}

/// The host's stylesheet collection. Unreadable sheets are skipped with
/// a warning rather than failing the whole export.
#[derive(Debug, Clone, Default)]
pub struct DocumentStyles {
    sheets: Vec<StyleSheet>,
}

impl DocumentStyles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, sheet: StyleSheet) {
        self.sheets.push(sheet);
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }
}

impl StyleSource for DocumentStyles {
    fn scoped_rules(&self, scope: &str) -> Vec<StyleRule> {
        let mut out = Vec::new();
        for sheet in &self.sheets {
            let rules = match sheet.rules() {
                Ok(rules) => rules,
                Err(err) => {
                    tracing::warn!(origin = sheet.origin(), error = %err, "skipping unreadable stylesheet");
                    continue;
                }
            };
            for rule in rules {
                let scoped: Vec<&str> = rule
                    .selector
                    .split(',')
                    .map(str::trim)
                    .filter(|s| s.starts_with(scope))
                    .collect();
                if scoped.is_empty() {
                    continue;
                }
                out.push(StyleRule {
                    selector: scoped.join(", "),
                    declarations: rule.declarations.clone(),
                });
            }
        }
        out
    }
}

/// Clone a scene with widget-scoped style rules inlined onto the
/// elements they select. Rules apply in sheet order, so later rules
/// land later in each element's `style` attribute.
pub fn inline_copy(scene: &Scene, styles: &dyn StyleSource) -> Scene {
    let mut copy = scene.clone();
    for rule in styles.scoped_rules(SCOPE_SELECTOR) {
        for selector in Selector::parse_list(rule.selector()) {
            selector.apply(copy.root_mut(), &mut |el| {
                for (property, value) in rule.declarations() {
                    el.add_style(property, value);
                }
            });
        }
    }
    copy
}
