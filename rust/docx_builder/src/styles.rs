//! Style registry: which named styles the target template provides and how a
//! list level maps onto them.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const LIST_BULLET: &str = "List Bullet";
pub const LIST_NUMBER: &str = "List Number";
pub const TABLE_GRID: &str = "Table Grid";
pub const TITLE: &str = "Title";

/// Deepest list level the stock Word template styles.
pub const DEFAULT_LIST_LEVELS: u32 = 3;

/// Word numbering has nine indent levels (`ilvl` 0..=8).
pub const MAX_LIST_LEVELS: u32 = 9;

pub const MAX_HEADING_LEVEL: u8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListKind {
    Bullet,
    Number,
}

impl ListKind {
    pub fn from_ordered(ordered: bool) -> Self {
        if ordered {
            ListKind::Number
        } else {
            ListKind::Bullet
        }
    }

    pub fn base_style(self) -> &'static str {
        match self {
            ListKind::Bullet => LIST_BULLET,
            ListKind::Number => LIST_NUMBER,
        }
    }

    /// Style name for a level; level 1 (and 0) is the bare base style.
    pub fn style_name(self, level: u32) -> String {
        if level > 1 {
            format!("{} {}", self.base_style(), level)
        } else {
            self.base_style().to_string()
        }
    }
}

/// What to do when the template lacks the style for a list level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Drop straight to "List Bullet" / "List Number".
    #[default]
    Base,
    /// Walk down one level at a time and take the deepest style that exists.
    Nearest,
}

/// Recorded whenever a list item ends up with a shallower style than asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleWarning {
    pub requested: String,
    pub used: String,
}

impl fmt::Display for StyleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "style '{}' not found, falling back to '{}'",
            self.requested, self.used
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStyle {
    pub name: String,
    pub downgraded_from: Option<String>,
}

impl ResolvedStyle {
    pub fn warning(&self) -> Option<StyleWarning> {
        self.downgraded_from.as_ref().map(|requested| StyleWarning {
            requested: requested.clone(),
            used: self.name.clone(),
        })
    }
}

/// Immutable view of the styles a template defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRegistry {
    available: BTreeSet<String>,
    fallback: FallbackPolicy,
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::with_list_levels(DEFAULT_LIST_LEVELS)
    }
}

impl StyleRegistry {
    /// Registry that knows exactly the given style names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            available: names.into_iter().map(Into::into).collect(),
            fallback: FallbackPolicy::default(),
        }
    }

    /// Headings, title, table grid and list styles for levels `1..=levels`,
    /// with `levels` clamped to `1..=MAX_LIST_LEVELS`.
    pub fn with_list_levels(levels: u32) -> Self {
        let mut available = BTreeSet::new();
        available.insert(TITLE.to_string());
        available.insert(TABLE_GRID.to_string());
        for level in 1..=MAX_HEADING_LEVEL {
            available.insert(heading_style(level));
        }
        for kind in [ListKind::Bullet, ListKind::Number] {
            for level in 1..=levels.clamp(1, MAX_LIST_LEVELS) {
                available.insert(kind.style_name(level));
            }
        }
        Self {
            available,
            fallback: FallbackPolicy::default(),
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_style(mut self, name: impl Into<String>) -> Self {
        self.available.insert(name.into());
        self
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    pub fn contains(&self, name: &str) -> bool {
        self.available.contains(name)
    }

    pub fn styles(&self) -> impl Iterator<Item = &str> {
        self.available.iter().map(String::as_str)
    }

    /// Resolve a list level to a style name. The base style is always
    /// returned as a last resort, even if the template omits it.
    pub fn resolve(&self, kind: ListKind, level: u32) -> ResolvedStyle {
        let candidate = kind.style_name(level);
        if level <= 1 || self.contains(&candidate) {
            return ResolvedStyle {
                name: candidate,
                downgraded_from: None,
            };
        }

        let name = match self.fallback {
            FallbackPolicy::Base => kind.base_style().to_string(),
            FallbackPolicy::Nearest => (2..level)
                .rev()
                .map(|l| kind.style_name(l))
                .find(|name| self.contains(name))
                .unwrap_or_else(|| kind.base_style().to_string()),
        };
        warn!(requested = %candidate, used = %name, "list style not in template");
        ResolvedStyle {
            name,
            downgraded_from: Some(candidate),
        }
    }

    pub fn resolve_ordered(&self, ordered: bool, level: u32) -> ResolvedStyle {
        self.resolve(ListKind::from_ordered(ordered), level)
    }
}

pub fn heading_style(level: u8) -> String {
    format!("Heading {level}")
}

/// Word style id for a display name: "List Bullet 2" -> "ListBullet2".
pub fn style_id(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}
