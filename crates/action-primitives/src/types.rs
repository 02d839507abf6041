//! Core types shared by browser backends

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-neutral description of how to find an element on the page.
///
/// Every selector is lazy: it is evaluated against the live page each time
/// an element handle built from it is used, and always picks the first match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selector {
    /// XPath expression
    #[serde(rename = "xpath")]
    XPath { path: String },

    /// CSS selector
    Css { css: String },

    /// Element whose own visible text matches
    Text { text: String, exact: bool },

    /// Form control associated with a label (or `aria-label`) containing the text
    Label { text: String },

    /// ARIA role (explicit or implicit) with optional accessible name
    Role { role: String, name: Option<String> },

    /// Element matching `target` positioned close to an element showing `anchor_text`
    Near { target: String, anchor_text: String },

    /// Element matching `css`, or a descendant of one, whose text matches
    CssText { css: String, text: String, exact: bool },
}

impl Selector {
    pub fn xpath(path: impl Into<String>) -> Self {
        Selector::XPath { path: path.into() }
    }

    pub fn css(css: impl Into<String>) -> Self {
        Selector::Css { css: css.into() }
    }

    pub fn id(id: &str) -> Self {
        Selector::Css {
            css: format!("#{}", id),
        }
    }

    pub fn text(text: impl Into<String>, exact: bool) -> Self {
        Selector::Text {
            text: text.into(),
            exact,
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Selector::Label { text: text.into() }
    }

    pub fn role(role: impl Into<String>, name: Option<String>) -> Self {
        Selector::Role {
            role: role.into(),
            name,
        }
    }

    pub fn near(target: impl Into<String>, anchor_text: impl Into<String>) -> Self {
        Selector::Near {
            target: target.into(),
            anchor_text: anchor_text.into(),
        }
    }

    pub fn css_text(css: impl Into<String>, text: impl Into<String>, exact: bool) -> Self {
        Selector::CssText {
            css: css.into(),
            text: text.into(),
            exact,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::XPath { path } => write!(f, "xpath={}", path),
            Selector::Css { css } => write!(f, "css={}", css),
            Selector::Text { text, exact: true } => write!(f, "text=\"{}\"", text),
            Selector::Text { text, exact: false } => write!(f, "text~\"{}\"", text),
            Selector::Label { text } => write!(f, "label=\"{}\"", text),
            Selector::Role { role, name: None } => write!(f, "role={}", role),
            Selector::Role {
                role,
                name: Some(name),
            } => write!(f, "role={}[name=\"{}\"]", role, name),
            Selector::Near {
                target,
                anchor_text,
            } => write!(f, "{}:near(:text(\"{}\"))", target, anchor_text),
            Selector::CssText { css, text, exact } => {
                let op = if *exact { "=" } else { "~" };
                write!(f, "{} >> text{}\"{}\"", css, op, text)
            }
        }
    }
}

/// Element state a wait can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementState {
    Visible,
    Hidden,
}

/// Page lifecycle milestone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadState {
    /// `load` event fired
    Load,

    /// DOM parsed
    DomContentLoaded,

    /// No network activity for a short quiet window
    NetworkIdle,
}

impl LoadState {
    pub fn name(&self) -> &'static str {
        match self {
            LoadState::Load => "load",
            LoadState::DomContentLoaded => "domcontentloaded",
            LoadState::NetworkIdle => "networkidle",
        }
    }
}

/// Mouse button used for clicks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
}

/// Dropdown option to pick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectOption {
    /// Option whose value or visible label equals the string
    ValueOrLabel(String),

    /// Option whose visible label equals the string
    Label(String),
}

impl SelectOption {
    pub fn as_str(&self) -> &str {
        match self {
            SelectOption::ValueOrLabel(s) | SelectOption::Label(s) => s,
        }
    }
}

/// Window (tab) to bring to the front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowTarget {
    /// The tab after the current one
    Next,

    /// Tab at a zero-based index
    Index(usize),
}

impl WindowTarget {
    /// Parses `"next"` or a numeric index; anything else means the first tab.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("next") => WindowTarget::Next,
            Some(value) => value
                .parse::<usize>()
                .map(WindowTarget::Index)
                .unwrap_or(WindowTarget::Index(0)),
            None => WindowTarget::Index(0),
        }
    }
}

/// Which readiness stages settled within their bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReadiness {
    pub loaded: bool,
    pub dom_ready: bool,
    pub indicators_cleared: bool,
    pub network_idle: bool,
}

impl PageReadiness {
    /// All stages settled
    pub fn is_settled(&self) -> bool {
        self.loaded && self.dom_ready && self.indicators_cleared && self.network_idle
    }
}
