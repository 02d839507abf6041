//! Recorded element descriptors.

use serde::{Deserialize, Serialize};

/// Bounding box captured at record time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Structural attributes kept for recovery.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintAttributes {
    /// `type` attribute of the element (`text`, `checkbox`, ...)
    #[serde(rename = "type")]
    pub input_type: Option<String>,
    pub role: Option<String>,
}

/// Surrounding page context kept for recovery.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FingerprintContext {
    /// Label or neighbouring text the element was visually associated with
    pub nearby_text: Option<String>,
    pub parent_tag: Option<String>,
    pub heading: Option<String>,
}

/// Recovery-only snapshot of an element's surroundings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fingerprint {
    pub attributes: FingerprintAttributes,
    pub context: FingerprintContext,
}

/// Everything known about an element when it was recorded.
///
/// A descriptor is never rewritten after capture. Healing produces a live
/// match for the current run only; the stored value stays as recorded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementDescriptor {
    /// Tag name
    #[serde(rename = "type")]
    pub tag: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub selector: Option<String>,
    pub css_selector: Option<String>,
    /// Positional path from a stable ancestor, used verbatim as last resort
    pub xpath: Option<String>,
    pub text: Option<String>,
    pub placeholder: Option<String>,
    pub data_test: Option<String>,
    pub aria_label: Option<String>,
    pub role: Option<String>,
    pub title: Option<String>,
    pub alt: Option<String>,
    pub class_name: Option<String>,
    pub value: Option<String>,
    pub href: Option<String>,
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Fingerprint>,
    /// Human-friendly name used only in logs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_xpath: Option<String>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl ElementDescriptor {
    pub fn xpath(&self) -> Option<&str> {
        present(&self.xpath)
    }

    pub fn id(&self) -> Option<&str> {
        present(&self.id)
    }

    /// Visible text, trimmed.
    pub fn text(&self) -> Option<&str> {
        present(&self.text)
    }

    pub fn tag(&self) -> Option<&str> {
        present(&self.tag)
    }

    pub fn aria_label(&self) -> Option<&str> {
        present(&self.aria_label)
    }

    pub fn nearby_text(&self) -> Option<&str> {
        self.fingerprint
            .as_ref()
            .and_then(|fp| present(&fp.context.nearby_text))
    }

    pub fn fingerprint_role(&self) -> Option<&str> {
        self.fingerprint
            .as_ref()
            .and_then(|fp| present(&fp.attributes.role))
    }

    /// Label used when logging about this element.
    pub fn display_name(&self) -> String {
        present(&self.element_name)
            .or_else(|| self.text())
            .map(str::to_string)
            .or_else(|| self.id().map(|id| format!("#{id}")))
            .or_else(|| self.xpath().map(str::to_string))
            .unwrap_or_else(|| "<unnamed element>".to_string())
    }
}
