use serde::{Deserialize, Serialize};

use crate::config::defaults::DEFAULT_PIXEL_SIZE;

/// Complete description of one image to produce
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationPayload {
    /// Text or URL encoded into the QR symbol
    pub target: String,
    pub icon: Option<IconSource>,
    /// Side length of the square output, in pixels
    pub pixel_size: i64,
}

impl GenerationPayload {
    pub fn new(target: impl Into<String>, icon: Option<IconSource>, pixel_size: Option<i64>) -> Self {
        Self {
            target: target.into(),
            icon,
            pixel_size: pixel_size.unwrap_or(DEFAULT_PIXEL_SIZE),
        }
    }
}

/// Where the center icon comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum IconSource {
    /// Fetched over HTTP at render time
    Remote(String),
    /// Base64 image bytes, bare or as a `data:` URL
    Inline(String),
}

impl IconSource {
    /// Pick the icon source from the two optional request fields.
    ///
    /// Inline data wins when both are present; empty strings count as absent.
    pub fn from_parts(remote: Option<String>, inline: Option<String>) -> Option<Self> {
        let inline = inline.filter(|data| !data.trim().is_empty());
        let remote = remote.filter(|url| !url.trim().is_empty());

        match (remote, inline) {
            (_, Some(data)) => Some(Self::Inline(data)),
            (Some(url), None) => Some(Self::from_reference(url)),
            (None, None) => None,
        }
    }

    /// Classify a single icon reference: `data:` URLs are inline, anything
    /// else is fetched.
    pub fn from_reference(reference: String) -> Self {
        if reference.trim_start().starts_with("data:") {
            Self::Inline(reference)
        } else {
            Self::Remote(reference)
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline(_))
    }
}
