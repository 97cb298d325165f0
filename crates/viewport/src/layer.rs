use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the alternate renderings of the same target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Layer {
    #[default]
    Visible,
    Infrared,
    Xray,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown layer: {0:?}")]
pub struct UnknownLayer(pub String);

impl Layer {
    /// Selector order.
    pub const ALL: [Layer; 3] = [Layer::Visible, Layer::Infrared, Layer::Xray];

    /// Stable name used by the selector and the wire format.
    pub fn name(self) -> &'static str {
        match self {
            Layer::Visible => "Visible",
            Layer::Infrared => "Infrared",
            Layer::Xray => "Xray",
        }
    }

    /// Human-readable selector label, including the observing instrument.
    pub fn label(self) -> &'static str {
        match self {
            Layer::Visible => "Visible (Hubble)",
            Layer::Infrared => "Infrared (JWST)",
            Layer::Xray => "X-ray (Chandra)",
        }
    }

    /// Image file name relative to the asset base path.
    pub fn asset_file(self) -> &'static str {
        match self {
            Layer::Visible => "nasa-visible.jpg",
            Layer::Infrared => "nasa-infrared.jpg",
            Layer::Xray => "nasa-xray.jpg",
        }
    }

    pub fn alt_text(self) -> String {
        format!("Layer: {} NASA image", self.name())
    }

    /// Join the asset file onto `base`, tolerating a trailing slash.
    pub fn asset_url(self, base: &str) -> String {
        let base = base.trim_end_matches('/');
        if base.is_empty() {
            self.asset_file().to_string()
        } else {
            format!("{base}/{}", self.asset_file())
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layer {
    type Err = UnknownLayer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layer::ALL
            .into_iter()
            .find(|layer| layer.name() == s)
            .ok_or_else(|| UnknownLayer(s.to_string()))
    }
}
