//! hOCR `title` attribute codec.
//!
//! The upstream renderer stores geometry in a semicolon-separated property
//! list, e.g. `bbox 120 340 860 372; x_wconf 93`. [`HocrTitle`] pulls out the
//! `bbox` property through the [`BBox`] codec and keeps every other property
//! verbatim so the attribute can be written back after the box changes.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::LayoutError;
use crate::geometry::BBox;

static BBOX_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^bbox(?:\s+(.*))?$").expect("valid bbox regex"));

/// A parsed hOCR `title` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HocrTitle {
    /// Bounding box from the `bbox` property.
    pub bbox: BBox,
    properties: Vec<String>,
    bbox_slot: usize,
}

impl HocrTitle {
    /// Parse a `title` attribute value.
    pub fn parse(title: &str) -> Result<Self, LayoutError> {
        let properties: Vec<String> = title
            .split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        for (slot, property) in properties.iter().enumerate() {
            if let Some(caps) = BBOX_PROPERTY.captures(property) {
                let coords = caps.get(1).map_or("", |m| m.as_str());
                let bbox = coords.parse::<BBox>()?;
                return Ok(Self {
                    bbox,
                    properties,
                    bbox_slot: slot,
                });
            }
        }

        Err(LayoutError::MalformedBoundingBox {
            input: title.to_string(),
            reason: "no bbox property".to_string(),
        })
    }

    /// Properties other than `bbox`, in their original order.
    pub fn other_properties(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != self.bbox_slot)
            .map(|(_, p)| p.as_str())
    }

    /// Value of a named property other than `bbox`, e.g. `x_wconf`.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.other_properties().find_map(|p| {
            let (key, value) = p.split_once(char::is_whitespace).unwrap_or((p, ""));
            (key == name).then(|| value.trim())
        })
    }
}

impl FromStr for HocrTitle {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HocrTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, property) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            if i == self.bbox_slot {
                write!(f, "bbox {}", self.bbox)?;
            } else {
                f.write_str(property)?;
            }
        }
        Ok(())
    }
}
