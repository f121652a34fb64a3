//! Fixed capability surface for the embed accessor API.
//!
//! Engines declare up front which accessor operations they implement; the
//! embed checks the declared flag instead of probing object shape. The
//! operation list itself is fixed for all engines.

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One accessor operation of the embed surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EmbedCapability {
    ExportPng,
    ExportPsd,
    SetBrushSize,
    GetBrushSize,
    SetBrushOpacity,
    GetBrushOpacity,
    SetBrushScatter,
    Draw,
    ClearLayer,
    GetColor,
    HideToolPanel,
}

/// Every capability, in stable declaration order.
pub const ALL_CAPABILITIES: &[EmbedCapability] = &[
    EmbedCapability::ExportPng,
    EmbedCapability::ExportPsd,
    EmbedCapability::SetBrushSize,
    EmbedCapability::GetBrushSize,
    EmbedCapability::SetBrushOpacity,
    EmbedCapability::GetBrushOpacity,
    EmbedCapability::SetBrushScatter,
    EmbedCapability::Draw,
    EmbedCapability::ClearLayer,
    EmbedCapability::GetColor,
    EmbedCapability::HideToolPanel,
];

impl EmbedCapability {
    /// Stable string id used in host-facing declarations.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExportPng => "export_png",
            Self::ExportPsd => "export_psd",
            Self::SetBrushSize => "set_brush_size",
            Self::GetBrushSize => "get_brush_size",
            Self::SetBrushOpacity => "set_brush_opacity",
            Self::GetBrushOpacity => "get_brush_opacity",
            Self::SetBrushScatter => "set_brush_scatter",
            Self::Draw => "draw",
            Self::ClearLayer => "clear_layer",
            Self::GetColor => "get_color",
            Self::HideToolPanel => "hide_tool_panel",
        }
    }

    /// User-facing short description.
    pub fn description(self) -> &'static str {
        match self {
            Self::ExportPng => "Export the current image as PNG bytes.",
            Self::ExportPsd => "Export the current document in the legacy layered format.",
            Self::SetBrushSize => "Set the brush size (actual value, not display value).",
            Self::GetBrushSize => "Read the current brush size.",
            Self::SetBrushOpacity => "Set the brush opacity.",
            Self::GetBrushOpacity => "Read the current brush opacity.",
            Self::SetBrushScatter => "Set the brush scatter.",
            Self::Draw => "Append a stroke along a path of points.",
            Self::ClearLayer => "Clear the active layer.",
            Self::GetColor => "Read the current color.",
            Self::HideToolPanel => "Hide the host-visible tool panel.",
        }
    }
}

/// Returns the stable string ids of every capability.
pub fn supported_capability_strings() -> Vec<&'static str> {
    ALL_CAPABILITIES
        .iter()
        .map(|capability| capability.as_str())
        .collect()
}

/// Parses one capability from its host-facing string id.
pub fn parse_capability(value: &str) -> Result<EmbedCapability, CapabilityParseError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(CapabilityParseError::EmptyCapability);
    }

    ALL_CAPABILITIES
        .iter()
        .copied()
        .find(|capability| capability.as_str() == normalized)
        .ok_or_else(|| CapabilityParseError::UnsupportedCapability(normalized.to_string()))
}

/// Capability parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityParseError {
    EmptyCapability,
    UnsupportedCapability(String),
}

impl Display for CapabilityParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCapability => write!(f, "capability value must not be empty"),
            Self::UnsupportedCapability(value) => {
                write!(f, "capability is unsupported: {value}")
            }
        }
    }
}

impl Error for CapabilityParseError {}

/// Declared membership set for one engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    entries: BTreeSet<EmbedCapability>,
}

impl CapabilitySet {
    /// Returns a set with no declared operations.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a set declaring every operation.
    pub fn full() -> Self {
        ALL_CAPABILITIES.iter().copied().collect()
    }

    /// True when `capability` is declared.
    pub fn supports(&self, capability: EmbedCapability) -> bool {
        self.entries.contains(&capability)
    }

    pub fn insert(&mut self, capability: EmbedCapability) {
        self.entries.insert(capability);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared capabilities in stable order.
    pub fn iter(&self) -> impl Iterator<Item = EmbedCapability> + '_ {
        self.entries.iter().copied()
    }
}

impl FromIterator<EmbedCapability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = EmbedCapability>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        parse_capability, supported_capability_strings, CapabilityParseError, CapabilitySet,
        EmbedCapability, ALL_CAPABILITIES,
    };

    #[test]
    fn parses_every_declared_capability_string() {
        for capability in ALL_CAPABILITIES.iter().copied() {
            let parsed = parse_capability(capability.as_str()).expect("capability parse");
            assert_eq!(parsed, capability);
        }
    }

    #[test]
    fn rejects_empty_capability() {
        let err = parse_capability("   ").expect_err("empty capability must fail");
        assert_eq!(err, CapabilityParseError::EmptyCapability);
    }

    #[test]
    fn rejects_unsupported_capability() {
        let err = parse_capability("resize_canvas").expect_err("unsupported capability must fail");
        assert_eq!(
            err,
            CapabilityParseError::UnsupportedCapability("resize_canvas".to_string())
        );
    }

    #[test]
    fn full_set_declares_every_operation() {
        let set = CapabilitySet::full();
        assert_eq!(set.len(), ALL_CAPABILITIES.len());
        for capability in ALL_CAPABILITIES.iter().copied() {
            assert!(set.supports(capability));
        }
    }

    #[test]
    fn partial_set_reports_missing_operations() {
        let set: CapabilitySet = [EmbedCapability::Draw, EmbedCapability::GetColor]
            .into_iter()
            .collect();
        assert!(set.supports(EmbedCapability::Draw));
        assert!(!set.supports(EmbedCapability::SetBrushSize));
    }

    #[test]
    fn string_ids_are_unique() {
        let values = supported_capability_strings();
        let deduped: std::collections::BTreeSet<_> = values.iter().collect();
        assert_eq!(values.len(), deduped.len());
    }
}
