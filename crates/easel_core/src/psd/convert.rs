//! Raw decoded structure to canonical project conversion.

use super::{DecodeError, RawPsdDocument};
use crate::model::project::{Project, ProjectLayer};

/// Converts one raw decoded document into a canonical project.
///
/// # Invariants
/// - Zero-dimension documents are rejected.
/// - Layer opacity is normalized from `0..=255` to `0.0..=1.0`.
/// - Blank layer names receive a stable generated name.
/// - The produced project carries no id; the lifecycle guard assigns one
///   when the project is opened.
pub fn psd_to_project(raw: RawPsdDocument) -> Result<Project, DecodeError> {
    if raw.width == 0 || raw.height == 0 {
        return Err(DecodeError::EmptyDocument);
    }

    let layers = raw
        .layers
        .into_iter()
        .enumerate()
        .map(|(index, layer)| {
            let name = if layer.name.trim().is_empty() {
                format!("Layer {}", index + 1)
            } else {
                layer.name
            };
            ProjectLayer {
                name,
                opacity: f64::from(layer.opacity) / 255.0,
                is_visible: !layer.hidden,
                pixels: layer.pixels,
            }
        })
        .collect();

    Ok(Project {
        id: None,
        width: raw.width,
        height: raw.height,
        layers,
    })
}

#[cfg(test)]
mod tests {
    use super::psd_to_project;
    use crate::psd::{DecodeError, RawPsdDocument, RawPsdLayer};

    fn raw_layer(name: &str, opacity: u8, hidden: bool) -> RawPsdLayer {
        RawPsdLayer {
            name: name.to_string(),
            opacity,
            hidden,
            pixels: vec![1, 2, 3],
        }
    }

    #[test]
    fn normalizes_opacity_and_visibility() {
        let raw = RawPsdDocument {
            width: 100,
            height: 50,
            layers: vec![raw_layer("Background", 255, false), raw_layer("Sketch", 0, true)],
        };

        let project = psd_to_project(raw).expect("conversion");
        assert_eq!(project.width, 100);
        assert_eq!(project.height, 50);
        assert_eq!(project.layers[0].opacity, 1.0);
        assert!(project.layers[0].is_visible);
        assert_eq!(project.layers[1].opacity, 0.0);
        assert!(!project.layers[1].is_visible);
    }

    #[test]
    fn backfills_blank_layer_names() {
        let raw = RawPsdDocument {
            width: 10,
            height: 10,
            layers: vec![raw_layer("", 128, false), raw_layer("   ", 128, false)],
        };

        let project = psd_to_project(raw).expect("conversion");
        assert_eq!(project.layers[0].name, "Layer 1");
        assert_eq!(project.layers[1].name, "Layer 2");
    }

    #[test]
    fn preserves_pixel_payload_untouched() {
        let raw = RawPsdDocument {
            width: 2,
            height: 2,
            layers: vec![raw_layer("L", 10, false)],
        };

        let project = psd_to_project(raw).expect("conversion");
        assert_eq!(project.layers[0].pixels, vec![1, 2, 3]);
    }

    #[test]
    fn rejects_zero_dimension_documents() {
        let raw = RawPsdDocument {
            width: 0,
            height: 32,
            layers: vec![],
        };

        let err = psd_to_project(raw).expect_err("zero width must fail");
        assert_eq!(err, DecodeError::EmptyDocument);
    }

    #[test]
    fn produced_project_carries_no_identity() {
        let raw = RawPsdDocument {
            width: 8,
            height: 8,
            layers: vec![],
        };

        let project = psd_to_project(raw).expect("conversion");
        assert_eq!(project.id, None);
    }
}
