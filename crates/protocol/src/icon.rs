use serde::{Deserialize, Serialize};

/// Semantic marker tokens resolved by the map surface's own styling.
///
/// Each marker and list row is tagged with one of these; colors and
/// shapes are up to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerIcon {
    Running,
    Cycling,
}

impl MarkerIcon {
    /// Glyph shown in popups and list rows.
    pub fn glyph(self) -> &'static str {
        match self {
            MarkerIcon::Running => "🏃",
            MarkerIcon::Cycling => "🚴",
        }
    }

    /// Popup style class name, stable across surfaces.
    pub fn popup_class(self) -> &'static str {
        match self {
            MarkerIcon::Running => "running-popup",
            MarkerIcon::Cycling => "cycling-popup",
        }
    }
}
