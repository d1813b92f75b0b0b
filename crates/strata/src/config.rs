//! Configuration types for Strata layout and interaction.
//!
//! All types implement [`serde::Deserialize`] with per-field defaults, so a
//! partial TOML or JSON document only overrides what it names.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and interaction settings.
//! - [`LayoutConfig`] - Orientation, node size and spacing used by the layout engine.
//! - [`InteractionConfig`] - Limits applied by the interaction state machine.
//!
//! # Example
//!
//! ```
//! # use strata::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.layout().ordering_passes(), 4);
//! ```

use serde::Deserialize;

use strata_core::geometry::Size;

use crate::{StrataError, layout::Orientation};

/// Top-level configuration combining layout and interaction settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Interaction configuration section.
    #[serde(default)]
    interaction: InteractionConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified sections.
    pub fn new(layout: LayoutConfig, interaction: InteractionConfig) -> Self {
        Self {
            layout,
            interaction,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the interaction configuration.
    pub fn interaction(&self) -> &InteractionConfig {
        &self.interaction
    }

    /// Checks every section for values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), StrataError> {
        self.layout.validate()?;
        self.interaction.validate()
    }
}

/// Node size and spacing used by the layout engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    orientation: Orientation,
    node_width: f32,
    node_height: f32,
    node_gap: f32,
    rank_gap: f32,
    ordering_passes: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            node_width: 160.0,
            node_height: 48.0,
            node_gap: 40.0,
            rank_gap: 80.0,
            ordering_passes: 4,
        }
    }
}

impl LayoutConfig {
    /// Returns the default flow direction.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns the fixed size of every node.
    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    /// Returns the gap between neighboring nodes of one rank.
    pub fn node_gap(&self) -> f32 {
        self.node_gap
    }

    /// Returns the gap between consecutive ranks.
    pub fn rank_gap(&self) -> f32 {
        self.rank_gap
    }

    /// Returns the number of barycenter ordering passes.
    pub fn ordering_passes(&self) -> usize {
        self.ordering_passes
    }

    /// Sets the default flow direction (builder style).
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the node size (builder style).
    pub fn with_node_size(mut self, size: Size) -> Self {
        self.node_width = size.width();
        self.node_height = size.height();
        self
    }

    /// Sets the node and rank gaps (builder style).
    pub fn with_gaps(mut self, node_gap: f32, rank_gap: f32) -> Self {
        self.node_gap = node_gap;
        self.rank_gap = rank_gap;
        self
    }

    /// Sets the number of ordering passes (builder style).
    pub fn with_ordering_passes(mut self, passes: usize) -> Self {
        self.ordering_passes = passes;
        self
    }

    fn validate(&self) -> Result<(), StrataError> {
        let positive = [
            ("layout.node_width", self.node_width),
            ("layout.node_height", self.node_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(StrataError::Config(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        let non_negative = [
            ("layout.node_gap", self.node_gap),
            ("layout.rank_gap", self.rank_gap),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(StrataError::Config(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        Ok(())
    }
}

/// Limits applied by the interaction state machine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    min_zoom: f32,
    max_zoom: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

impl InteractionConfig {
    /// Creates a configuration with the given zoom limits.
    pub fn new(min_zoom: f32, max_zoom: f32) -> Self {
        Self { min_zoom, max_zoom }
    }

    /// Returns the smallest allowed zoom factor.
    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    /// Returns the largest allowed zoom factor.
    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    fn validate(&self) -> Result<(), StrataError> {
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            return Err(StrataError::Config(format!(
                "interaction.min_zoom must be a positive number, got {}",
                self.min_zoom
            )));
        }
        if !(self.max_zoom.is_finite() && self.max_zoom >= self.min_zoom) {
            return Err(StrataError::Config(format!(
                "interaction.max_zoom must be at least min_zoom ({}), got {}",
                self.min_zoom, self.max_zoom
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.layout().orientation(), Orientation::TopToBottom);
        assert_eq!(config.layout().node_size(), Size::new(160.0, 48.0));
        assert_eq!(config.layout().node_gap(), 40.0);
        assert_eq!(config.layout().rank_gap(), 80.0);
        assert_eq!(config.interaction().min_zoom(), 0.1);
        assert_eq!(config.interaction().max_zoom(), 10.0);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let json = r#"{"layout": {"orientation": "lr", "node_gap": 12.0}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.layout().orientation(), Orientation::LeftToRight);
        assert_eq!(config.layout().node_gap(), 12.0);
        assert_eq!(config.layout().rank_gap(), 80.0);
        assert_eq!(config.interaction(), &InteractionConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let layout = LayoutConfig::default().with_node_size(Size::new(0.0, 10.0));
        let config = AppConfig::new(layout, InteractionConfig::default());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("layout.node_width"));

        let layout = LayoutConfig::default().with_gaps(-1.0, 10.0);
        let config = AppConfig::new(layout, InteractionConfig::default());
        assert!(config.validate().is_err());

        let config = AppConfig::new(LayoutConfig::default(), InteractionConfig::new(2.0, 1.0));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("interaction.max_zoom"));
    }
}
