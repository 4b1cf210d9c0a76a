// SPDX-License-Identifier: GPL-3.0-only

//! Filter selection
//!
//! Keeps the chosen filter and pushes its expression onto the preview as soon
//! as the choice changes. Capture reads the same expression back, so photos
//! match the preview.

use crate::backends::camera::PreviewSurface;
use crate::pipelines::photo::filters::{FilterKind, resolve};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelector {
    selected: String,
    expression: String,
}

impl Default for FilterSelector {
    fn default() -> Self {
        let none = FilterKind::None;
        Self {
            selected: none.name().to_string(),
            expression: none.expression().to_string(),
        }
    }
}

impl FilterSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a filter by preset name or raw expression and apply it to `preview`
    pub fn select(&mut self, name: &str, preview: &mut PreviewSurface) {
        let name = name.trim();
        self.selected = name.to_string();
        self.expression = resolve(name);
        preview.filter = self.expression.clone();
        info!(filter = %self.selected, expression = %self.expression, "Filter selected");
    }

    /// Name as selected
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Preset behind the selection, if it is one
    pub fn kind(&self) -> Option<FilterKind> {
        FilterKind::from_name(&self.selected)
    }

    /// Expression applied to preview and captures
    pub fn expression(&self) -> &str {
        &self.expression
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let selector = FilterSelector::new();
        assert_eq!(selector.expression(), "none");
        assert_eq!(selector.kind(), Some(FilterKind::None));
    }

    #[test]
    fn test_select_updates_preview_synchronously() {
        let mut selector = FilterSelector::new();
        let mut preview = PreviewSurface::default();

        selector.select("polaroid", &mut preview);
        assert_eq!(preview.filter, FilterKind::Polaroid.expression());
        assert_eq!(selector.kind(), Some(FilterKind::Polaroid));

        selector.select("blur(2px)", &mut preview);
        assert_eq!(preview.filter, "blur(2px)");
        assert_eq!(selector.kind(), None);
    }

    #[test]
    fn test_select_trims_raw_expression() {
        let mut selector = FilterSelector::new();
        let mut preview = PreviewSurface::default();

        selector.select("  blur(2px)\t", &mut preview);
        assert_eq!(selector.selected(), "blur(2px)");
        assert_eq!(selector.expression(), "blur(2px)");
        assert_eq!(preview.filter, "blur(2px)");

        selector.select(" Sepia ", &mut preview);
        assert_eq!(preview.filter, "sepia(100%)");
    }
}
