//! Host chart state shared by its series.
//!
//! Holds the plot area geometry, the scene graph and the loading indicator.
//! Series keep an `Rc<RefCell<Chart>>` and borrow it only for short,
//! synchronous sections of a draw pass.

use crate::scene::Scene;
use batuta_common::display::WithDimensions;

/// Rectangle of the chart in which series are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlotArea {
    /// Offset from the chart's left edge.
    pub left: u32,
    /// Offset from the chart's top edge.
    pub top: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PlotArea {
    /// Create a plot area.
    #[must_use]
    pub const fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Whether the area has no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A chart: plot area, scene, loading indicator.
#[derive(Debug, Clone)]
pub struct Chart {
    plot_area: PlotArea,
    scene: Scene,
    loading: Option<String>,
    loading_shown: usize,
}

impl Chart {
    /// Create a chart whose plot area covers the whole surface.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_plot_area(width, height, PlotArea::new(0, 0, width, height))
    }

    /// Create a chart with an explicit plot area inside a `width` x `height` surface.
    #[must_use]
    pub fn with_plot_area(width: u32, height: u32, plot_area: PlotArea) -> Self {
        Self {
            plot_area,
            scene: Scene::new(width, height),
            loading: None,
            loading_shown: 0,
        }
    }

    /// Current plot area.
    #[must_use]
    pub const fn plot_area(&self) -> PlotArea {
        self.plot_area
    }

    /// Scene graph.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene graph.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Show the loading indicator with a label.
    pub fn show_loading(&mut self, label: &str) {
        self.loading = Some(label.to_string());
        self.loading_shown += 1;
    }

    /// Hide the loading indicator. Hiding an already hidden indicator is a no-op.
    pub fn hide_loading(&mut self) {
        self.loading = None;
    }

    /// Label of the visible loading indicator, if any.
    #[must_use]
    pub fn loading_label(&self) -> Option<&str> {
        self.loading.as_deref()
    }

    /// How many times the loading indicator has been shown.
    #[must_use]
    pub const fn loading_shown(&self) -> usize {
        self.loading_shown
    }
}

impl WithDimensions for Chart {
    /// Resize the chart; the plot area keeps its offsets and shrinks or grows
    /// with the surface.
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.scene.resize(width, height);
        self.plot_area.width = width.saturating_sub(self.plot_area.left);
        self.plot_area.height = height.saturating_sub(self.plot_area.top);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_indicator() {
        let mut chart = Chart::new(100, 100);
        assert!(chart.loading_label().is_none());

        chart.show_loading("Drawing...");
        assert_eq!(chart.loading_label(), Some("Drawing..."));

        chart.hide_loading();
        chart.hide_loading();
        assert!(chart.loading_label().is_none());
        assert_eq!(chart.loading_shown(), 1);
    }

    #[test]
    fn test_set_dimensions_keeps_offsets() {
        let mut chart = Chart::with_plot_area(200, 100, PlotArea::new(20, 10, 170, 80));
        chart.set_dimensions(400, 300);

        assert_eq!(chart.plot_area(), PlotArea::new(20, 10, 380, 290));
        assert_eq!(chart.scene().width(), 400);
    }

    #[test]
    fn test_empty_plot_area() {
        let mut chart = Chart::with_plot_area(50, 50, PlotArea::new(10, 10, 40, 40));
        chart.set_dimensions(5, 5);
        assert!(chart.plot_area().is_empty());
    }
}
