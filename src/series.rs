//! Chart series with chunked raster drawing.
//!
//! A [`Series`] owns its data, style, sparse index and raster surface. Calling
//! [`Series::draw`] starts a new pass: the synchronous part resets the index,
//! disables hit-testing and prepares the surface; the returned future walks
//! the data in chunks, yielding to the runtime between them, and finishes
//! with a final commit and publish.
//!
//! Passes must run on a single thread (a current-thread runtime, optionally
//! inside a `LocalSet`). A newer `draw` supersedes any pass still in flight.

use crate::axis::Axes;
use crate::chart::Chart;
use crate::config::{Config, RasterOptions, SeriesStyle};
use crate::data::SeriesData;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::hit_test::{adapt_search, Point};
use crate::index::{IndexEntry, SparseIndex};
use crate::scene::{GroupId, ImageHandle};
use crate::scheduler::{each_chunked, CancelToken, ChunkOutcome, ChunkStats, Generation};
use crate::session::{project, DrawSession, PublishMark};
use crate::strategy::{self, DataExtremes, RenderingStrategy};
use crate::surface::RasterSurface;
use std::cell::RefCell;
use std::future::{self, Future};
use std::pin::Pin;
use std::rc::Rc;
use tracing::{debug, warn, Instrument, Span};

/// Future of a draw pass.
pub type DrawFuture = Pin<Box<dyn Future<Output = Result<PassReport>>>>;

/// How a draw pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// Every point was drawn and the surface published.
    Completed,
    /// A newer pass started first; this one stopped without further effects.
    Superseded,
    /// The plot area had no pixels; nothing was drawn.
    Skipped,
}

/// Summary of a draw pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    /// Generation of the pass.
    pub generation: u64,
    /// How the pass ended.
    pub outcome: PassOutcome,
    /// Points visited.
    pub items: usize,
    /// Chunks processed.
    pub chunks: usize,
    /// Yields to the runtime between chunks.
    pub yields: usize,
    /// Stroke or fill commits, including the final one.
    pub stroke_commits: usize,
    /// Publishes in order.
    pub publishes: Vec<PublishMark>,
    /// Entries in the sparse index after the pass.
    pub index_len: usize,
}

impl PassReport {
    fn empty(generation: u64, outcome: PassOutcome) -> Self {
        Self {
            generation,
            outcome,
            items: 0,
            chunks: 0,
            yields: 0,
            stroke_commits: 0,
            publishes: Vec::new(),
            index_len: 0,
        }
    }

    fn from_session(
        generation: u64,
        outcome: PassOutcome,
        stats: ChunkStats,
        session: &DrawSession,
        index_len: usize,
    ) -> Self {
        Self {
            generation,
            outcome,
            items: session.counter(),
            chunks: stats.chunks,
            yields: stats.yields,
            stroke_commits: session.stroke_commits(),
            publishes: session.publishes().to_vec(),
            index_len,
        }
    }
}

/// Mutable state shared between a series and its in-flight pass.
#[derive(Debug)]
struct SeriesState {
    data: SeriesData,
    axes: Axes,
    style: SeriesStyle,
    options: RasterOptions,
    surface: RasterSurface,
    index: SparseIndex,
    /// Data the current index and points were built from.
    indexed: SeriesData,
    points: Vec<Point>,
    search_enabled: bool,
}

/// Builder for [`Series`].
#[derive(Debug, Default)]
pub struct SeriesBuilder {
    name: String,
    data: SeriesData,
    style: SeriesStyle,
    options: RasterOptions,
    axes: Option<Axes>,
}

impl SeriesBuilder {
    /// Create a builder for a series called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the data.
    #[must_use]
    pub fn data(mut self, data: SeriesData) -> Self {
        self.data = data;
        self
    }

    /// Set the style.
    #[must_use]
    pub fn style(mut self, style: SeriesStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the pass tuning.
    #[must_use]
    pub fn options(mut self, options: RasterOptions) -> Self {
        self.options = options;
        self
    }

    /// Take style and tuning from a configuration.
    #[must_use]
    pub fn config(mut self, config: &Config) -> Self {
        self.style = config.style.clone();
        self.options = config.raster.clone();
        self
    }

    /// Set the axes. Defaults to linear axes fitted to the data.
    #[must_use]
    pub fn axes(mut self, axes: Axes) -> Self {
        self.axes = Some(axes);
        self
    }

    /// Attach the series to `chart`.
    ///
    /// The rendering strategy is chosen here, once, from the point count.
    #[must_use]
    pub fn build(self, chart: &Rc<RefCell<Chart>>) -> Series {
        let (group, area) = {
            let mut chart = chart.borrow_mut();
            let area = chart.plot_area();
            let group = chart
                .scene_mut()
                .add_group(self.name.as_str(), (area.left as f32, area.top as f32));
            (group, area)
        };

        let axes = self
            .axes
            .unwrap_or_else(|| Axes::fit(self.data.x(), self.data.y(), area.width, area.height));
        let strategy = strategy::select(self.data.len(), self.options.raster_threshold);

        Series {
            name: self.name,
            chart: Rc::clone(chart),
            group,
            strategy,
            generation: Generation::new(),
            state: Rc::new(RefCell::new(SeriesState {
                indexed: self.data.clone(),
                data: self.data,
                axes,
                style: self.style,
                options: self.options,
                surface: RasterSurface::new(),
                index: SparseIndex::new(),
                points: Vec::new(),
                search_enabled: true,
            })),
        }
    }
}

/// A data series drawn into a chart.
#[derive(Debug)]
pub struct Series {
    name: String,
    chart: Rc<RefCell<Chart>>,
    group: GroupId,
    strategy: Box<dyn RenderingStrategy>,
    generation: Generation,
    state: Rc<RefCell<SeriesState>>,
}

impl Series {
    /// Start a draw pass.
    ///
    /// Any pass still in flight is superseded before shared state is touched.
    /// The returned future must be polled on the thread that created it.
    /// Vector series draw synchronously; their future is already complete.
    ///
    /// The future fails if a point cannot be transformed. Points before it
    /// stay drawn (and partially published); hit-testing stays disabled until
    /// the next successful pass.
    #[tracing::instrument(level = "debug", skip_all, fields(series = %self.name))]
    pub fn draw(&self) -> DrawFuture {
        let token = self.generation.advance();

        if !self.strategy.is_raster() {
            return Box::pin(future::ready(self.draw_vector(&token)));
        }

        let Some(prepared) = self.prepare_raster(&token) else {
            return Box::pin(future::ready(Ok(PassReport::empty(
                token.generation(),
                PassOutcome::Skipped,
            ))));
        };

        let pass = RasterPass {
            abandoned: Abandoned {
                token: token.clone(),
                state: Rc::clone(&self.state),
                chart: Rc::clone(&self.chart),
                armed: true,
            },
            token,
            state: Rc::clone(&self.state),
            chart: Rc::clone(&self.chart),
            prepared,
        };
        Box::pin(pass.run().instrument(Span::current()))
    }

    /// Synchronous part of a raster pass. `None` means the pass is skipped.
    fn prepare_raster(&self, token: &CancelToken) -> Option<Prepared> {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        state.index.clear();
        state.points.clear();
        state.search_enabled = false;

        let mut chart = self.chart.borrow_mut();
        let area = chart.plot_area();
        let acquired = state
            .surface
            .acquire(chart.scene_mut(), self.group, area.width, area.height)
            .map(|_| ());
        if let Err(err) = acquired {
            debug!(generation = token.generation(), %err, "no raster surface, skipping pass");
            state.surface.blank(chart.scene_mut());
            state.search_enabled = true;
            return None;
        }
        state.indexed = state.data.clone();

        let len = state.data.len();
        if len > state.options.loading_threshold {
            chart.show_loading(&state.options.loading_label);
        }

        debug!(generation = token.generation(), len, "raster pass started");
        let (x, y) = state.data.columns();
        Some(Prepared {
            x,
            y,
            axes: state.axes.clone(),
            chunk_size: state.options.chunk_size,
            session: DrawSession::new(&state.style, &state.options, len),
        })
    }

    fn draw_vector(&self, token: &CancelToken) -> Result<PassReport> {
        {
            let mut state = self.state.borrow_mut();
            state.index.clear();
            state.search_enabled = false;
        }

        if let Err(err) = self.generate_points() {
            warn!(generation = token.generation(), %err, "vector draw aborted");
            return Err(err);
        }
        {
            let mut state = self.state.borrow_mut();
            state.indexed = state.data.clone();
        }
        self.chart.borrow_mut().scene_mut().clear_group(self.group);
        self.draw_points();
        self.draw_tracker();

        let mut state = self.state.borrow_mut();
        let entries = state
            .points
            .iter()
            .map(|p| IndexEntry {
                pixel_x: p.plot_x.round() as i32,
                pixel_y: p.plot_y,
                source_index: p.index,
            })
            .collect();
        state.index = SparseIndex::dense(entries);
        state.search_enabled = true;

        let mut report = PassReport::empty(token.generation(), PassOutcome::Completed);
        report.items = state.points.len();
        report.index_len = state.index.len();
        debug!(generation = token.generation(), items = report.items, "vector draw finished");
        Ok(report)
    }

    /// Build per-point objects through the rendering strategy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transform`] if a point cannot be placed.
    pub fn generate_points(&self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let points = self.strategy.generate_points(&state.data, &state.axes)?;
        state.points = points;
        Ok(())
    }

    /// Data extremes through the rendering strategy.
    #[must_use]
    pub fn extremes(&self) -> Option<DataExtremes> {
        self.strategy.extremes(&self.state.borrow().data)
    }

    /// Add the generated points' shapes to the scene.
    pub fn draw_points(&self) {
        let state = self.state.borrow();
        let mut chart = self.chart.borrow_mut();
        self.strategy
            .draw_points(&state.points, &state.style, chart.scene_mut(), self.group);
    }

    /// Add the generated points' hit area to the scene.
    pub fn draw_tracker(&self) {
        let state = self.state.borrow();
        let mut chart = self.chart.borrow_mut();
        self.strategy
            .draw_tracker(&state.points, chart.scene_mut(), self.group);
    }

    /// Point nearest to `pointer`, given in plot-area pixels.
    ///
    /// Rows are taken from the data the last pass drew, even if `set_data`
    /// has been called since. Returns `None` while a pass is in flight.
    #[must_use]
    pub fn search_point(&self, pointer: (f64, f64)) -> Option<Point> {
        let state = self.state.borrow();
        if !state.search_enabled {
            return None;
        }

        let raw = state.index.nearest(pointer, state.style.effective_search());
        let resolver = self.strategy.resolver(&state.indexed, &state.points);
        adapt_search(raw, resolver.as_ref())
    }

    /// Replace the data; takes effect on the next draw.
    ///
    /// Hit-testing keeps answering from the data that is currently drawn.
    pub fn set_data(&self, data: SeriesData) {
        self.state.borrow_mut().data = data;
    }

    /// Replace the axes; takes effect on the next draw.
    pub fn set_axes(&self, axes: Axes) {
        self.state.borrow_mut().axes = axes;
    }

    /// Series name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of data points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.borrow().data.len()
    }

    /// Whether the series has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this series draws through the raster pass.
    #[must_use]
    pub fn is_raster(&self) -> bool {
        self.strategy.is_raster()
    }

    /// Generation of the latest pass.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.current()
    }

    /// Scene group holding the series' elements.
    #[must_use]
    pub const fn group(&self) -> GroupId {
        self.group
    }

    /// Copy of the sparse index.
    #[must_use]
    pub fn index_entries(&self) -> Vec<IndexEntry> {
        self.state.borrow().index.entries().to_vec()
    }

    /// Entries in the sparse index.
    #[must_use]
    pub fn index_len(&self) -> usize {
        self.state.borrow().index.len()
    }

    /// Whether hit-testing is enabled (no pass in flight).
    #[must_use]
    pub fn is_search_enabled(&self) -> bool {
        self.state.borrow().search_enabled
    }

    /// Scene image of the raster surface, once acquired.
    #[must_use]
    pub fn image(&self) -> Option<ImageHandle> {
        self.state.borrow().surface.image()
    }

    /// Publishes of the raster surface over the series' lifetime.
    #[must_use]
    pub fn publishes(&self) -> usize {
        self.state.borrow().surface.publishes()
    }

    /// Run `f` against the raster buffer, once acquired.
    pub fn with_buffer<R>(&self, f: impl FnOnce(&Framebuffer) -> R) -> Option<R> {
        self.state.borrow().surface.buffer().map(f)
    }
}

/// Inputs snapshotted by the synchronous part of a raster pass.
struct Prepared {
    x: Rc<[f64]>,
    y: Rc<[f64]>,
    axes: Axes,
    chunk_size: usize,
    session: DrawSession,
}

/// Asynchronous part of a raster pass.
struct RasterPass {
    token: CancelToken,
    state: Rc<RefCell<SeriesState>>,
    chart: Rc<RefCell<Chart>>,
    prepared: Prepared,
    abandoned: Abandoned,
}

/// Puts the series back in a usable state if a current pass is dropped
/// before it ends: hides the loading indicator and re-enables hit-testing
/// over the points indexed so far.
struct Abandoned {
    token: CancelToken,
    state: Rc<RefCell<SeriesState>>,
    chart: Rc<RefCell<Chart>>,
    armed: bool,
}

impl Abandoned {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for Abandoned {
    fn drop(&mut self) {
        if !self.armed || self.token.is_cancelled() {
            return;
        }
        debug!(generation = self.token.generation(), "raster pass dropped before completion");
        if let Ok(mut chart) = self.chart.try_borrow_mut() {
            chart.hide_loading();
        }
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.search_enabled = true;
        }
    }
}

impl RasterPass {
    async fn run(self) -> Result<PassReport> {
        let Self {
            token,
            state,
            chart,
            prepared,
            abandoned,
        } = self;
        let Prepared {
            x,
            y,
            axes,
            chunk_size,
            mut session,
        } = prepared;
        let generation = token.generation();

        let result = each_chunked(&x[..], chunk_size, &token, |i, &xv| {
            let (pixel_x, pixel_y) = project(&axes, i, xv, y[i])?;

            let mut guard = state.borrow_mut();
            let st = &mut *guard;
            let fb = st.surface.buffer_mut().ok_or(Error::DetachedSurface)?;
            if session.step(i, pixel_x, pixel_y, &mut st.index, fb) {
                st.surface.publish(chart.borrow_mut().scene_mut())?;
            }
            Ok(())
        })
        .await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                abandoned.disarm();
                warn!(generation, items = session.counter(), %err, "raster pass aborted");
                chart.borrow_mut().hide_loading();
                return Err(err);
            }
        };
        abandoned.disarm();

        // An empty pass has no chunk boundary to notice supersession at.
        let stats = outcome.stats();
        if matches!(outcome, ChunkOutcome::Cancelled(_)) || token.is_cancelled() {
            debug!(generation, items = session.counter(), "raster pass superseded");
            return Ok(PassReport::from_session(
                generation,
                PassOutcome::Superseded,
                stats,
                &session,
                0,
            ));
        }

        let mut guard = state.borrow_mut();
        let st = &mut *guard;
        let fb = st.surface.buffer_mut().ok_or(Error::DetachedSurface)?;
        session.finish(fb);
        {
            let mut chart = chart.borrow_mut();
            st.surface.publish(chart.scene_mut())?;
            chart.hide_loading();
        }
        st.search_enabled = true;

        let report = PassReport::from_session(
            generation,
            PassOutcome::Completed,
            stats,
            &session,
            st.index.len(),
        );
        debug!(
            generation,
            items = report.items,
            chunks = report.chunks,
            index_len = report.index_len,
            "raster pass finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::LinearAxis;
    use crate::chart::PlotArea;

    fn chart(width: u32, height: u32) -> Rc<RefCell<Chart>> {
        Rc::new(RefCell::new(Chart::new(width, height)))
    }

    fn series_on(chart: &Rc<RefCell<Chart>>, x: Vec<f64>, y: Vec<f64>) -> Series {
        SeriesBuilder::new("test")
            .data(SeriesData::from_xy(x, y).unwrap())
            .build(chart)
    }

    #[tokio::test]
    async fn test_draw_publishes_image() {
        let chart = chart(50, 20);
        let series = series_on(&chart, vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.5]);

        let report = series.draw().await.unwrap();

        assert_eq!(report.outcome, PassOutcome::Completed);
        assert_eq!(report.publishes, vec![PublishMark::Final]);
        let image = series.image().unwrap();
        let chart = chart.borrow();
        assert!(chart
            .scene()
            .image_href(image)
            .unwrap()
            .starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_search_disabled_until_pass_completes() {
        let chart = chart(50, 20);
        let series = series_on(&chart, vec![0.0, 1.0], vec![0.0, 1.0]);

        let pass = series.draw();
        assert!(!series.is_search_enabled());
        assert!(series.search_point((0.0, 0.0)).is_none());

        pass.await.unwrap();
        assert!(series.is_search_enabled());
        assert_eq!(series.search_point((0.0, 0.0)).unwrap().index, 0);
    }

    #[tokio::test]
    async fn test_zero_plot_area_skips() {
        let chart = Rc::new(RefCell::new(Chart::with_plot_area(
            10,
            10,
            PlotArea::new(0, 0, 0, 0),
        )));
        let series = series_on(&chart, vec![0.0, 1.0], vec![0.0, 1.0]);

        let report = series.draw().await.unwrap();

        assert_eq!(report.outcome, PassOutcome::Skipped);
        assert_eq!(series.index_len(), 0);
        assert!(series.image().is_none());
        assert!(series.is_search_enabled());
    }

    #[tokio::test]
    async fn test_vector_strategy_below_threshold() {
        let chart = chart(11, 11);
        let series = SeriesBuilder::new("small")
            .data(SeriesData::from_xy(vec![0.0, 10.0], vec![0.0, 10.0]).unwrap())
            .options(RasterOptions {
                raster_threshold: 100,
                ..RasterOptions::default()
            })
            .axes(Axes::new(
                LinearAxis::horizontal((0.0, 10.0), 11).unwrap(),
                LinearAxis::vertical((0.0, 10.0), 11).unwrap(),
            ))
            .build(&chart);

        let report = series.draw().await.unwrap();

        assert!(!series.is_raster());
        assert_eq!(report.outcome, PassOutcome::Completed);
        assert_eq!(report.index_len, 2);
        assert!(series.image().is_none());
        assert!(series.extremes().is_some());

        let point = series.search_point((9.0, 1.0)).unwrap();
        assert_eq!(point.index, 1);
        assert_eq!(point.plot_x, 10.0);

        // Line plus tracker.
        let elements = chart.borrow().scene().group(series.group()).unwrap().elements().len();
        assert_eq!(elements, 2);
    }

    #[tokio::test]
    async fn test_raster_hooks_are_inert() {
        let chart = chart(20, 20);
        let series = series_on(&chart, vec![0.0, 1.0], vec![0.0, 1.0]);

        series.generate_points().unwrap();
        series.draw_points();
        series.draw_tracker();

        assert!(series.extremes().is_none());
        assert!(chart.borrow().scene().group(series.group()).unwrap().elements().is_empty());
    }

    #[tokio::test]
    async fn test_set_data_applies_on_next_draw() {
        let chart = chart(20, 20);
        let series = series_on(&chart, vec![0.0, 1.0], vec![0.0, 1.0]);
        series.draw().await.unwrap();
        assert_eq!(series.len(), 2);

        series.set_data(SeriesData::default());
        let report = series.draw().await.unwrap();

        assert!(series.is_empty());
        assert_eq!(report.index_len, 0);
        assert_eq!(series.generation(), 2);
        assert_eq!(series.publishes(), 2);
    }

    #[tokio::test]
    async fn test_search_answers_from_drawn_data_after_set_data() {
        let chart = chart(20, 20);
        let series = SeriesBuilder::new("test")
            .data(SeriesData::from_xy(vec![0.0, 10.0], vec![1.0, 2.0]).unwrap())
            .axes(Axes::new(
                LinearAxis::horizontal((0.0, 10.0), 11).unwrap(),
                LinearAxis::vertical((0.0, 10.0), 11).unwrap(),
            ))
            .build(&chart);
        series.draw().await.unwrap();

        series.set_data(SeriesData::from_xy(vec![100.0, 200.0], vec![7.0, 8.0]).unwrap());
        let point = series.search_point((10.0, 0.0)).unwrap();

        assert_eq!(point.index, 1);
        assert_eq!((point.x, point.y), (10.0, 2.0));
        assert_eq!(point.plot_x, 10.0);

        series.draw().await.unwrap();
        let point = series.search_point((10.0, 0.0)).unwrap();
        assert_eq!(point.index, 0);
        assert_eq!((point.x, point.y), (100.0, 7.0));
        assert_eq!(point.plot_x, 100.0);
    }

    fn loading_series(chart: &Rc<RefCell<Chart>>, len: usize) -> Series {
        let x: Vec<f64> = (0..len).map(|i| i as f64).collect();
        SeriesBuilder::new("test")
            .data(SeriesData::from_xy(x, vec![0.0; len]).unwrap())
            .options(RasterOptions {
                chunk_size: 1,
                loading_threshold: 0,
                ..RasterOptions::default()
            })
            .axes(Axes::new(
                LinearAxis::horizontal((0.0, len as f64), 50).unwrap(),
                LinearAxis::vertical((0.0, 1.0), 20).unwrap(),
            ))
            .build(chart)
    }

    #[tokio::test]
    async fn test_dropped_pass_restores_series() {
        let chart = chart(50, 20);
        let series = loading_series(&chart, 4);

        let pass = series.draw();
        assert_eq!(chart.borrow().loading_label(), Some("Drawing..."));
        assert!(!series.is_search_enabled());
        drop(pass);

        assert!(chart.borrow().loading_label().is_none());
        assert!(series.is_search_enabled());
    }

    #[tokio::test]
    async fn test_pass_dropped_mid_flight_restores_series() {
        let chart = chart(50, 20);
        let series = loading_series(&chart, 10);

        tokio::select! {
            biased;
            _ = series.draw() => panic!("pass should still be running"),
            () = tokio::task::yield_now() => {}
        }

        let indexed = series.index_len();
        assert!(indexed > 0 && indexed < 10);
        assert!(chart.borrow().loading_label().is_none());
        assert_eq!(series.search_point((0.0, 0.0)).unwrap().index, 0);
    }

    #[tokio::test]
    async fn test_dropped_stale_pass_leaves_newer_pass_alone() {
        let chart = chart(50, 20);
        let series = loading_series(&chart, 4);

        let stale = series.draw();
        let fresh = series.draw();
        drop(stale);

        assert!(!series.is_search_enabled());
        assert_eq!(chart.borrow().loading_label(), Some("Drawing..."));
        assert_eq!(fresh.await.unwrap().outcome, PassOutcome::Completed);
        assert!(chart.borrow().loading_label().is_none());
    }
}
