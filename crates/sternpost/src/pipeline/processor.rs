//! The diagram processor
//!
//! Drives every container on a page through the rendering collaborator and
//! the post-render passes. The processor is single-threaded: the color mode
//! lives in a shared [`ThemeState`] and is re-read after every await, so a
//! theme toggle that lands mid-render is honored by the passes that follow.

use tracing::{debug, error, info, span, warn, Instrument, Level};

use super::container::{Container, Page};
use super::display::error_display;
use super::ids::IdGenerator;
use super::recovery::mentions_diagram_subsystem;
use crate::core::{
    ColorMode, DiagramError, DiagramKind, DiagramRenderer, ProcessorConfig, RendererConfig,
    SvgElement, ThemeState, ThreadTimer, Timer,
};
use crate::passes::{Pass, PassSet, PaletteOverrides};

/// Why a container was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `initialize` has not run (or the processor was reset)
    NotInitialized,
    /// The container already holds visual markup or carries the processed marker
    AlreadyRendered,
    /// The container shows an error display; only a reset brings it back
    Errored,
    /// Zero-sized or inside a hidden ancestor
    NotVisible,
    /// Trimmed text is shorter than the minimum length
    TooShort,
}

/// Result of rendering one container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Skipped(SkipReason),
    Rendered { id: String, touched: usize },
    Failed { id: String, message: String },
}

/// Counts for one `render_all` sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub rendered: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RenderSummary {
    fn record(&mut self, outcome: &RenderOutcome) {
        match outcome {
            RenderOutcome::Skipped(_) => self.skipped += 1,
            RenderOutcome::Rendered { .. } => self.rendered += 1,
            RenderOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Renders diagram containers and post-processes the result
pub struct Processor<R, T = ThreadTimer> {
    renderer: R,
    timer: T,
    theme: ThemeState,
    config: ProcessorConfig,
    passes: PassSet,
    ids: IdGenerator,
    initialized: bool,
}

impl<R: DiagramRenderer, T: Timer> Processor<R, T> {
    pub fn new(renderer: R, timer: T, theme: ThemeState) -> Self {
        let config = ProcessorConfig::default();
        Self {
            renderer,
            timer,
            theme,
            ids: IdGenerator::new(config.id_prefix.clone()),
            config,
            passes: PassSet::standard(),
            initialized: false,
        }
    }

    pub fn with_config(mut self, config: ProcessorConfig) -> Self {
        self.ids = IdGenerator::new(config.id_prefix.clone());
        self.config = config;
        self
    }

    pub fn with_passes(mut self, passes: PassSet) -> Self {
        self.passes = passes;
        self
    }

    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Configure the collaborator for the current color mode
    pub fn initialize(&mut self) -> Result<(), DiagramError> {
        let mode = self.theme.mode();
        self.renderer.initialize(&RendererConfig::for_mode(mode))?;
        self.initialized = true;
        info!(%mode, "Diagram renderer initialized");
        Ok(())
    }

    /// Initialize and render every container on the page
    pub async fn start(&mut self, page: &mut Page) -> Result<RenderSummary, DiagramError> {
        self.initialize()?;
        Ok(self.render_all(page).await)
    }

    /// Render one container, at most once until it is reset
    pub async fn render(&self, container: &mut Container) -> RenderOutcome {
        if !self.initialized {
            warn!("Diagram renderer not initialized");
            return RenderOutcome::Skipped(SkipReason::NotInitialized);
        }
        if container.holds_visual() || container.is_processed() {
            return RenderOutcome::Skipped(SkipReason::AlreadyRendered);
        }
        if !container.layout().is_visible() {
            debug!(id = ?container.id(), "Container not visible, deferring render");
            return RenderOutcome::Skipped(SkipReason::NotVisible);
        }
        let Some(text) = container.source_text().map(|t| t.trim().to_string()) else {
            return RenderOutcome::Skipped(SkipReason::Errored);
        };
        if text.chars().count() < self.config.min_text_len {
            warn!(len = text.len(), "Empty or too short diagram text");
            return RenderOutcome::Skipped(SkipReason::TooShort);
        }

        container.remember_original(&text);
        let id = container
            .id()
            .map(str::to_string)
            .unwrap_or_else(|| self.ids.next_id());
        let kind = DiagramKind::detect(&text);
        let text = if kind == DiagramKind::Class {
            self.abbreviate_class_members(&text)
        } else {
            text
        };

        let render_span = span!(Level::INFO, "render_diagram", id = %id, kind = %kind);
        container.mark_rendering();
        let result = self
            .renderer
            .render(&id, &text)
            .instrument(render_span.clone())
            .await;
        let _enter = render_span.enter();

        match result
            .map_err(DiagramError::from)
            .and_then(|markup| SvgElement::parse(&markup))
        {
            Ok(mut tree) => {
                let mode = self.theme.mode();
                let touched = self.passes.run(&mut tree, mode);
                container.set_rendered(tree);
                info!(touched, %mode, "Rendered diagram");
                RenderOutcome::Rendered { id, touched }
            }
            Err(err) => {
                let message = match err {
                    DiagramError::Render { source } => source.to_string(),
                    other => other.to_string(),
                };
                error!(error = %message, "Failed to render diagram");
                container.set_errored(error_display(&message, self.theme.mode()));
                RenderOutcome::Failed { id, message }
            }
        }
    }

    /// Render every container in document order, then let the palette settle
    pub async fn render_all(&self, page: &mut Page) -> RenderSummary {
        info!(count = page.len(), "Rendering diagrams");
        let mut summary = RenderSummary::default();

        for container in page.iter_mut() {
            let outcome = self.render(container).await;
            summary.record(&outcome);
            self.timer.sleep(self.config.inter_render_delay).await;
        }

        for delay in &self.config.settle_delays {
            self.timer.sleep(*delay).await;
            let touched = self.reapply_palette(page);
            debug!(touched, "Palette re-applied");
        }

        info!(
            rendered = summary.rendered,
            failed = summary.failed,
            skipped = summary.skipped,
            "Finished rendering diagrams"
        );
        summary
    }

    /// Run the palette pass again on every rendered container
    pub fn reapply_palette(&self, page: &mut Page) -> usize {
        let mode = self.theme.mode();
        page.iter_mut()
            .filter_map(|container| container.visual_mut())
            .map(|tree| PaletteOverrides.apply(tree, mode))
            .sum()
    }

    /// Mark the processor uninitialized and reset every container
    ///
    /// Returns the number of containers that had an original to restore.
    pub fn reset_all(&mut self, page: &mut Page) -> usize {
        self.initialized = false;
        let reset = page.iter_mut().map(|c| c.reset()).filter(|&reset| reset).count();
        debug!(reset, "Containers reset");
        reset
    }

    /// Reset, wait, initialize and render everything again
    pub async fn reinitialize(&mut self, page: &mut Page) -> Result<RenderSummary, DiagramError> {
        info!("Reinitializing diagrams");
        self.reset_all(page);
        self.timer.sleep(self.config.reinit_delay).await;
        self.start(page).await
    }

    /// Switch the color mode and re-render every diagram in it
    pub async fn change_mode(
        &mut self,
        page: &mut Page,
        mode: ColorMode,
    ) -> Result<RenderSummary, DiagramError> {
        self.theme.set(mode);
        self.reinitialize(page).await
    }

    /// React to an error nothing else caught
    ///
    /// Errors that mention the diagram subsystem trigger a full
    /// reinitialization after the recovery delay. Returns whether recovery ran.
    pub async fn handle_uncaught_error(
        &mut self,
        page: &mut Page,
        message: &str,
    ) -> Result<bool, DiagramError> {
        error!(error = message, "Uncaught error");
        if !mentions_diagram_subsystem(message) {
            return Ok(false);
        }
        warn!("Diagram error detected, attempting recovery");
        self.timer.sleep(self.config.recovery_delay).await;
        self.reinitialize(page).await?;
        Ok(true)
    }

    fn abbreviate_class_members(&self, text: &str) -> String {
        self.config
            .class_member_abbreviations
            .iter()
            .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
    }
}
