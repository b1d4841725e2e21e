//! Shared fakes for processor tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use sternpost::core::{
    ColorMode, DiagramRenderer, RenderError, RendererConfig, ThemeState, Timer,
};

pub const FLOWCHART_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" id="d" style="max-width: 412px;" aria-roledescription="flowchart-v2"><g class="nodes"><g class="node default" id="A"><rect x="-40" y="-20" width="80" height="40"/><foreignObject><div><span class="nodeLabel">Start</span></div></foreignObject></g><g class="node default" id="B"><polygon points="40,0 80,40 40,80 0,40" transform="translate(100, 50)"/><text><tspan>Ok?</tspan></text></g></g></svg>"#;

pub const SEQUENCE_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" aria-roledescription="sequence"><g><line class="actor-line" x1="75" y1="5" x2="75" y2="300"/><rect class="actor actor-top" x="0" y="0" width="150" height="65" rx="3"/><text class="actor actor-box" x="75" y="32"><tspan>Alice</tspan></text></g><g><rect class="actor actor-top" x="200" y="0" width="150" height="65" rx="3"/><text class="actor actor-box" x="275" y="32"><tspan>Bob</tspan></text></g><text class="messageText" x="175" y="80">Hello</text><line class="messageLine0" x1="75" y1="100" x2="275" y2="100"/><line class="messageLine1" x1="275" y1="140" x2="75" y2="140"/></svg>"#;

type Respond = Box<dyn Fn(&str) -> Result<String, RenderError>>;

/// Renderer fake that records every call
pub struct FakeRenderer {
    respond: Respond,
    calls: RefCell<Vec<(String, String)>>,
    configs: Vec<RendererConfig>,
    flip_theme: Option<ThemeState>,
}

impl FakeRenderer {
    pub fn with(respond: impl Fn(&str) -> Result<String, RenderError> + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            calls: RefCell::new(Vec::new()),
            configs: Vec::new(),
            flip_theme: None,
        }
    }

    /// Picks the fixture matching the diagram kind of the text
    pub fn fixtures() -> Self {
        Self::with(|text| {
            if text.trim_start().starts_with("sequenceDiagram") {
                Ok(SEQUENCE_SVG.to_string())
            } else {
                Ok(FLOWCHART_SVG.to_string())
            }
        })
    }

    pub fn failing(message: &'static str) -> Self {
        Self::with(move |_| Err(RenderError::syntax(message)))
    }

    /// Toggle `theme` while each render is in flight
    pub fn flipping(mut self, theme: ThemeState) -> Self {
        self.flip_theme = Some(theme);
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn configs(&self) -> &[RendererConfig] {
        &self.configs
    }
}

impl DiagramRenderer for FakeRenderer {
    fn initialize(&mut self, config: &RendererConfig) -> Result<(), RenderError> {
        self.configs.push(config.clone());
        Ok(())
    }

    fn render(&self, id: &str, text: &str) -> impl Future<Output = Result<String, RenderError>> {
        self.calls
            .borrow_mut()
            .push((id.to_string(), text.to_string()));
        if let Some(theme) = &self.flip_theme {
            theme.set(theme.mode().toggled());
        }
        let result = (self.respond)(text);
        async move { result }
    }
}

/// Timer fake that records requested delays and returns immediately
#[derive(Clone, Default)]
pub struct RecordingTimer {
    slept: Rc<RefCell<Vec<Duration>>>,
}

impl RecordingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn millis(&self) -> Vec<u128> {
        self.slept.borrow().iter().map(|d| d.as_millis()).collect()
    }
}

impl Timer for RecordingTimer {
    async fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}

pub fn light() -> ThemeState {
    ThemeState::new(ColorMode::Light)
}

pub fn dark() -> ThemeState {
    ThemeState::new(ColorMode::Dark)
}
