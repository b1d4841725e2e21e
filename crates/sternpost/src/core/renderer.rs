//! Rendering collaborator and timer abstractions
//!
//! The diagram renderer itself is a black box: it is initialized once with a
//! [`RendererConfig`] and then maps `(id, description)` to SVG markup
//! asynchronously. Delays between renders go through [`Timer`] so the
//! pipeline can run against a real clock, the browser event loop, or a
//! recording fake in tests.

use std::future::Future;
use std::time::Duration;

use crate::core::{RenderError, RendererConfig};

/// The rendering collaborator
pub trait DiagramRenderer {
    /// Configure the renderer; called before the first render and again on
    /// every reinitialization
    fn initialize(&mut self, config: &RendererConfig) -> Result<(), RenderError>;

    /// Render a diagram description to SVG markup
    fn render(&self, id: &str, text: &str)
        -> impl Future<Output = Result<String, RenderError>>;
}

/// Cooperative delay source
pub trait Timer {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Timer that blocks the current thread
///
/// Suitable for the CLI, where nothing else runs on the thread while a
/// delay elapses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadTimer;

impl Timer for ThreadTimer {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Timer that never waits
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Timer for NoDelay {
    async fn sleep(&self, _duration: Duration) {}
}

#[cfg(not(target_arch = "wasm32"))]
pub use command::CommandRenderer;

#[cfg(not(target_arch = "wasm32"))]
mod command {
    use std::fs;
    use std::path::PathBuf;
    use std::process::Command;

    use anyhow::{anyhow, Context, Result};
    use tracing::{debug, trace};

    use super::DiagramRenderer;
    use crate::core::{RenderError, RendererConfig};

    /// Renderer backed by an external command such as mermaid-cli (`mmdc`)
    ///
    /// Each render writes the description and the JSON configuration into a
    /// fresh temporary directory and runs
    /// `<program> -i <input> -o <output> -c <config> -I <id>`.
    #[derive(Debug, Clone)]
    pub struct CommandRenderer {
        program: PathBuf,
        extra_args: Vec<String>,
        config_json: Option<String>,
    }

    impl CommandRenderer {
        pub fn new(program: impl Into<PathBuf>) -> Self {
            Self {
                program: program.into(),
                extra_args: Vec::new(),
                config_json: None,
            }
        }

        /// Extra arguments appended after the standard ones
        pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
            self.extra_args.extend(args);
            self
        }

        pub fn program(&self) -> &std::path::Path {
            &self.program
        }

        fn run(&self, id: &str, text: &str) -> Result<std::result::Result<String, String>> {
            let config = self
                .config_json
                .as_deref()
                .ok_or_else(|| anyhow!("renderer used before initialize"))?;

            let dir = tempfile::tempdir().context("Failed to create temp directory")?;
            let input = dir.path().join("diagram.mmd");
            let output = dir.path().join("diagram.svg");
            let config_path = dir.path().join("config.json");
            fs::write(&input, text).context("Failed to write diagram input")?;
            fs::write(&config_path, config).context("Failed to write renderer config")?;

            trace!(program = %self.program.display(), id, "Spawning renderer");
            let result = Command::new(&self.program)
                .arg("-i")
                .arg(&input)
                .arg("-o")
                .arg(&output)
                .arg("-c")
                .arg(&config_path)
                .arg("-I")
                .arg(id)
                .args(&self.extra_args)
                .output()
                .with_context(|| format!("Failed to run '{}'", self.program.display()))?;

            if !result.status.success() {
                let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
                debug!(status = ?result.status.code(), "Renderer rejected diagram");
                return Ok(Err(if stderr.is_empty() {
                    format!("renderer exited with {}", result.status)
                } else {
                    stderr
                }));
            }

            let svg = fs::read_to_string(&output).context("Renderer produced no output")?;
            Ok(Ok(svg))
        }
    }

    impl Default for CommandRenderer {
        fn default() -> Self {
            Self::new("mmdc")
        }
    }

    impl DiagramRenderer for CommandRenderer {
        fn initialize(&mut self, config: &RendererConfig) -> Result<(), RenderError> {
            let json = serde_json::to_string(config)
                .map_err(|e| RenderError::unavailable(e.to_string()))?;
            self.config_json = Some(json);
            Ok(())
        }

        async fn render(&self, id: &str, text: &str) -> Result<String, RenderError> {
            if self.config_json.is_none() {
                return Err(RenderError::NotInitialized);
            }
            match self.run(id, text) {
                Ok(Ok(svg)) => Ok(svg),
                Ok(Err(message)) => Err(RenderError::syntax(message)),
                Err(e) => Err(RenderError::unavailable(format!("{:#}", e))),
            }
        }
    }
}
