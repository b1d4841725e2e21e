//! Command-line interface for the sternpost utility
//!
//! Renders Mermaid.js descriptions through an external renderer and
//! post-processes the SVG it produces for a documentation site.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures::executor::block_on;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::colorizer::format_report;
use sternpost::core::logging::init_logging;
use sternpost::core::{
    ColorMode, CommandRenderer, ProcessorConfig, RendererConfig, SvgElement, ThemeState,
    ThreadTimer,
};
use sternpost::passes::{DiagramReport, PassSet};
use sternpost::pipeline::{Container, Processor, RenderOutcome};
use sternpost::preferences::{
    FileStore, NavState, PreferenceStore, ThemeController, NAV_COLLAPSED_KEY, THEME_KEY,
};

/// Sternpost - Post-process Mermaid.js diagrams for documentation sites
#[derive(Parser)]
#[command(name = "sternpost")]
#[command(about = "Render Mermaid.js diagrams and fix up their SVG for light and dark pages")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a diagram description to post-processed SVG
    Render {
        /// Input file containing the diagram description (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the SVG or error display (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Color mode; defaults to the stored preference, then light
        #[arg(long, value_enum)]
        mode: Option<ModeChoice>,

        /// Preference file consulted when --mode is absent
        #[arg(long)]
        prefs: Option<PathBuf>,

        /// Diagram id handed to the renderer
        #[arg(long)]
        id: Option<String>,

        /// Renderer executable
        #[arg(long, default_value = "mmdc")]
        renderer: PathBuf,

        /// Extra argument passed to the renderer (repeatable)
        #[arg(long = "renderer-arg", allow_hyphen_values = true)]
        renderer_args: Vec<String>,
    },

    /// Post-process SVG that was already rendered
    Postprocess {
        /// Input SVG file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Color mode; defaults to the stored preference, then light
        #[arg(long, value_enum)]
        mode: Option<ModeChoice>,

        /// Preference file consulted when --mode is absent
        #[arg(long)]
        prefs: Option<PathBuf>,
    },

    /// Report sequence markers, cutouts and decision shapes in SVG
    Inspect {
        /// Input SVG file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,

        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// Print the renderer configuration for a color mode
    Config {
        /// Color mode
        #[arg(long, value_enum, default_value_t = ModeChoice::Light)]
        mode: ModeChoice,

        /// Print on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Read or change stored reader preferences
    Prefs {
        /// Preference file
        #[arg(long)]
        prefs: PathBuf,

        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum PrefsAction {
    /// Show stored preferences and the resolved theme
    Show {
        /// Assume the system prefers dark when no theme is stored
        #[arg(long)]
        system_dark: bool,
    },
    /// Flip the stored theme
    ToggleTheme {
        /// Assume the system prefers dark when no theme is stored
        #[arg(long)]
        system_dark: bool,
    },
    /// Store an explicit theme
    SetTheme {
        #[arg(value_enum)]
        mode: ModeChoice,
    },
    /// Forget the stored theme and follow the system again
    ClearTheme,
    /// Flip the navigation collapsed flag
    ToggleNav,
}

/// Color modes accepted on the command line
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum ModeChoice {
    Light,
    Dark,
}

impl From<ModeChoice> for ColorMode {
    fn from(value: ModeChoice) -> Self {
        match value {
            ModeChoice::Light => ColorMode::Light,
            ModeChoice::Dark => ColorMode::Dark,
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Main CLI application
pub struct SternpostApp {
    passes: PassSet,
}

impl SternpostApp {
    /// Create a new application instance with the standard passes
    pub fn new() -> Self {
        Self {
            passes: PassSet::standard(),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var("STERNPOST_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("STERNPOST_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Sternpost v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Render {
                input,
                output,
                mode,
                prefs,
                id,
                renderer,
                renderer_args,
            } => {
                let mode = resolve_mode(mode, prefs.as_deref())?;
                let renderer = CommandRenderer::new(renderer).with_args(renderer_args);
                self.render_command(input, output, mode, id, renderer, cli.verbose)
            }
            Commands::Postprocess {
                input,
                output,
                mode,
                prefs,
            } => {
                let mode = resolve_mode(mode, prefs.as_deref())?;
                self.postprocess_command(input, output, mode, cli.verbose)
            }
            Commands::Inspect { input, json, color } => {
                self.inspect_command(input, json, color, cli.verbose)
            }
            Commands::Config { mode, compact } => self.config_command(mode.into(), compact),
            Commands::Prefs { prefs, action } => {
                let report = self.prefs_command(&prefs, action)?;
                println!("{}", report);
                Ok(())
            }
        }
    }

    /// Handle the render command
    fn render_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        mode: ColorMode,
        id: Option<String>,
        renderer: CommandRenderer,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!(
                "Rendering {} bytes with {} in {} mode",
                content.len(),
                renderer.program().display(),
                mode
            );
        }

        // One container: no pause between renders, no settle passes
        let mut processor = Processor::new(renderer, ThreadTimer, ThemeState::new(mode))
            .with_config(ProcessorConfig::without_delays());
        processor.initialize()?;

        let mut container = Container::new(content);
        if let Some(id) = id {
            container = container.with_id(id);
        }

        match block_on(processor.render(&mut container)) {
            RenderOutcome::Rendered { id, touched } => {
                info!(%id, touched, "Rendered diagram");
                if verbose {
                    eprintln!("Rendered {} ({} elements post-processed)", id, touched);
                }
                self.write_output(output, &container.markup())
            }
            RenderOutcome::Failed { id, message } => {
                warn!(%id, error = %message, "Diagram failed to render");
                self.write_output(output, &container.markup())?;
                Err(anyhow!("Diagram failed to render: {}", message))
            }
            RenderOutcome::Skipped(reason) => {
                Err(anyhow!("Diagram was not rendered: {:?}", reason))
            }
        }
    }

    /// Handle the postprocess command
    fn postprocess_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        mode: ColorMode,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;
        let processed = self.postprocess(&content, mode)?;

        if verbose {
            eprintln!("Post-processed SVG for {} mode", mode);
        }

        self.write_output(output, &processed)
    }

    /// Run the configured passes over SVG markup
    pub fn postprocess(&self, markup: &str, mode: ColorMode) -> Result<String> {
        let mut root = SvgElement::parse(markup)?;
        let touched = self.passes.run(&mut root, mode);
        debug!(%mode, touched, "Post-processed SVG");
        Ok(root.to_markup())
    }

    /// Handle the inspect command
    fn inspect_command(
        &self,
        input: Option<PathBuf>,
        json: bool,
        color: ColorChoice,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let report = DiagramReport::of(&SvgElement::parse(&content)?);
        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{}", format_report(&report, should_colorize(color)));
            io::stdout().flush()?;
        }
        Ok(())
    }

    /// Handle the config command
    fn config_command(&self, mode: ColorMode, compact: bool) -> Result<()> {
        let config = RendererConfig::for_mode(mode);
        let json = if compact {
            config.to_json()?
        } else {
            config.to_json_pretty()?
        };
        println!("{}", json);
        Ok(())
    }

    /// Handle the prefs command, returning what to print
    pub fn prefs_command(&self, path: &Path, action: PrefsAction) -> Result<String> {
        let store = FileStore::open(path)
            .with_context(|| format!("Failed to open preference file '{}'", path.display()))?;

        let message = match action {
            PrefsAction::Show { system_dark } => {
                let nav = NavState::load(&store);
                let controller = ThemeController::new(store, system_dark);
                format!(
                    "theme: {} ({})\nnavCollapsed: {}\ntheme-color: {}",
                    controller.mode(),
                    if controller.has_explicit_choice() {
                        "stored"
                    } else {
                        "system"
                    },
                    nav.collapsed,
                    controller.meta_theme_color()
                )
            }
            PrefsAction::ToggleTheme { system_dark } => {
                let mut controller = ThemeController::new(store, system_dark);
                let mode = controller.toggle()?;
                format!("theme: {}", mode)
            }
            PrefsAction::SetTheme { mode } => {
                let mut controller = ThemeController::new(store, false);
                controller.set(mode.into())?;
                format!("theme: {}", controller.mode())
            }
            PrefsAction::ClearTheme => {
                let mut store = store;
                store.remove(THEME_KEY)?;
                "theme: system".to_string()
            }
            PrefsAction::ToggleNav => {
                let mut store = store;
                let mut nav = NavState::load(&store);
                let collapsed = nav.toggle(&mut store)?;
                format!("{}: {}", NAV_COLLAPSED_KEY, collapsed)
            }
        };
        debug!(path = %path.display(), "Preferences command finished");
        Ok(message)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                if content.is_empty() || content.ends_with('\n') {
                    print!("{}", content);
                } else {
                    println!("{}", content);
                }
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for SternpostApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the color mode: explicit flag, then stored preference, then light
pub fn resolve_mode(mode: Option<ModeChoice>, prefs: Option<&Path>) -> Result<ColorMode> {
    if let Some(mode) = mode {
        return Ok(mode.into());
    }
    match prefs {
        Some(path) => {
            let store = FileStore::open(path)
                .with_context(|| format!("Failed to open preference file '{}'", path.display()))?;
            Ok(ThemeController::new(store, false).mode())
        }
        None => Ok(ColorMode::Light),
    }
}

/// Determine if stdout output should be colorized
fn should_colorize(color: ColorChoice) -> bool {
    match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            if std::env::var("NO_COLOR").is_ok() {
                return false;
            }
            crossterm::tty::IsTty::is_tty(&std::io::stdout())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    const DIAMOND_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" style="max-width: 300px;"><g class="node"><polygon points="40,0 80,40 40,80 0,40"/></g><text>Ok?</text></svg>"#;

    #[test]
    fn test_cli_parsing_render_command() {
        let args = vec![
            "sternpost",
            "render",
            "--input",
            "diagram.mmd",
            "--output",
            "diagram.svg",
            "--mode",
            "dark",
            "--renderer-arg",
            "--puppeteerConfigFile",
            "--renderer-arg",
            "puppeteer.json",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Render {
                input,
                output,
                mode,
                prefs,
                id,
                renderer,
                renderer_args,
            } => {
                assert_eq!(input.unwrap().to_string_lossy(), "diagram.mmd");
                assert_eq!(output.unwrap().to_string_lossy(), "diagram.svg");
                assert_eq!(mode, Some(ModeChoice::Dark));
                assert!(prefs.is_none());
                assert!(id.is_none());
                assert_eq!(renderer.to_string_lossy(), "mmdc"); // default
                assert_eq!(
                    renderer_args,
                    vec!["--puppeteerConfigFile", "puppeteer.json"]
                );
            }
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn test_cli_parsing_postprocess_command() {
        let args = vec!["sternpost", "postprocess", "--prefs", "prefs.json"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Postprocess {
                input, mode, prefs, ..
            } => {
                assert!(input.is_none());
                assert!(mode.is_none());
                assert_eq!(prefs.unwrap().to_string_lossy(), "prefs.json");
            }
            _ => panic!("Expected Postprocess command"),
        }
    }

    #[test]
    fn test_cli_parsing_inspect_command() {
        let args = vec!["sternpost", "inspect", "--json", "--color", "never"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Inspect { json, color, .. } => {
                assert!(json);
                assert_eq!(color, ColorChoice::Never);
            }
            _ => panic!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_cli_parsing_prefs_command() {
        let args = vec!["sternpost", "prefs", "--prefs", "p.json", "set-theme", "dark"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Prefs { prefs, action } => {
                assert_eq!(prefs.to_string_lossy(), "p.json");
                assert_eq!(
                    action,
                    PrefsAction::SetTheme {
                        mode: ModeChoice::Dark
                    }
                );
            }
            _ => panic!("Expected Prefs command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        let args = vec!["sternpost", "config", "--mode", "sepia"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_verbose_flag() {
        let args = vec!["sternpost", "--verbose", "config"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.log_level, LogLevel::Info);
    }

    #[test]
    fn test_sternpost_app_default() {
        let _app = SternpostApp::default();
    }

    #[test]
    fn test_read_input_from_file() {
        let app = SternpostApp::new();
        let input = "flowchart TD\n  A-->B";

        let dir = tempdir().unwrap();
        let file_path = dir.path().join("diagram.mmd");
        fs::write(&file_path, input).unwrap();

        let content = app.read_input(Some(file_path)).unwrap();
        assert_eq!(content, input);
    }

    #[test]
    fn test_read_input_missing_file() {
        let app = SternpostApp::new();
        let dir = tempdir().unwrap();
        let err = app
            .read_input(Some(dir.path().join("missing.mmd")))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read input file"));
    }

    #[test]
    fn test_write_output_to_file() {
        let app = SternpostApp::new();
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("out.svg");

        app.write_output(Some(file_path.clone()), "<svg/>").unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "<svg/>");
    }

    #[test]
    fn test_postprocess_command_writes_file() {
        let app = SternpostApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.svg");
        let output = dir.path().join("out.svg");
        fs::write(&input, DIAMOND_SVG).unwrap();

        app.postprocess_command(Some(input), Some(output.clone()), ColorMode::Dark, false)
            .unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("max-width: 100%"));
        assert!(written.contains("scale(0.6666"));
        assert!(written.contains("fill: #f1f5f9"));
    }

    #[test]
    fn test_postprocess_rejects_bad_svg() {
        let app = SternpostApp::new();
        assert!(app.postprocess("<svg>", ColorMode::Light).is_err());
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_postprocess_emits_debug_event() {
        use tracing_subscriber::util::SubscriberInitExt;

        let captured = Captured::default();
        let writer = captured.clone();
        let _guard = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .set_default();

        SternpostApp::new()
            .postprocess(DIAMOND_SVG, ColorMode::Dark)
            .unwrap();

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("Post-processed SVG"), "{}", logs);
        assert!(logs.contains("mode=dark"), "{}", logs);
    }

    #[test]
    fn test_prefs_round_trip() {
        let app = SternpostApp::new();
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let shown = app
            .prefs_command(&path, PrefsAction::Show { system_dark: true })
            .unwrap();
        assert!(shown.contains("theme: dark (system)"));

        let toggled = app
            .prefs_command(&path, PrefsAction::ToggleTheme { system_dark: false })
            .unwrap();
        assert_eq!(toggled, "theme: dark");

        let nav = app.prefs_command(&path, PrefsAction::ToggleNav).unwrap();
        assert_eq!(nav, "navCollapsed: true");

        let shown = app
            .prefs_command(&path, PrefsAction::Show { system_dark: false })
            .unwrap();
        assert!(shown.contains("theme: dark (stored)"));
        assert!(shown.contains("navCollapsed: true"));
        assert!(shown.contains("#0f172a"));

        app.prefs_command(&path, PrefsAction::ClearTheme).unwrap();
        assert_eq!(resolve_mode(None, Some(&path)).unwrap(), ColorMode::Light);
    }

    #[test]
    fn test_resolve_mode_precedence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        assert_eq!(resolve_mode(None, None).unwrap(), ColorMode::Light);
        assert_eq!(resolve_mode(None, Some(&path)).unwrap(), ColorMode::Dark);
        assert_eq!(
            resolve_mode(Some(ModeChoice::Light), Some(&path)).unwrap(),
            ColorMode::Light
        );
    }

    #[test]
    fn test_render_command_reports_missing_renderer() {
        let app = SternpostApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("diagram.mmd");
        let output = dir.path().join("diagram.html");
        fs::write(&input, "flowchart TD\n  A-->B").unwrap();

        let renderer = CommandRenderer::new(dir.path().join("no-such-renderer"));
        let result = app.render_command(
            Some(input),
            Some(output.clone()),
            ColorMode::Light,
            Some("arch".to_string()),
            renderer,
            false,
        );

        assert!(result.is_err());
        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("Diagram Rendering Error"));
    }

    #[test]
    fn test_should_colorize_explicit_choices() {
        assert!(should_colorize(ColorChoice::Always));
        assert!(!should_colorize(ColorChoice::Never));
    }
}
