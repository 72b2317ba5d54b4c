//! Command-line interface for the eulerdraw utility
//!
//! Reads abstract diagrams as JSON or compact notation and writes the
//! laid-out diagram as SVG or JSON.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::debug;

use eulerdraw::abstraction::{AbstractDescription, DiagramContext};
use eulerdraw::core::logging::init_logging;
use eulerdraw::input::{parse_compact, AbstractDiagramSpec};
use eulerdraw::placement::DiagramCreator;
use eulerdraw::render::{JsonRenderer, SvgRenderer};
use eulerdraw::{LayoutConfig, RenderConfig, Renderer};

/// Eulerdraw - Lay out Euler and Venn diagrams as circles
#[derive(Parser)]
#[command(name = "eulerdraw")]
#[command(about = "Lay out Euler diagrams described as zones and render them to SVG")]
#[command(version = env!("CARGO_PKG_VERSION"))]
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
    /// Lay out a diagram and render it
    Draw {
        /// Input file with the abstract diagram (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Edge length of the square output
        #[arg(short, long, default_value_t = 400.0)]
        size: f64,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Svg)]
        format: OutputFormat,

        /// Notation of the input
        #[arg(short, long, value_enum, default_value_t = Notation::Json)]
        notation: Notation,

        /// Leave curve labels out of the SVG
        #[arg(long)]
        no_labels: bool,
    },

    /// Check that an abstract diagram is well formed
    Validate {
        /// Input file to validate (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Notation of the input
        #[arg(short, long, value_enum, default_value_t = Notation::Json)]
        notation: Notation,
    },

    /// Print the layout checksum used for regression comparisons
    Checksum {
        /// Input file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Edge length the diagram is fitted to
        #[arg(short, long, default_value_t = 100.0)]
        size: f64,

        /// Notation of the input
        #[arg(short, long, value_enum, default_value_t = Notation::Json)]
        notation: Notation,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the decomposition, recomposition and build steps
    Plan {
        /// Input file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Notation of the input
        #[arg(short, long, value_enum, default_value_t = Notation::Json)]
        notation: Notation,
    },
}

/// Rendered output formats
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Svg,
    Json,
}

/// Input notations
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum Notation {
    /// The `{"AbstractDiagram": ...}` wire format
    #[default]
    Json,
    /// Zone words such as `a b ab, ab`
    Compact,
}

#[derive(Debug, Serialize)]
struct ChecksumReport {
    checksum: f64,
    size: f64,
    circles: usize,
    shaded_zones: usize,
}

/// Main CLI application
pub struct EulerdrawApp {
    layout: LayoutConfig,
    render: RenderConfig,
}

impl EulerdrawApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default(), RenderConfig::default())
    }

    pub fn with_config(layout: LayoutConfig, render: RenderConfig) -> Self {
        Self { layout, render }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var("EULERDRAW_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("EULERDRAW_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            debug!("Logging already initialized: {}", e);
        }

        if cli.verbose {
            eprintln!("Eulerdraw v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Draw {
                input,
                output,
                size,
                format,
                notation,
                no_labels,
            } => self.draw_command(input, output, size, format, notation, no_labels, cli.verbose),
            Commands::Validate { input, notation } => {
                self.validate_command(input, notation, cli.verbose)
            }
            Commands::Checksum {
                input,
                size,
                notation,
                json,
            } => self.checksum_command(input, size, notation, json),
            Commands::Plan { input, notation } => self.plan_command(input, notation),
        }
    }

    /// Handle the draw command
    #[allow(clippy::too_many_arguments)]
    fn draw_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        size: f64,
        format: OutputFormat,
        notation: Notation,
        no_labels: bool,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let rendered = self.draw_content(&content, size, format, notation, no_labels)?;
        if verbose {
            eprintln!("Laid out diagram at size {}", size);
        }
        self.write_output(output, &rendered)
    }

    /// Lay out `content` and render it in `format`.
    pub fn draw_content(
        &self,
        content: &str,
        size: f64,
        format: OutputFormat,
        notation: Notation,
        no_labels: bool,
    ) -> Result<String> {
        check_size(size)?;
        let mut ctx = DiagramContext::new();
        let description = self.load_description(content, notation, &mut ctx)?;
        let diagram = DiagramCreator::new(self.layout.clone())
            .create_diagram(&description, &mut ctx, size)
            .context("laying out diagram")?;

        match format {
            OutputFormat::Svg => {
                let config = if no_labels {
                    self.render.clone().without_labels()
                } else {
                    self.render.clone()
                };
                SvgRenderer::with_config(config).render(&diagram)
            }
            OutputFormat::Json => JsonRenderer::new().render(&diagram),
        }
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, notation: Notation, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let mut ctx = DiagramContext::new();
        match self.load_description(&content, notation, &mut ctx) {
            Ok(description) => {
                println!(
                    "✓ Valid diagram: {} contours, {} zones",
                    description.num_contours(),
                    description.num_zones()
                );
                Ok(())
            }
            Err(e) => {
                println!("✗ Invalid diagram: {:#}", e);
                Err(e)
            }
        }
    }

    /// Handle the checksum command
    fn checksum_command(
        &self,
        input: Option<PathBuf>,
        size: f64,
        notation: Notation,
        json: bool,
    ) -> Result<()> {
        check_size(size)?;
        let content = self.read_input(input)?;
        let mut ctx = DiagramContext::new();
        let description = self.load_description(&content, notation, &mut ctx)?;
        let diagram = DiagramCreator::new(self.layout.clone())
            .create_diagram(&description, &mut ctx, size)
            .context("laying out diagram")?;

        if json {
            let report = ChecksumReport {
                checksum: diagram.checksum(),
                size,
                circles: diagram.circles().len(),
                shaded_zones: diagram.shaded_zones().len(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{:.5}", diagram.checksum());
        }
        Ok(())
    }

    /// Handle the plan command
    fn plan_command(&self, input: Option<PathBuf>, notation: Notation) -> Result<()> {
        let content = self.read_input(input)?;
        let mut ctx = DiagramContext::new();
        let description = self.load_description(&content, notation, &mut ctx)?;
        let plan = DiagramCreator::new(self.layout.clone())
            .plan(&description, &mut ctx)
            .context("planning diagram")?;
        print!("{}", plan);
        io::stdout().flush()?;
        Ok(())
    }

    /// Parse and validate `content` into an abstract description.
    pub fn load_description(
        &self,
        content: &str,
        notation: Notation,
        ctx: &mut DiagramContext,
    ) -> Result<AbstractDescription> {
        let spec = match notation {
            Notation::Json => {
                AbstractDiagramSpec::from_json(content).context("reading diagram JSON")?
            }
            Notation::Compact => {
                parse_compact(content.trim()).context("reading compact notation")?
            }
        };
        let description = spec.to_description(ctx).context("validating diagram")?;
        Ok(description)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) => {
                if path.to_string_lossy() == "-" {
                    let mut content = String::new();
                    io::stdin().read_to_string(&mut content)?;
                    Ok(content)
                } else {
                    fs::read_to_string(&path).map_err(|e| {
                        anyhow!("Failed to read input file '{}': {}", path.display(), e)
                    })
                }
            }
            None => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for EulerdrawApp {
    fn default() -> Self {
        Self::new()
    }
}

fn check_size(size: f64) -> Result<()> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(anyhow!("size must be a positive number, got {}", size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    const VENN2: &str = r#"{"AbstractDiagram": {
        "Version": 0,
        "Contours": ["a", "b"],
        "Zones": [{"in": ["a"]}, {"in": ["b"]}, {"in": ["a", "b"]}],
        "ShadedZones": [],
        "Spiders": []
    }}"#;

    #[test]
    fn test_cli_parsing_draw_command() {
        let args = vec![
            "eulerdraw", "draw", "--input", "venn.json", "--output", "venn.svg", "--size", "250",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Draw {
                input,
                output,
                size,
                format,
                notation,
                no_labels,
            } => {
                assert_eq!(input.unwrap().to_string_lossy(), "venn.json");
                assert_eq!(output.unwrap().to_string_lossy(), "venn.svg");
                assert_eq!(size, 250.0);
                assert_eq!(format, OutputFormat::Svg); // default
                assert_eq!(notation, Notation::Json); // default
                assert!(!no_labels);
            }
            _ => panic!("Expected Draw command"),
        }
    }

    #[test]
    fn test_cli_parsing_format_and_notation() {
        let args = vec!["eulerdraw", "draw", "--format", "json", "--notation", "compact"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Draw {
                format, notation, ..
            } => {
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(notation, Notation::Compact);
            }
            _ => panic!("Expected Draw command"),
        }
    }

    #[test]
    fn test_cli_parsing_checksum_command() {
        let args = vec!["eulerdraw", "checksum", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Checksum { size, json, .. } => {
                assert_eq!(size, 100.0);
                assert!(json);
            }
            _ => panic!("Expected Checksum command"),
        }
    }

    #[test]
    fn test_cli_parsing_rejects_unknown_format() {
        let args = vec!["eulerdraw", "draw", "--format", "png"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_verbose_and_log_flags() {
        let args = vec!["eulerdraw", "--verbose", "--log-level", "debug", "plan"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.log_format, LogFormat::Compact);
    }

    #[test]
    fn test_draw_content_svg() {
        let app = EulerdrawApp::new();
        let svg = app
            .draw_content(VENN2, 200.0, OutputFormat::Svg, Notation::Json, false)
            .unwrap();
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<text").count(), 2);
    }

    #[test]
    fn test_draw_content_compact_json() {
        let app = EulerdrawApp::default();
        let json = app
            .draw_content("a b ab, ab", 200.0, OutputFormat::Json, Notation::Compact, false)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["circles"].as_array().unwrap().len(), 2);
        assert_eq!(value["shaded_zones"][0], "ab");
    }

    #[test]
    fn test_draw_content_rejects_bad_size() {
        let app = EulerdrawApp::new();
        let result = app.draw_content(VENN2, -5.0, OutputFormat::Svg, Notation::Json, false);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_description_reports_validation() {
        let app = EulerdrawApp::new();
        let mut ctx = DiagramContext::new();
        let bad = r#"{"AbstractDiagram": {"Contours": ["a"], "Zones": [{"in": ["q"]}]}}"#;
        let err = app
            .load_description(bad, Notation::Json, &mut ctx)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("undefined curve 'q'"));
    }

    #[test]
    fn test_read_input_from_file() {
        let app = EulerdrawApp::new();

        let dir = tempdir().unwrap();
        let file_path = dir.path().join("venn.json");
        fs::write(&file_path, VENN2).unwrap();

        let content = app.read_input(Some(file_path)).unwrap();
        assert_eq!(content, VENN2);
    }

    #[test]
    fn test_read_input_missing_file() {
        let app = EulerdrawApp::new();
        let dir = tempdir().unwrap();
        let err = app.read_input(Some(dir.path().join("absent.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read input file"));
    }

    #[test]
    fn test_write_output_to_file() {
        let app = EulerdrawApp::new();
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("out.svg");

        app.write_output(Some(file_path.clone()), "<svg/>").unwrap();

        let read_content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(read_content, "<svg/>");
    }
}
