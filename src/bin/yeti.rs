//! Yeti CLI - Command-line interface for Yeti Pose
//!
//! Commands:
//! - pose: Evaluate one interaction state into a pose frame
//! - render: Evaluate one interaction state into an SVG document
//! - run: Process streaming interaction states from stdin (NDJSON)
//! - replay: Apply a script of form events, emitting a frame per event
//! - schema: Print input schema information

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use yeti_pose::encoder::{FrameEncoder, PoseFrame};
use yeti_pose::pipeline::{parse_state, PoseProcessor};
use yeti_pose::{render_svg, FormEvent, FormState, PoseError, YETI_VERSION};

/// Yeti - Deterministic pose engine for a login-form mascot
#[derive(Parser)]
#[command(name = "yeti")]
#[command(author = "Synheart AI Inc")]
#[command(version = YETI_VERSION)]
#[command(about = "Derive the login mascot's pose from form interaction state", long_about = None)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one interaction state into a pose frame
    Pose {
        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Pretty-print the frame
        #[arg(long)]
        pretty: bool,
    },

    /// Evaluate one interaction state into an SVG document
    Render {
        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },

    /// Process streaming interaction states from stdin (streaming mode)
    Run {
        /// Flush output after each record (`--flush false` to buffer)
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        flush: bool,

        /// Only emit frames whose pose changed
        #[arg(long)]
        changes_only: bool,
    },

    /// Apply a script of form events, emitting one frame per event
    Replay {
        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,
    },

    /// Print schema information
    Schema {
        /// Schema to print
        #[arg(value_enum)]
        schema_type: SchemaType,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one frame per line)
    Ndjson,
    /// JSON array of frames
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Interaction state input
    State,
    /// Form event script input
    Events,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn run(cli: Cli) -> Result<(), YetiCliError> {
    match cli.command {
        Commands::Pose {
            input,
            output,
            pretty,
        } => cmd_pose(&input, &output, pretty),
        Commands::Render { input, output } => cmd_render(&input, &output),
        Commands::Run {
            flush,
            changes_only,
        } => cmd_run(flush, changes_only),
        Commands::Replay {
            input,
            output_format,
        } => cmd_replay(&input, output_format),
        Commands::Schema { schema_type } => {
            println!("{}", schema_json(schema_type));
            Ok(())
        }
    }
}

fn read_input(input: &Path) -> Result<String, YetiCliError> {
    if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            info!("reading from interactive terminal; end input with Ctrl-D");
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn write_output(output: &Path, data: &str) -> Result<(), YetiCliError> {
    if output.to_string_lossy() == "-" {
        print!("{}", data);
    } else {
        fs::write(output, data)?;
    }
    Ok(())
}

fn cmd_pose(input: &Path, output: &Path, pretty: bool) -> Result<(), YetiCliError> {
    let state = parse_state(read_input(input)?.trim())?;
    let frame = PoseProcessor::new().process_state(&state);

    let mut data = FrameEncoder::to_json(&frame, pretty)?;
    data.push('\n');
    write_output(output, &data)
}

fn cmd_render(input: &Path, output: &Path) -> Result<(), YetiCliError> {
    let state = parse_state(read_input(input)?.trim())?;
    let pose = yeti_pose::evaluate(&state);
    debug!(?pose, "rendering pose");
    write_output(output, &render_svg(&pose))
}

fn cmd_run(flush: bool, changes_only: bool) -> Result<(), YetiCliError> {
    let mut processor = PoseProcessor::new();

    if atty::is(atty::Stream::Stdin) {
        info!("streaming mode: enter one interaction state JSON object per line");
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for (line_num, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let state = parse_state(trimmed).map_err(|e| {
            YetiCliError::ParseError(format!("Failed to parse line {}: {}", line_num + 1, e))
        })?;

        let frame = processor.process_state(&state);
        if changes_only && !frame.changed {
            continue;
        }

        writeln!(stdout, "{}", FrameEncoder::to_json(&frame, false)?)?;
        if flush {
            stdout.flush()?;
        }
    }

    stdout.flush()?;
    debug!(frames = processor.frames_emitted(), "stream closed");
    Ok(())
}

fn cmd_replay(input: &Path, output_format: OutputFormat) -> Result<(), YetiCliError> {
    let events = FormEvent::parse_ndjson(&read_input(input)?)?;
    if events.is_empty() {
        return Err(YetiCliError::NoEvents);
    }

    let mut processor = PoseProcessor::new();
    let mut form = FormState::new();
    let frames = processor.replay(&mut form, &events);

    print!("{}", format_output(&frames, &output_format)?);
    Ok(())
}

fn format_output(frames: &[PoseFrame], format: &OutputFormat) -> Result<String, YetiCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut output = String::new();
            for frame in frames {
                output.push_str(&serde_json::to_string(frame)?);
                output.push('\n');
            }
            Ok(output)
        }
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string(frames)?)),
        OutputFormat::JsonPretty => Ok(format!("{}\n", serde_json::to_string_pretty(frames)?)),
    }
}

fn schema_json(schema_type: SchemaType) -> String {
    let flag = serde_json::json!({ "type": "boolean", "default": false });
    let schema = match schema_type {
        SchemaType::State => serde_json::json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "InteractionState",
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "input_length": {
                    "type": "integer",
                    "minimum": 0,
                    "default": 0,
                    "description": "Tracked field length; values above 30 are clamped to 30"
                },
                "is_username_focused": flag,
                "is_password_focused": flag,
                "is_password_visible": flag,
                "is_auth_failed": flag,
                "is_auth_succeeded": flag
            },
            "not": {
                "properties": {
                    "is_auth_failed": { "const": true },
                    "is_auth_succeeded": { "const": true }
                },
                "required": ["is_auth_failed", "is_auth_succeeded"]
            }
        }),
        SchemaType::Events => {
            let field = serde_json::json!({ "enum": ["username", "password"] });
            serde_json::json!({
                "$schema": "http://json-schema.org/draft-07/schema#",
                "title": "FormEvent",
                "oneOf": [
                    { "properties": { "type": { "const": "focus" }, "field": field }, "required": ["type", "field"] },
                    { "properties": { "type": { "const": "blur" }, "field": field }, "required": ["type", "field"] },
                    { "properties": { "type": { "const": "input" }, "field": field, "value": { "type": "string" } }, "required": ["type", "field", "value"] },
                    { "properties": { "type": { "const": "toggle_visibility" } }, "required": ["type"] },
                    { "properties": { "type": { "const": "submit" }, "outcome": { "enum": ["success", "failure"] } }, "required": ["type", "outcome"] }
                ]
            })
        }
    };
    schema.to_string()
}

// Error types

#[derive(Debug)]
enum YetiCliError {
    Io(io::Error),
    Pose(PoseError),
    Json(serde_json::Error),
    NoEvents,
    ParseError(String),
}

impl From<io::Error> for YetiCliError {
    fn from(e: io::Error) -> Self {
        YetiCliError::Io(e)
    }
}

impl From<PoseError> for YetiCliError {
    fn from(e: PoseError) -> Self {
        YetiCliError::Pose(e)
    }
}

impl From<serde_json::Error> for YetiCliError {
    fn from(e: serde_json::Error) -> Self {
        YetiCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<YetiCliError> for CliError {
    fn from(e: YetiCliError) -> Self {
        match e {
            YetiCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            YetiCliError::Pose(PoseError::ConflictingOutcome) => CliError {
                code: "CONFLICTING_OUTCOME".to_string(),
                message: PoseError::ConflictingOutcome.to_string(),
                hint: Some("Clear is_auth_failed when setting is_auth_succeeded".to_string()),
            },
            YetiCliError::Pose(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'yeti schema state' for the expected input".to_string()),
            },
            YetiCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            YetiCliError::NoEvents => CliError {
                code: "NO_EVENTS".to_string(),
                message: "No form events found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            YetiCliError::ParseError(msg) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Check input format".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_run(args: &[&str]) -> (bool, bool) {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        match cli.command {
            Commands::Run {
                flush,
                changes_only,
            } => (flush, changes_only),
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_run_flushes_by_default() {
        assert_eq!(parse_run(&["yeti", "run"]), (true, false));
    }

    #[test]
    fn test_run_flush_can_be_disabled() {
        assert_eq!(parse_run(&["yeti", "run", "--flush", "false"]), (false, false));
        assert_eq!(
            parse_run(&["yeti", "run", "--flush", "true", "--changes-only"]),
            (true, true)
        );
    }

    #[test]
    fn test_state_schema_allows_lengths_above_thirty() {
        let schema: serde_json::Value =
            serde_json::from_str(&schema_json(SchemaType::State)).unwrap();
        let length = &schema["properties"]["input_length"];
        assert!(length.get("maximum").is_none());
        assert!(length["description"].as_str().unwrap().contains("clamped"));
        assert_eq!(schema["additionalProperties"], false);
    }
}
