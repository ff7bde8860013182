#![forbid(unsafe_code)]

//! Harness configuration.
//!
//! Values come from `VITRINE_HARNESS_*` environment variables first, then
//! command-line flags override them:
//!
//! | Variable                    | Flag          | Default     |
//! |-----------------------------|---------------|-------------|
//! | `VITRINE_HARNESS_FRAMES`    | `--frames=N`  | `240`       |
//! | `VITRINE_HARNESS_FRAME_MS`  | `--frame-ms=N`| `16`        |
//! | `VITRINE_HARNESS_TRACE_FILE`| `--trace=PATH`| stdout      |
//! | `VITRINE_HARNESS_VIEWPORT`  | `--viewport=WxH` | `1280x800` |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use vitrine::{Error, Result, Size};

pub const HELP_TEXT: &str = "\
vitrine-harness: run the portfolio page headless and write a frame trace

USAGE:
    vitrine-harness [OPTIONS]

OPTIONS:
    --frames=N        Number of frames to step (default: 240)
    --frame-ms=N      Virtual frame length in milliseconds (default: 16)
    --trace=PATH      Write the JSON-lines trace to PATH instead of stdout
    --viewport=WxH    Viewport size (default: 1280x800)
    --help, -h        Show this help message

ENVIRONMENT VARIABLES:
    VITRINE_HARNESS_FRAMES      Override default --frames
    VITRINE_HARNESS_FRAME_MS    Override default --frame-ms
    VITRINE_HARNESS_TRACE_FILE  Override default --trace
    VITRINE_HARNESS_VIEWPORT    Override default --viewport
    RUST_LOG                    Log filter (default: info)";

/// What the harness was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(HarnessConfig),
    Help,
}

/// Parameters of one headless run.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    pub frames: u32,
    pub frame: Duration,
    /// `None` writes the trace to stdout.
    pub trace_file: Option<PathBuf>,
    pub viewport: Size,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            frames: 240,
            frame: Duration::from_millis(16),
            trace_file: None,
            viewport: Size::new(1280.0, 800.0),
        }
    }
}

impl HarnessConfig {
    /// Parse from the process environment and arguments.
    pub fn from_env() -> Result<Command> {
        Self::parse(
            |key| std::env::var(key).ok(),
            std::env::args().skip(1),
        )
    }

    /// Parse with an injectable environment lookup and argument list.
    pub fn parse<F, I, S>(env: F, args: I) -> Result<Command>
    where
        F: Fn(&str) -> Option<String>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();

        if let Some(val) = env("VITRINE_HARNESS_FRAMES") {
            config.frames = parse_frames("VITRINE_HARNESS_FRAMES", &val)?;
        }
        if let Some(val) = env("VITRINE_HARNESS_FRAME_MS") {
            config.frame = parse_frame_ms("VITRINE_HARNESS_FRAME_MS", &val)?;
        }
        if let Some(val) = env("VITRINE_HARNESS_TRACE_FILE")
            && !val.is_empty()
        {
            config.trace_file = Some(PathBuf::from(val));
        }
        if let Some(val) = env("VITRINE_HARNESS_VIEWPORT") {
            config.viewport = parse_viewport("VITRINE_HARNESS_VIEWPORT", &val)?;
        }

        for arg in args {
            let arg = arg.as_ref();
            if matches!(arg, "--help" | "-h") {
                return Ok(Command::Help);
            } else if let Some(val) = arg.strip_prefix("--frames=") {
                config.frames = parse_frames("--frames", val)?;
            } else if let Some(val) = arg.strip_prefix("--frame-ms=") {
                config.frame = parse_frame_ms("--frame-ms", val)?;
            } else if let Some(val) = arg.strip_prefix("--trace=") {
                config.trace_file = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--viewport=") {
                config.viewport = parse_viewport("--viewport", val)?;
            } else {
                return Err(Error::Config(format!("unknown argument: {arg}")));
            }
        }

        Ok(Command::Run(config))
    }
}

fn parse_number<T: FromStr>(name: &str, val: &str) -> Result<T> {
    val.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{name}: not a number: {val:?}")))
}

fn parse_frames(name: &str, val: &str) -> Result<u32> {
    match parse_number(name, val)? {
        0 => Err(Error::Config(format!("{name}: frames must be positive"))),
        n => Ok(n),
    }
}

fn parse_frame_ms(name: &str, val: &str) -> Result<Duration> {
    match parse_number(name, val)? {
        0 => Err(Error::Config(format!("{name}: frame length must be positive"))),
        ms => Ok(Duration::from_millis(ms)),
    }
}

fn parse_viewport(name: &str, val: &str) -> Result<Size> {
    let (w, h) = val
        .split_once(['x', 'X'])
        .ok_or_else(|| Error::Config(format!("{name}: expected WIDTHxHEIGHT, got {val:?}")))?;
    let width: f32 = parse_number(name, w)?;
    let height: f32 = parse_number(name, h)?;
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return Err(Error::Config(format!("{name}: viewport must be positive")));
    }
    Ok(Size::new(width, height))
}
