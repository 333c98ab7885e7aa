// turtlestage/demo/native-turtle/src/main.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runs a turtle program headlessly at a fixed frame rate and writes the
//! final stage as SVG.

use clap::{App, Arg, ArgMatches};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::process;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use turtlestage::driver::DEFAULT_FRAME;
use turtlestage::{
    block_on, Board, BoardConfig, BoardError, DriverError, Interpreter, Scene, Speed,
    StaticSprite, Ticker,
};
use turtlestage_telemetry::{
    JsonLinesSink, Measurements, Properties, TelemetrySession, TracingSink,
};
use uturtle::ast::Turtle;
use uturtle::ProgramError;

// Ten minutes of simulated time.
const MAX_SIMULATED_MS: u64 = 10 * 60 * 1000;

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Program(#[from] ProgramError),

    #[error("board error: {0}")]
    Board(#[from] BoardError),

    #[error("{0}")]
    Driver(#[from] DriverError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let matches = App::new("turtle-demo")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Runs a turtle program and renders the result as SVG")
        .arg(
            Arg::with_name("INPUT")
                .help("Turtle program to run")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .help("Read INPUT as a JSON array of command messages"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .help("SVG output path (stdout if omitted)"),
        )
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .help("Board configuration as JSON"),
        )
        .arg(
            Arg::with_name("speed")
                .short("s")
                .long("speed")
                .takes_value(true)
                .possible_values(&["slowest", "slow", "normal", "fast", "fastest"])
                .help("Initial turtle speed"),
        )
        .arg(
            Arg::with_name("frame-ms")
                .long("frame-ms")
                .takes_value(true)
                .help("Simulated frame length in milliseconds"),
        )
        .arg(
            Arg::with_name("telemetry")
                .long("telemetry")
                .takes_value(true)
                .help("Append telemetry as JSON lines to this file"),
        )
        .get_matches();

    if let Err(err) = run(&matches) {
        error!("{}", err);
        eprintln!("turtle-demo: {}", err);
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), DemoError> {
    let telemetry = TelemetrySession::default();

    let result = render(matches, &telemetry);
    if let Err(ref err) = result {
        telemetry.track_exception("demo_failed", err, Properties::new());
    }

    // The sink shows up last; everything tracked so far was buffered.
    let flushed = attach_telemetry(&telemetry, matches.value_of("telemetry"));
    info!(flushed, "telemetry flushed");

    result
}

/// Attaches the JSON lines file at `path`, or logs through `tracing` when
/// there is no path or it cannot be opened.
fn attach_telemetry(telemetry: &TelemetrySession, path: Option<&str>) -> usize {
    let path = match path {
        Some(path) => path,
        None => return telemetry.attach_sink(TracingSink),
    };
    match fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => telemetry.attach_sink(JsonLinesSink::new(BufWriter::new(file))),
        Err(err) => {
            warn!(path, "cannot open telemetry file, logging instead: {}", err);
            telemetry.attach_sink(TracingSink)
        }
    }
}

fn frame_length(value: Option<&str>) -> Result<Duration, DemoError> {
    let ms: u64 = match value {
        Some(ms) => ms
            .parse()
            .map_err(|_| DemoError::InvalidArgument(format!("frame-ms `{}`", ms)))?,
        None => return Ok(DEFAULT_FRAME),
    };
    if ms == 0 {
        return Err(DemoError::InvalidArgument(
            "frame-ms must be at least 1".to_string(),
        ));
    }
    Ok(Duration::from_millis(ms))
}

fn render(matches: &ArgMatches, telemetry: &TelemetrySession) -> Result<(), DemoError> {
    let mut config = match matches.value_of("config") {
        Some(path) => serde_json::from_reader(File::open(path)?)?,
        None => BoardConfig::default(),
    };
    if let Some(speed) = matches.value_of("speed") {
        config.speed = parse_speed(speed)?;
    }
    let frame = frame_length(matches.value_of("frame-ms"))?;
    let max_frames = MAX_SIMULATED_MS / frame.as_millis() as u64;

    let input = matches.value_of("INPUT").unwrap_or_default();
    let source = fs::read_to_string(input)?;
    let program: Turtle = if matches.is_present("json") {
        serde_json::from_str(&source)?
    } else {
        uturtle::parse(&source)?
    };

    let mut loaded = Properties::new();
    loaded.insert("input".to_string(), input.to_string());
    let mut counts = Measurements::new();
    counts.insert("commands".to_string(), program.len() as f64);
    telemetry.track("program_loaded", loaded, counts);

    let ticker = Ticker::new();
    let board = Board::new(Scene::new(config.width, config.height), &ticker, config);
    block_on(&ticker, frame, max_frames, board.init(&StaticSprite::default()))??;

    let mut interpreter = Interpreter::new();
    let flags = block_on(&ticker, frame, max_frames, interpreter.run(&board, &program))??;
    if !flags.is_empty() {
        let mut data = Properties::new();
        data.insert("flags".to_string(), flags.to_string());
        telemetry.track("program_warnings", data, Measurements::new());
    }

    let mut finished = Measurements::new();
    finished.insert("frames".to_string(), ticker.frames() as f64);
    telemetry.track("program_finished", Properties::new(), finished);

    let svg = board.with_stage(|scene| scene.to_svg());
    board.kill();

    match matches.value_of("output") {
        Some(path) => fs::write(path, svg)?,
        None => io::stdout().write_all(svg.as_bytes())?,
    }
    Ok(())
}

fn parse_speed(name: &str) -> Result<Speed, DemoError> {
    match name {
        "slowest" => Ok(Speed::Slowest),
        "slow" => Ok(Speed::Slow),
        "normal" => Ok(Speed::Normal),
        "fast" => Ok(Speed::Fast),
        "fastest" => Ok(Speed::Fastest),
        _ => Err(DemoError::InvalidArgument(format!("speed `{}`", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::{attach_telemetry, frame_length, DemoError, DEFAULT_FRAME};
    use std::time::Duration;
    use turtlestage_telemetry::{Measurements, Properties, TelemetrySession};

    #[test]
    fn frame_length_rejects_zero() {
        assert!(matches!(
            frame_length(Some("0")),
            Err(DemoError::InvalidArgument(_))
        ));
        assert!(matches!(
            frame_length(Some("soon")),
            Err(DemoError::InvalidArgument(_))
        ));
        assert_eq!(frame_length(Some("40")).unwrap(), Duration::from_millis(40));
        assert_eq!(frame_length(None).unwrap(), DEFAULT_FRAME);
    }

    #[test]
    fn unopenable_telemetry_file_falls_back_to_tracing() {
        let telemetry = TelemetrySession::default();
        telemetry.track("demo_failed", Properties::new(), Measurements::new());

        let path = "/nonexistent-turtle-demo-dir/telemetry.jsonl";
        assert_eq!(attach_telemetry(&telemetry, Some(path)), 1);
        assert!(telemetry.is_ready());
        assert_eq!(telemetry.events().pending(), 0);
    }
}
