use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod emit;
pub mod inspect;
pub mod version;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ingest frames from a link and print readings as they change.
    Watch(WatchArgs),
    /// Send telemetry transmissions, acting as a sensor node.
    Emit(EmitArgs),
    /// Decode a captured byte stream and dump its frames.
    Inspect(InspectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Watch(args) => watch::run(args, format),
        Command::Emit(args) => emit::run(args),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Serial device to read, or "-" for stdin.
    pub device: PathBuf,
    /// Serial baud rate.
    #[arg(long, default_value = "9600")]
    pub baud: u32,
    /// Exit after ingesting N intact frames.
    #[arg(long, value_name = "N")]
    pub frames: Option<u64>,
    /// Registry capacity (client slots).
    #[arg(long, default_value = "5", value_name = "N")]
    pub clients: usize,
}

#[derive(Args, Debug)]
pub struct EmitArgs {
    /// Serial device to write, or "-" for stdout.
    pub device: PathBuf,
    /// Serial baud rate.
    #[arg(long, default_value = "9600")]
    pub baud: u32,
    /// Client identity as hex bytes (e.g. 6e6f6465 for "node").
    #[arg(long, value_name = "HEX")]
    pub client: String,
    /// Sequence number of the first transmission.
    #[arg(long, default_value = "1")]
    pub seq: u32,
    /// Sensor reading as HEXID:VALUE (repeatable).
    #[arg(long, value_name = "HEXID:VALUE")]
    pub reading: Vec<String>,
    /// Number of transmissions to send, incrementing the sequence number.
    #[arg(long, default_value = "1", value_name = "N")]
    pub count: u32,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Capture file to decode, or "-" for stdin.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
