use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One flushed reading: a sensor whose value changed in the last frame,
/// alongside its client's sequencing state. Identities are lowercase hex.
pub struct SensorUpdate {
    pub client: String,
    pub sensor: String,
    pub value: i32,
    pub last_seqnum: Option<u32>,
    pub packet_loss: u32,
}

#[derive(Serialize)]
struct ReadingOutput<'a> {
    kind: &'static str,
    client: &'a str,
    sensor: &'a str,
    value: i32,
    last_seqnum: Option<u32>,
    packet_loss: u32,
    timestamp: String,
}

pub fn print_update(update: &SensorUpdate, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ReadingOutput {
                kind: "reading",
                client: &update.client,
                sensor: &update.sensor,
                value: update.value,
                last_seqnum: update.last_seqnum,
                packet_loss: update.packet_loss,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CLIENT", "SENSOR", "VALUE", "SEQ", "LOSS"])
                .add_row(vec![
                    update.client.clone(),
                    update.sensor.clone(),
                    update.value.to_string(),
                    seqnum_display(update.last_seqnum),
                    update.packet_loss.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "client={} sensor={} value={} seq={} loss={}",
                update.client,
                update.sensor,
                update.value,
                seqnum_display(update.last_seqnum),
                update.packet_loss
            );
        }
        OutputFormat::Raw => {
            println!("{}\t{}\t{}", update.client, update.sensor, update.value);
        }
    }
}

/// Per-client totals printed when a watch session ends.
pub struct ClientSummary {
    pub client: String,
    pub last_seqnum: Option<u32>,
    pub packet_loss: u32,
    pub sensors: usize,
}

/// Session totals printed when a watch session ends.
pub struct WatchTotals {
    pub frames_decoded: u64,
    pub frames_rejected: u64,
    pub messages: u64,
    pub applied: u64,
    pub dropped: u64,
}

#[derive(Serialize)]
struct ClientOutput<'a> {
    kind: &'static str,
    client: &'a str,
    last_seqnum: Option<u32>,
    packet_loss: u32,
    sensors: usize,
}

#[derive(Serialize)]
struct TotalsOutput {
    kind: &'static str,
    frames_decoded: u64,
    frames_rejected: u64,
    messages: u64,
    applied: u64,
    dropped: u64,
}

pub fn print_session_summary(
    clients: &[ClientSummary],
    totals: &WatchTotals,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            for client in clients {
                let out = ClientOutput {
                    kind: "client",
                    client: &client.client,
                    last_seqnum: client.last_seqnum,
                    packet_loss: client.packet_loss,
                    sensors: client.sensors,
                };
                println!(
                    "{}",
                    serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
                );
            }
            let out = TotalsOutput {
                kind: "summary",
                frames_decoded: totals.frames_decoded,
                frames_rejected: totals.frames_rejected,
                messages: totals.messages,
                applied: totals.applied,
                dropped: totals.dropped,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CLIENT", "LAST SEQ", "LOSS", "SENSORS"]);
            for client in clients {
                table.add_row(vec![
                    client.client.clone(),
                    seqnum_display(client.last_seqnum),
                    client.packet_loss.to_string(),
                    client.sensors.to_string(),
                ]);
            }
            println!("{table}");
            println!(
                "frames={} rejected={} messages={} applied={} dropped={}",
                totals.frames_decoded,
                totals.frames_rejected,
                totals.messages,
                totals.applied,
                totals.dropped
            );
        }
        OutputFormat::Pretty => {
            for client in clients {
                println!(
                    "client={} seq={} loss={} sensors={}",
                    client.client,
                    seqnum_display(client.last_seqnum),
                    client.packet_loss,
                    client.sensors
                );
            }
            println!(
                "frames={} rejected={} messages={} applied={} dropped={}",
                totals.frames_decoded,
                totals.frames_rejected,
                totals.messages,
                totals.applied,
                totals.dropped
            );
        }
        OutputFormat::Raw => {}
    }
}

/// One decoded message inside an inspected frame.
pub struct MessageRow {
    pub tag: u8,
    pub name: &'static str,
    pub body: String,
    pub value: Option<u32>,
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    tag: u8,
    name: &'a str,
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<u32>,
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    kind: &'static str,
    frame: u64,
    payload_len: usize,
    truncated: bool,
    messages: Vec<MessageOutput<'a>>,
}

pub fn print_frame(
    index: u64,
    payload_len: usize,
    rows: &[MessageRow],
    truncated: bool,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                kind: "frame",
                frame: index,
                payload_len,
                truncated,
                messages: rows
                    .iter()
                    .map(|row| MessageOutput {
                        tag: row.tag,
                        name: row.name,
                        body: &row.body,
                        value: row.value,
                    })
                    .collect(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FRAME", "TAG", "NAME", "BODY", "U32"]);
            for row in rows {
                table.add_row(vec![
                    index.to_string(),
                    row.tag.to_string(),
                    row.name.to_string(),
                    row.body.clone(),
                    row.value.map_or(String::new(), |v| v.to_string()),
                ]);
            }
            println!("{table}");
            if truncated {
                println!("frame {index}: truncated trailing message");
            }
        }
        OutputFormat::Pretty => {
            let rendered: Vec<String> = rows
                .iter()
                .map(|row| match row.value {
                    Some(value) => format!("{}={value}", row.name),
                    None => format!("{}[{}]", row.name, row.body),
                })
                .collect();
            let suffix = if truncated { " (truncated)" } else { "" };
            println!(
                "frame {index} ({payload_len} bytes): {}{suffix}",
                rendered.join(" ")
            );
        }
        OutputFormat::Raw => {}
    }
}

#[derive(Serialize)]
struct InspectOutput {
    kind: &'static str,
    frames: u64,
    rejected: u64,
    trailing_partial: bool,
}

pub fn print_inspect_summary(
    frames: u64,
    rejected: u64,
    trailing_partial: bool,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let out = InspectOutput {
                kind: "inspect",
                frames,
                rejected,
                trailing_partial,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            let partial = if trailing_partial {
                " trailing_partial=true"
            } else {
                ""
            };
            println!("frames={frames} rejected={rejected}{partial}");
        }
        OutputFormat::Raw => {}
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn seqnum_display(seqnum: Option<u32>) -> String {
    seqnum.map_or_else(|| "-".to_string(), |s| s.to_string())
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
