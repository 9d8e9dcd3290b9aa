use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sensorlink_frame::FrameError;
use sensorlink_hub::{HubError, HubSession, Ingestor};
use sensorlink_registry::ClientRegistry;

use crate::cmd::WatchArgs;
use crate::exit::{hub_error, CliError, CliResult, SUCCESS};
use crate::output::{
    print_session_summary, print_update, ClientSummary, OutputFormat, SensorUpdate, WatchTotals,
};

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let link = open_link(&args)?;
    let registry = ClientRegistry::with_capacity(args.clients);
    let mut session = HubSession::with_ingestor(link, Ingestor::with_registry(registry));

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut totals = WatchTotals {
        frames_decoded: 0,
        frames_rejected: 0,
        messages: 0,
        applied: 0,
        dropped: 0,
    };
    let mut ingested = 0u64;

    while running.load(Ordering::SeqCst) {
        let applied = match session.next_frame() {
            Ok(applied) => applied,
            Err(HubError::Frame(FrameError::LinkClosed)) => break,
            Err(err) => return Err(hub_error("watch failed", err)),
        };

        totals.messages += u64::from(applied.messages);
        totals.applied += u64::from(applied.applied);
        totals.dropped += u64::from(applied.dropped);

        for update in flush_dirty(&mut session) {
            print_update(&update, format);
        }

        ingested += 1;
        if let Some(frames) = args.frames {
            if ingested >= frames {
                break;
            }
        }
    }

    totals.frames_decoded = session.frames_decoded();
    totals.frames_rejected = session.frames_rejected();

    let clients: Vec<ClientSummary> = session
        .registry()
        .clients()
        .iter()
        .map(|client| ClientSummary {
            client: hex::encode(client.id()),
            last_seqnum: client.last_seqnum(),
            packet_loss: client.packet_loss(),
            sensors: client.sensors().len(),
        })
        .collect();
    print_session_summary(&clients, &totals, format);

    Ok(SUCCESS)
}

/// Drains dirty sensors into printable rows and resets every flag, so the
/// next frame reports only what it changed.
fn flush_dirty<T: Read>(session: &mut HubSession<T>) -> Vec<SensorUpdate> {
    let mut updates = Vec::new();
    for client in session.registry_mut().clients_mut() {
        let client_hex = hex::encode(client.id());
        let last_seqnum = client.last_seqnum();
        let packet_loss = client.packet_loss();
        for sensor in client.sensors_mut() {
            if sensor.is_dirty() {
                updates.push(SensorUpdate {
                    client: client_hex.clone(),
                    sensor: hex::encode(sensor.id()),
                    value: sensor.value(),
                    last_seqnum,
                    packet_loss,
                });
                sensor.clear_dirty();
            }
        }
        client.clear_dirty();
    }
    updates
}

fn open_link(args: &WatchArgs) -> CliResult<Box<dyn Read>> {
    if args.device.as_os_str() == "-" {
        return Ok(Box::new(std::io::stdin()));
    }
    open_serial_link(args)
}

#[cfg(unix)]
fn open_serial_link(args: &WatchArgs) -> CliResult<Box<dyn Read>> {
    let link = sensorlink_transport::open_serial(&args.device, args.baud)
        .map_err(|err| crate::exit::link_error("open failed", err))?;
    Ok(Box::new(link))
}

#[cfg(not(unix))]
fn open_serial_link(_args: &WatchArgs) -> CliResult<Box<dyn Read>> {
    Err(CliError::new(
        crate::exit::USAGE,
        "serial devices are only supported on unix; pipe frames to \"-\" instead",
    ))
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
