//! In-process hub and simulated sensor node over a loopback link.
//!
//! Run with:
//!   cargo run --example loopback-hub

use std::thread;
use std::time::Duration;

use sensorlink::frame::FrameWriter;
use sensorlink::hub::HubSession;
use sensorlink::message::{tag, MessageBuilder};
use sensorlink::transport::LinkStream;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (node_end, hub_end) = LinkStream::pair()?;

    // The node: three transmissions with a deliberate gap after the first,
    // so the hub charges packet loss.
    let node = thread::spawn(move || -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut writer = FrameWriter::new(node_end);
        let mut builder = MessageBuilder::new();

        for (seq, temp) in [(1u32, 215), (4, 217), (5, 219)] {
            builder.clear();
            builder.append(tag::CLIENT_ID, b"meteo-08")?;
            builder.append_u32(tag::SEQNUM, seq)?;
            builder.append(tag::SENSOR_ID, b"temp")?;
            builder.append_u32(tag::SENSOR_VALUE, temp)?;
            writer.send(builder.as_bytes())?;
            thread::sleep(Duration::from_millis(10));
        }
        Ok(())
    });

    let mut session = HubSession::new(hub_end);
    for _ in 0..3 {
        let applied = session.next_frame()?;
        println!(
            "frame: {} messages, {} applied, {} dropped",
            applied.messages, applied.applied, applied.dropped
        );

        for reading in session.registry().readings() {
            if reading.dirty {
                println!(
                    "  {} / {} = {}",
                    String::from_utf8_lossy(reading.client_id),
                    String::from_utf8_lossy(reading.sensor_id),
                    reading.value
                );
            }
        }
        for client in session.registry_mut().clients_mut() {
            client.clear_dirty();
            for sensor in client.sensors_mut() {
                sensor.clear_dirty();
            }
        }
    }

    for report in session.registry().client_reports() {
        println!(
            "client {}: last_seq={:?} loss={}",
            String::from_utf8_lossy(report.client_id),
            report.last_seqnum,
            report.packet_loss
        );
    }

    node.join().expect("node thread should not panic")?;
    Ok(())
}
