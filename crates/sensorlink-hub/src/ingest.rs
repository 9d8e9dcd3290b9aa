//! Applies decoded transmission payloads to the client registry.

use tracing::{debug, warn};

use sensorlink_message::{messages, tag};
use sensorlink_registry::ClientRegistry;

/// Outcome of applying one transmission payload.
///
/// Every well-formed message is either applied or dropped, so
/// `applied + dropped == messages`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Applied {
    /// Well-formed messages walked in the payload.
    pub messages: u32,
    /// Messages that updated or armed ingest state.
    pub applied: u32,
    /// Messages dropped: missing context, full tables, or bad bodies.
    pub dropped: u32,
    /// A truncated trailing message cut the walk short. Everything
    /// applied before the cut stays applied.
    pub truncated: bool,
}

/// Walks transmission payloads and folds them into per-client state.
///
/// A transmission is one decoded frame payload: a client identity, a
/// sequence number, then sensor identity/value pairs. The walk keeps two
/// cursors scoped to the payload. The client cursor arms on `CLIENT_ID`
/// and scopes everything that follows; the sensor cursor arms on
/// `SENSOR_ID` and pairs with each later `SENSOR_VALUE`. Messages arriving
/// before their cursor is armed are dropped and counted, never applied to
/// a guessed destination.
///
/// Registry rejections (full tables, malformed identities) drop the update
/// and keep walking; established state is never displaced by a misbehaving
/// transmitter.
#[derive(Debug, Default)]
pub struct Ingestor {
    registry: ClientRegistry,
}

impl Ingestor {
    /// An ingestor over a registry with the default capacity.
    pub fn new() -> Self {
        Self {
            registry: ClientRegistry::new(),
        }
    }

    /// An ingestor over a caller-configured registry.
    pub fn with_registry(registry: ClientRegistry) -> Self {
        Self { registry }
    }

    /// The accumulated per-client state.
    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    /// Mutable registry access for the reporting sink.
    pub fn registry_mut(&mut self) -> &mut ClientRegistry {
        &mut self.registry
    }

    /// Consumes the ingestor, handing the registry to the caller.
    pub fn into_registry(self) -> ClientRegistry {
        self.registry
    }

    /// Applies every message in one decoded transmission payload.
    pub fn apply(&mut self, payload: &[u8]) -> Applied {
        let mut out = Applied::default();
        let mut current_client: Option<&[u8]> = None;
        let mut pending_sensor: Option<&[u8]> = None;

        for message in messages(payload) {
            let message = match message {
                Ok(message) => message,
                Err(err) => {
                    warn!(error = %err, "malformed tail, keeping messages applied so far");
                    out.truncated = true;
                    break;
                }
            };
            out.messages += 1;

            match message.tag {
                tag::CLIENT_ID => match self.registry.find_or_create(message.body) {
                    Ok(_) => {
                        current_client = Some(message.body);
                        pending_sensor = None;
                        out.applied += 1;
                    }
                    Err(err) => {
                        warn!(
                            error = %err,
                            client = %hex::encode(message.body),
                            "dropping transmission from unregistered client"
                        );
                        current_client = None;
                        pending_sensor = None;
                        out.dropped += 1;
                    }
                },

                tag::SEQNUM => {
                    let Some(client_id) = current_client else {
                        debug!("sequence number before client identity, dropped");
                        out.dropped += 1;
                        continue;
                    };
                    let observed = match message.as_u32() {
                        Ok(observed) => observed,
                        Err(err) => {
                            warn!(error = %err, "bad sequence number body, dropped");
                            out.dropped += 1;
                            continue;
                        }
                    };
                    let Ok(client) = self.registry.find_or_create(client_id) else {
                        out.dropped += 1;
                        continue;
                    };
                    if let Some(last) = client.last_seqnum() {
                        if observed > last {
                            let lost = observed - last - 1;
                            if lost > 0 {
                                debug!(
                                    client = %hex::encode(client_id),
                                    last,
                                    observed,
                                    lost,
                                    "sequence gap"
                                );
                                client.add_packet_loss(lost);
                            }
                        }
                    }
                    client.set_last_seqnum(observed);
                    client.mark_dirty();
                    out.applied += 1;
                }

                tag::SENSOR_ID => {
                    if current_client.is_none() {
                        debug!("sensor identity before client identity, dropped");
                        out.dropped += 1;
                        continue;
                    }
                    pending_sensor = Some(message.body);
                    out.applied += 1;
                }

                tag::SENSOR_VALUE => {
                    let (Some(client_id), Some(sensor_id)) = (current_client, pending_sensor)
                    else {
                        debug!("sensor value before its context, dropped");
                        out.dropped += 1;
                        continue;
                    };
                    let raw = match message.as_u32() {
                        Ok(raw) => raw,
                        Err(err) => {
                            warn!(error = %err, "bad sensor value body, dropped");
                            out.dropped += 1;
                            continue;
                        }
                    };
                    let Ok(client) = self.registry.find_or_create(client_id) else {
                        out.dropped += 1;
                        continue;
                    };
                    match client.find_or_create_sensor(sensor_id) {
                        Ok(sensor) => {
                            sensor.set_value(raw as i32);
                            sensor.mark_dirty();
                            out.applied += 1;
                        }
                        Err(err) => {
                            warn!(
                                error = %err,
                                client = %hex::encode(client_id),
                                sensor = %hex::encode(sensor_id),
                                "dropping reading"
                            );
                            out.dropped += 1;
                        }
                    }
                }

                other => {
                    debug!(tag = other, body_len = message.body.len(), "skipping unrecognized message");
                    out.dropped += 1;
                }
            }
        }

        out
    }
}
