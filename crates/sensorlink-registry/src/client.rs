//! Per-client state: sequencing, loss accounting, and bounded sensor slots.

use crate::error::{RegistryError, Result};
use crate::id::ByteId;

/// Sensor slots available under each client.
pub const MAX_SENSORS: usize = 5;

/// The latest reading from one sensor, with change tracking.
#[derive(Debug, Clone)]
pub struct SensorValue {
    id: ByteId,
    value: i32,
    dirty: bool,
}

impl SensorValue {
    fn new(id: ByteId) -> Self {
        Self {
            id,
            value: 0,
            dirty: false,
        }
    }

    /// The sensor identity bytes.
    pub fn id(&self) -> &[u8] {
        self.id.as_bytes()
    }

    /// The cached reading.
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Stores a reading. Storage carries no change-detection policy:
    /// callers decide when to [`mark_dirty`](Self::mark_dirty).
    pub fn set_value(&mut self, value: i32) {
        self.value = value;
    }

    /// Whether this reading changed since the sink last flushed it.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flags the reading as changed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Resets the flag after the sink consumed this entry.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

/// State tracked for one transmitting node.
///
/// Sensor slots are claimed on first sight of a new identity and never
/// evicted; once all [`MAX_SENSORS`] slots are taken, readings for unknown
/// sensors are rejected so established history is never displaced.
#[derive(Debug, Clone)]
pub struct Client {
    id: ByteId,
    last_seqnum: Option<u32>,
    packet_loss: u32,
    dirty: bool,
    sensors: Vec<SensorValue>,
}

impl Client {
    pub(crate) fn new(id: ByteId) -> Self {
        Self {
            id,
            last_seqnum: None,
            packet_loss: 0,
            dirty: false,
            sensors: Vec::with_capacity(MAX_SENSORS),
        }
    }

    /// The client identity bytes.
    pub fn id(&self) -> &[u8] {
        self.id.as_bytes()
    }

    /// Sequence number of the most recent transmission, if any was seen.
    pub fn last_seqnum(&self) -> Option<u32> {
        self.last_seqnum
    }

    /// Records the sequence number of the transmission being applied.
    pub fn set_last_seqnum(&mut self, seqnum: u32) {
        self.last_seqnum = Some(seqnum);
    }

    /// Transmissions inferred lost from sequence gaps so far.
    pub fn packet_loss(&self) -> u32 {
        self.packet_loss
    }

    /// Charges `lost` missed transmissions to this client.
    pub fn add_packet_loss(&mut self, lost: u32) {
        self.packet_loss = self.packet_loss.saturating_add(lost);
    }

    /// Whether client-level state changed since the sink last flushed it.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flags client-level state as changed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Resets the flag after the sink consumed this entry.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Byte-exact sensor lookup; claims a free slot on first sight.
    pub fn find_or_create_sensor(&mut self, id: &[u8]) -> Result<&mut SensorValue> {
        let id = ByteId::new(id)?;
        if let Some(pos) = self.sensors.iter().position(|s| s.id == id) {
            return Ok(&mut self.sensors[pos]);
        }
        if self.sensors.len() >= MAX_SENSORS {
            return Err(RegistryError::SensorsFull {
                capacity: MAX_SENSORS,
            });
        }
        let slot = self.sensors.len();
        self.sensors.push(SensorValue::new(id));
        Ok(&mut self.sensors[slot])
    }

    /// Looks up a sensor without claiming a slot.
    pub fn sensor(&self, id: &[u8]) -> Option<&SensorValue> {
        self.sensors.iter().find(|s| s.id == *id)
    }

    /// The claimed sensor slots, in claim order.
    pub fn sensors(&self) -> &[SensorValue] {
        &self.sensors
    }

    /// Mutable slot access for the reporting sink.
    pub fn sensors_mut(&mut self) -> &mut [SensorValue] {
        &mut self.sensors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: &[u8]) -> Client {
        Client::new(ByteId::new(id).unwrap())
    }

    #[test]
    fn new_client_starts_blank() {
        let c = client(b"node-1");
        assert_eq!(c.id(), b"node-1");
        assert_eq!(c.last_seqnum(), None);
        assert_eq!(c.packet_loss(), 0);
        assert!(!c.is_dirty());
        assert!(c.sensors().is_empty());
    }

    #[test]
    fn find_or_create_reuses_the_same_slot() {
        let mut c = client(b"node-1");
        c.find_or_create_sensor(b"temp").unwrap().set_value(21);
        let sensor = c.find_or_create_sensor(b"temp").unwrap();
        assert_eq!(sensor.value(), 21);
        assert_eq!(c.sensors().len(), 1);
    }

    #[test]
    fn sixth_sensor_is_rejected_and_first_five_survive() {
        let mut c = client(b"node-1");
        for i in 0u8..5 {
            c.find_or_create_sensor(&[i]).unwrap().set_value(i32::from(i));
        }

        let err = c.find_or_create_sensor(&[9]).unwrap_err();
        assert!(matches!(err, RegistryError::SensorsFull { capacity: 5 }));

        assert_eq!(c.sensors().len(), 5);
        for i in 0u8..5 {
            assert_eq!(c.sensor(&[i]).unwrap().value(), i32::from(i));
        }
    }

    #[test]
    fn full_table_still_serves_known_sensors() {
        let mut c = client(b"node-1");
        for i in 0u8..5 {
            c.find_or_create_sensor(&[i]).unwrap();
        }
        c.find_or_create_sensor(&[2]).unwrap().set_value(-40);
        assert_eq!(c.sensor(&[2]).unwrap().value(), -40);
    }

    #[test]
    fn set_value_does_not_flip_the_dirty_flag() {
        let mut c = client(b"node-1");
        let sensor = c.find_or_create_sensor(b"temp").unwrap();
        sensor.set_value(7);
        assert!(!sensor.is_dirty());

        sensor.mark_dirty();
        assert!(sensor.is_dirty());
        sensor.clear_dirty();
        assert!(!sensor.is_dirty());
    }

    #[test]
    fn packet_loss_accumulates_and_saturates() {
        let mut c = client(b"node-1");
        c.add_packet_loss(3);
        c.add_packet_loss(4);
        assert_eq!(c.packet_loss(), 7);

        c.add_packet_loss(u32::MAX);
        assert_eq!(c.packet_loss(), u32::MAX);
    }

    #[test]
    fn client_dirty_flag_round_trips() {
        let mut c = client(b"node-1");
        c.set_last_seqnum(10);
        assert!(!c.is_dirty());

        c.mark_dirty();
        assert!(c.is_dirty());
        c.clear_dirty();
        assert!(!c.is_dirty());
        assert_eq!(c.last_seqnum(), Some(10));
    }
}
