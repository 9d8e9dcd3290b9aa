//! A framed link paired with an ingestor.

use std::io::Read;

use sensorlink_frame::FrameReader;
use sensorlink_registry::ClientRegistry;
use sensorlink_transport::LinkStream;

use crate::error::Result;
use crate::ingest::{Applied, Ingestor};

/// One hub-side ingest session: frames in, registry updates out.
///
/// The session owns a [`FrameReader`] over any byte link and an
/// [`Ingestor`]. Each call to [`next_frame`](Self::next_frame) blocks for
/// the next intact frame (corrupt frames are counted and skipped inside
/// the reader) and applies its payload.
#[derive(Debug)]
pub struct HubSession<T> {
    reader: FrameReader<T>,
    ingestor: Ingestor,
}

impl HubSession<LinkStream> {
    /// Opens a serial device and ingests from it.
    #[cfg(unix)]
    pub fn open_serial(path: impl AsRef<std::path::Path>, baud: u32) -> Result<Self> {
        let link = sensorlink_transport::open_serial(path, baud)?;
        Ok(Self::new(link))
    }
}

impl<T: Read> HubSession<T> {
    /// A session over an already-open link, with a default registry.
    pub fn new(link: T) -> Self {
        Self::with_ingestor(link, Ingestor::new())
    }

    /// A session over an already-open link and a caller-built ingestor.
    pub fn with_ingestor(link: T, ingestor: Ingestor) -> Self {
        Self {
            reader: FrameReader::new(link),
            ingestor,
        }
    }

    /// Reads the next intact frame and applies its payload.
    pub fn next_frame(&mut self) -> Result<Applied> {
        let payload = self.reader.read_frame()?;
        Ok(self.ingestor.apply(&payload))
    }

    /// The session's ingestor.
    pub fn ingestor(&self) -> &Ingestor {
        &self.ingestor
    }

    /// Mutable ingestor access.
    pub fn ingestor_mut(&mut self) -> &mut Ingestor {
        &mut self.ingestor
    }

    /// The accumulated per-client state.
    pub fn registry(&self) -> &ClientRegistry {
        self.ingestor.registry()
    }

    /// Mutable registry access for the reporting sink.
    pub fn registry_mut(&mut self) -> &mut ClientRegistry {
        self.ingestor.registry_mut()
    }

    /// Frames decoded intact on this link so far.
    pub fn frames_decoded(&self) -> u64 {
        self.reader.frames_decoded()
    }

    /// Frames rejected on this link so far.
    pub fn frames_rejected(&self) -> u64 {
        self.reader.frames_rejected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HubError;

    use bytes::BytesMut;
    use sensorlink_frame::{encode_frame, FrameError};
    use sensorlink_message::{tag, MessageBuilder};

    fn framed_transmission(client: &[u8], seq: u32, readings: &[(&[u8], u32)]) -> BytesMut {
        let mut builder = MessageBuilder::new();
        builder.append(tag::CLIENT_ID, client).unwrap();
        builder.append_u32(tag::SEQNUM, seq).unwrap();
        for (sensor, value) in readings {
            builder.append(tag::SENSOR_ID, sensor).unwrap();
            builder.append_u32(tag::SENSOR_VALUE, *value).unwrap();
        }
        let mut wire = BytesMut::new();
        encode_frame(builder.as_bytes(), &mut wire).unwrap();
        wire
    }

    #[test]
    fn frames_flow_end_to_end_into_the_registry() {
        let mut wire = framed_transmission(b"node-1", 1, &[(b"temp", 21)]);
        wire.extend_from_slice(&framed_transmission(b"node-1", 2, &[(b"temp", 22)]));

        let mut session = HubSession::new(std::io::Cursor::new(wire.to_vec()));

        let first = session.next_frame().unwrap();
        assert_eq!(first.applied, 4);
        let second = session.next_frame().unwrap();
        assert_eq!(second.applied, 4);

        let client = session.registry().get(b"node-1").unwrap();
        assert_eq!(client.last_seqnum(), Some(2));
        assert_eq!(client.packet_loss(), 0);
        assert_eq!(client.sensor(b"temp").unwrap().value(), 22);
        assert_eq!(session.frames_decoded(), 2);
    }

    #[test]
    fn corrupt_frame_is_skipped_and_counted() {
        let mut wire = framed_transmission(b"node-1", 1, &[]);
        let last = wire.len() - 1;
        wire[last] ^= 0xFF; // break the checksum
        wire.extend_from_slice(&framed_transmission(b"node-1", 2, &[]));

        let mut session = HubSession::new(std::io::Cursor::new(wire.to_vec()));

        let applied = session.next_frame().unwrap();
        assert_eq!(applied.applied, 2);
        assert_eq!(session.frames_rejected(), 1);
        assert_eq!(session.frames_decoded(), 1);
        assert_eq!(
            session.registry().get(b"node-1").unwrap().last_seqnum(),
            Some(2)
        );
    }

    #[test]
    fn closed_link_surfaces_as_a_frame_error() {
        let wire = framed_transmission(b"node-1", 1, &[]);
        let mut session = HubSession::new(std::io::Cursor::new(wire.to_vec()));

        session.next_frame().unwrap();
        let err = session.next_frame().unwrap_err();
        assert!(matches!(err, HubError::Frame(FrameError::LinkClosed)));
    }

    #[cfg(unix)]
    #[test]
    fn missing_device_surfaces_as_a_link_error() {
        let err = HubSession::open_serial("/dev/sensorlink-does-not-exist", 9600).unwrap_err();
        assert!(matches!(err, HubError::Link(_)));
    }

    #[test]
    fn caller_configured_registry_is_honored() {
        let registry = sensorlink_registry::ClientRegistry::with_capacity(1);
        let mut wire = framed_transmission(b"node-1", 1, &[]);
        wire.extend_from_slice(&framed_transmission(b"node-2", 1, &[]));

        let mut session = HubSession::with_ingestor(
            std::io::Cursor::new(wire.to_vec()),
            Ingestor::with_registry(registry),
        );

        session.next_frame().unwrap();
        let second = session.next_frame().unwrap();
        assert_eq!(second.dropped, 2);
        assert_eq!(session.registry().len(), 1);
    }
}
