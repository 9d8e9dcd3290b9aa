//! The bounded client table and its reporting views.

use crate::client::Client;
use crate::error::{RegistryError, Result};
use crate::id::ByteId;

/// Client slots in a registry built with [`ClientRegistry::new`].
pub const DEFAULT_CAPACITY: usize = 5;

/// Per-client row handed to reporting sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientReport<'a> {
    /// The client identity bytes.
    pub client_id: &'a [u8],
    /// Sequence number of the most recent transmission, if any.
    pub last_seqnum: Option<u32>,
    /// Transmissions inferred lost so far.
    pub packet_loss: u32,
    /// Whether client-level state changed since the last flush.
    pub dirty: bool,
}

impl<'a> From<&'a Client> for ClientReport<'a> {
    fn from(client: &'a Client) -> Self {
        Self {
            client_id: client.id(),
            last_seqnum: client.last_seqnum(),
            packet_loss: client.packet_loss(),
            dirty: client.is_dirty(),
        }
    }
}

/// One sensor reading handed to reporting sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading<'a> {
    /// The owning client's identity bytes.
    pub client_id: &'a [u8],
    /// The sensor identity bytes.
    pub sensor_id: &'a [u8],
    /// The cached reading.
    pub value: i32,
    /// Whether the reading changed since the last flush.
    pub dirty: bool,
}

/// Bounded, identity-keyed store of per-node state.
///
/// Slots are claimed on first sight of a new identity and never evicted or
/// reused for another identity. Once every slot is claimed, updates for
/// unknown identities are rejected; callers drop the update rather than
/// displace established sequencing and loss history.
#[derive(Debug)]
pub struct ClientRegistry {
    clients: Vec<Client>,
    capacity: usize,
}

impl ClientRegistry {
    /// A registry bounded to [`DEFAULT_CAPACITY`] clients.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A registry bounded to `capacity` clients.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            clients: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Byte-exact client lookup; claims a free slot on first sight.
    pub fn find_or_create(&mut self, id: &[u8]) -> Result<&mut Client> {
        let id = ByteId::new(id)?;
        if let Some(pos) = self
            .clients
            .iter()
            .position(|c| c.id() == id.as_bytes())
        {
            return Ok(&mut self.clients[pos]);
        }
        if self.clients.len() >= self.capacity {
            return Err(RegistryError::ClientsFull {
                capacity: self.capacity,
            });
        }
        let slot = self.clients.len();
        self.clients.push(Client::new(id));
        Ok(&mut self.clients[slot])
    }

    /// Looks up a client without claiming a slot.
    pub fn get(&self, id: &[u8]) -> Option<&Client> {
        self.clients.iter().find(|c| c.id() == id)
    }

    /// The claimed client slots, in claim order.
    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    /// Mutable slot access for the reporting sink.
    pub fn clients_mut(&mut self) -> &mut [Client] {
        &mut self.clients
    }

    /// The fixed client bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Claimed client slots so far.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether no client has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Per-client rows for reporting sinks, in claim order.
    pub fn client_reports(&self) -> impl Iterator<Item = ClientReport<'_>> {
        self.clients.iter().map(ClientReport::from)
    }

    /// Every cached reading for reporting sinks, grouped by client.
    pub fn readings(&self) -> impl Iterator<Item = Reading<'_>> {
        self.clients.iter().flat_map(|client| {
            client.sensors().iter().map(move |sensor| Reading {
                client_id: client.id(),
                sensor_id: sensor.id(),
                value: sensor.value(),
                dirty: sensor.is_dirty(),
            })
        })
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}
