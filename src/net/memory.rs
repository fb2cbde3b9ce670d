//! In-memory transport.
//!
//! Stands in for the external peer-to-peer library in tests and local
//! play. Every endpoint registers a mailbox on a shared `MemoryNetwork`;
//! connections carry encoded JSON frames into the remote mailbox, and the
//! owner drains its mailbox with `poll`. Frames on a link can be dropped
//! on purpose to reproduce lost updates.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};

use rustc_hash::FxHashMap;

use super::game_code::GameCode;
use super::transport::{ConnectionEvent, Connector, PeerConnection};
use crate::core::{PlayerId, TransportError};
use crate::protocol::{self, Message};

enum Delivery {
    Incoming(MemoryConnection),
    Open(PlayerId),
    Frame(PlayerId, String),
    Close(PlayerId),
}

#[derive(Default)]
struct Registry {
    mailboxes: FxHashMap<PlayerId, Sender<Delivery>>,
    /// Frames still to be dropped per (from, to) link.
    drops: FxHashMap<(PlayerId, PlayerId), usize>,
}

/// Shared hub all endpoints of one simulated network attach to.
#[derive(Clone, Default)]
pub struct MemoryNetwork {
    registry: Rc<RefCell<Registry>>,
}

impl MemoryNetwork {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer under `id`. A host registers under its game code.
    ///
    /// Re-registering an id replaces the previous mailbox.
    pub fn register(&self, id: impl Into<PlayerId>) -> MemoryEndpoint {
        let id = id.into();
        let (tx, rx) = mpsc::channel();
        self.registry.borrow_mut().mailboxes.insert(id.clone(), tx);
        tracing::debug!("[net] Registered memory endpoint {}", id);
        MemoryEndpoint {
            id,
            inbox: rx,
            network: self.clone(),
        }
    }

    /// Silently lose the next `count` frames sent from `from` to `to`.
    pub fn drop_next(&self, from: &PlayerId, to: &PlayerId, count: usize) {
        self.registry
            .borrow_mut()
            .drops
            .insert((from.clone(), to.clone()), count);
    }

    #[must_use]
    pub fn is_registered(&self, id: &PlayerId) -> bool {
        self.registry.borrow().mailboxes.contains_key(id)
    }

    fn deliver(&self, to: &PlayerId, delivery: Delivery) -> bool {
        let registry = self.registry.borrow();
        match registry.mailboxes.get(to) {
            Some(tx) => tx.send(delivery).is_ok(),
            None => false,
        }
    }

    fn take_drop(&self, from: &PlayerId, to: &PlayerId) -> bool {
        let mut registry = self.registry.borrow_mut();
        let key = (from.clone(), to.clone());
        match registry.drops.get_mut(&key) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                if *remaining == 0 {
                    registry.drops.remove(&key);
                }
                true
            }
            _ => false,
        }
    }

    fn unregister(&self, id: &PlayerId) {
        self.registry.borrow_mut().mailboxes.remove(id);
    }
}

/// What an endpoint finds in its mailbox.
pub enum MemoryEvent {
    /// A remote peer opened a connection to this endpoint.
    Incoming(MemoryConnection),
    Peer { from: PlayerId, event: ConnectionEvent },
}

/// One peer's attachment to the network.
pub struct MemoryEndpoint {
    id: PlayerId,
    inbox: Receiver<Delivery>,
    network: MemoryNetwork,
}

impl MemoryEndpoint {
    #[must_use]
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    /// Drain everything delivered so far, in arrival order.
    ///
    /// Frames that fail to decode surface as `ConnectionEvent::Error`.
    pub fn poll(&mut self) -> Vec<MemoryEvent> {
        self.inbox
            .try_iter()
            .map(|delivery| match delivery {
                Delivery::Incoming(conn) => MemoryEvent::Incoming(conn),
                Delivery::Open(from) => MemoryEvent::Peer { from, event: ConnectionEvent::Open },
                Delivery::Close(from) => MemoryEvent::Peer { from, event: ConnectionEvent::Close },
                Delivery::Frame(from, frame) => {
                    let event = match protocol::decode(&frame) {
                        Ok(message) => ConnectionEvent::Data(message),
                        Err(err) => ConnectionEvent::Error(err.to_string()),
                    };
                    MemoryEvent::Peer { from, event }
                }
            })
            .collect()
    }
}

impl Connector for MemoryEndpoint {
    type Connection = MemoryConnection;

    fn connect(&mut self, code: &GameCode) -> Result<MemoryConnection, TransportError> {
        let host = code.peer_id();
        if !self.network.is_registered(&host) {
            return Err(TransportError::Unreachable(host.to_string()));
        }

        let link = Rc::new(Cell::new(true));
        let host_side = MemoryConnection {
            local: host.clone(),
            remote: self.id.clone(),
            link: link.clone(),
            network: self.network.clone(),
        };
        let client_side = MemoryConnection {
            local: self.id.clone(),
            remote: host.clone(),
            link,
            network: self.network.clone(),
        };

        self.network.deliver(&host, Delivery::Incoming(host_side));
        self.network.deliver(&host, Delivery::Open(self.id.clone()));
        self.network.deliver(&self.id, Delivery::Open(host.clone()));
        tracing::info!("[net] {} connected to {}", self.id, host);

        Ok(client_side)
    }
}

impl Drop for MemoryEndpoint {
    fn drop(&mut self) {
        self.network.unregister(&self.id);
    }
}

/// One end of an in-memory link.
pub struct MemoryConnection {
    local: PlayerId,
    remote: PlayerId,
    /// Shared by both ends; false once either side closes.
    link: Rc<Cell<bool>>,
    network: MemoryNetwork,
}

impl PeerConnection for MemoryConnection {
    fn peer_id(&self) -> &PlayerId {
        &self.remote
    }

    fn send(&mut self, message: &Message) -> Result<(), TransportError> {
        if !self.link.get() {
            return Err(TransportError::Closed(self.remote.to_string()));
        }
        let frame = protocol::encode(message)?;
        if self.network.take_drop(&self.local, &self.remote) {
            tracing::debug!("[net] Lost {} from {} to {}", message.kind(), self.local, self.remote);
            return Ok(());
        }
        if self.network.deliver(&self.remote, Delivery::Frame(self.local.clone(), frame)) {
            Ok(())
        } else {
            Err(TransportError::Unreachable(self.remote.to_string()))
        }
    }

    fn is_open(&self) -> bool {
        self.link.get()
    }

    fn close(&mut self) {
        if self.link.replace(false) {
            self.network.deliver(&self.remote, Delivery::Close(self.local.clone()));
            self.network.deliver(&self.local, Delivery::Close(self.remote.clone()));
        }
    }
}
