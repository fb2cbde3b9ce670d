//! Fan-out over a set of peer connections.
//!
//! Each send is independent: a closed or failing peer is logged and
//! skipped, and never holds up the others. There is no batching and no
//! backpressure.

use super::transport::PeerConnection;
use crate::core::{PlayerId, TransportError};
use crate::protocol::Message;

/// Outcome of one broadcast.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    /// Peers that were closed or rejected the frame.
    pub skipped: Vec<PlayerId>,
}

/// Connections held by a session, in the order they were added.
#[derive(Default)]
pub struct Fanout {
    connections: Vec<Box<dyn PeerConnection>>,
}

impl Fanout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection, replacing any previous one to the same peer.
    pub fn add(&mut self, connection: Box<dyn PeerConnection>) {
        let peer = connection.peer_id().clone();
        if let Some(pos) = self.position(&peer) {
            tracing::debug!("[net] Replacing connection to {}", peer);
            self.connections[pos] = connection;
        } else {
            self.connections.push(connection);
        }
    }

    /// Detach a connection without closing it.
    pub fn remove(&mut self, peer: &PlayerId) -> Option<Box<dyn PeerConnection>> {
        let pos = self.position(peer)?;
        Some(self.connections.remove(pos))
    }

    #[must_use]
    pub fn contains(&self, peer: &PlayerId) -> bool {
        self.position(peer).is_some()
    }

    pub fn peer_ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.connections.iter().map(|c| c.peer_id())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Send to a single peer.
    pub fn send_to(&mut self, peer: &PlayerId, message: &Message) -> Result<(), TransportError> {
        let pos = self
            .position(peer)
            .ok_or_else(|| TransportError::Unreachable(peer.to_string()))?;
        let connection = &mut self.connections[pos];
        if !connection.is_open() {
            return Err(TransportError::Closed(peer.to_string()));
        }
        tracing::debug!("[net] -> {}: {}", peer, message.kind());
        connection.send(message)
    }

    /// Send to every open connection.
    pub fn broadcast(&mut self, message: &Message) -> BroadcastReport {
        self.fan_out(message, None)
    }

    /// Send to every open connection except `excluded`.
    pub fn broadcast_except(&mut self, message: &Message, excluded: &PlayerId) -> BroadcastReport {
        self.fan_out(message, Some(excluded))
    }

    /// Close every connection and forget them.
    pub fn close_all(&mut self) {
        for connection in &mut self.connections {
            connection.close();
        }
        self.connections.clear();
    }

    fn position(&self, peer: &PlayerId) -> Option<usize> {
        self.connections.iter().position(|c| c.peer_id() == peer)
    }

    fn fan_out(&mut self, message: &Message, excluded: Option<&PlayerId>) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        for connection in &mut self.connections {
            let peer = connection.peer_id().clone();
            if excluded == Some(&peer) {
                continue;
            }
            if !connection.is_open() {
                tracing::warn!("[net] Skipping closed connection to {} for {}", peer, message.kind());
                report.skipped.push(peer);
                continue;
            }
            match connection.send(message) {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    tracing::warn!("[net] Dropped {} to {}: {}", message.kind(), peer, err);
                    report.skipped.push(peer);
                }
            }
        }

        tracing::debug!(
            "[net] Broadcast {} to {} peer(s), {} skipped",
            message.kind(),
            report.delivered,
            report.skipped.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Connection that records what it was asked to send.
    struct Recorder {
        peer: PlayerId,
        open: bool,
        fail: bool,
        sent: Rc<RefCell<Vec<Message>>>,
    }

    impl Recorder {
        fn boxed(peer: &str, open: bool, fail: bool) -> (Box<dyn PeerConnection>, Rc<RefCell<Vec<Message>>>) {
            let sent = Rc::new(RefCell::new(Vec::new()));
            let conn = Recorder { peer: PlayerId::new(peer), open, fail, sent: sent.clone() };
            (Box::new(conn), sent)
        }
    }

    impl PeerConnection for Recorder {
        fn peer_id(&self) -> &PlayerId {
            &self.peer
        }

        fn send(&mut self, message: &Message) -> Result<(), TransportError> {
            if self.fail {
                return Err(TransportError::Unreachable(self.peer.to_string()));
            }
            self.sent.borrow_mut().push(message.clone());
            Ok(())
        }

        fn is_open(&self) -> bool {
            self.open
        }

        fn close(&mut self) {
            self.open = false;
        }
    }

    fn turn_update() -> Message {
        Message::TurnUpdate { current_turn: PlayerId::new("a") }
    }

    #[test]
    fn test_broadcast_skips_closed_and_failing() {
        let mut fanout = Fanout::new();
        let (a, a_sent) = Recorder::boxed("a", true, false);
        let (b, b_sent) = Recorder::boxed("b", false, false);
        let (c, c_sent) = Recorder::boxed("c", true, true);
        let (d, d_sent) = Recorder::boxed("d", true, false);
        fanout.add(a);
        fanout.add(b);
        fanout.add(c);
        fanout.add(d);

        let report = fanout.broadcast(&turn_update());

        assert_eq!(report.delivered, 2);
        assert_eq!(report.skipped, vec![PlayerId::new("b"), PlayerId::new("c")]);
        assert_eq!(a_sent.borrow().len(), 1);
        assert!(b_sent.borrow().is_empty());
        assert!(c_sent.borrow().is_empty());
        assert_eq!(d_sent.borrow().len(), 1);
    }

    #[test]
    fn test_broadcast_except() {
        let mut fanout = Fanout::new();
        let (a, a_sent) = Recorder::boxed("a", true, false);
        let (b, b_sent) = Recorder::boxed("b", true, false);
        fanout.add(a);
        fanout.add(b);

        let report = fanout.broadcast_except(&turn_update(), &PlayerId::new("a"));

        assert_eq!(report.delivered, 1);
        assert!(a_sent.borrow().is_empty());
        assert_eq!(b_sent.borrow().len(), 1);
    }

    #[test]
    fn test_send_to_missing_peer() {
        let mut fanout = Fanout::new();
        let err = fanout.send_to(&PlayerId::new("nobody"), &turn_update()).unwrap_err();
        assert!(matches!(err, TransportError::Unreachable(_)));
    }

    #[test]
    fn test_add_replaces_same_peer() {
        let mut fanout = Fanout::new();
        let (first, first_sent) = Recorder::boxed("a", true, false);
        let (second, second_sent) = Recorder::boxed("a", true, false);
        fanout.add(first);
        fanout.add(second);

        assert_eq!(fanout.len(), 1);
        fanout.send_to(&PlayerId::new("a"), &turn_update()).unwrap();
        assert!(first_sent.borrow().is_empty());
        assert_eq!(second_sent.borrow().len(), 1);
    }

    #[test]
    fn test_remove_and_close_all() {
        let mut fanout = Fanout::new();
        let (a, _) = Recorder::boxed("a", true, false);
        let (b, _) = Recorder::boxed("b", true, false);
        fanout.add(a);
        fanout.add(b);

        assert!(fanout.remove(&PlayerId::new("a")).is_some());
        assert!(!fanout.contains(&PlayerId::new("a")));
        assert_eq!(fanout.peer_ids().count(), 1);

        fanout.close_all();
        assert!(fanout.is_empty());
    }
}
