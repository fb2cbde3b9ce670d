//! Shared harness: one host and any number of clients on a `MemoryNetwork`.

#![allow(dead_code)]

use peer_cards::{
    Card, CardId, CardKind, ClientSession, DeckAuthority, Deck, GameCode, GameRng, HostSession,
    MemoryEndpoint, MemoryEvent, MemoryNetwork, PlayerId, SessionConfig,
};

pub const CODE: &str = "123";

pub struct Table {
    pub network: MemoryNetwork,
    pub host: HostSession,
    host_endpoint: MemoryEndpoint,
    pub clients: Vec<(ClientSession, MemoryEndpoint)>,
}

impl Table {
    pub fn new(config: SessionConfig) -> Self {
        let authority = DeckAuthority::new(&config);
        Self::with_authority(config, authority)
    }

    pub fn with_authority(config: SessionConfig, authority: DeckAuthority) -> Self {
        init_tracing();
        let network = MemoryNetwork::new();
        let code = GameCode::parse(CODE).unwrap();
        let host_endpoint = network.register(code.peer_id());
        let host = HostSession::with_authority(code, "Hana", "#ff8800", config, authority);
        Self {
            network,
            host,
            host_endpoint,
            clients: Vec::new(),
        }
    }

    pub fn host_id(&self) -> PlayerId {
        PlayerId::new(CODE)
    }

    /// Register and connect a client, then settle the handshake.
    pub fn join(&mut self, peer: &str, name: &str) -> PlayerId {
        self.join_with(peer, name, SessionConfig::default())
    }

    pub fn join_with(&mut self, peer: &str, name: &str, config: SessionConfig) -> PlayerId {
        let id = PlayerId::new(peer);
        let mut endpoint = self.network.register(id.clone());
        let mut client = ClientSession::new(id.clone(), name, "#0088ff").with_config(config);
        client
            .join(&mut endpoint, &GameCode::parse(CODE).unwrap())
            .unwrap();
        self.clients.push((client, endpoint));
        self.pump();
        id
    }

    pub fn client(&self, id: &PlayerId) -> &ClientSession {
        &self.clients.iter().find(|(c, _)| c.identity() == id).unwrap().0
    }

    pub fn client_mut(&mut self, id: &PlayerId) -> &mut ClientSession {
        &mut self.clients.iter_mut().find(|(c, _)| c.identity() == id).unwrap().0
    }

    /// Close a client's connection and drop it from the table.
    pub fn leave(&mut self, id: &PlayerId) {
        let pos = self.clients.iter().position(|(c, _)| c.identity() == id).unwrap();
        let (mut client, _endpoint) = self.clients.remove(pos);
        client.shutdown();
        self.pump();
    }

    /// Deliver every pending event until the network is quiet.
    pub fn pump(&mut self) {
        loop {
            let mut delivered = 0;

            for event in self.host_endpoint.poll() {
                delivered += 1;
                match event {
                    MemoryEvent::Incoming(connection) => {
                        self.host.add_connection(Box::new(connection))
                    }
                    MemoryEvent::Peer { from, event } => self.host.handle_event(&from, event),
                }
            }

            for (client, endpoint) in &mut self.clients {
                for event in endpoint.poll() {
                    delivered += 1;
                    if let MemoryEvent::Peer { event, .. } = event {
                        client.handle_event(event);
                    }
                }
            }

            if delivered == 0 {
                break;
            }
        }
    }
}

/// Route session logs to the test output. Set `RUST_LOG=debug` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn main_card(id: &str, value: u32) -> Card {
    Card::new(id, CardKind::Main, format!("images/main_cards/card_{value}.png"), value, format!("Card {value}"))
}

/// An authority holding exactly `count` main cards and no special cards.
pub fn small_authority(count: u32) -> DeckAuthority {
    let main: Deck = (0..count).map(|i| main_card(&format!("main-1-{i}"), 1)).collect();
    DeckAuthority::with_decks(main, Deck::empty(), GameRng::new(7))
}

pub fn first_card(hand: &[Card]) -> CardId {
    hand[0].id.clone()
}

pub fn config() -> SessionConfig {
    SessionConfig::default().with_seed(42)
}
