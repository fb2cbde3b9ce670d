//! Client session.
//!
//! A client holds one connection, to the host. Everything it knows about
//! the game is replicated: hand, special area and turn order are replaced
//! wholesale by host updates, and opponents' hand sizes and played cards
//! are whatever the last announcement said.
//!
//! The client never moves the turn. Its actions are sent to the host, and
//! it stays in `MyTurn` until the host's `turn_update` arrives.

use super::notice::{Notice, Notices};
use super::outcome::{check_for_winner, Victory};
use super::seat::Seat;
use super::turn::{TurnOrder, TurnPhase};
use crate::cards::{Card, CardId};
use crate::core::{
    ConnectedPlayer, GameError, PlayerId, PlayerRoster, SessionConfig, TransportError,
};
use crate::net::{ConnectionEvent, Connector, GameCode, PeerConnection};
use crate::protocol::{Message, PROTOCOL_VERSION};

pub struct ClientSession {
    seat: Seat,
    config: SessionConfig,
    host: Option<Box<dyn PeerConnection>>,
    host_name: Option<String>,
    /// Whether `player_info` went out on the current connection.
    introduced: bool,
    started: bool,
    turn: TurnOrder,
    opponents: PlayerRoster,
    notices: Notices,
}

impl ClientSession {
    #[must_use]
    pub fn new(identity: PlayerId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            seat: Seat::new(identity, name, color),
            config: SessionConfig::default(),
            host: None,
            host_name: None,
            introduced: false,
            started: false,
            turn: TurnOrder::default(),
            opponents: PlayerRoster::new(),
            notices: Notices::default(),
        }
    }

    /// Use `config` for local settings such as the take-card policy.
    #[must_use]
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn identity(&self) -> &PlayerId {
        &self.seat.identity
    }

    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        self.host_name.as_deref()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.host.as_ref().is_some_and(|host| host.is_open())
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        TurnPhase::of(self.started, &self.turn, &self.seat.identity)
    }

    #[must_use]
    pub fn turn_order(&self) -> &TurnOrder {
        &self.turn
    }

    #[must_use]
    pub fn current_turn(&self) -> Option<&PlayerId> {
        self.turn.current()
    }

    #[must_use]
    pub fn opponents(&self) -> &PlayerRoster {
        &self.opponents
    }

    #[must_use]
    pub fn seat(&self) -> &Seat {
        &self.seat
    }

    #[must_use]
    pub fn hand(&self) -> &[Card] {
        self.seat.hand()
    }

    #[must_use]
    pub fn played_cards(&self) -> &[Card] {
        self.seat.played_cards()
    }

    #[must_use]
    pub fn special_cards(&self) -> &[Card] {
        self.seat.special_cards()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    // === Connection ===

    /// Open a connection to the host behind `code`.
    pub fn join<C: Connector>(
        &mut self,
        connector: &mut C,
        code: &GameCode,
    ) -> Result<(), TransportError> {
        match connector.connect(code) {
            Ok(connection) => {
                tracing::info!("[client] Joining game {}", code);
                self.connect(Box::new(connection));
                Ok(())
            }
            Err(err) => {
                tracing::warn!("[client] Failed to join {}: {}", code, err);
                self.notices.error(format!("Failed to join game: {err}"));
                Err(err)
            }
        }
    }

    /// Attach the connection to the host. `player_info` goes out once it
    /// opens, or right away if it already is.
    pub fn connect(&mut self, connection: Box<dyn PeerConnection>) {
        let already_open = connection.is_open();
        self.host = Some(connection);
        self.introduced = false;
        if already_open {
            self.introduce();
        }
    }

    /// Feed one event from the host connection into the session.
    pub fn handle_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Open => {
                tracing::info!("[client] Connected to host");
                self.introduce();
            }
            ConnectionEvent::Data(message) => self.handle_message(message),
            ConnectionEvent::Close => {
                tracing::info!("[client] Host connection closed");
                self.host = None;
                self.notices.warning("Disconnected from host");
            }
            ConnectionEvent::Error(err) => {
                tracing::warn!("[client] Connection error: {}", err);
                self.notices.error(format!("Network error: {err}"));
            }
        }
    }

    /// Apply one message from the host.
    pub fn handle_message(&mut self, message: Message) {
        tracing::debug!("[client] <- {}", message.kind());

        match message {
            Message::Welcome { host_name, protocol_version } => {
                if protocol_version != PROTOCOL_VERSION {
                    tracing::warn!(
                        "[client] Host speaks protocol {}, expected {}",
                        protocol_version,
                        PROTOCOL_VERSION
                    );
                }
                self.notices.success(format!("Connected to {host_name}'s game!"));
                self.host_name = Some(host_name);
            }
            Message::GameStart { player_cards, special_cards, turn_order, current_turn } => {
                self.seat.replace_hand(player_cards);
                self.seat.replace_special(special_cards);
                self.replace_turn_order(turn_order, current_turn);
                self.started = true;
                tracing::info!("[client] Game started, {} card(s) in hand", self.seat.hand().len());
                self.notices.success("Game started!");
                self.announce_turn();
            }
            Message::HandUpdate { cards } => self.seat.replace_hand(cards),
            Message::SpecialCardsUpdate { cards } => self.seat.replace_special(cards),
            Message::TurnOrderUpdate { turn_order, current_turn } => {
                self.replace_turn_order(turn_order, current_turn);
                self.started = true;
            }
            Message::TurnUpdate { current_turn } => {
                self.turn.set_current(current_turn);
                self.announce_turn();
            }
            Message::CardPlayed { player_id, hand_size, played_cards, .. } => {
                let player = self.opponent_mut(&player_id);
                player.hand_size = hand_size;
                player.played_cards = played_cards;
                let text = format!("{} played a card", self.display_name(&player_id));
                self.notices.info(text);
            }
            Message::CardDrawn { player_id, hand_size } => {
                self.opponent_mut(&player_id).hand_size = hand_size;
                let text = format!("{} drew a card", self.display_name(&player_id));
                self.notices.info(text);
            }
            Message::CardDiscarded { player_id, card_id } => {
                self.opponent_mut(&player_id)
                    .played_cards
                    .retain(|c| c.id != card_id);
                let text = format!("{} discarded a card", self.display_name(&player_id));
                self.notices.info(text);
            }
            Message::CardTaken { player_id, target_player_id } => {
                let text = format!(
                    "{} took a card from {}",
                    self.display_name(&player_id),
                    self.display_name(&target_player_id)
                );
                self.notices.info(text);
            }
            Message::TakeCardRequest { target_player_id, card_id, requester_id } => {
                if &target_player_id == self.identity() {
                    self.surrender(&requester_id, &card_id);
                }
            }
            Message::CardReceived { card, recipient_id } => {
                if recipient_id.as_ref().map_or(true, |r| r == self.identity()) {
                    self.notices.success(format!("You took {}!", card.name));
                    self.seat.receive(card);
                }
            }
            Message::CardDealt { card } => {
                self.seat.add_to_hand(card);
                self.notices.success("Card drawn!");
            }
            Message::PlayerInfo { .. } | Message::DrawRequest { .. } => {
                tracing::debug!("[client] Ignoring {} from host", message.kind());
            }
        }
    }

    // === Local actions ===

    /// Clients cannot start a game; the start button is host-only.
    pub fn start_game(&mut self) -> Result<(), GameError> {
        Err(self.reject(GameError::HostOnly("start the game")))
    }

    /// Play a card from hand. The host passes the turn on receipt.
    pub fn play_card(&mut self, card_id: &CardId) -> Result<Card, GameError> {
        self.ensure_can_act()?;

        let card = self.seat.play(card_id).map_err(|err| self.reject(err))?;
        let played = Message::CardPlayed {
            player_id: self.identity().clone(),
            card_id: card.id.clone(),
            hand_size: self.seat.hand().len(),
            played_cards: self.seat.played_cards().to_vec(),
        };
        self.send(&played);
        self.notices.success("Card played!");
        Ok(card)
    }

    /// Discard a played card.
    pub fn discard_card(&mut self, card_id: &CardId) -> Result<Card, GameError> {
        self.ensure_can_act()?;

        let card = self.seat.discard(card_id).map_err(|err| self.reject(err))?;
        let discarded = Message::CardDiscarded {
            player_id: self.identity().clone(),
            card_id: card.id.clone(),
        };
        self.send(&discarded);
        self.notices.success("Card discarded!");
        Ok(card)
    }

    /// Ask `target` for one of their played cards.
    pub fn take_card(&mut self, target: &PlayerId, card_id: CardId) -> Result<(), GameError> {
        self.ensure_can_act()?;

        if !self.turn.iter().any(|id| id != self.identity()) {
            return Err(self.reject(GameError::NoOpponents));
        }
        if target == self.identity() || !self.turn.contains(target) {
            return Err(self.reject(GameError::UnknownPlayer(target.clone())));
        }

        let request = Message::TakeCardRequest {
            target_player_id: target.clone(),
            card_id,
            requester_id: self.identity().clone(),
        };
        self.send(&request);
        Ok(())
    }

    /// Ask the host to deal one main card. It arrives as `card_dealt`.
    pub fn request_draw(&mut self) -> Result<(), GameError> {
        self.ensure_can_act()?;
        let request = Message::DrawRequest { player_id: self.identity().clone() };
        self.send(&request);
        Ok(())
    }

    /// Poll the win condition against the local view.
    pub fn check_for_winner(&mut self) -> Option<Victory> {
        let victory =
            check_for_winner(&self.seat, &self.opponents, self.config.win_played_cards)?;
        if &victory.winner == self.identity() {
            self.notices.success(format!(
                "You won! You collected {} cards!",
                victory.played_cards
            ));
        } else {
            self.notices
                .info(format!("{} won with {} cards!", victory.name, victory.played_cards));
        }
        Some(victory)
    }

    /// Close the host connection and forget the game.
    pub fn shutdown(&mut self) {
        if let Some(mut host) = self.host.take() {
            host.close();
        }
        self.started = false;
        self.turn = TurnOrder::default();
        self.opponents = PlayerRoster::new();
        self.seat.clear();
    }

    // === Internals ===

    fn introduce(&mut self) {
        if self.introduced {
            return;
        }
        self.introduced = true;
        let info = Message::PlayerInfo {
            name: self.seat.name.clone(),
            color: self.seat.color.clone(),
        };
        self.send(&info);
    }

    fn replace_turn_order(&mut self, order: Vec<PlayerId>, current: PlayerId) {
        self.turn = TurnOrder::from_parts(order, current);
        let turn = &self.turn;
        self.opponents.retain(|p| turn.contains(&p.id));

        let others: Vec<PlayerId> = self
            .turn
            .iter()
            .filter(|id| *id != self.identity())
            .cloned()
            .collect();
        for id in &others {
            self.opponent_mut(id);
        }
    }

    /// Known opponent record, created on first sight.
    fn opponent_mut(&mut self, id: &PlayerId) -> &mut ConnectedPlayer {
        let name = self.default_name(id);
        self.opponents
            .get_or_insert_with(id, || ConnectedPlayer::new(id.clone(), name, "#808080"))
    }

    fn default_name(&self, id: &PlayerId) -> String {
        let is_host = self.host.as_ref().is_some_and(|host| host.peer_id() == id);
        match (&self.host_name, is_host) {
            (Some(host_name), true) => host_name.clone(),
            _ => id.to_string(),
        }
    }

    fn announce_turn(&mut self) {
        let Some(current) = self.turn.current().cloned() else {
            return;
        };
        if &current == self.identity() {
            self.notices.success("It's your turn!");
        } else {
            let text = format!("Current turn: {}", self.display_name(&current));
            self.notices.info(text);
        }
    }

    fn surrender(&mut self, requester: &PlayerId, card_id: &CardId) {
        let Some(card) = self.seat.surrender(
            card_id,
            self.config.take_card_policy,
            &self.config.main_image_root,
        ) else {
            tracing::warn!("[client] {} asked for {} which is not in play", requester, card_id);
            return;
        };

        self.send(&Message::CardReceived {
            card,
            recipient_id: Some(requester.clone()),
        });
        self.send(&Message::CardTaken {
            player_id: requester.clone(),
            target_player_id: self.identity().clone(),
        });
        let text = format!("{} took your card!", self.display_name(requester));
        self.notices.warning(text);
    }

    fn ensure_can_act(&mut self) -> Result<(), GameError> {
        if !self.started {
            return Err(self.reject(GameError::NotStarted));
        }
        if !self.is_connected() {
            return Err(self.reject(GameError::NotConnected));
        }
        if !self.turn.is_current(&self.seat.identity) {
            return Err(self.reject(GameError::NotYourTurn));
        }
        Ok(())
    }

    fn reject(&mut self, err: GameError) -> GameError {
        tracing::debug!("[client] Rejected action: {}", err);
        self.notices.warning(err.to_string());
        err
    }

    /// Fire-and-forget. A failed send keeps the local change and only
    /// raises an error notice.
    fn send(&mut self, message: &Message) {
        let result = match self.host.as_mut() {
            Some(host) => host.send(message),
            None => Err(TransportError::Closed("host".to_string())),
        };
        match result {
            Ok(()) => tracing::debug!("[client] -> host: {}", message.kind()),
            Err(err) => {
                tracing::warn!("[client] Could not send {}: {}", message.kind(), err);
                self.notices.error(format!("Failed to send {}: {err}", message.kind()));
            }
        }
    }

    fn display_name(&self, id: &PlayerId) -> String {
        if id == self.identity() {
            format!("{} (You)", self.seat.name)
        } else if let Some(player) = self.opponents.get(id) {
            player.name.clone()
        } else {
            self.default_name(id)
        }
    }
}
