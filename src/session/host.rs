//! Host session.
//!
//! The host is the single writer of the decks, the turn order and the
//! authoritative current turn. It pushes full-replace updates to clients
//! and relays their public announcements to each other. Nothing it sends
//! is acknowledged: a lost update leaves that client diverged.
//!
//! ## Lifecycle
//!
//! 1. `new` with the game code as the host's peer id
//! 2. `add_connection` / `handle_event` as clients arrive
//! 3. `start_game` once, which deals and fixes the turn order
//! 4. local actions and incoming messages until `shutdown`

use std::iter;

use super::authority::DeckAuthority;
use super::notice::{Notice, Notices};
use super::outcome::{check_for_winner, Victory};
use super::seat::Seat;
use super::turn::{Removal, TurnOrder, TurnPhase};
use crate::cards::{Card, CardId};
use crate::core::{ConnectedPlayer, GameError, PlayerId, PlayerRoster, SessionConfig};
use crate::net::{ConnectionEvent, Fanout, GameCode, PeerConnection};
use crate::protocol::{Message, PROTOCOL_VERSION};

pub struct HostSession {
    code: GameCode,
    seat: Seat,
    config: SessionConfig,
    authority: DeckAuthority,
    connections: Fanout,
    players: PlayerRoster,
    turn: TurnOrder,
    started: bool,
    notices: Notices,
}

impl HostSession {
    /// Open a session with freshly built and shuffled decks.
    #[must_use]
    pub fn new(
        code: GameCode,
        name: impl Into<String>,
        color: impl Into<String>,
        config: SessionConfig,
    ) -> Self {
        let authority = DeckAuthority::new(&config);
        Self::with_authority(code, name, color, config, authority)
    }

    /// Open a session dealing from the given authority.
    #[must_use]
    pub fn with_authority(
        code: GameCode,
        name: impl Into<String>,
        color: impl Into<String>,
        config: SessionConfig,
        authority: DeckAuthority,
    ) -> Self {
        let seat = Seat::new(code.peer_id(), name, color);
        tracing::info!("[host] Hosting game {} as {}", code, seat.name);
        Self {
            code,
            seat,
            config,
            authority,
            connections: Fanout::new(),
            players: PlayerRoster::new(),
            turn: TurnOrder::default(),
            started: false,
            notices: Notices::default(),
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn code(&self) -> &GameCode {
        &self.code
    }

    #[must_use]
    pub fn identity(&self) -> &PlayerId {
        &self.seat.identity
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
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
    pub fn players(&self) -> &PlayerRoster {
        &self.players
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
    pub fn main_deck_remaining(&self) -> usize {
        self.authority.main_remaining()
    }

    #[must_use]
    pub fn special_deck_remaining(&self) -> usize {
        self.authority.special_remaining()
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    // === Connections ===

    /// Accept a new incoming connection. The welcome goes out once it opens.
    pub fn add_connection(&mut self, connection: Box<dyn PeerConnection>) {
        tracing::info!("[host] New connection from {}", connection.peer_id());
        self.connections.add(connection);
    }

    /// Feed one connection event into the session.
    pub fn handle_event(&mut self, from: &PlayerId, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Open => {
                let welcome = Message::Welcome {
                    host_name: self.seat.name.clone(),
                    protocol_version: PROTOCOL_VERSION,
                };
                self.send_to(from, &welcome);
            }
            ConnectionEvent::Data(message) => self.handle_message(from, message),
            ConnectionEvent::Close => self.handle_disconnect(from),
            ConnectionEvent::Error(err) => {
                tracing::warn!("[host] Connection error from {}: {}", from, err);
                self.notices.error(format!("Network error: {err}"));
            }
        }
    }

    /// Apply one message received from `from`.
    pub fn handle_message(&mut self, from: &PlayerId, message: Message) {
        tracing::debug!("[host] <- {}: {}", from, message.kind());

        match &message {
            Message::PlayerInfo { name, color } => {
                self.add_player(from, name, color);
                return;
            }
            Message::CardPlayed { player_id, hand_size, played_cards, .. } => {
                if let Some(player) = self.players.get_mut(player_id) {
                    player.hand_size = *hand_size;
                    player.played_cards = played_cards.clone();
                }
                let text = format!("{} played a card", self.display_name(player_id));
                self.notices.info(text);
            }
            Message::CardDrawn { player_id, hand_size } => {
                self.players.set_hand_size(player_id, *hand_size);
                let text = format!("{} drew a card", self.display_name(player_id));
                self.notices.info(text);
            }
            Message::CardDiscarded { player_id, card_id } => {
                if let Some(player) = self.players.get_mut(player_id) {
                    player.played_cards.retain(|c| &c.id != card_id);
                }
                let text = format!("{} discarded a card", self.display_name(player_id));
                self.notices.info(text);
            }
            Message::CardTaken { player_id, target_player_id } => {
                let text = format!(
                    "{} took a card from {}",
                    self.display_name(player_id),
                    self.display_name(target_player_id)
                );
                self.notices.info(text);

                // The requester already knows; skip them as well as the sender.
                let peers: Vec<PlayerId> = self
                    .connections
                    .peer_ids()
                    .filter(|peer| *peer != from && *peer != player_id)
                    .cloned()
                    .collect();
                for peer in &peers {
                    self.send_to(peer, &message);
                }
                return;
            }
            Message::TakeCardRequest { target_player_id, card_id, requester_id } => {
                if target_player_id == self.identity() {
                    self.surrender(requester_id, card_id);
                } else {
                    self.send_to(target_player_id, &message);
                }
            }
            Message::CardReceived { card, recipient_id } => {
                match recipient_id {
                    Some(recipient) if recipient != self.identity() => {
                        self.send_to(recipient, &message);
                    }
                    _ => {
                        self.seat.receive(card.clone());
                        self.notices.success(format!("You took {}!", card.name));
                    }
                }
                return;
            }
            Message::DrawRequest { .. } => {
                self.serve_draw(from);
                return;
            }
            Message::Welcome { .. }
            | Message::GameStart { .. }
            | Message::HandUpdate { .. }
            | Message::SpecialCardsUpdate { .. }
            | Message::TurnOrderUpdate { .. }
            | Message::TurnUpdate { .. }
            | Message::CardDealt { .. } => {
                tracing::debug!("[host] Ignoring host-only message {} from {}", message.kind(), from);
                return;
            }
        }

        if message.is_relayed_announcement() {
            self.connections.broadcast_except(&message, from);
        }
        if self.started && message.ends_turn() && self.turn.is_current(from) {
            self.advance_turn();
        }
    }

    /// Drop a departed peer. Once the game has started they also leave the
    /// turn order, and everyone gets exactly one `turn_order_update`.
    pub fn handle_disconnect(&mut self, peer: &PlayerId) {
        self.connections.remove(peer);

        let Some(player) = self.players.remove(peer) else {
            tracing::debug!("[host] Connection from {} closed before joining", peer);
            return;
        };
        tracing::info!("[host] {} ({}) left", player.name, peer);

        if self.started {
            let removal = self.turn.remove(peer);
            if removal == Removal::RemovedCurrent {
                tracing::info!("[host] Turn passed to {:?} after disconnect", self.turn.current());
            }
            if removal != Removal::NotPresent {
                if let Some(current) = self.turn.current().cloned() {
                    let update = Message::TurnOrderUpdate {
                        turn_order: self.turn.to_vec(),
                        current_turn: current,
                    };
                    self.connections.broadcast(&update);
                }
            }
        }

        self.notices.warning(format!("{} left the game!", player.name));
    }

    // === Game flow ===

    /// Deal, fix the turn order and send every connection its `game_start`.
    ///
    /// The order is the host followed by players in join order; the host
    /// moves first. Connections that never sent `player_info` get an empty
    /// hand and no turn.
    pub fn start_game(&mut self) -> Result<(), GameError> {
        if self.started {
            return Err(GameError::AlreadyStarted);
        }

        let clients: Vec<PlayerId> = self.players.ids().cloned().collect();
        let deal = self.authority.deal_initial_hands(
            &clients,
            self.config.hand_size,
            self.config.special_slots,
        );

        self.seat.replace_hand(deal.host_hand.clone());
        self.seat.replace_special(deal.special_cards.clone());
        for (id, hand) in &deal.client_hands {
            self.players.set_hand_size(id, hand.len());
        }

        self.turn = TurnOrder::new(iter::once(self.identity().clone()).chain(clients));
        self.started = true;

        let turn_order = self.turn.to_vec();
        let current_turn = self.identity().clone();
        let peers: Vec<PlayerId> = self.connections.peer_ids().cloned().collect();
        for peer in &peers {
            let start = Message::GameStart {
                player_cards: deal.hand_for(peer).to_vec(),
                special_cards: deal.special_cards.clone(),
                turn_order: turn_order.clone(),
                current_turn: current_turn.clone(),
            };
            self.send_to(peer, &start);
        }

        tracing::info!(
            "[host] Game started with {} player(s), {} main card(s) left",
            turn_order.len(),
            self.authority.main_remaining()
        );
        self.notices.success("Game started!");
        Ok(())
    }

    /// Pass the turn to the next player and announce it.
    pub fn advance_turn(&mut self) -> Option<PlayerId> {
        let next = self.turn.advance().cloned()?;
        self.connections
            .broadcast(&Message::TurnUpdate { current_turn: next.clone() });

        tracing::info!("[host] Turn -> {}", next);
        let text = format!("Current turn: {}", self.display_name(&next));
        self.notices.info(text);
        Some(next)
    }

    /// Draw a main card into the host's hand, then end the turn.
    pub fn draw_card(&mut self) -> Result<Card, GameError> {
        self.ensure_my_turn()?;

        let Some(card) = self.authority.draw(false) else {
            return Err(self.reject(GameError::DeckEmpty));
        };
        self.seat.add_to_hand(card.clone());

        let drawn = Message::CardDrawn {
            player_id: self.identity().clone(),
            hand_size: self.seat.hand().len(),
        };
        self.connections.broadcast(&drawn);
        self.notices.success("Card drawn!");
        self.advance_turn();
        Ok(card)
    }

    /// Move a card from hand to the played area, then end the turn.
    pub fn play_card(&mut self, card_id: &CardId) -> Result<Card, GameError> {
        self.ensure_my_turn()?;

        let card = self.seat.play(card_id).map_err(|err| self.reject(err))?;
        let played = Message::CardPlayed {
            player_id: self.identity().clone(),
            card_id: card.id.clone(),
            hand_size: self.seat.hand().len(),
            played_cards: self.seat.played_cards().to_vec(),
        };
        self.connections.broadcast(&played);
        self.notices.success("Card played!");
        self.advance_turn();
        Ok(card)
    }

    /// Move a played card to the discard pile, then end the turn.
    pub fn discard_card(&mut self, card_id: &CardId) -> Result<Card, GameError> {
        self.ensure_my_turn()?;

        let card = self.seat.discard(card_id).map_err(|err| self.reject(err))?;
        let discarded = Message::CardDiscarded {
            player_id: self.identity().clone(),
            card_id: card.id.clone(),
        };
        self.connections.broadcast(&discarded);
        self.notices.success("Card discarded!");
        self.advance_turn();
        Ok(card)
    }

    /// Ask `target` for one of their played cards, then end the turn.
    ///
    /// The request goes to every connection; only the target answers.
    pub fn take_card(&mut self, target: &PlayerId, card_id: CardId) -> Result<(), GameError> {
        self.ensure_my_turn()?;

        if self.players.is_empty() {
            return Err(self.reject(GameError::NoOpponents));
        }
        if !self.players.contains(target) {
            return Err(self.reject(GameError::UnknownPlayer(target.clone())));
        }

        let request = Message::TakeCardRequest {
            target_player_id: target.clone(),
            card_id,
            requester_id: self.identity().clone(),
        };
        self.connections.broadcast(&request);
        self.advance_turn();
        Ok(())
    }

    /// Poll the win condition.
    pub fn check_for_winner(&mut self) -> Option<Victory> {
        let victory = check_for_winner(&self.seat, &self.players, self.config.win_played_cards)?;
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

    /// Close every connection and discard all game state.
    pub fn shutdown(&mut self) {
        tracing::info!("[host] Shutting down game {}", self.code);
        self.connections.close_all();
        self.players = PlayerRoster::new();
        self.turn = TurnOrder::default();
        self.seat.clear();
        self.started = false;
    }

    // === Internals ===

    fn add_player(&mut self, id: &PlayerId, name: &str, color: &str) {
        if self.players.add(ConnectedPlayer::new(id.clone(), name, color)) {
            tracing::info!("[host] {} joined as {}", id, name);
            self.notices.info(format!("{name} joined the game!"));
        }
    }

    fn serve_draw(&mut self, from: &PlayerId) {
        if !self.started || !self.turn.is_current(from) {
            tracing::warn!("[host] Ignoring draw request from {} out of turn", from);
            return;
        }
        let Some(card) = self.authority.draw(false) else {
            let text = format!("{} tried to draw: {}", self.display_name(from), GameError::DeckEmpty);
            self.notices.warning(text);
            return;
        };

        self.send_to(from, &Message::CardDealt { card });
        let hand_size = self.players.get(from).map_or(1, |p| p.hand_size + 1);
        self.players.set_hand_size(from, hand_size);

        let drawn = Message::CardDrawn { player_id: from.clone(), hand_size };
        self.connections.broadcast_except(&drawn, from);
        let text = format!("{} drew a card", self.display_name(from));
        self.notices.info(text);
        self.advance_turn();
    }

    fn surrender(&mut self, requester: &PlayerId, card_id: &CardId) {
        let Some(card) = self.seat.surrender(
            card_id,
            self.config.take_card_policy,
            &self.config.main_image_root,
        ) else {
            tracing::warn!("[host] {} asked for {} which is not in play", requester, card_id);
            return;
        };

        let received = Message::CardReceived {
            card,
            recipient_id: Some(requester.clone()),
        };
        self.send_to(requester, &received);

        let taken = Message::CardTaken {
            player_id: requester.clone(),
            target_player_id: self.identity().clone(),
        };
        self.connections.broadcast_except(&taken, requester);

        let text = format!("{} took your card!", self.display_name(requester));
        self.notices.warning(text);
    }

    fn ensure_my_turn(&mut self) -> Result<(), GameError> {
        if !self.started {
            return Err(self.reject(GameError::NotStarted));
        }
        if !self.turn.is_current(&self.seat.identity) {
            return Err(self.reject(GameError::NotYourTurn));
        }
        Ok(())
    }

    /// Surface a rejected action to the local player.
    fn reject(&mut self, err: GameError) -> GameError {
        tracing::debug!("[host] Rejected action: {}", err);
        self.notices.warning(err.to_string());
        err
    }

    fn send_to(&mut self, peer: &PlayerId, message: &Message) {
        if let Err(err) = self.connections.send_to(peer, message) {
            tracing::warn!("[host] Could not send {} to {}: {}", message.kind(), peer, err);
        }
    }

    fn display_name(&self, id: &PlayerId) -> String {
        if id == self.identity() {
            format!("{} (You)", self.seat.name)
        } else {
            self.players.name_of(id).to_string()
        }
    }
}
