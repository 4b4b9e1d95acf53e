use actix_web_actors::ws;
use log::{debug, info, warn};

use crate::game::{GameSession, RuleError, Transition};
use crate::models::utils::get_game_status;
use crate::models::*;
use crate::websocket::handler::CheckersWebSocket;
use crate::websocket::room;

impl CheckersWebSocket {
    pub fn handle_create(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        let player = self.player_ref(&msg);
        info!("Creating new game for player {}", player);

        match room::open_room(&self.app_state.store, msg.game_id.as_deref(), &player) {
            Ok(entry) if entry.created => self.enter_room(entry, player, "game_created", ctx),
            Ok(entry) => {
                let doc = entry.document.clone();
                let game_id = entry.game_id.clone();
                self.enter_room(entry, player, "joined", ctx);
                self.broadcast_to_game(&game_id, &doc, true);
            }
            Err(e) => {
                warn!("Failed to create game: {}", e);
                self.send(ctx, &ServerMessage::error(None, e));
            }
        }
    }

    pub fn handle_join(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        let Some(game_id) = msg.game_id.clone().filter(|id| !id.trim().is_empty()) else {
            warn!("No game ID provided");
            self.send(ctx, &ServerMessage::error(None, "No game ID provided"));
            return;
        };
        let game_id = game_id.trim().to_string();
        let player = self.player_ref(&msg);
        info!("Player {} joining game {}", player, game_id);

        match room::join_room(&self.app_state.store, &game_id, &player) {
            Ok(entry) => {
                let doc = entry.document.clone();
                self.enter_room(entry, player, "joined", ctx);
                self.broadcast_to_game(&game_id, &doc, true);
            }
            Err(e) => {
                warn!("Cannot join game {}: {}", game_id, e);
                self.send(ctx, &ServerMessage::error(Some(game_id), e));
            }
        }
    }

    /// A click on one square of the board.
    pub fn handle_square(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        let Some(target) = msg.square.and_then(Square::position) else {
            warn!("Square action without a valid square: {:?}", msg.square);
            let reply = ServerMessage::error(self.current_game(), "Square requires an on-board row and col");
            self.send(ctx, &reply);
            return;
        };
        if let Err(e) = self.refresh_conclusion() {
            self.send(ctx, &ServerMessage::error(self.current_game(), e));
            return;
        }

        let result = match self.session.as_mut() {
            Some(session) => session.activate(target),
            None => {
                self.send(ctx, &ServerMessage::error(None, "Not in a game"));
                return;
            }
        };
        debug!("Square {} activated by {}: {:?}", target, self.id, result);
        self.apply_transition(result, ctx);
    }

    /// A complete move given as origin and destination.
    pub fn handle_move(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        let from = msg.move_from.and_then(Square::position);
        let to = msg.move_to.and_then(Square::position);
        let (Some(from), Some(to)) = (from, to) else {
            warn!("Move action missing from or to");
            let reply = ServerMessage::error(
                self.current_game(),
                "Move requires on-board from and to positions",
            );
            self.send(ctx, &reply);
            return;
        };
        if let Err(e) = self.refresh_conclusion() {
            self.send(ctx, &ServerMessage::error(self.current_game(), e));
            return;
        }

        let result = match self.session.as_mut() {
            Some(session) => session.apply_move(from, to),
            None => {
                self.send(ctx, &ServerMessage::error(None, "Not in a game"));
                return;
            }
        };
        info!("Move {} -> {} by {}: {:?}", from, to, self.id, result.as_ref().err());
        self.apply_transition(result, ctx);
    }

    pub fn handle_get_moves(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        let Some(from) = msg.move_from.or(msg.square).and_then(Square::position) else {
            warn!("No square provided");
            self.send(ctx, &ServerMessage::error(self.current_game(), "No square provided"));
            return;
        };
        let Some(session) = self.session.as_ref() else {
            self.send(ctx, &ServerMessage::error(None, "Not in a game"));
            return;
        };

        let reply = ServerMessage {
            game_id: self.current_game(),
            side: self.side,
            available_moves: Some(session.legal_destinations(from)),
            view: Some(session.render()),
            ..ServerMessage::new("available_moves")
        };
        self.send(ctx, &reply);
    }

    pub fn handle_forfeit(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let Some(game_id) = self.current_game() else {
            self.send(ctx, &ServerMessage::error(None, "Not in a game"));
            return;
        };
        match self.app_state.store.forfeit(&game_id, &self.player_id) {
            Ok(doc) => self.broadcast_to_game(&game_id, &doc, false),
            Err(e) => {
                warn!("Forfeit by {} refused: {}", self.player_id, e);
                self.send(ctx, &ServerMessage::error(Some(game_id), e));
            }
        }
    }

    pub fn handle_reset(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let Some(game_id) = self.current_game() else {
            self.send(ctx, &ServerMessage::error(None, "Not in a game"));
            return;
        };
        match self.app_state.store.reset(&game_id, &self.player_id) {
            Ok(doc) => self.broadcast_to_game(&game_id, &doc, false),
            Err(e) => {
                warn!("Reset by {} refused: {}", self.player_id, e);
                self.send(ctx, &ServerMessage::error(Some(game_id), e));
            }
        }
    }

    pub fn handle_leave(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let Some(game_id) = self.current_game() else {
            self.send(ctx, &ServerMessage::error(None, "Not in a game"));
            return;
        };
        match self.app_state.store.leave(&game_id, &self.player_id) {
            Ok(Some(doc)) => self.broadcast_to_game(&game_id, &doc, true),
            Ok(None) => {}
            Err(e) => warn!("Leaving game {} failed: {}", game_id, e),
        }
        self.detach();
        self.send(
            ctx,
            &ServerMessage {
                game_id: Some(game_id),
                ..ServerMessage::new("left")
            },
        );
    }

    fn player_ref(&self, msg: &ClientMessage) -> String {
        msg.player_id
            .clone()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| self.id.clone())
    }

    fn enter_room(
        &mut self,
        entry: room::Entry,
        player: String,
        message_type: &str,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        self.attach(&entry.game_id);
        self.player_id = player;
        self.side = entry.seat.side();
        let session = room::start_session(&entry.document, entry.seat);

        let reply = ServerMessage {
            game_id: Some(entry.game_id),
            side: self.side,
            view: Some(session.render()),
            status_label: Some(get_game_status(&entry.document)),
            document: Some(entry.document),
            ..ServerMessage::new(message_type)
        };
        self.session = Some(session);
        self.send(ctx, &reply);
    }

    fn refresh_conclusion(&mut self) -> Result<(), String> {
        let (Some(game_id), Some(session)) = (self.current_game(), self.session.as_mut()) else {
            return Err("Not in a game".to_string());
        };
        room::refresh_conclusion(&self.app_state.store, &game_id, session).map_err(|e| e.to_string())
    }

    fn apply_transition(
        &mut self,
        result: Result<Transition, RuleError>,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        match result {
            Ok(transition) if transition.changes_board() => self.commit(transition, ctx),
            Ok(_) => self.send_render(ctx),
            Err(e) => {
                warn!("Rejected action from {}: {}", self.id, e);
                let reply = ServerMessage {
                    view: self.session.as_ref().map(GameSession::render),
                    side: self.side,
                    ..ServerMessage::error(self.current_game(), e)
                };
                self.send(ctx, &reply);
            }
        }
    }

    /// Writes a board change to the store and pushes it to the room.
    fn commit(&mut self, transition: Transition, ctx: &mut ws::WebsocketContext<Self>) {
        let (Some(game_id), Some(session)) = (self.current_game(), self.session.as_mut()) else {
            return;
        };
        match room::commit(&self.app_state.store, &game_id, session, transition) {
            Ok(Some(doc)) => self.broadcast_to_game(&game_id, &doc, false),
            Ok(None) => self.send_render(ctx),
            Err(e) => {
                let reply = ServerMessage {
                    view: self.session.as_ref().map(GameSession::render),
                    side: self.side,
                    ..ServerMessage::error(Some(game_id), e)
                };
                self.send(ctx, &reply);
            }
        }
    }

    fn send_render(&self, ctx: &mut ws::WebsocketContext<Self>) {
        let reply = ServerMessage {
            game_id: self.current_game(),
            side: self.side,
            view: self.session.as_ref().map(GameSession::render),
            ..ServerMessage::new("render")
        };
        self.send(ctx, &reply);
    }
}
