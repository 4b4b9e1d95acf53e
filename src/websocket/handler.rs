use actix::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::game::{GameSession, Side};
use crate::models::*;
use crate::websocket::room;

/// WebSocket connection of one client. Owns that client's turn state machine.
pub struct CheckersWebSocket {
    pub id: String,
    pub app_state: web::Data<AppState>,
    /// Room this connection is attached to; empty when in no room.
    pub game_id: String,
    pub player_id: String,
    pub side: Option<Side>,
    pub session: Option<GameSession>,
}

impl CheckersWebSocket {
    pub fn new(id: String, app_state: web::Data<AppState>) -> Self {
        CheckersWebSocket {
            player_id: id.clone(),
            id,
            app_state,
            game_id: String::new(),
            side: None,
            session: None,
        }
    }
}

impl Actor for CheckersWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let total_sessions = {
            let mut sessions = self.app_state.sessions.lock();
            sessions.insert(self.id.clone(), ctx.address());
            sessions.len()
        };
        info!("WebSocket connection started: {}", self.id);
        info!("Total active sessions: {}", total_sessions);
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        self.detach();

        let total_sessions = {
            let mut sessions = self.app_state.sessions.lock();
            sessions.remove(&self.id);
            sessions.len()
        };
        info!("WebSocket connection closed: {}", self.id);
        info!("Total active sessions: {}", total_sessions);

        Running::Stop
    }
}

impl Handler<GameSnapshot> for CheckersWebSocket {
    type Result = ();

    fn handle(&mut self, msg: GameSnapshot, ctx: &mut Self::Context) {
        if msg.game_id != self.game_id {
            debug!("Dropping snapshot of {} for connection {}", msg.game_id, self.id);
            return;
        }
        let update =
            room::snapshot_update(&msg.game_id, self.side, self.session.as_mut(), msg.document);
        if let Some(update) = update {
            self.send(ctx, &update);
        }
    }
}

// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for CheckersWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Text(text)) => {
                info!("Received text message: {}", text);
                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        debug!("Parsed client message: {:?}", client_msg);
                        self.handle_message(client_msg, ctx);
                    }
                    Err(e) => {
                        warn!("Error parsing client message: {}", e);
                        let reply = ServerMessage::error(
                            self.current_game(),
                            format!("Invalid message format: {e}"),
                        );
                        self.send(ctx, &reply);
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
                let reply =
                    ServerMessage::error(self.current_game(), "Binary messages are not supported");
                self.send(ctx, &reply);
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Connection closed: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            }
            _ => {
                ctx.stop();
            }
        }
    }
}

impl CheckersWebSocket {
    pub fn handle_message(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match msg.message_type.as_str() {
            "create" => self.handle_create(msg, ctx),
            "join" => self.handle_join(msg, ctx),
            "square" => self.handle_square(msg, ctx),
            "move" => self.handle_move(msg, ctx),
            "get_moves" => self.handle_get_moves(msg, ctx),
            "forfeit" => self.handle_forfeit(ctx),
            "reset" => self.handle_reset(ctx),
            "leave" => self.handle_leave(ctx),
            other => {
                warn!("Unknown message type: {}", other);
                let reply =
                    ServerMessage::error(self.current_game(), format!("Unknown message type: {other}"));
                self.send(ctx, &reply);
            }
        }
    }

    /// Pushes `document` to every connection in `game_id`, optionally
    /// skipping this one.
    pub fn broadcast_to_game(&self, game_id: &str, document: &GameDocument, skip_self: bool) {
        info!("Broadcasting snapshot of game {}", game_id);

        // Copy what we need so no lock is held while sending.
        let (connection_ids, addrs) = {
            let connections = self.app_state.connections.lock();
            let Some(ids) = connections.get(game_id) else {
                info!("No connections found for game {}", game_id);
                return;
            };
            let ids = ids.clone();
            let sessions = self.app_state.sessions.lock();
            let addrs: Vec<_> = ids.iter().map(|id| sessions.get(id).cloned()).collect();
            (ids, addrs)
        };

        for (connection_id, addr) in connection_ids.iter().zip(addrs) {
            if skip_self && connection_id == &self.id {
                continue;
            }
            match addr {
                Some(addr) => addr.do_send(GameSnapshot {
                    game_id: game_id.to_string(),
                    document: document.clone(),
                }),
                None => warn!("Session not found for connection ID: {}", connection_id),
            }
        }
    }

    /// Registers this connection with `game_id`.
    pub(crate) fn attach(&mut self, game_id: &str) {
        if !self.game_id.is_empty() && self.game_id != game_id {
            self.detach();
        }
        self.game_id = game_id.to_string();
        let mut connections = self.app_state.connections.lock();
        let ids = connections.entry(game_id.to_string()).or_default();
        if !ids.contains(&self.id) {
            ids.push(self.id.clone());
        }
    }

    /// Leaves the current room. A finished room is dropped with its last
    /// connection; a waiting or running one stays for its players to return.
    pub(crate) fn detach(&mut self) {
        if self.game_id.is_empty() {
            return;
        }
        let game_id = std::mem::take(&mut self.game_id);
        let now_empty = {
            let mut connections = self.app_state.connections.lock();
            match connections.get_mut(&game_id) {
                Some(ids) => {
                    ids.retain(|id| id != &self.id);
                    info!("Removed player {} from game {}'s connections", self.id, game_id);
                    if ids.is_empty() {
                        connections.remove(&game_id);
                        true
                    } else {
                        false
                    }
                }
                None => false,
            }
        };
        if now_empty {
            info!("No more connections in game {}", game_id);
            self.app_state.store.remove_if_concluded(&game_id);
        }
        self.side = None;
        self.session = None;
    }

    pub(crate) fn current_game(&self) -> Option<String> {
        if self.game_id.is_empty() {
            None
        } else {
            Some(self.game_id.clone())
        }
    }

    pub(crate) fn send(&self, ctx: &mut ws::WebsocketContext<Self>, message: &ServerMessage) {
        match serde_json::to_string(message) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                warn!("Failed to serialize response: {}", e);
                ctx.text("{\"message_type\": \"error\", \"error\": \"Internal server error\"}");
            }
        }
    }
}

/// WebSocket connection handler
pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let id = Uuid::new_v4().to_string();
    info!("New WebSocket connection: {}", id);

    ws::start(CheckersWebSocket::new(id, app_state), &req, stream)
}
