use actix::Addr;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::store::GameStore;
use crate::websocket::CheckersWebSocket;

/// Application state shared between connections
#[derive(Default)]
pub struct AppState {
    pub store: GameStore,
    /// Room id to the connection ids attached to it.
    pub connections: Mutex<HashMap<String, Vec<String>>>,
    pub sessions: Mutex<HashMap<String, Addr<CheckersWebSocket>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
