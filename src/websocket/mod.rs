pub mod game_handlers;
pub mod handler;
pub mod room;

pub use handler::{ws_index, CheckersWebSocket};
