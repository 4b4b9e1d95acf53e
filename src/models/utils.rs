use crate::models::{GameDocument, GameStatus};

/// Short status text for client display.
pub fn get_game_status(doc: &GameDocument) -> String {
    if let Some(winner) = doc.winner {
        return format!("{winner}_wins");
    }
    match doc.status {
        GameStatus::WaitingForSecondPlayer => "waiting".to_string(),
        _ => format!("{}_turn", doc.side_to_move),
    }
}
