use actix_files as fs;
use actix_web::{web, HttpResponse, Responder};
use log::info;
use std::path::Path;

use crate::models::AppState;

/// HTTP handler for the index page
pub async fn index() -> impl Responder {
    HttpResponse::Ok().body("Checkers Web App")
}

/// Current document of one room, for clients that poll instead of subscribing.
pub async fn game_document(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> impl Responder {
    let game_id = path.into_inner();
    match app_state.store.get(&game_id) {
        Some(doc) => HttpResponse::Ok().json(doc),
        None => {
            info!("Document requested for unknown game {}", game_id);
            HttpResponse::NotFound().body(format!("Game not found: {game_id}"))
        }
    }
}

/// Configure the HTTP routes
pub fn configure_routes(cfg: &mut web::ServiceConfig, static_dir: &Path) {
    cfg.service(web::resource("/ws").route(web::get().to(crate::websocket::ws_index)))
        .service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/games/{game_id}").route(web::get().to(game_document)))
        .service(fs::Files::new("/static", static_dir).show_files_listing());
}
