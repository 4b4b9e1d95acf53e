use actix_web::{web, App, HttpServer};
use log::info;

use checkers_web_app::config::ServerConfig;
use checkers_web_app::models::AppState;
use checkers_web_app::routes::configure_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    info!("Starting checkers server at http://{}", config.bind_addr);
    info!("Serving static files from {}", config.static_dir.display());

    // Create shared application state
    let app_state = web::Data::new(AppState::new());
    let static_dir = config.static_dir.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(|cfg| configure_routes(cfg, &static_dir))
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await
}
