//! Online Brazilian checkers: a rules engine, a per-client turn state
//! machine and an actix server that keeps two players in sync.

pub mod config;
pub mod game;
pub mod models;
pub mod routes;
pub mod store;
pub mod websocket;
