pub mod common;
pub mod config;
pub mod extractors;
pub mod logging;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;
pub mod utils;
