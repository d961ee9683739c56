pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod services;
