pub mod advice;
pub mod app;
pub mod config;
pub mod errors;
pub mod forecast;
pub mod handlers;
pub mod models;
pub mod seed;
pub mod stats;
pub mod ui;
pub mod state;

pub use app::router;
pub use config::Config;
pub use seed::load_seed;
pub use state::AppState;
