pub mod api;
pub mod app;
pub mod auction;
pub mod config;
pub mod dom;
pub mod query;
pub mod router;
pub mod session;
pub mod ui;
pub mod views;

pub use app::App;
pub use config::Config;
