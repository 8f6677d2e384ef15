pub mod app_module;
pub mod app_router;
pub mod config;
pub mod debug;
pub mod error;
pub mod health;
pub mod tone;
