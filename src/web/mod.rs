//! Web module - dashboard page and JSON chart API

mod page;
mod server;

pub use server::{serve, ServerConfig};
