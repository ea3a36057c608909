pub mod app;
pub mod client;
pub mod daemon;
pub mod server;
pub mod structs;
