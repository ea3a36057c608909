pub mod agent;
pub mod cache;
pub mod config_manager;
pub mod format;
pub mod shooter;

pub use agent::Agent;
pub use cache::HookCache;
