pub mod container;
pub mod event;
pub mod hook;
pub mod reaction;
