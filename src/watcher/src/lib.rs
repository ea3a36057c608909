pub mod decorate;
pub mod docker;
pub mod source;
pub mod stream;

pub use source::{ContainerSource, SourceError};
pub use stream::{EventSink, EventStream};
