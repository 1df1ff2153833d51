//! Common utilities shared among the crates of the Dachs compiler.
pub mod error;
pub mod log;
pub mod position;
pub mod source;

pub use error::{Error, note_on, ordinal};
pub use log::{LogTags, Logger};
pub use position::Position;
pub use source::Source;
