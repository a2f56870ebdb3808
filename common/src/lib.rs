pub mod protocol;
pub mod format;

pub use protocol::*;
pub use format::*;
