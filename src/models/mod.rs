pub mod acknowledgment;
pub mod document;
pub mod visa;

pub use acknowledgment::*;
pub use document::*;
pub use visa::*;
