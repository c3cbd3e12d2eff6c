//! Windows-specific type definitions and wrappers

pub mod attribute_list;
pub mod handle;

// Re-export commonly used types
pub use attribute_list::ParentProcessAttributeList;
pub use handle::{Handle, ServiceHandle};
