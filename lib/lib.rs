//! larder shared library.

/// Domain error codes mapped to operator-facing messages.
pub mod errors;
pub mod one_shot;
/// Cursor pagination over GraphQL connections.
pub mod pagination;
pub mod selection;
pub mod session;

pub use larder_api as api;
