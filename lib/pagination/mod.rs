//! Client-side pagination over GraphQL connections.

mod pager;
mod walker;

pub use pager::ConnectionPager;
pub use walker::{CursorWalker, PageTicket, Settled};
