//! Data models for Polaris GraphQL payloads.

mod feature;
mod page;
mod task_chain;
mod version;

pub use feature::{Feature, PermissionGroup};
pub use page::{Connection, Edge, PageInfo};
pub use task_chain::{TaskChain, TaskChainState};
pub use version::Version;
