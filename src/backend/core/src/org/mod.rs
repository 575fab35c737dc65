//! Organization tree: unit records, structural lookups, and traversal.
//!
//! - **Models**: `Unit`, `UnitId`, rank levels, risk bands
//! - **Tree**: validated, indexed `OrgTree` with descendant/ancestor walks
//! - **Shared**: copy-on-write `SharedTree` handle for concurrent readers

pub mod models;
pub mod shared;
pub mod tree;

pub use models::{RiskBand, Unit, UnitId, UnitLevel};
pub use shared::SharedTree;
pub use tree::{OrgTree, TreeError, FULL_NAME_SEPARATOR};
