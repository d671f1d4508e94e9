//! Gap registry
//!
//! Single source of truth for workflow state. Access is split in two:
//! - [`GapReader`]: the read-only query surface handed to dashboards,
//!   alerting and stale-contact sweeps
//! - [`GapStore`]: the write side, held only by the workflow engine
//!
//! Every write goes through [`GapStore::commit`], which applies a gap
//! update together with its record or not at all.

#![deny(unsafe_code)]

pub mod error;
pub mod memory;
pub mod query;
pub mod store;

pub use error::{RegistryError, Result};
pub use memory::InMemoryGapStore;
pub use query::GapQuery;
pub use store::{GapReader, GapStore, GapTransition, TransitionRecord};
