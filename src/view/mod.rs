//! View targets.
//!
//! Controllers render markup; the coordinator writes it into a `Container`
//! found through a `Document`.

pub mod container;

pub use container::{Container, Document, MemoryContainer, MemoryDocument};
