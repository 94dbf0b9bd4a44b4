//! Core data model: snapshots, the message contract, cursor injection, geometry.

pub mod cursor;
pub mod geometry;
pub mod protocol;
pub mod snapshot;
pub mod text;
