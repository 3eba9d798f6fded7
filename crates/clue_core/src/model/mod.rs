//! Tile and section domain model.
//!
//! # Responsibility
//! - Define the tile record contract and its concrete variants.
//! - Build tiles from discriminator strings through an explicit registry.
//! - Describe curriculum section types.
//!
//! # Invariants
//! - Tile kinds form a closed set checked exhaustively at compile time.
//! - Tile records are value snapshots; edits replace the snapshot held by
//!   the owning document.

pub mod dataflow;
pub(crate) mod fields;
pub mod geometry;
pub mod image;
pub mod numberline;
pub mod registry;
pub mod section;
pub mod table;
pub mod text;
pub mod tile;
pub mod tile_model;
