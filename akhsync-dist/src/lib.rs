//! # akhsync-dist
//!
//! Distribution Assembler. Stages a production build under `dist/`, optionally
//! merges it into a renamed copy of the project's world save, and zips each
//! staging directory into an `.mcaddon` / `.mcworld`.
//!
//! - [`assemble`] — the `dist` sequence
//! - [`world`] — world validation and the `level.dat` rename
//! - [`nbt`] — little-endian NBT codec
//! - [`archive`] — zip writer

pub mod archive;
pub mod assemble;
pub mod error;
pub mod nbt;
pub mod world;

pub use assemble::{dist, Archive, DistKind, DistOptions, DistReport};
pub use error::DistError;
pub use world::DEFAULT_WORLD_NAME_TEMPLATE;
