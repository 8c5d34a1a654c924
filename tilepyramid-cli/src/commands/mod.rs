//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`coord`] - Pack, unpack and walk up packed coordinates
//! - [`tiles`] - Seed pyramids and bounding-box enumeration
//! - [`store`] - Read, write and delete stored tiles
//! - [`reformat`] - Narrow a tile of record to layers and a format

pub mod common;
pub mod coord;
pub mod reformat;
pub mod store;
pub mod tiles;
