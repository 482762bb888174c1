//! Hotspot generator for AAC visual scene displays
//!
//! Sends a photo to a multimodal chat model with a fixed instructional prompt
//! and parses the reply into named hotspots, each carrying short communication
//! options for pre-verbal children.

pub mod ai;
pub mod conversation;
pub mod error;
pub mod generator;
pub mod image;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod server;

pub use error::{Error, Result};
