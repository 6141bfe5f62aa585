//! Playtree server
//!
//! The boundary collaborators around the playtree core: a file-backed
//! document store, the HTTP surface for documents and the per-user
//! player, and the command-line player mode.

pub mod api;
pub mod config;
pub mod error;
pub mod state;
pub mod store;
