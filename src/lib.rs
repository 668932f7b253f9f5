//! Quorum classroom interaction server library.
//! This crate exposes internal modules for integration testing.
//! The binary entry point is in main.rs.

pub mod admin;
pub mod config;
pub mod error;
pub mod identity;
pub mod poll;
pub mod registry;
pub mod rep;
pub mod routes;
pub mod state;
pub mod ws;
