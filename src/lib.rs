//! foodlovers - Local Food Lovers review and favorites service
//!
//! Layers, bottom-up:
//! - `store`: in-memory document collections behind an explicit database handle
//! - `query`: review filter parameters to predicate and ordering
//! - `auth`: bearer credential to verified email
//! - `coordinator`: ownership, favorite dedup and cascade rules
//! - `api`: axum router and server

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod logging;
pub mod query;
pub mod store;
