//! Railway fare lookup server.
//!
//! Registers stations, per-hop fares, and routes, and answers: "what does
//! it cost to travel from here to there, through these stations?"

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod notify;
pub mod registry;
pub mod service;
pub mod store;
pub mod web;
