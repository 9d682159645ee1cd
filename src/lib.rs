//! Atlas - Conversational travel planner
//!
//! This library provides a slot-filling trip intake that talks to travellers
//! through a language model, plus attraction recommendations, routes, weather,
//! car rentals and fuel prices assembled from external providers.
//!
//! Every external dependency degrades: providers fall back to substitute
//! data and the model-backed oracles fall back to local behaviour, so a
//! request only fails when it is malformed.

pub mod agent;
pub mod api;
pub mod cli;
pub mod config;
pub mod geo;
pub mod logging;
pub mod metrics;
pub mod oracle;
pub mod providers;
pub mod recommend;
pub mod session;
pub mod slots;
pub mod travel;
