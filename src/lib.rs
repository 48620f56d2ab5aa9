//! Live classroom polls: one active poll per topic, one revisable answer
//! per participant, and tallies that stay consistent under concurrent
//! submissions.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod locale;
pub mod models;
pub mod projector;
pub mod selection;
pub mod server;
pub mod tally;
