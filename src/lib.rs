// mirrorbot: mirror-link replies for Stacker News
//
// This is the library root. Each module corresponds to a subsystem of the
// bot; main.rs only wires them together behind the CLI.

pub mod alert;
pub mod client;
pub mod config;
pub mod daemon;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod links;
pub mod output;
pub mod schedule;
pub mod status;
