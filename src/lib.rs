//! Validator onboarding and campaign management for coordinated chain
//! launches.
//!
//! The two workflows in [`workflow`] run over trait-object collaborators
//! ([`network::Network`], [`account::AccountRegistry`],
//! [`prompt::Prompter`], [`chain::ChainDaemon`]) so they can be driven by the
//! real daemons or by in-memory fakes.
pub mod account;
pub mod chain;
pub mod cli;
pub mod coins;
pub mod config;
pub mod context;
pub mod daemon;
pub mod error;
pub mod id;
pub mod logging;
pub mod network;
pub mod output;
pub mod prompt;
pub mod proposal;
mod util;
pub mod validator;
pub mod workflow;
pub mod workspace;

pub use context::Context;
pub use error::{Error, ErrorKind, Result};
