//! Hosting matches.
//!
//! - `host`: the [`Table`] a front end plays at, with undo and the menu
//! - `self_play`: autonomous matches for evaluation runs

pub mod host;
pub mod self_play;

pub use host::{Menu, Table};
pub use self_play::{MatchReport, SelfPlay, SelfPlayConfig};
