//! Hack The Planet: virtual filesystems and a command shell for a hacking game.
//!
//! Every simulated machine ([`host::Host`]) owns a JSON-persisted tree of
//! directories and leaves. The [`shell`] dispatches typed commands against the
//! host on top of its session stack; `ssh` and `download` cross between hosts
//! registered in the [`network::Network`].

pub mod cli;
pub mod config;
pub mod error;
pub mod game_state;
pub mod host;
pub mod logging;
pub mod network;
pub mod shell;
pub mod store;
pub mod tree;
pub mod users;
