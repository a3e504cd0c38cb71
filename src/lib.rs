//! Usage-string command line parsing.
//!
//! A usage string such as
//! `install (client [--no-profile] | server [--server-dir=<dir>]) <minecraft-version>`
//! is compiled once into a [`Grammar`], which then validates any number of command
//! inputs and binds their arguments into [`Bindings`].

pub mod arguments;
pub mod grammar;
pub mod input;
pub mod util;

pub use grammar::{compile, Grammar, Node, NodeKind};
pub use input::{match_input, Bindings};
pub use util::error::Error;
