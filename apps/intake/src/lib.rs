//! Résumé intake client.
//!
//! Validates a candidate résumé locally, uploads it to the intake endpoint,
//! and drives the Continue/Skip form that sits inside a chat mini-app. The
//! chat host is injected through [`host::Host`]; the network through
//! [`transport::Transport`].

pub mod config;
pub mod errors;
pub mod form;
pub mod host;
pub mod models;
pub mod transport;
pub mod upload;
