//! Marquee client library
//!
//! This crate holds the data-access core of the Marquee media client: the
//! session-aware gateway in front of the remote catalog service, the session
//! bootstrap state machine, favorites reconciliation and the cascading
//! catalog loader. The `marquee` binary in `src/main.rs` is a thin terminal
//! front end over these pieces.
//!
//! Notes
//! - Shared state lives in injectable stores ([`state::AppState`]); nothing
//!   here keeps ambient globals.
//! - Presentation code observes stores and notifications; it never mutates
//!   session, profile or favorites state directly.

pub mod app;
pub mod common;
pub mod domains;
pub mod infra;
pub mod state;
