//! # Venu
//!
//! `venu` is the registration service for a single-event website: it serves
//! the landing page, the sign-up/login flow and the registration form, and
//! delegates credential handling and persistence to two hosted collaborators
//! (a GoTrue-compatible auth API and a PostgREST-compatible data store)
//! addressed by one service URL and one public API key.
//!
//! The crate is split into:
//!
//! - [`cli`] — argument parsing, logging setup and the `server` action.
//! - [`supabase`] — thin HTTP clients for the hosted collaborators.
//! - [`venu`] — the HTTP surface: per-visitor view state, session tracking
//!   and the axum handlers that render each screen.

pub mod cli;
pub mod supabase;
pub mod venu;
