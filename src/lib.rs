//! todod: a small CRUD service for todo items and user accounts.
//!
//! HTTP Basic-Auth is exchanged for an opaque session cookie by the auth
//! middleware; everything behind `/api/v1` except `/health` and `/logout`
//! requires an authenticated identity.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod health;
pub mod state;
pub mod statuses;
pub mod tls;
pub mod todos;
pub mod users;
