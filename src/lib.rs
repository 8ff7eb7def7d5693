//! Settings service and preferences window for the Outliner editing plugin.
//!
//! The library half is the typed, observable settings store ([`config`]) over
//! an injected asynchronous storage facility ([`storage`]); the binary half
//! is a small desktop window that renders one toggle per setting and persists
//! the record on every flip.

pub mod app;
pub mod config;
pub mod storage;
pub mod ui;
