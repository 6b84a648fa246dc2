//! HTTP API: configuration, routing, request/response mapping and the
//! process entry points used by the `parlor` binary.

pub mod app;
pub mod cli;
pub mod config;
pub mod middleware;
pub mod server;
