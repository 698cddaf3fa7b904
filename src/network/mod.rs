//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread (non-blocking accept loop, polls for shutdown)
//! - Worker thread pool fed by a bounded crossbeam channel
//! - Commands routed through the [`Handler`](crate::handler::Handler)

mod server;
mod connection;
mod client;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
pub use client::Client;
