//! TCP Server
//!
//! Accepts connections and dispatches them to worker threads.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, TrySendError};

use crate::config::Config;
use crate::error::{Result, SeqlogError};
use crate::handler::Handler;
use crate::log::Log;

use super::Connection;

/// How long the acceptor sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// TCP server for SeqLog
///
/// The listener is bound in [`Server::bind`], so the local address is
/// known (and connectable) before [`Server::run`] starts accepting.
pub struct Server {
    config: Config,
    handler: Handler,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
}

/// Signals a running [`Server`] to stop from another thread
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Ask the server to stop accepting and drain its workers
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Check whether shutdown has been requested
    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

impl Server {
    /// Validate the config and bind the listen address
    pub fn bind(config: Config, log: Arc<Log>) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            SeqlogError::Network(format!("failed to bind {}: {}", config.listen_addr, e))
        })?;

        Ok(Self {
            config,
            handler: Handler::new(log),
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The address the server is actually listening on
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle that can stop this server from another thread
    ///
    /// `run` borrows the server mutably until it returns, so take the
    /// handle before calling it; this is the only way to stop a running
    /// server.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Start the server (blocking)
    ///
    /// Returns once shutdown has been signalled and every worker has
    /// finished its current connection.
    pub fn run(&mut self) -> Result<()> {
        self.listener.set_nonblocking(true)?;

        let (tx, rx) = channel::bounded::<TcpStream>(self.config.max_connections);
        let workers = self.spawn_workers(rx)?;

        tracing::info!(
            "Listening on {} with {} workers",
            self.local_addr()?,
            workers.len()
        );

        while !self.shutdown.load(Ordering::Acquire) {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    // Accepted sockets may inherit non-blocking mode on some platforms
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Failed to configure connection from {}: {}", peer, e);
                        continue;
                    }
                    match tx.try_send(stream) {
                        Ok(()) => tracing::trace!("Queued connection from {}", peer),
                        Err(TrySendError::Full(_)) => {
                            tracing::warn!("Connection queue full, refusing {}", peer);
                        }
                        Err(TrySendError::Disconnected(_)) => {
                            return Err(SeqlogError::Network(
                                "all workers exited".to_string(),
                            ));
                        }
                    }
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                }
            }
        }

        tracing::info!("Shutting down, waiting for workers");
        drop(tx);
        for worker in workers {
            if worker.join().is_err() {
                tracing::error!("Worker thread panicked");
            }
        }

        Ok(())
    }

    fn spawn_workers(&self, rx: Receiver<TcpStream>) -> Result<Vec<JoinHandle<()>>> {
        let mut workers = Vec::with_capacity(self.config.worker_threads);

        for id in 0..self.config.worker_threads {
            let rx = rx.clone();
            let handler = self.handler.clone();
            let read_ms = self.config.read_timeout_ms;
            let write_ms = self.config.write_timeout_ms;

            let worker = thread::Builder::new()
                .name(format!("seqlog-worker-{}", id))
                .spawn(move || worker_loop(rx, handler, read_ms, write_ms))?;
            workers.push(worker);
        }

        Ok(workers)
    }
}

/// Serve queued connections one at a time until the channel closes
fn worker_loop(rx: Receiver<TcpStream>, handler: Handler, read_ms: u64, write_ms: u64) {
    for stream in rx.iter() {
        let mut connection = match Connection::new(stream, handler.clone()) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Failed to set up connection: {}", e);
                continue;
            }
        };

        if let Err(e) = connection.set_timeouts(read_ms, write_ms) {
            tracing::warn!("Failed to set timeouts for {}: {}", connection.peer_addr(), e);
            continue;
        }

        if let Err(e) = connection.handle() {
            tracing::debug!("Connection {} closed with error: {}", connection.peer_addr(), e);
        }
    }
}
