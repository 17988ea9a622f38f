// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! TCP acceptor and per-connection handlers.
//!
//! One task per accepted connection; each loops reading one JSON line,
//! dispatching through the router, and writing one JSON line back. Handler
//! errors never close a connection - only EOF, transport failure, or the
//! shutdown signal do.

use crate::bank::Bank;
use crate::router;
use crate::session::SessionRegistry;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Pause between bind attempts when the address is already in use.
const BIND_RETRY_INTERVAL: Duration = Duration::from_secs(10);

/// How long shutdown waits for in-flight connections before aborting them.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Sent when a response unexpectedly fails to serialize.
const FALLBACK_RESPONSE: &str = r#"{"error":true,"message":"internal server error"}"#;

/// The connection acceptor.
///
/// Owns handles to the shared bank and session registry and hands clones to
/// every spawned connection handler.
pub struct Server {
    bank: Arc<Bank>,
    sessions: Arc<SessionRegistry>,
}

impl Server {
    pub fn new(bank: Arc<Bank>, sessions: Arc<SessionRegistry>) -> Self {
        Self { bank, sessions }
    }

    /// Binds the listening socket, retrying indefinitely while the address
    /// is in use. Other bind errors fail fast.
    pub async fn bind(
        addr: SocketAddr,
        shutdown: &mut watch::Receiver<bool>,
    ) -> io::Result<TcpListener> {
        loop {
            match TcpListener::bind(addr).await {
                Ok(listener) => {
                    info!(%addr, "server listening");
                    return Ok(listener);
                }
                Err(error) if error.kind() == io::ErrorKind::AddrInUse => {
                    warn!(
                        %addr,
                        retry_in = ?BIND_RETRY_INTERVAL,
                        "address already in use, retrying"
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(BIND_RETRY_INTERVAL) => {}
                        _ = shutdown.changed() => {
                            return Err(io::Error::new(
                                io::ErrorKind::Interrupted,
                                "shutdown requested before bind succeeded",
                            ));
                        }
                    }
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Binds to `addr` and serves until the shutdown signal flips.
    pub async fn run(
        self,
        addr: SocketAddr,
        mut shutdown: watch::Receiver<bool>,
    ) -> io::Result<()> {
        let listener = Self::bind(addr, &mut shutdown).await?;
        self.serve(listener, shutdown).await
    }

    /// Accept loop over an already-bound listener.
    ///
    /// Tracks every connection handler in a [`JoinSet`], reaping finished
    /// ones opportunistically. On shutdown it stops accepting, lets handlers
    /// finish their current exchange, and aborts whatever is still running
    /// after the grace period.
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown: watch::Receiver<bool>,
    ) -> io::Result<()> {
        let mut handlers: JoinSet<()> = JoinSet::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            info!(%peer, "socket connected");
                            let bank = Arc::clone(&self.bank);
                            let sessions = Arc::clone(&self.sessions);
                            let shutdown = shutdown.clone();
                            handlers.spawn(handle_connection(
                                bank, sessions, stream, peer, shutdown,
                            ));
                        }
                        Err(error) => {
                            warn!(%error, "failed to accept connection");
                        }
                    }
                    // Reap handlers that have already exited.
                    while handlers.try_join_next().is_some() {}
                }
                _ = shutdown.changed() => break,
            }
        }

        drop(listener);
        info!(active = handlers.len(), "shutting down, waiting for connections");

        let drain = async {
            while handlers.join_next().await.is_some() {}
        };
        if tokio::time::timeout(SHUTDOWN_GRACE, drain).await.is_err() {
            warn!("grace period elapsed, aborting remaining connections");
            handlers.abort_all();
        }
        Ok(())
    }
}

/// Per-connection request/response loop.
///
/// Framing is one JSON object per newline-terminated line. The current
/// exchange is never interrupted: the shutdown signal is only observed at
/// the read boundary.
async fn handle_connection(
    bank: Arc<Bank>,
    sessions: Arc<SessionRegistry>,
    stream: TcpStream,
    peer: SocketAddr,
    mut shutdown: watch::Receiver<bool>,
) {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    loop {
        let line = tokio::select! {
            read = lines.next_line() => match read {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!(%peer, "socket disconnected");
                    break;
                }
                Err(error) => {
                    debug!(%peer, %error, "read failed");
                    break;
                }
            },
            _ = shutdown.changed() => {
                debug!(%peer, "connection stopped by shutdown");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = router::dispatch(&bank, &sessions, &line);
        let mut payload =
            serde_json::to_string(&response).unwrap_or_else(|_| FALLBACK_RESPONSE.to_owned());
        payload.push('\n');

        if let Err(error) = write_half.write_all(payload.as_bytes()).await {
            debug!(%peer, %error, "write failed");
            break;
        }
    }
}
