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

use clap::Parser;
use smartbank_rs::{Bank, Server, SessionRegistry};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::process;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// SmartBank - Multi-client banking server
///
/// Listens for TCP connections and serves banking operations (register,
/// login, withdraw, deposit, transfer, history) as newline-delimited JSON.
#[derive(Parser, Debug)]
#[command(name = "smartbank")]
#[command(about = "A banking server speaking newline-delimited JSON over TCP", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    host: IpAddr,

    /// Port to listen on
    #[arg(long, default_value_t = 8001)]
    port: u16,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "smartbank_rs=info".into()),
        )
        .init();

    let args = Args::parse();
    let addr = SocketAddr::new(args.host, args.port);

    // The only construction site for shared state; everything downstream
    // receives handles.
    let bank = Arc::new(Bank::new());
    let sessions = Arc::new(SessionRegistry::new());
    let server = Server::new(bank, sessions);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
        }
        let _ = shutdown_tx.send(true);
    });

    if let Err(e) = server.run(addr, shutdown_rx).await {
        error!("server error: {e}");
        process::exit(1);
    }
}
