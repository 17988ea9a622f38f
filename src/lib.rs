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

//! # SmartBank
//!
//! This library provides a multi-client banking server: clients connect over
//! TCP, authenticate, and issue operations (register, login, withdraw,
//! deposit, transfer, history query) as newline-delimited JSON messages.
//!
//! ## Core Components
//!
//! - [`Bank`]: Transactional core managing clients, accounts, and history
//! - [`SessionRegistry`]: Opaque tokens binding connections to clients
//! - [`router::dispatch`]: Per-message entry point (parse, auth gate, handle)
//! - [`Server`]: TCP acceptor spawning one handler task per connection
//!
//! ## Example
//!
//! ```
//! use smartbank_rs::{AccountCode, Bank};
//! use rust_decimal_macros::dec;
//!
//! let bank = Bank::new();
//!
//! let client_id = bank.register_client("Pedro", "11122233344", "123").unwrap();
//! let code = AccountCode(client_id.0);
//!
//! bank.deposit(code, dec!(1000.00)).unwrap();
//! bank.withdraw(code, dec!(250.00)).unwrap();
//!
//! let account = bank.get_account(&code).unwrap();
//! assert_eq!(account.balance(), dec!(750.00));
//! ```
//!
//! ## Thread Safety
//!
//! All shared state is safe for concurrent connection handlers. Balance
//! mutations are serialized by a single bank-wide lock (see [`Bank`]);
//! session bookkeeping uses its own finer-grained map.

pub mod account;
mod bank;
mod base;
mod crypt;
mod directory;
pub mod error;
mod history;
pub mod protocol;
pub mod router;
mod server;
mod session;

pub use account::Account;
pub use bank::Bank;
pub use base::{AccountCode, ClientId, EntryId};
pub use directory::{Client, ClientDirectory};
pub use error::BankError;
pub use history::{HistoryEntry, HistoryKind, HistoryLog};
pub use protocol::{Request, Response};
pub use server::Server;
pub use session::SessionRegistry;
