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

//! Append-only transaction history.
//!
//! Entries are immutable once appended and are surfaced most-recent-first.
//! The log carries no business logic; the [`crate::Bank`] decides what gets
//! recorded and appends inside its mutation-lock scope.

use crate::base::{AccountCode, EntryId};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Fixed vocabulary of ledger mutations recorded in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryKind {
    AccountOpened,
    Withdrawal,
    Deposit,
    TransferSent,
    TransferReceived,
}

/// One immutable history record for an account.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    /// Serialized as an ISO-8601 string on the wire.
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(skip)]
    pub account: AccountCode,
}

/// Append-only history log keyed by account code.
#[derive(Debug, Default)]
pub struct HistoryLog {
    entries: DashMap<AccountCode, Vec<HistoryEntry>>,
    sequence: AtomicU64,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry for `account` and returns its id.
    ///
    /// Appending never fails; the log is purely in-memory.
    pub fn append(&self, account: AccountCode, kind: HistoryKind, message: String) -> EntryId {
        let id = EntryId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        let entry = HistoryEntry {
            id,
            kind,
            timestamp: Utc::now(),
            message,
            account,
        };
        self.entries.entry(account).or_default().push(entry);
        id
    }

    /// Returns all entries for `account`, most recent first.
    pub fn list(&self, account: AccountCode) -> Vec<HistoryEntry> {
        self.entries
            .get(&account)
            .map(|entries| entries.iter().rev().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of entries recorded for `account`.
    pub fn count(&self, account: AccountCode) -> usize {
        self.entries.get(&account).map_or(0, |entries| entries.len())
    }
}
