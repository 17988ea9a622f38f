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

//! Session registry: opaque tokens binding connections to authenticated
//! clients.
//!
//! Tokens are random alphanumeric strings with a server-side-only mapping to
//! the client id; nothing about the client is recoverable from the token
//! itself. Sessions live until explicit logout or process exit, and one
//! client may hold several concurrent sessions.

use crate::BankError;
use crate::base::ClientId;
use crate::directory::ClientDirectory;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rand::Rng;
use rand::distributions::Alphanumeric;

/// Length of generated session tokens.
const TOKEN_LEN: usize = 24;

/// Shared registry of active session tokens.
///
/// Uses its own map rather than the bank's mutation lock: the token table has
/// no cross-entity invariant with the ledger, so `add`/`check`/`logout` only
/// need per-map consistency.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    tokens: DashMap<String, ClientId>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticates the credentials against the directory and opens a
    /// session on success.
    pub fn login(
        &self,
        directory: &ClientDirectory,
        cpf: &str,
        raw_password: &str,
    ) -> Result<String, BankError> {
        let client_id = directory.verify_credentials(cpf, raw_password)?;
        Ok(self.add(client_id))
    }

    /// Opens a session for an already-authenticated client and returns the
    /// new token.
    pub fn add(&self, client_id: ClientId) -> String {
        loop {
            let token: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(TOKEN_LEN)
                .map(char::from)
                .collect();

            // Collisions are astronomically unlikely; retry anyway rather
            // than silently rebinding an existing token.
            match self.tokens.entry(token.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(entry) => {
                    entry.insert(client_id);
                    return token;
                }
            }
        }
    }

    /// Whether the token is currently registered.
    pub fn check(&self, token: &str) -> bool {
        self.tokens.contains_key(token)
    }

    /// Resolves a token to the client it was issued to.
    pub fn resolve(&self, token: &str) -> Option<ClientId> {
        self.tokens.get(token).map(|id| *id)
    }

    /// Destroys the session. Logging out an unknown token is not an error.
    pub fn logout(&self, token: &str) {
        self.tokens.remove(token);
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
