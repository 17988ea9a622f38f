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

//! Client directory: identity records and credential checks.
//!
//! The directory maps a client identity (name, tax-id, password digest) to a
//! client id and enforces tax-id uniqueness. Passwords only ever cross this
//! boundary as digests produced by [`crate::crypt`].

use crate::BankError;
use crate::base::ClientId;
use crate::crypt;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identity record of a registered client.
#[derive(Debug, Clone)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub cpf: String,
    pub password_digest: String,
}

/// Shared directory of registered clients.
///
/// Lookups by id and by tax-id are both O(1); the tax-id map doubles as the
/// uniqueness guard via the entry API, so two racing registrations with the
/// same cpf cannot both succeed.
#[derive(Debug, Default)]
pub struct ClientDirectory {
    clients: DashMap<ClientId, Client>,
    by_cpf: DashMap<String, ClientId>,
    sequence: AtomicU32,
}

impl ClientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new client, storing the password as a one-way digest.
    ///
    /// # Errors
    ///
    /// Returns [`BankError::DuplicateClient`] if the cpf is already taken.
    pub fn register(&self, name: &str, cpf: &str, raw_password: &str) -> Result<ClientId, BankError> {
        match self.by_cpf.entry(cpf.to_owned()) {
            Entry::Occupied(_) => Err(BankError::DuplicateClient),
            Entry::Vacant(entry) => {
                let id = ClientId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
                entry.insert(id);
                self.clients.insert(
                    id,
                    Client {
                        id,
                        name: name.to_owned(),
                        cpf: cpf.to_owned(),
                        password_digest: crypt::hash(raw_password),
                    },
                );
                Ok(id)
            }
        }
    }

    pub fn get(&self, id: ClientId) -> Option<Client> {
        self.clients.get(&id).map(|client| client.clone())
    }

    pub fn find_by_cpf(&self, cpf: &str) -> Option<Client> {
        let id = *self.by_cpf.get(cpf)?;
        self.get(id)
    }

    /// Looks a client up by tax-id or by numeric id, exact match only.
    ///
    /// The id branch requires the identifier to be the id's canonical
    /// rendering: `"1"` matches client 1, `"0001"` and `"00000000001"` do
    /// not, so zero-padded tax-ids never alias an id.
    pub fn lookup(&self, identifier: &str) -> Option<Client> {
        if let Some(client) = self.find_by_cpf(identifier) {
            return Some(client);
        }
        let id = identifier.parse::<u32>().ok()?;
        let client = self.get(ClientId(id))?;
        (identifier == client.id.to_string()).then_some(client)
    }

    /// Validates a cpf/password pair.
    ///
    /// Unknown cpf and wrong password are indistinguishable to the caller;
    /// both come back as [`BankError::InvalidCredentials`].
    pub fn verify_credentials(&self, cpf: &str, raw_password: &str) -> Result<ClientId, BankError> {
        let client = self.lookup(cpf).ok_or(BankError::InvalidCredentials)?;
        if !crypt::verify(raw_password, &client.password_digest) {
            return Err(BankError::InvalidCredentials);
        }
        Ok(client.id)
    }

    /// Number of registered clients.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
