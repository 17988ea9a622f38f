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

//! Transactional banking core.
//!
//! The [`Bank`] is the central service object: it owns the client directory,
//! the account map, and the history log, and it coordinates every balance
//! mutation. It is constructed once at process start and shared by handle
//! into the acceptor and router; there are no ambient globals.
//!
//! # Consistency
//!
//! A single bank-wide mutex serializes all mutating operations (withdraw,
//! deposit, transfer, registration), each held for the full duration of the
//! operation including its history appends. This trades cross-account
//! parallelism for an auditable guarantee: no lost updates, no double
//! spends, and a failed transfer leaves both balances and both histories
//! untouched. Reads are taken outside the lock and may observe a balance
//! mid-mutation.
//!
//! The lock is a synchronous [`parking_lot::Mutex`] and nothing awaits while
//! holding it.

use crate::account::{Account, format_money};
use crate::base::{AccountCode, ClientId};
use crate::directory::{Client, ClientDirectory};
use crate::error::BankError;
use crate::history::{HistoryEntry, HistoryKind, HistoryLog};
use dashmap::DashMap;
use parking_lot::Mutex;
use rust_decimal::Decimal;

/// Banking service object managing clients, accounts, and history.
///
/// # Invariants
///
/// - Every registered client owns exactly one account, created atomically
///   with the client record.
/// - Account balances never go negative.
/// - At most one mutating operation runs at a time, system-wide.
pub struct Bank {
    directory: ClientDirectory,
    /// Accounts indexed by account code.
    accounts: DashMap<AccountCode, Account>,
    history: HistoryLog,
    /// Serializes all balance mutations and their history appends.
    mutation_lock: Mutex<()>,
}

impl Bank {
    /// Creates a bank with no clients or accounts.
    pub fn new() -> Self {
        Bank {
            directory: ClientDirectory::new(),
            accounts: DashMap::new(),
            history: HistoryLog::new(),
            mutation_lock: Mutex::new(()),
        }
    }

    /// The client directory, for credential checks at login.
    pub fn directory(&self) -> &ClientDirectory {
        &self.directory
    }

    /// Registers a client and atomically provisions their account with a
    /// zero balance, recording the `account-opened` history entry.
    ///
    /// # Errors
    ///
    /// Returns [`BankError::DuplicateClient`] if the cpf is already
    /// registered; nothing is created in that case.
    pub fn register_client(
        &self,
        name: &str,
        cpf: &str,
        raw_password: &str,
    ) -> Result<ClientId, BankError> {
        let _guard = self.mutation_lock.lock();

        let client_id = self.directory.register(name, cpf, raw_password)?;
        let code = AccountCode(client_id.0);
        self.accounts.insert(code, Account::new(code, client_id));
        self.history.append(
            code,
            HistoryKind::AccountOpened,
            format!("Initial balance: {}", format_money(Decimal::ZERO)),
        );
        Ok(client_id)
    }

    /// Debits `amount` from the account and records a `withdrawal` entry.
    ///
    /// # Errors
    ///
    /// - [`BankError::UnknownAccount`] - No account behind `code`.
    /// - [`BankError::InvalidAmount`] - `amount` is zero or negative.
    /// - [`BankError::InsufficientFunds`] - `amount` exceeds the balance.
    ///
    /// The account is left unchanged on any error.
    pub fn withdraw(&self, code: AccountCode, amount: Decimal) -> Result<(), BankError> {
        let _guard = self.mutation_lock.lock();

        let account = self.accounts.get(&code).ok_or(BankError::UnknownAccount)?;
        account.withdraw(amount)?;
        self.history.append(
            code,
            HistoryKind::Withdrawal,
            format!("Amount: {}", format_money(amount)),
        );
        Ok(())
    }

    /// Credits `amount` to the account and records a `deposit` entry.
    ///
    /// # Errors
    ///
    /// - [`BankError::UnknownAccount`] - No account behind `code`.
    /// - [`BankError::InvalidAmount`] - `amount` is zero or negative.
    pub fn deposit(&self, code: AccountCode, amount: Decimal) -> Result<(), BankError> {
        let _guard = self.mutation_lock.lock();

        let account = self.accounts.get(&code).ok_or(BankError::UnknownAccount)?;
        account.deposit(amount)?;
        self.history.append(
            code,
            HistoryKind::Deposit,
            format!("Amount: {}", format_money(amount)),
        );
        Ok(())
    }

    /// Moves `amount` from `origin` to `destination` as one atomic unit,
    /// recording `transfer-sent` and `transfer-received` entries.
    ///
    /// A transfer to the same account succeeds as a no-op: no balance
    /// change, no history, regardless of the amount.
    ///
    /// # Errors
    ///
    /// - [`BankError::UnknownAccount`] - Either code has no account.
    /// - [`BankError::InvalidAmount`] - `amount` is zero or negative.
    /// - [`BankError::InsufficientFunds`] - `amount` exceeds origin balance.
    ///
    /// A failed transfer leaves both balances and both histories unchanged.
    pub fn transfer(
        &self,
        origin: AccountCode,
        destination: AccountCode,
        amount: Decimal,
    ) -> Result<(), BankError> {
        if origin == destination {
            return Ok(());
        }

        let _guard = self.mutation_lock.lock();

        let origin_account = self.accounts.get(&origin).ok_or(BankError::UnknownAccount)?;
        let destination_account = self
            .accounts
            .get(&destination)
            .ok_or(BankError::UnknownAccount)?;

        // The debit validates the amount, so the credit below cannot fail
        // and the operation never half-applies.
        origin_account.withdraw(amount)?;
        destination_account.deposit(amount)?;

        self.history.append(
            origin,
            HistoryKind::TransferSent,
            format!(
                "Amount: {}, destination account: {}",
                format_money(amount),
                destination
            ),
        );
        self.history.append(
            destination,
            HistoryKind::TransferReceived,
            format!(
                "Amount: {}, origin account: {}",
                format_money(amount),
                origin
            ),
        );
        Ok(())
    }

    /// Retrieves a client record by id.
    pub fn client(&self, id: ClientId) -> Option<Client> {
        self.directory.get(id)
    }

    /// Retrieves the account owned by a client.
    ///
    /// Account codes are derived from client ids, so this is a direct map
    /// lookup.
    pub fn account_of(
        &self,
        client: ClientId,
    ) -> Option<dashmap::mapref::one::Ref<'_, AccountCode, Account>> {
        self.accounts.get(&AccountCode(client.0))
    }

    /// Retrieves an account by code.
    pub fn get_account(
        &self,
        code: &AccountCode,
    ) -> Option<dashmap::mapref::one::Ref<'_, AccountCode, Account>> {
        self.accounts.get(code)
    }

    /// History of an account, most recent first.
    pub fn history_of(&self, code: AccountCode) -> Vec<HistoryEntry> {
        self.history.list(code)
    }
}

impl Default for Bank {
    fn default() -> Self {
        Self::new()
    }
}
