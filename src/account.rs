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

//! Account balance management.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use smartbank_rs::{Account, AccountCode, ClientId};
//!
//! let account = Account::new(AccountCode(1), ClientId(1));
//! assert_eq!(account.balance(), dec!(0.00));
//! ```

use crate::BankError;
use crate::base::{AccountCode, ClientId};
use parking_lot::Mutex;
use rust_decimal::Decimal;

/// Formats an amount as a money string with exactly two decimal digits,
/// e.g. `R$ 1000.00`. Used for every human-readable history message.
pub fn format_money(amount: Decimal) -> String {
    // round_dp first: Display precision pads but must not be trusted to round
    let rounded = amount.round_dp(2);
    format!("R$ {rounded:.2}")
}

#[derive(Debug)]
struct AccountData {
    code: AccountCode,
    owner: ClientId,
    balance: Decimal,
}

impl AccountData {
    fn new(code: AccountCode, owner: ClientId) -> Self {
        Self {
            code,
            owner,
            balance: Decimal::ZERO,
        }
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.balance >= Decimal::ZERO,
            "Invariant violated: balance went negative: {}",
            self.balance
        );
    }

    /// Increases the balance.
    fn deposit(&mut self, amount: Decimal) -> Result<(), BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::InvalidAmount);
        }
        self.balance += amount;
        self.assert_invariants();
        Ok(())
    }

    /// Decreases the balance, checked against the non-negativity invariant.
    fn withdraw(&mut self, amount: Decimal) -> Result<(), BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::InvalidAmount);
        }
        if self.balance < amount {
            return Err(BankError::InsufficientFunds);
        }
        self.balance -= amount;
        self.assert_invariants();
        Ok(())
    }
}

/// Bank account owned by exactly one client.
///
/// The balance lives behind a [`Mutex`] so concurrent connection handlers can
/// read it while a mutation is in flight; mutations themselves are
/// additionally serialized by the bank-wide lock in [`crate::Bank`].
#[derive(Debug)]
pub struct Account {
    inner: Mutex<AccountData>,
}

impl Account {
    pub fn new(code: AccountCode, owner: ClientId) -> Self {
        Self {
            inner: Mutex::new(AccountData::new(code, owner)),
        }
    }

    pub fn code(&self) -> AccountCode {
        self.inner.lock().code
    }

    pub fn owner(&self) -> ClientId {
        self.inner.lock().owner
    }

    pub fn balance(&self) -> Decimal {
        self.inner.lock().balance
    }

    /// Balance rendered as a two-decimal money string.
    pub fn balance_fmt(&self) -> String {
        format_money(self.balance())
    }

    pub fn deposit(&self, amount: Decimal) -> Result<(), BankError> {
        self.inner.lock().deposit(amount)
    }

    pub fn withdraw(&self, amount: Decimal) -> Result<(), BankError> {
        self.inner.lock().withdraw(amount)
    }
}
