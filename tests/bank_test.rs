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

//! Bank public API integration tests.

use rust_decimal_macros::dec;
use smartbank_rs::{AccountCode, Bank, BankError, HistoryKind};

/// Registers a client and returns their account code.
fn open_account(bank: &Bank, cpf: &str) -> AccountCode {
    let id = bank.register_client("Test Client", cpf, "secret").unwrap();
    AccountCode(id.0)
}

// === Registration ===

#[test]
fn register_provisions_account_with_zero_balance() {
    let bank = Bank::new();
    let code = open_account(&bank, "11111111111");

    let account = bank.get_account(&code).unwrap();
    assert_eq!(account.balance(), dec!(0));
}

#[test]
fn register_records_account_opened_entry() {
    let bank = Bank::new();
    let code = open_account(&bank, "11111111111");

    let history = bank.history_of(code);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, HistoryKind::AccountOpened);
    assert_eq!(history[0].message, "Initial balance: R$ 0.00");
}

#[test]
fn register_duplicate_cpf_creates_nothing() {
    let bank = Bank::new();
    open_account(&bank, "11111111111");

    let result = bank.register_client("Impostor", "11111111111", "other");
    assert_eq!(result, Err(BankError::DuplicateClient));
    assert_eq!(bank.directory().len(), 1);
}

#[test]
fn account_code_derives_from_client_id() {
    let bank = Bank::new();
    let first = bank.register_client("Ana", "11111111111", "pw").unwrap();
    let second = bank.register_client("Bia", "22222222222", "pw").unwrap();

    assert_eq!(bank.account_of(first).unwrap().code(), AccountCode(first.0));
    assert_eq!(
        bank.account_of(second).unwrap().code(),
        AccountCode(second.0)
    );
    assert_ne!(first, second);
}

// === Deposits and withdrawals ===

#[test]
fn deposit_increases_balance_and_logs() {
    let bank = Bank::new();
    let code = open_account(&bank, "11111111111");

    bank.deposit(code, dec!(1000)).unwrap();

    assert_eq!(bank.get_account(&code).unwrap().balance(), dec!(1000));
    let history = bank.history_of(code);
    assert_eq!(history[0].kind, HistoryKind::Deposit);
    assert_eq!(history[0].message, "Amount: R$ 1000.00");
}

#[test]
fn deposit_rejects_non_positive_amounts() {
    let bank = Bank::new();
    let code = open_account(&bank, "11111111111");

    assert_eq!(bank.deposit(code, dec!(0)), Err(BankError::InvalidAmount));
    assert_eq!(bank.deposit(code, dec!(-10)), Err(BankError::InvalidAmount));
    assert_eq!(bank.get_account(&code).unwrap().balance(), dec!(0));
    assert_eq!(bank.history_of(code).len(), 1); // only account-opened
}

#[test]
fn withdraw_decreases_balance_and_logs() {
    let bank = Bank::new();
    let code = open_account(&bank, "11111111111");
    bank.deposit(code, dec!(1000)).unwrap();

    bank.withdraw(code, dec!(500)).unwrap();

    assert_eq!(bank.get_account(&code).unwrap().balance(), dec!(500));
    let history = bank.history_of(code);
    assert_eq!(history[0].kind, HistoryKind::Withdrawal);
    assert_eq!(history[0].message, "Amount: R$ 500.00");
}

#[test]
fn withdraw_beyond_balance_fails_without_mutation() {
    let bank = Bank::new();
    let code = open_account(&bank, "11111111111");
    bank.deposit(code, dec!(1000)).unwrap();

    let result = bank.withdraw(code, dec!(1500));

    assert_eq!(result, Err(BankError::InsufficientFunds));
    assert_eq!(bank.get_account(&code).unwrap().balance(), dec!(1000));
    // account-opened + deposit, nothing for the failed withdrawal
    assert_eq!(bank.history_of(code).len(), 2);
}

#[test]
fn operations_on_unknown_account_fail() {
    let bank = Bank::new();
    let missing = AccountCode(999);

    assert_eq!(
        bank.deposit(missing, dec!(10)),
        Err(BankError::UnknownAccount)
    );
    assert_eq!(
        bank.withdraw(missing, dec!(10)),
        Err(BankError::UnknownAccount)
    );
}

// === Transfers ===

#[test]
fn transfer_moves_funds_and_logs_both_sides() {
    let bank = Bank::new();
    let origin = open_account(&bank, "11111111111");
    let destination = open_account(&bank, "22222222222");
    bank.deposit(origin, dec!(500)).unwrap();

    bank.transfer(origin, destination, dec!(200)).unwrap();

    assert_eq!(bank.get_account(&origin).unwrap().balance(), dec!(300));
    assert_eq!(bank.get_account(&destination).unwrap().balance(), dec!(200));

    let sent = &bank.history_of(origin)[0];
    assert_eq!(sent.kind, HistoryKind::TransferSent);
    assert_eq!(
        sent.message,
        format!("Amount: R$ 200.00, destination account: {destination}")
    );

    let received = &bank.history_of(destination)[0];
    assert_eq!(received.kind, HistoryKind::TransferReceived);
    assert_eq!(
        received.message,
        format!("Amount: R$ 200.00, origin account: {origin}")
    );
}

#[test]
fn failed_transfer_leaves_both_sides_untouched() {
    let bank = Bank::new();
    let origin = open_account(&bank, "11111111111");
    let destination = open_account(&bank, "22222222222");
    bank.deposit(origin, dec!(100)).unwrap();

    let result = bank.transfer(origin, destination, dec!(250));

    assert_eq!(result, Err(BankError::InsufficientFunds));
    assert_eq!(bank.get_account(&origin).unwrap().balance(), dec!(100));
    assert_eq!(bank.get_account(&destination).unwrap().balance(), dec!(0));
    assert_eq!(bank.history_of(origin).len(), 2); // opened + deposit
    assert_eq!(bank.history_of(destination).len(), 1); // opened
}

#[test]
fn transfer_with_invalid_amount_fails_without_mutation() {
    let bank = Bank::new();
    let origin = open_account(&bank, "11111111111");
    let destination = open_account(&bank, "22222222222");
    bank.deposit(origin, dec!(100)).unwrap();

    assert_eq!(
        bank.transfer(origin, destination, dec!(0)),
        Err(BankError::InvalidAmount)
    );
    assert_eq!(
        bank.transfer(origin, destination, dec!(-5)),
        Err(BankError::InvalidAmount)
    );
    assert_eq!(bank.get_account(&origin).unwrap().balance(), dec!(100));
    assert_eq!(bank.get_account(&destination).unwrap().balance(), dec!(0));
}

#[test]
fn transfer_to_unknown_destination_fails() {
    let bank = Bank::new();
    let origin = open_account(&bank, "11111111111");
    bank.deposit(origin, dec!(100)).unwrap();

    let result = bank.transfer(origin, AccountCode(999), dec!(50));

    assert_eq!(result, Err(BankError::UnknownAccount));
    assert_eq!(bank.get_account(&origin).unwrap().balance(), dec!(100));
}

#[test]
fn self_transfer_succeeds_as_noop() {
    let bank = Bank::new();
    let code = open_account(&bank, "11111111111");
    bank.deposit(code, dec!(100)).unwrap();

    bank.transfer(code, code, dec!(50)).unwrap();
    // Even invalid amounts succeed on self-transfer; nothing is validated.
    bank.transfer(code, code, dec!(-50)).unwrap();
    bank.transfer(code, code, dec!(1_000_000)).unwrap();

    assert_eq!(bank.get_account(&code).unwrap().balance(), dec!(100));
    assert_eq!(bank.history_of(code).len(), 2); // opened + deposit only
}

#[test]
fn transfer_conserves_total_balance() {
    let bank = Bank::new();
    let a = open_account(&bank, "11111111111");
    let b = open_account(&bank, "22222222222");
    bank.deposit(a, dec!(700)).unwrap();
    bank.deposit(b, dec!(300)).unwrap();

    bank.transfer(a, b, dec!(450)).unwrap();
    bank.transfer(b, a, dec!(120.50)).unwrap();

    let total =
        bank.get_account(&a).unwrap().balance() + bank.get_account(&b).unwrap().balance();
    assert_eq!(total, dec!(1000));
}

// === History ordering ===

#[test]
fn history_is_most_recent_first() {
    let bank = Bank::new();
    let code = open_account(&bank, "11111111111");
    bank.deposit(code, dec!(1000)).unwrap();
    bank.withdraw(code, dec!(200)).unwrap();

    let history = bank.history_of(code);
    let kinds: Vec<_> = history.iter().map(|entry| entry.kind).collect();
    assert_eq!(
        kinds,
        vec![
            HistoryKind::Withdrawal,
            HistoryKind::Deposit,
            HistoryKind::AccountOpened,
        ]
    );

    // Entry ids also decrease from most recent to oldest.
    assert!(history[0].id.0 > history[1].id.0);
    assert!(history[1].id.0 > history[2].id.0);
}
