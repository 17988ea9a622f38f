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

//! Error types for request handling and banking operations.
//!
//! Every variant is recoverable at the connection level: the router converts
//! it into an `error: true` response and the connection stays open. Only
//! transport failure ends a connection.

use thiserror::Error;

/// Banking and protocol errors.
///
/// The `Display` string of each variant is the `message` field sent back to
/// the client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BankError {
    /// Request line was not a decodable JSON object
    #[error("could not read the request")]
    MalformedRequest,

    /// Action field absent or names no known operation
    #[error("invalid operation")]
    InvalidOperation,

    /// Missing, unknown, or logged-out session token on a private action
    #[error("client is not authenticated")]
    NotAuthenticated,

    /// Unknown tax-id or password digest mismatch on login
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Registration with a tax-id that is already taken
    #[error("cpf is already registered")]
    DuplicateClient,

    /// Session resolved to a client that no longer exists
    #[error("client not found")]
    ClientNotFound,

    /// Operation references an account code with no account behind it
    #[error("account not found")]
    UnknownAccount,

    /// Amount is zero, negative, or not numeric
    #[error("invalid amount (must be positive)")]
    InvalidAmount,

    /// Debit would exceed the available balance
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Collaborator failure; fatal for the in-flight request only
    #[error("internal server error")]
    Internal,
}

#[cfg(test)]
mod tests {
    use super::BankError;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            BankError::MalformedRequest.to_string(),
            "could not read the request"
        );
        assert_eq!(BankError::InvalidOperation.to_string(), "invalid operation");
        assert_eq!(
            BankError::NotAuthenticated.to_string(),
            "client is not authenticated"
        );
        assert_eq!(
            BankError::InvalidCredentials.to_string(),
            "invalid credentials"
        );
        assert_eq!(
            BankError::DuplicateClient.to_string(),
            "cpf is already registered"
        );
        assert_eq!(BankError::ClientNotFound.to_string(), "client not found");
        assert_eq!(BankError::UnknownAccount.to_string(), "account not found");
        assert_eq!(
            BankError::InvalidAmount.to_string(),
            "invalid amount (must be positive)"
        );
        assert_eq!(
            BankError::InsufficientFunds.to_string(),
            "insufficient funds"
        );
        assert_eq!(BankError::Internal.to_string(), "internal server error");
    }

    #[test]
    fn errors_are_cloneable() {
        let error = BankError::InsufficientFunds;
        let cloned = error.clone();
        assert_eq!(error, cloned);
    }
}
