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

//! Wire protocol types.
//!
//! Requests and responses are single-line UTF-8 JSON objects. The request
//! `action` field tags a closed [`Request`] enum, so the router's dispatch is
//! an exhaustive match rather than a string-keyed table. Responses always
//! carry an `error` boolean.

use crate::BankError;
use crate::base::{ClientId, EntryId};
use crate::history::HistoryEntry;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// One client request, tagged by its `action` field.
///
/// Amounts stay as raw JSON values here; handlers parse them with
/// [`parse_amount`] so that non-numeric input surfaces as
/// [`BankError::InvalidAmount`] rather than a malformed-request error.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Request {
    RegisterClient {
        name: String,
        cpf: String,
        password: String,
    },
    ClientIsLogged {
        #[serde(default)]
        token: Option<String>,
    },
    LoginClient {
        cpf: String,
        password: String,
    },
    LogoutClient {
        #[serde(default)]
        token: Option<String>,
    },
    GetClient {
        #[serde(default)]
        token: Option<String>,
    },
    GetClientHistory {
        #[serde(default)]
        token: Option<String>,
    },
    Withdraw {
        #[serde(default)]
        token: Option<String>,
        amount: Value,
    },
    Deposit {
        #[serde(default)]
        token: Option<String>,
        amount: Value,
    },
    Transfer {
        #[serde(default)]
        token: Option<String>,
        amount: Value,
        destination_acc_code: String,
    },
}

impl Request {
    /// Whether the action may only be invoked with a valid session token.
    pub fn requires_auth(&self) -> bool {
        match self {
            Request::RegisterClient { .. }
            | Request::ClientIsLogged { .. }
            | Request::LoginClient { .. } => false,
            Request::LogoutClient { .. }
            | Request::GetClient { .. }
            | Request::GetClientHistory { .. }
            | Request::Withdraw { .. }
            | Request::Deposit { .. }
            | Request::Transfer { .. } => true,
        }
    }

    /// The session token carried by the request, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            Request::RegisterClient { .. } | Request::LoginClient { .. } => None,
            Request::ClientIsLogged { token }
            | Request::LogoutClient { token }
            | Request::GetClient { token }
            | Request::GetClientHistory { token }
            | Request::Withdraw { token, .. }
            | Request::Deposit { token, .. }
            | Request::Transfer { token, .. } => token.as_deref(),
        }
    }

    /// Whether `action` names a known operation (after lowercasing).
    pub fn is_known_action(action: &str) -> bool {
        matches!(
            action,
            "register_client"
                | "client_is_logged"
                | "login_client"
                | "logout_client"
                | "get_client"
                | "get_client_history"
                | "withdraw"
                | "deposit"
                | "transfer"
        )
    }
}

/// Parses a client-supplied amount.
///
/// Accepts JSON numbers and numeric strings; everything else is
/// [`BankError::InvalidAmount`]. Sign and range checks happen later in the
/// ledger.
pub fn parse_amount(raw: &Value) -> Result<Decimal, BankError> {
    let parsed = match raw {
        Value::Number(number) => Decimal::from_str(&number.to_string()).ok(),
        Value::String(text) => Decimal::from_str(text.trim()).ok(),
        _ => None,
    };
    parsed.ok_or(BankError::InvalidAmount)
}

/// Account fields nested in the `get_client` response.
#[derive(Debug, Serialize)]
pub struct AccountInfo {
    /// Zero-padded account code, e.g. `"0046"`.
    pub code: String,
    /// Balance with exactly two decimal digits, e.g. `"1000.00"`.
    pub balance: String,
}

/// History fields in the `get_client_history` response.
#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub id: EntryId,
    #[serde(rename = "type")]
    pub kind: crate::history::HistoryKind,
    pub timestamp: String,
    pub message: String,
}

impl From<HistoryEntry> for HistoryItem {
    fn from(entry: HistoryEntry) -> Self {
        HistoryItem {
            id: entry.id,
            kind: entry.kind,
            timestamp: entry.timestamp.to_rfc3339(),
            message: entry.message,
        }
    }
}

/// One server response. Every variant serializes with an `error` flag.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Response {
    Message {
        error: bool,
        message: String,
    },
    Session {
        error: bool,
        message: String,
        token: String,
    },
    Logged {
        error: bool,
        is_logged: bool,
    },
    Client {
        error: bool,
        id: ClientId,
        name: String,
        cpf: String,
        account: AccountInfo,
    },
    History {
        error: bool,
        history: Vec<HistoryItem>,
    },
}

impl Response {
    pub fn failure(error: BankError) -> Self {
        Response::Message {
            error: true,
            message: error.to_string(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Response::Message {
            error: false,
            message: message.into(),
        }
    }

    pub fn session(message: impl Into<String>, token: String) -> Self {
        Response::Session {
            error: false,
            message: message.into(),
            token,
        }
    }

    pub fn logged(is_logged: bool) -> Self {
        Response::Logged {
            error: false,
            is_logged,
        }
    }

    pub fn history(history: Vec<HistoryItem>) -> Self {
        Response::History {
            error: false,
            history,
        }
    }

    /// Whether this response reports a failure.
    pub fn is_error(&self) -> bool {
        match self {
            Response::Message { error, .. }
            | Response::Session { error, .. }
            | Response::Logged { error, .. }
            | Response::Client { error, .. }
            | Response::History { error, .. } => *error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn request_deserializes_by_action_tag() {
        let raw = r#"{"action":"register_client","name":"Pedro","cpf":"11122233344","password":"123"}"#;
        let request: Request = serde_json::from_str(raw).unwrap();
        assert!(matches!(request, Request::RegisterClient { .. }));
        assert!(!request.requires_auth());
    }

    #[test]
    fn private_actions_expose_their_token() {
        let raw = r#"{"action":"withdraw","token":"abc","amount":"10"}"#;
        let request: Request = serde_json::from_str(raw).unwrap();
        assert!(request.requires_auth());
        assert_eq!(request.token(), Some("abc"));
    }

    #[test]
    fn missing_token_deserializes_as_none() {
        let raw = r#"{"action":"get_client"}"#;
        let request: Request = serde_json::from_str(raw).unwrap();
        assert!(request.requires_auth());
        assert_eq!(request.token(), None);
    }

    #[test]
    fn known_action_list_is_closed() {
        assert!(Request::is_known_action("register_client"));
        assert!(Request::is_known_action("transfer"));
        assert!(!Request::is_known_action("steal"));
        assert!(!Request::is_known_action(""));
    }

    #[test]
    fn amounts_accept_numbers_and_numeric_strings() {
        assert_eq!(parse_amount(&json!(1000)).unwrap(), dec!(1000));
        assert_eq!(parse_amount(&json!(12.5)).unwrap(), dec!(12.5));
        assert_eq!(parse_amount(&json!("500")).unwrap(), dec!(500));
        assert_eq!(parse_amount(&json!(" 2.75 ")).unwrap(), dec!(2.75));
        assert_eq!(parse_amount(&json!(-3)).unwrap(), dec!(-3));
    }

    #[test]
    fn non_numeric_amounts_are_invalid() {
        assert_eq!(parse_amount(&json!("abc")), Err(BankError::InvalidAmount));
        assert_eq!(parse_amount(&json!(null)), Err(BankError::InvalidAmount));
        assert_eq!(parse_amount(&json!([1])), Err(BankError::InvalidAmount));
        assert_eq!(parse_amount(&json!({})), Err(BankError::InvalidAmount));
        assert_eq!(parse_amount(&json!(true)), Err(BankError::InvalidAmount));
    }

    #[test]
    fn responses_always_carry_the_error_flag() {
        let failure = serde_json::to_value(Response::failure(BankError::InvalidAmount)).unwrap();
        assert_eq!(failure["error"], true);
        assert_eq!(failure["message"], "invalid amount (must be positive)");

        let success = serde_json::to_value(Response::success("done")).unwrap();
        assert_eq!(success["error"], false);

        let logged = serde_json::to_value(Response::logged(true)).unwrap();
        assert_eq!(logged["error"], false);
        assert_eq!(logged["is_logged"], true);
    }

    #[test]
    fn session_response_includes_token() {
        let value = serde_json::to_value(Response::session("ok", "t0k3n".into())).unwrap();
        assert_eq!(value["token"], "t0k3n");
        assert_eq!(value["error"], false);
    }
}
