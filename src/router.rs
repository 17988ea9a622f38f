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

//! Request router: the single entry point invoked per message.
//!
//! Parsing, the authentication gate, and dispatch live here. Handlers
//! resolve the acting client strictly from the session token, never from
//! client-supplied identifiers - a client can only ever operate on the
//! account bound to their own token.

use crate::BankError;
use crate::bank::Bank;
use crate::base::{AccountCode, ClientId};
use crate::protocol::{AccountInfo, Request, Response, parse_amount};
use crate::session::SessionRegistry;
use serde_json::Value;
use tracing::debug;

/// Parses one request line and produces the response for it.
///
/// Never fails: every error becomes an `error: true` response. The
/// connection handler just writes whatever comes back.
pub fn dispatch(bank: &Bank, sessions: &SessionRegistry, line: &str) -> Response {
    let request = match parse(line) {
        Ok(request) => request,
        Err(error) => {
            debug!(%error, "rejected request");
            return Response::failure(error);
        }
    };

    // Authentication gate: private actions need a live token before the
    // handler ever runs.
    if request.requires_auth() {
        let authenticated = request
            .token()
            .is_some_and(|token| sessions.check(token));
        if !authenticated {
            return Response::failure(BankError::NotAuthenticated);
        }
    }

    handle(bank, sessions, request).unwrap_or_else(Response::failure)
}

/// Decodes a line into a [`Request`].
///
/// The `action` tag is matched case-insensitively; an unknown action and an
/// undecodable message are distinct errors.
fn parse(line: &str) -> Result<Request, BankError> {
    let mut value: Value =
        serde_json::from_str(line).map_err(|_| BankError::MalformedRequest)?;
    let object = value.as_object_mut().ok_or(BankError::MalformedRequest)?;

    let action = object
        .get("action")
        .and_then(Value::as_str)
        .ok_or(BankError::InvalidOperation)?
        .to_lowercase();
    if !Request::is_known_action(&action) {
        return Err(BankError::InvalidOperation);
    }
    object.insert("action".to_owned(), Value::String(action));

    serde_json::from_value(value).map_err(|_| BankError::MalformedRequest)
}

/// Exhaustive dispatch over the closed request enum.
fn handle(
    bank: &Bank,
    sessions: &SessionRegistry,
    request: Request,
) -> Result<Response, BankError> {
    match request {
        Request::RegisterClient {
            name,
            cpf,
            password,
        } => {
            let client_id = bank.register_client(&name, &cpf, &password)?;
            let token = sessions.add(client_id);
            Ok(Response::session("client registered successfully", token))
        }

        Request::ClientIsLogged { token } => {
            let is_logged = token.as_deref().is_some_and(|token| sessions.check(token));
            Ok(Response::logged(is_logged))
        }

        Request::LoginClient { cpf, password } => {
            let token = sessions.login(bank.directory(), &cpf, &password)?;
            Ok(Response::session("access granted", token))
        }

        Request::LogoutClient { token } => {
            if let Some(token) = token.as_deref() {
                sessions.logout(token);
            }
            Ok(Response::success("session destroyed"))
        }

        Request::GetClient { token } => {
            let client_id = resolve(sessions, token.as_deref())?;
            let client = bank.client(client_id).ok_or(BankError::ClientNotFound)?;
            let account = bank
                .account_of(client_id)
                .ok_or(BankError::UnknownAccount)?;
            Ok(Response::Client {
                error: false,
                id: client.id,
                name: client.name,
                cpf: client.cpf,
                account: AccountInfo {
                    code: account.code().to_string(),
                    balance: format!("{:.2}", account.balance().round_dp(2)),
                },
            })
        }

        Request::GetClientHistory { token } => {
            let client_id = resolve(sessions, token.as_deref())?;
            let account = bank
                .account_of(client_id)
                .ok_or(BankError::UnknownAccount)?;
            let code = account.code();
            drop(account);
            let history = bank.history_of(code).into_iter().map(Into::into).collect();
            Ok(Response::history(history))
        }

        Request::Withdraw { token, amount } => {
            let client_id = resolve(sessions, token.as_deref())?;
            let amount = parse_amount(&amount)?;
            bank.withdraw(AccountCode(client_id.0), amount)?;
            Ok(Response::success("withdrawal completed"))
        }

        Request::Deposit { token, amount } => {
            let client_id = resolve(sessions, token.as_deref())?;
            let amount = parse_amount(&amount)?;
            bank.deposit(AccountCode(client_id.0), amount)?;
            Ok(Response::success("deposit completed"))
        }

        Request::Transfer {
            token,
            amount,
            destination_acc_code,
        } => {
            let client_id = resolve(sessions, token.as_deref())?;
            let origin = AccountCode(client_id.0);
            let destination = destination_acc_code
                .parse::<AccountCode>()
                .map_err(|_| BankError::UnknownAccount)?;
            // A self-transfer succeeds before the amount is even looked at.
            if destination != origin {
                let amount = parse_amount(&amount)?;
                bank.transfer(origin, destination, amount)?;
            }
            Ok(Response::success("transfer completed"))
        }
    }
}

/// Resolves the acting client from the session token.
///
/// The auth gate already ran, but the session can be destroyed between the
/// check and the handler; resolution failure is still "not authenticated".
fn resolve(sessions: &SessionRegistry, token: Option<&str>) -> Result<ClientId, BankError> {
    token
        .and_then(|token| sessions.resolve(token))
        .ok_or(BankError::NotAuthenticated)
}
