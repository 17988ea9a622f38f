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

//! Core identifier types for clients, accounts, and history entries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Unique identifier for a registered client.
///
/// Assigned from a monotonic sequence at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ClientId(pub u32);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric code of a bank account.
///
/// Equal to the owning client's id; rendered zero-padded to at least four
/// digits (id 46 becomes `"0046"`) everywhere the code is shown to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountCode(pub u32);

impl fmt::Display for AccountCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl FromStr for AccountCode {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(AccountCode)
    }
}

/// Unique identifier for a history entry.
///
/// Assigned from a global sequence, so entry ids reflect the order in which
/// ledger mutations were recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_code_is_zero_padded() {
        assert_eq!(AccountCode(46).to_string(), "0046");
        assert_eq!(AccountCode(7).to_string(), "0007");
        assert_eq!(AccountCode(12345).to_string(), "12345");
    }

    #[test]
    fn account_code_parses_padded_form() {
        assert_eq!("0046".parse::<AccountCode>().unwrap(), AccountCode(46));
        assert_eq!(" 1000 ".parse::<AccountCode>().unwrap(), AccountCode(1000));
        assert!("abc".parse::<AccountCode>().is_err());
        assert!("".parse::<AccountCode>().is_err());
    }
}
