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

//! Password digest helpers.
//!
//! Passwords are never stored raw; the directory only sees the opaque digest
//! produced here. Callers treat this module as a `hash`/`verify` capability.

use sha2::{Digest, Sha256};

/// Produces the hex-encoded digest of a raw password.
pub fn hash(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

/// Checks whether `raw` was the input that produced `digest`.
pub fn verify(raw: &str, digest: &str) -> bool {
    hash(raw) == digest
}
