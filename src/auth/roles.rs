// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Role names used as token authorities.

/// Grants access to administrative endpoints.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
/// Granted to every regular account.
pub const ROLE_USER: &str = "ROLE_USER";
