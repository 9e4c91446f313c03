// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::auth::TokenService;
use crate::cache::CacheManager;
use crate::models::Greeting;
use crate::store::{InMemoryStore, User};

/// Greeting cache TTL.
const GREETING_CACHE_TTL: Duration = Duration::from_secs(300);
/// User cache TTL, shorter so disabled accounts drop out quickly.
const USER_CACHE_TTL: Duration = Duration::from_secs(60);
const CACHE_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    pub tokens: Arc<TokenService>,
    pub greetings: Arc<CacheManager<Greeting>>,
    pub users: Arc<CacheManager<User>>,
}

impl AppState {
    pub fn new(store: InMemoryStore, tokens: TokenService) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            tokens: Arc::new(tokens),
            greetings: Arc::new(CacheManager::new(CACHE_CAPACITY, GREETING_CACHE_TTL)),
            users: Arc::new(CacheManager::new(CACHE_CAPACITY, USER_CACHE_TTL)),
        }
    }
}

#[cfg(test)]
impl AppState {
    /// State with freshly generated keys and an empty store.
    pub(crate) fn for_tests() -> Self {
        let (sign_keys, enc_keys) = crate::auth::keys::test_key_pairs();
        let tokens = TokenService::new(
            sign_keys.clone(),
            enc_keys.clone(),
            Duration::from_secs(3600),
            "greeting-service",
        );
        Self::new(InMemoryStore::new(), tokens)
    }
}
