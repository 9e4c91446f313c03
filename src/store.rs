// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory store for greetings and user accounts.
//!
//! A single store guarded by the `RwLock` in [`crate::state::AppState`]
//! backs both resources. Passwords are stored as Argon2id hashes.

use std::collections::HashMap;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Greeting, GreetingInput};

/// A user account able to log in.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub enabled: bool,
    /// Role names granted to the user (e.g. `ROLE_ADMIN`).
    pub roles: Vec<String>,
}

#[derive(Default)]
pub struct InMemoryStore {
    greetings: HashMap<u64, Greeting>,
    next_greeting_id: u64,
    users: HashMap<String, User>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list_greetings(&self) -> Vec<Greeting> {
        let mut greetings: Vec<Greeting> = self.greetings.values().cloned().collect();
        greetings.sort_by_key(|g| g.id);
        greetings
    }

    pub fn greeting_by_id(&self, id: u64) -> Result<Greeting, ApiError> {
        self.greetings
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("Greeting with id {id} not found")))
    }

    pub fn exists_by_message(&self, message: &str) -> bool {
        self.greetings.values().any(|g| g.message == message)
    }

    pub fn create_greeting(&mut self, input: GreetingInput) -> Result<Greeting, ApiError> {
        if self.exists_by_message(&input.message) {
            return Err(ApiError::conflict(format!(
                "A greeting with the message '{}' already exists",
                input.message
            )));
        }

        self.next_greeting_id += 1;
        let now = Utc::now();
        let greeting = Greeting {
            id: self.next_greeting_id,
            message: input.message,
            created_at: now,
            updated_at: now,
        };
        self.greetings.insert(greeting.id, greeting.clone());
        Ok(greeting)
    }

    pub fn update_greeting(&mut self, id: u64, input: GreetingInput) -> Result<Greeting, ApiError> {
        let duplicate = self
            .greetings
            .values()
            .any(|g| g.id != id && g.message == input.message);
        if duplicate {
            return Err(ApiError::conflict(format!(
                "A greeting with the message '{}' already exists",
                input.message
            )));
        }

        let Some(greeting) = self.greetings.get_mut(&id) else {
            return Err(ApiError::not_found(format!("Greeting with id {id} not found")));
        };

        greeting.message = input.message;
        greeting.updated_at = Utc::now();
        Ok(greeting.clone())
    }

    pub fn delete_greeting(&mut self, id: u64) -> Result<(), ApiError> {
        if self.greetings.remove(&id).is_some() {
            Ok(())
        } else {
            Err(ApiError::not_found(format!("Greeting with id {id} not found")))
        }
    }

    pub fn set_user_enabled(&mut self, id: &str, enabled: bool) {
        if let Some(user) = self.users.get_mut(id) {
            user.enabled = enabled;
        }
    }

    pub fn find_user_by_username(&self, username: &str) -> Option<User> {
        self.users.values().find(|u| u.username == username).cloned()
    }

    /// Insert a user with a freshly hashed password.
    pub fn seed_user(
        &mut self,
        username: impl Into<String>,
        password: &str,
        roles: Vec<String>,
    ) -> Result<User, ApiError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ApiError::internal(format!("failed to hash password: {e}")))?
            .to_string();

        let id = Uuid::new_v4().to_string();
        let user = User {
            id: id.clone(),
            username: username.into(),
            password_hash,
            enabled: true,
            roles,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }
}

/// Check a plaintext password against a stored Argon2id hash.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn input(message: &str) -> GreetingInput {
        GreetingInput {
            message: message.to_string(),
        }
    }

    #[test]
    fn create_and_fetch_greeting() {
        let mut store = InMemoryStore::new();
        let created = store.create_greeting(input("Hello, World!")).unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.created_at, created.updated_at);

        let fetched = store.greeting_by_id(created.id).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn create_duplicate_message_conflicts() {
        let mut store = InMemoryStore::new();
        store.create_greeting(input("Hello")).unwrap();

        let err = store.create_greeting(input("Hello")).unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[test]
    fn greeting_by_id_not_found() {
        let store = InMemoryStore::new();
        let err = store.greeting_by_id(42).unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn list_greetings_sorted_by_id() {
        let mut store = InMemoryStore::new();
        store.create_greeting(input("first")).unwrap();
        store.create_greeting(input("second")).unwrap();
        store.create_greeting(input("third")).unwrap();

        let ids: Vec<u64> = store.list_greetings().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn update_greeting_changes_message() {
        let mut store = InMemoryStore::new();
        let created = store.create_greeting(input("before")).unwrap();

        let updated = store.update_greeting(created.id, input("after")).unwrap();
        assert_eq!(updated.message, "after");
        assert_eq!(updated.id, created.id);

        let err = store.update_greeting(999, input("nope")).unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn update_to_existing_message_conflicts() {
        let mut store = InMemoryStore::new();
        store.create_greeting(input("taken")).unwrap();
        let other = store.create_greeting(input("other")).unwrap();

        let err = store.update_greeting(other.id, input("taken")).unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);

        // Updating a greeting to its own message is not a conflict.
        assert!(store.update_greeting(other.id, input("other")).is_ok());
    }

    #[test]
    fn delete_greeting_not_found() {
        let mut store = InMemoryStore::new();
        let err = store.delete_greeting(7).unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn seeded_user_password_verifies() {
        let mut store = InMemoryStore::new();
        let user = store
            .seed_user("admin", "password", vec!["ROLE_ADMIN".to_string()])
            .unwrap();

        assert!(verify_password("password", &user.password_hash));
        assert!(!verify_password("wrong", &user.password_hash));

        let found = store.find_user_by_username("admin").unwrap();
        assert_eq!(found.id, user.id);
        assert!(store.find_user_by_username("nobody").is_none());
    }
}
