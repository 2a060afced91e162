// tests/common/mod.rs

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use sardonyx::core::errors::SecurityError;
use sardonyx::core::model::{BackingStore, MemoryStore, Permission, Role, User};
use std::sync::Arc;

/// Creates and persists a user with the provided password digest and flags.
pub async fn seed_user(
    store: &MemoryStore,
    username: &str,
    password_hash: &str,
    active: bool,
    super_user: bool,
) -> User {
    let mut user = store.create_user(username).await.unwrap();
    user.password_hash = password_hash.to_string();
    user.is_active = active;
    user.is_super_user = super_user;
    store.save_user(&user).await.unwrap();
    user
}

/// Creates and persists a role with the provided weight, grants and paths.
pub async fn seed_role(
    store: &MemoryStore,
    name: &str,
    weight: i64,
    permissions: &[&str],
    paths: &[&str],
) -> Role {
    let mut role = store.create_role(name).await.unwrap();
    role.weight = weight;
    role.permissions = permissions.iter().map(|code| code.to_string()).collect();
    store.save_role(&role).await.unwrap();
    store
        .set_role_paths(&role, paths.iter().map(|path| path.to_string()).collect())
        .await
        .unwrap();
    store.role_by_id(&role.id).await.unwrap().unwrap()
}

/// Assigns roles to a user and returns the refreshed user.
pub async fn assign_roles(store: &MemoryStore, user: &User, roles: Vec<Role>) -> User {
    store.set_user_roles(user, roles).await.unwrap();
    store.user_by_id(&user.id).await.unwrap().unwrap()
}

/// A backing store whose every operation fails.
pub struct FailingStore;

fn offline<T>() -> Result<T, SecurityError> {
    Err(SecurityError::Store("backing store offline".to_string()))
}

#[async_trait]
impl BackingStore for FailingStore {
    async fn ping(&self) -> bool {
        true
    }

    async fn secured_paths(&self) -> Result<Vec<String>, SecurityError> {
        offline()
    }

    async fn set_secured_paths(&self, _paths: Vec<String>) -> Result<(), SecurityError> {
        offline()
    }

    async fn create_user(&self, _username: &str) -> Result<User, SecurityError> {
        offline()
    }

    async fn user_by_id(&self, _id: &str) -> Result<Option<User>, SecurityError> {
        offline()
    }

    async fn user_by_username(&self, _username: &str) -> Result<Option<User>, SecurityError> {
        offline()
    }

    async fn user_by_email(&self, _email: &str) -> Result<Option<User>, SecurityError> {
        offline()
    }

    async fn find_users_by_username(&self, _query: &str) -> Result<Vec<String>, SecurityError> {
        offline()
    }

    async fn find_users_by_email(&self, _query: &str) -> Result<Vec<String>, SecurityError> {
        offline()
    }

    async fn save_user(&self, _user: &User) -> Result<(), SecurityError> {
        offline()
    }

    async fn set_user_roles(&self, _user: &User, _roles: Vec<Role>) -> Result<(), SecurityError> {
        offline()
    }

    async fn delete_user(&self, _user: &User) -> Result<(), SecurityError> {
        offline()
    }

    async fn create_role(&self, _name: &str) -> Result<Role, SecurityError> {
        offline()
    }

    async fn role_by_id(&self, _id: &str) -> Result<Option<Role>, SecurityError> {
        offline()
    }

    async fn role_by_name(&self, _name: &str) -> Result<Option<Role>, SecurityError> {
        offline()
    }

    async fn roles(&self) -> Result<Vec<Role>, SecurityError> {
        offline()
    }

    async fn save_role(&self, _role: &Role) -> Result<(), SecurityError> {
        offline()
    }

    async fn set_role_permissions(
        &self,
        _role: &Role,
        _codes: Vec<String>,
    ) -> Result<(), SecurityError> {
        offline()
    }

    async fn set_role_paths(&self, _role: &Role, _paths: Vec<String>) -> Result<(), SecurityError> {
        offline()
    }

    async fn delete_role(&self, _role: &Role) -> Result<(), SecurityError> {
        offline()
    }

    async fn permissions(&self) -> Result<Vec<Permission>, SecurityError> {
        offline()
    }

    async fn has_permission(&self, _code: &str) -> Result<bool, SecurityError> {
        offline()
    }

    async fn add_permission(&self, _code: &str) -> Result<(), SecurityError> {
        offline()
    }

    async fn delete_permission(&self, _code: &str) -> Result<(), SecurityError> {
        offline()
    }
}

/// Shorthand for an `Arc<MemoryStore>` ready for use.
pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}
