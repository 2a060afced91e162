// src/core/model/memory.rs

//! An in-memory backing store.

use crate::core::errors::SecurityError;
use crate::core::matcher::PathRule;
use crate::core::model::{BackingStore, ChainableBackingStore, Permission, Role, User};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// An in-memory [`ChainableBackingStore`].
///
/// The reference implementation of the store contract, and the fixture the
/// test suite runs against. Not a persistence engine: all data lives for the
/// lifetime of the store.
#[derive(Debug)]
pub struct MemoryStore {
    available: AtomicBool,
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    secured_paths: Vec<String>,
    users: BTreeMap<String, User>,
    roles: BTreeMap<String, Role>,
    permissions: BTreeMap<String, Permission>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            available: AtomicBool::new(true),
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Controls the readiness reported by `ping`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

#[async_trait]
impl BackingStore for MemoryStore {
    async fn ping(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn secured_paths(&self) -> Result<Vec<String>, SecurityError> {
        Ok(self.inner.read().secured_paths.clone())
    }

    async fn set_secured_paths(&self, paths: Vec<String>) -> Result<(), SecurityError> {
        self.inner.write().secured_paths = paths;
        Ok(())
    }

    async fn create_user(&self, username: &str) -> Result<User, SecurityError> {
        let user = User::new(Uuid::new_v4().to_string(), username);
        self.inner.write().users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn user_by_id(&self, id: &str) -> Result<Option<User>, SecurityError> {
        Ok(self.inner.read().users.get(id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, SecurityError> {
        Ok(self
            .inner
            .read()
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, SecurityError> {
        Ok(self
            .inner
            .read()
            .users
            .values()
            .find(|user| user.email.as_deref() == Some(email))
            .cloned())
    }

    async fn find_users_by_username(&self, query: &str) -> Result<Vec<String>, SecurityError> {
        Ok(self
            .inner
            .read()
            .users
            .values()
            .filter(|user| user.username.contains(query))
            .map(|user| user.username.clone())
            .collect())
    }

    async fn find_users_by_email(&self, query: &str) -> Result<Vec<String>, SecurityError> {
        Ok(self
            .inner
            .read()
            .users
            .values()
            .filter(|user| user.email.as_deref().is_some_and(|email| email.contains(query)))
            .map(|user| user.username.clone())
            .collect())
    }

    async fn save_user(&self, user: &User) -> Result<(), SecurityError> {
        self.inner.write().users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn set_user_roles(&self, user: &User, roles: Vec<Role>) -> Result<(), SecurityError> {
        if let Some(stored) = self.inner.write().users.get_mut(&user.id) {
            stored.roles = roles;
        }
        Ok(())
    }

    async fn delete_user(&self, user: &User) -> Result<(), SecurityError> {
        self.inner.write().users.remove(&user.id);
        Ok(())
    }

    async fn create_role(&self, name: &str) -> Result<Role, SecurityError> {
        let role = Role::new(Uuid::new_v4().to_string(), name);
        self.inner.write().roles.insert(role.id.clone(), role.clone());
        Ok(role)
    }

    async fn role_by_id(&self, id: &str) -> Result<Option<Role>, SecurityError> {
        Ok(self.inner.read().roles.get(id).cloned())
    }

    async fn role_by_name(&self, name: &str) -> Result<Option<Role>, SecurityError> {
        Ok(self
            .inner
            .read()
            .roles
            .values()
            .find(|role| role.name == name)
            .cloned())
    }

    async fn roles(&self) -> Result<Vec<Role>, SecurityError> {
        Ok(self.inner.read().roles.values().cloned().collect())
    }

    async fn save_role(&self, role: &Role) -> Result<(), SecurityError> {
        self.inner.write().roles.insert(role.id.clone(), role.clone());
        Ok(())
    }

    async fn set_role_permissions(
        &self,
        role: &Role,
        codes: Vec<String>,
    ) -> Result<(), SecurityError> {
        if let Some(stored) = self.inner.write().roles.get_mut(&role.id) {
            stored.permissions = codes.into_iter().collect();
        }
        Ok(())
    }

    async fn set_role_paths(&self, role: &Role, paths: Vec<String>) -> Result<(), SecurityError> {
        if let Some(stored) = self.inner.write().roles.get_mut(&role.id) {
            stored.paths = paths.iter().map(|path| PathRule::parse(path)).collect();
        }
        Ok(())
    }

    async fn delete_role(&self, role: &Role) -> Result<(), SecurityError> {
        self.inner.write().roles.remove(&role.id);
        Ok(())
    }

    async fn permissions(&self) -> Result<Vec<Permission>, SecurityError> {
        Ok(self.inner.read().permissions.values().cloned().collect())
    }

    async fn has_permission(&self, code: &str) -> Result<bool, SecurityError> {
        Ok(self.inner.read().permissions.contains_key(code))
    }

    async fn add_permission(&self, code: &str) -> Result<(), SecurityError> {
        self.inner
            .write()
            .permissions
            .entry(code.to_string())
            .or_insert_with(|| Permission::new(code));
        Ok(())
    }

    async fn delete_permission(&self, code: &str) -> Result<(), SecurityError> {
        self.inner.write().permissions.remove(code);
        Ok(())
    }
}

impl ChainableBackingStore for MemoryStore {
    fn owns_user(&self, user: &User) -> bool {
        self.inner.read().users.contains_key(&user.id)
    }

    fn owns_role(&self, role: &Role) -> bool {
        self.inner.read().roles.contains_key(&role.id)
    }

    fn owns_permission(&self, permission: &Permission) -> bool {
        self.inner.read().permissions.contains_key(&permission.code)
    }
}
