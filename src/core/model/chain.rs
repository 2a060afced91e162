// src/core/model/chain.rs

//! Chains multiple backing stores into one logical store.

use crate::core::errors::SecurityError;
use crate::core::model::{BackingStore, ChainableBackingStore, Permission, Role, User};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// An ordered chain of backing stores acting as one logical store.
///
/// Reads query members in order and return the first hit; aggregate reads
/// union all members, de-duplicated by natural key. Writes are routed to the
/// single member that claims ownership of the target entity; a write nobody
/// claims is dropped. Creation always goes to the first member.
#[derive(Default)]
pub struct ChainedStore {
    stores: Vec<Arc<dyn ChainableBackingStore>>,
}

impl ChainedStore {
    pub fn new() -> Self {
        ChainedStore { stores: Vec::new() }
    }

    /// Adds a member to the chain if it reports itself ready.
    ///
    /// Returns false when the store failed its readiness probe and was
    /// excluded.
    pub async fn add_store(&mut self, store: Arc<dyn ChainableBackingStore>) -> bool {
        if store.ping().await {
            self.stores.push(store);
            true
        } else {
            debug!("Backing store provided but not ready for work, excluding it from the chain");
            false
        }
    }

    /// The number of members in the chain.
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    fn first(&self) -> Result<&Arc<dyn ChainableBackingStore>, SecurityError> {
        self.stores
            .first()
            .ok_or_else(|| SecurityError::Store("backing store chain is empty".to_string()))
    }
}

#[async_trait]
impl BackingStore for ChainedStore {
    async fn ping(&self) -> bool {
        !self.stores.is_empty()
    }

    async fn secured_paths(&self) -> Result<Vec<String>, SecurityError> {
        let mut paths = Vec::new();
        let mut seen = HashSet::new();
        for store in &self.stores {
            for path in store.secured_paths().await? {
                if seen.insert(path.clone()) {
                    paths.push(path);
                }
            }
        }
        Ok(paths)
    }

    async fn set_secured_paths(&self, paths: Vec<String>) -> Result<(), SecurityError> {
        self.first()?.set_secured_paths(paths).await
    }

    async fn create_user(&self, username: &str) -> Result<User, SecurityError> {
        self.first()?.create_user(username).await
    }

    async fn user_by_id(&self, id: &str) -> Result<Option<User>, SecurityError> {
        for store in &self.stores {
            if let Some(user) = store.user_by_id(id).await? {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, SecurityError> {
        for store in &self.stores {
            if let Some(user) = store.user_by_username(username).await? {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, SecurityError> {
        for store in &self.stores {
            if let Some(user) = store.user_by_email(email).await? {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    async fn find_users_by_username(&self, query: &str) -> Result<Vec<String>, SecurityError> {
        let mut usernames = Vec::new();
        let mut seen = HashSet::new();
        for store in &self.stores {
            for username in store.find_users_by_username(query).await? {
                if seen.insert(username.clone()) {
                    usernames.push(username);
                }
            }
        }
        Ok(usernames)
    }

    async fn find_users_by_email(&self, query: &str) -> Result<Vec<String>, SecurityError> {
        let mut usernames = Vec::new();
        let mut seen = HashSet::new();
        for store in &self.stores {
            for username in store.find_users_by_email(query).await? {
                if seen.insert(username.clone()) {
                    usernames.push(username);
                }
            }
        }
        Ok(usernames)
    }

    async fn save_user(&self, user: &User) -> Result<(), SecurityError> {
        for store in &self.stores {
            if store.owns_user(user) {
                return store.save_user(user).await;
            }
        }
        debug!("No backing store owns user '{}', dropping save", user.username);
        Ok(())
    }

    async fn set_user_roles(&self, user: &User, roles: Vec<Role>) -> Result<(), SecurityError> {
        for store in &self.stores {
            if store.owns_user(user) {
                return store.set_user_roles(user, roles).await;
            }
        }
        debug!("No backing store owns user '{}', dropping role update", user.username);
        Ok(())
    }

    async fn delete_user(&self, user: &User) -> Result<(), SecurityError> {
        for store in &self.stores {
            if store.owns_user(user) {
                return store.delete_user(user).await;
            }
        }
        debug!("No backing store owns user '{}', dropping delete", user.username);
        Ok(())
    }

    async fn create_role(&self, name: &str) -> Result<Role, SecurityError> {
        self.first()?.create_role(name).await
    }

    async fn role_by_id(&self, id: &str) -> Result<Option<Role>, SecurityError> {
        for store in &self.stores {
            if let Some(role) = store.role_by_id(id).await? {
                return Ok(Some(role));
            }
        }
        Ok(None)
    }

    async fn role_by_name(&self, name: &str) -> Result<Option<Role>, SecurityError> {
        for store in &self.stores {
            if let Some(role) = store.role_by_name(name).await? {
                return Ok(Some(role));
            }
        }
        Ok(None)
    }

    async fn roles(&self) -> Result<Vec<Role>, SecurityError> {
        let mut roles: Vec<Role> = Vec::new();
        let mut seen = HashSet::new();
        for store in &self.stores {
            for role in store.roles().await? {
                if seen.insert(role.name.clone()) {
                    roles.push(role);
                }
            }
        }
        Ok(roles)
    }

    async fn save_role(&self, role: &Role) -> Result<(), SecurityError> {
        for store in &self.stores {
            if store.owns_role(role) {
                return store.save_role(role).await;
            }
        }
        debug!("No backing store owns role '{}', dropping save", role.name);
        Ok(())
    }

    async fn set_role_permissions(
        &self,
        role: &Role,
        codes: Vec<String>,
    ) -> Result<(), SecurityError> {
        for store in &self.stores {
            if store.owns_role(role) {
                return store.set_role_permissions(role, codes).await;
            }
        }
        debug!("No backing store owns role '{}', dropping permission grant", role.name);
        Ok(())
    }

    async fn set_role_paths(&self, role: &Role, paths: Vec<String>) -> Result<(), SecurityError> {
        for store in &self.stores {
            if store.owns_role(role) {
                return store.set_role_paths(role, paths).await;
            }
        }
        debug!("No backing store owns role '{}', dropping path update", role.name);
        Ok(())
    }

    async fn delete_role(&self, role: &Role) -> Result<(), SecurityError> {
        for store in &self.stores {
            if store.owns_role(role) {
                return store.delete_role(role).await;
            }
        }
        debug!("No backing store owns role '{}', dropping delete", role.name);
        Ok(())
    }

    async fn permissions(&self) -> Result<Vec<Permission>, SecurityError> {
        let mut permissions: Vec<Permission> = Vec::new();
        let mut seen = HashSet::new();
        for store in &self.stores {
            for permission in store.permissions().await? {
                if seen.insert(permission.code.clone()) {
                    permissions.push(permission);
                }
            }
        }
        Ok(permissions)
    }

    async fn has_permission(&self, code: &str) -> Result<bool, SecurityError> {
        for store in &self.stores {
            if store.has_permission(code).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn add_permission(&self, code: &str) -> Result<(), SecurityError> {
        self.first()?.add_permission(code).await
    }

    async fn delete_permission(&self, code: &str) -> Result<(), SecurityError> {
        for store in &self.stores {
            store.delete_permission(code).await?;
        }
        Ok(())
    }
}
