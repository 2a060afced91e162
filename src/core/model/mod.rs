// src/core/model/mod.rs

//! The security model: entities and the backing store contracts.

pub mod chain;
pub mod memory;
mod permission;
mod role;
mod user;

pub use chain::ChainedStore;
pub use memory::MemoryStore;
pub use permission::Permission;
pub use role::Role;
pub use user::User;

use crate::core::errors::SecurityError;
use async_trait::async_trait;

/// Storage contract consumed by the engine for users, roles and permissions.
///
/// Concrete stores are external collaborators; any blocking I/O they perform
/// is behind these awaited calls. [`MemoryStore`] is the in-crate reference
/// implementation.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Checks if the store is ready to work.
    async fn ping(&self) -> bool;

    /// Gets the path rules which are secured for anonymous users, in order.
    async fn secured_paths(&self) -> Result<Vec<String>, SecurityError>;

    /// Replaces the secured path rules.
    async fn set_secured_paths(&self, paths: Vec<String>) -> Result<(), SecurityError>;

    /// Creates and persists a new user with the provided username.
    async fn create_user(&self, username: &str) -> Result<User, SecurityError>;

    async fn user_by_id(&self, id: &str) -> Result<Option<User>, SecurityError>;

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, SecurityError>;

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, SecurityError>;

    /// Finds the usernames matching the provided username fragment.
    async fn find_users_by_username(&self, query: &str) -> Result<Vec<String>, SecurityError>;

    /// Finds the usernames of users matching the provided email fragment.
    async fn find_users_by_email(&self, query: &str) -> Result<Vec<String>, SecurityError>;

    async fn save_user(&self, user: &User) -> Result<(), SecurityError>;

    /// Replaces the roles of the provided user.
    async fn set_user_roles(&self, user: &User, roles: Vec<Role>) -> Result<(), SecurityError>;

    async fn delete_user(&self, user: &User) -> Result<(), SecurityError>;

    /// Creates and persists a new role with the provided name.
    async fn create_role(&self, name: &str) -> Result<Role, SecurityError>;

    async fn role_by_id(&self, id: &str) -> Result<Option<Role>, SecurityError>;

    async fn role_by_name(&self, name: &str) -> Result<Option<Role>, SecurityError>;

    async fn roles(&self) -> Result<Vec<Role>, SecurityError>;

    async fn save_role(&self, role: &Role) -> Result<(), SecurityError>;

    /// Replaces the permission codes granted to the provided role.
    async fn set_role_permissions(
        &self,
        role: &Role,
        codes: Vec<String>,
    ) -> Result<(), SecurityError>;

    /// Replaces the allowed path rules of the provided role.
    async fn set_role_paths(&self, role: &Role, paths: Vec<String>) -> Result<(), SecurityError>;

    async fn delete_role(&self, role: &Role) -> Result<(), SecurityError>;

    async fn permissions(&self) -> Result<Vec<Permission>, SecurityError>;

    async fn has_permission(&self, code: &str) -> Result<bool, SecurityError>;

    /// Registers a new permission code.
    async fn add_permission(&self, code: &str) -> Result<(), SecurityError>;

    /// Unregisters an existing permission code.
    async fn delete_permission(&self, code: &str) -> Result<(), SecurityError>;
}

/// A backing store that can participate in a [`ChainedStore`].
///
/// Ownership predicates route writes: a chained write goes to the first
/// member claiming the entity.
pub trait ChainableBackingStore: BackingStore {
    /// Checks if this store owns the provided user instance.
    fn owns_user(&self, user: &User) -> bool;

    /// Checks if this store owns the provided role instance.
    fn owns_role(&self, role: &Role) -> bool;

    /// Checks if this store owns the provided permission instance.
    fn owns_permission(&self, permission: &Permission) -> bool;
}
