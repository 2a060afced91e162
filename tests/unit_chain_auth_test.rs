// tests/unit_chain_auth_test.rs

mod common;

use common::{memory_store, seed_user};
use sardonyx::config::SecurityConfig;
use sardonyx::core::auth::{
    Authenticator, ChainAuthenticator, MemorySessionStore, SessionAuthenticator,
};
use sardonyx::core::errors::SecurityError;
use sardonyx::core::model::MemoryStore;
use std::sync::Arc;

fn config() -> SecurityConfig {
    SecurityConfig {
        salt: "s3cret".to_string(),
        ..SecurityConfig::default()
    }
}

fn member(store: &Arc<MemoryStore>) -> Arc<SessionAuthenticator> {
    let sessions = Arc::new(MemorySessionStore::new());
    Arc::new(SessionAuthenticator::new(store.clone(), sessions, &config()).unwrap())
}

#[tokio::test]
async fn test_login_falls_through_to_the_member_knowing_the_user() {
    let first_store = memory_store();
    let second_store = memory_store();
    seed_user(&second_store, "john", "secret", true, false).await;

    let mut chain = ChainAuthenticator::new();
    chain.add_authenticator(member(&first_store));
    chain.add_authenticator(member(&second_store));

    let user = chain.login("john", "secret").await.unwrap();

    assert_eq!(user.username, "john");
    assert_eq!(chain.current_user().await.unwrap().unwrap().username, "john");
}

#[tokio::test]
async fn test_login_surfaces_a_credential_failure_immediately() {
    let first_store = memory_store();
    let second_store = memory_store();
    seed_user(&first_store, "john", "secret", true, false).await;
    seed_user(&second_store, "john", "other", true, false).await;

    let mut chain = ChainAuthenticator::new();
    chain.add_authenticator(member(&first_store));
    chain.add_authenticator(member(&second_store));

    // The first member knows the user, so its bad-password verdict is final
    // even though the second member would have accepted the password.
    let err = chain.login("john", "other").await.unwrap_err();

    assert_eq!(err, SecurityError::BadCredentials);
}

#[tokio::test]
async fn test_exhausted_chain_reports_unknown_user() {
    let mut chain = ChainAuthenticator::new();
    chain.add_authenticator(member(&memory_store()));

    let err = chain.login("ghost", "secret").await.unwrap_err();

    assert_eq!(err, SecurityError::UnknownUser("ghost".to_string()));
}

#[tokio::test]
async fn test_current_user_takes_the_first_members_user() {
    let first_store = memory_store();
    let second_store = memory_store();
    seed_user(&second_store, "john", "secret", true, false).await;

    let first = member(&first_store);
    let second = member(&second_store);
    second.login("john", "secret").await.unwrap();

    let mut chain = ChainAuthenticator::new();
    chain.add_authenticator(first);
    chain.add_authenticator(second);

    assert_eq!(chain.current_user().await.unwrap().unwrap().username, "john");
}

#[tokio::test]
async fn test_logout_is_broadcast_to_all_members() {
    let first_store = memory_store();
    let second_store = memory_store();
    seed_user(&first_store, "john", "secret", true, false).await;
    seed_user(&second_store, "jane", "secret", true, false).await;

    let first = member(&first_store);
    let second = member(&second_store);
    first.login("john", "secret").await.unwrap();
    second.login("jane", "secret").await.unwrap();

    let mut chain = ChainAuthenticator::new();
    chain.add_authenticator(first.clone());
    chain.add_authenticator(second.clone());

    chain.logout().await.unwrap();

    assert!(first.current_user().await.unwrap().is_none());
    assert!(second.current_user().await.unwrap().is_none());
    assert!(chain.current_user().await.unwrap().is_none());
}

#[tokio::test]
async fn test_switch_succeeds_when_any_member_succeeds() {
    let first_store = memory_store();
    let second_store = memory_store();
    seed_user(&second_store, "admin", "secret", true, true).await;
    seed_user(&second_store, "jane", "secret", true, false).await;

    let first = member(&first_store);
    let second = member(&second_store);
    second.login("admin", "secret").await.unwrap();

    let mut chain = ChainAuthenticator::new();
    chain.add_authenticator(first);
    chain.add_authenticator(second);

    // The first member is anonymous and fails the switch; its failure is
    // swallowed because the second member succeeds.
    chain.switch_user("jane").await.unwrap();

    assert!(chain.is_switched().await);
    assert_eq!(chain.current_user().await.unwrap().unwrap().username, "jane");
}

#[tokio::test]
async fn test_switch_surfaces_an_error_when_every_member_fails() {
    let mut chain = ChainAuthenticator::new();
    chain.add_authenticator(member(&memory_store()));
    chain.add_authenticator(member(&memory_store()));

    let err = chain.switch_user("jane").await.unwrap_err();

    assert!(matches!(err, SecurityError::Unauthorized(_)));
}
