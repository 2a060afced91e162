// tests/unit_chained_store_test.rs

mod common;

use common::{memory_store, seed_role, seed_user};
use sardonyx::core::model::{BackingStore, ChainedStore, MemoryStore, User};
use std::sync::Arc;

async fn chain_of(stores: &[&Arc<MemoryStore>]) -> ChainedStore {
    let mut chain = ChainedStore::new();
    for store in stores {
        chain.add_store((*store).clone()).await;
    }
    chain
}

#[tokio::test]
async fn test_store_failing_its_readiness_probe_is_excluded() {
    let ready = memory_store();
    let offline = memory_store();
    offline.set_available(false);

    let mut chain = ChainedStore::new();
    assert!(chain.add_store(ready).await);
    assert!(!chain.add_store(offline).await);

    assert_eq!(chain.len(), 1);
}

#[tokio::test]
async fn test_empty_chain_is_not_ready() {
    let chain = ChainedStore::new();

    assert!(!chain.ping().await);
    assert!(chain_of(&[&memory_store()]).await.ping().await);
}

#[tokio::test]
async fn test_reads_return_the_first_hit() {
    let first = memory_store();
    let second = memory_store();
    seed_user(&second, "john", "", true, false).await;

    let chain = chain_of(&[&first, &second]).await;

    let user = chain.user_by_username("john").await.unwrap().unwrap();
    assert_eq!(user.username, "john");
    assert!(chain.user_by_username("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_reads_prefer_the_earlier_member() {
    let first = memory_store();
    let second = memory_store();
    let mut in_first = seed_user(&first, "john", "", true, false).await;
    in_first.email = Some("john@first.example".to_string());
    first.save_user(&in_first).await.unwrap();
    let mut in_second = seed_user(&second, "john", "", true, false).await;
    in_second.email = Some("john@second.example".to_string());
    second.save_user(&in_second).await.unwrap();

    let chain = chain_of(&[&first, &second]).await;

    let user = chain.user_by_username("john").await.unwrap().unwrap();
    assert_eq!(user.email.as_deref(), Some("john@first.example"));
}

#[tokio::test]
async fn test_secured_paths_union_preserves_order_and_deduplicates() {
    let first = memory_store();
    let second = memory_store();
    first
        .set_secured_paths(vec!["/admin/**".to_string(), "/api/**".to_string()])
        .await
        .unwrap();
    second
        .set_secured_paths(vec!["/api/**".to_string(), "/reports/**".to_string()])
        .await
        .unwrap();

    let chain = chain_of(&[&first, &second]).await;

    assert_eq!(
        chain.secured_paths().await.unwrap(),
        vec!["/admin/**", "/api/**", "/reports/**"]
    );
}

#[tokio::test]
async fn test_permissions_union_deduplicates_by_code() {
    let first = memory_store();
    let second = memory_store();
    first.add_permission("content.edit").await.unwrap();
    second.add_permission("content.edit").await.unwrap();
    second.add_permission("content.delete").await.unwrap();

    let chain = chain_of(&[&first, &second]).await;

    let codes: Vec<String> = chain
        .permissions()
        .await
        .unwrap()
        .into_iter()
        .map(|permission| permission.code)
        .collect();
    assert_eq!(codes, vec!["content.edit", "content.delete"]);

    assert!(chain.has_permission("content.delete").await.unwrap());
    assert!(!chain.has_permission("content.publish").await.unwrap());
}

#[tokio::test]
async fn test_writes_are_routed_to_the_owning_member() {
    let first = memory_store();
    let second = memory_store();
    let mut user = seed_user(&second, "john", "", true, false).await;

    let chain = chain_of(&[&first, &second]).await;

    user.email = Some("john@example.com".to_string());
    chain.save_user(&user).await.unwrap();

    let stored = second.user_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(stored.email.as_deref(), Some("john@example.com"));
    assert!(first.user_by_id(&user.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_role_writes_are_routed_to_the_owning_member() {
    let first = memory_store();
    let second = memory_store();
    let role = seed_role(&second, "editor", 10, &[], &[]).await;

    let chain = chain_of(&[&first, &second]).await;

    chain
        .set_role_permissions(&role, vec!["content.edit".to_string()])
        .await
        .unwrap();

    let stored = second.role_by_id(&role.id).await.unwrap().unwrap();
    assert!(stored.is_permission_granted("content.edit"));
    assert!(first.role_by_id(&role.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_write_without_an_owner_is_dropped() {
    let first = memory_store();
    let second = memory_store();
    let chain = chain_of(&[&first, &second]).await;

    // This user was never created through any member.
    let orphan = User::new("no-such-id", "orphan");
    chain.save_user(&orphan).await.unwrap();

    assert!(chain.user_by_username("orphan").await.unwrap().is_none());
}

#[tokio::test]
async fn test_creation_goes_to_the_first_member() {
    let first = memory_store();
    let second = memory_store();
    let chain = chain_of(&[&first, &second]).await;

    let user = chain.create_user("john").await.unwrap();
    let role = chain.create_role("editor").await.unwrap();

    assert!(first.user_by_id(&user.id).await.unwrap().is_some());
    assert!(second.user_by_id(&user.id).await.unwrap().is_none());
    assert!(first.role_by_id(&role.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_permission_registration_goes_to_the_first_member() {
    let first = memory_store();
    let second = memory_store();
    let chain = chain_of(&[&first, &second]).await;

    chain.add_permission("content.edit").await.unwrap();

    assert!(first.has_permission("content.edit").await.unwrap());
    assert!(!second.has_permission("content.edit").await.unwrap());
}

#[tokio::test]
async fn test_permission_deletion_is_broadcast() {
    let first = memory_store();
    let second = memory_store();
    first.add_permission("content.edit").await.unwrap();
    second.add_permission("content.edit").await.unwrap();

    let chain = chain_of(&[&first, &second]).await;
    chain.delete_permission("content.edit").await.unwrap();

    assert!(!first.has_permission("content.edit").await.unwrap());
    assert!(!second.has_permission("content.edit").await.unwrap());
}

#[tokio::test]
async fn test_username_search_unions_all_members() {
    let first = memory_store();
    let second = memory_store();
    seed_user(&first, "john", "", true, false).await;
    seed_user(&second, "johanna", "", true, false).await;
    seed_user(&second, "jane", "", true, false).await;

    let chain = chain_of(&[&first, &second]).await;

    let found = chain.find_users_by_username("joh").await.unwrap();
    assert_eq!(found, vec!["john", "johanna"]);
}
