//! QA tests for communities and the rendered service surface.
//!
//! Exercises the full facade: creation and membership rules, owner-first
//! listings, the `{a,b}` rendering of collection results, and the two
//! canonical end-to-end scenarios.

use mingle_core::{NetworkError, NetworkService, ServiceError};
use tempfile::TempDir;

async fn service(dir: &TempDir) -> NetworkService {
    NetworkService::open(dir.path().join("state.json"))
        .await
        .expect("open should succeed")
}

fn network_err(err: ServiceError) -> NetworkError {
    match err {
        ServiceError::Network(err) => err,
        ServiceError::Persist(err) => panic!("unexpected persistence error: {err}"),
    }
}

#[tokio::test]
async fn test_friendship_scenario_renders_confirmed_list() {
    let dir = TempDir::new().unwrap();
    let mut service = service(&dir).await;

    service.create_user("ana", "pw", "Ana").await.unwrap();
    service.create_user("bia", "pw", "Bia").await.unwrap();
    let ana = service.login("ana", "pw").unwrap();
    let bia = service.login("bia", "pw").unwrap();

    service.add_friend(&ana, "bia").await.unwrap();
    assert!(!service.is_friend("ana", "bia").unwrap());

    service.add_friend(&bia, "ana").await.unwrap();
    assert!(service.is_friend("ana", "bia").unwrap());
    assert_eq!(service.friends("ana").unwrap(), "{bia}");
    assert_eq!(service.friends("bia").unwrap(), "{ana}");
}

#[tokio::test]
async fn test_community_broadcast_scenario() {
    let dir = TempDir::new().unwrap();
    let mut service = service(&dir).await;

    service.create_user("ana", "pw", "Ana").await.unwrap();
    service.create_user("bia", "pw", "Bia").await.unwrap();
    let ana = service.login("ana", "pw").unwrap();
    let bia = service.login("bia", "pw").unwrap();

    service.create_community(&ana, "c1", "d").await.unwrap();
    service.join_community(&bia, "c1").await.unwrap();
    assert_eq!(service.community_members("c1").unwrap(), "{ana,bia}");

    service.broadcast(&ana, "c1", "oi").await.unwrap();
    assert_eq!(service.read_community_message(&ana).await.unwrap(), "oi");
    assert_eq!(service.read_community_message(&bia).await.unwrap(), "oi");

    let err = service.read_community_message(&ana).await.unwrap_err();
    assert_eq!(network_err(err), NetworkError::NoMessages);
}

#[tokio::test]
async fn test_community_metadata_and_membership_rules() {
    let dir = TempDir::new().unwrap();
    let mut service = service(&dir).await;

    service.create_user("ana", "pw", "Ana").await.unwrap();
    service.create_user("bia", "pw", "Bia").await.unwrap();
    let ana = service.login("ana", "pw").unwrap();
    let bia = service.login("bia", "pw").unwrap();

    service
        .create_community(&ana, "rust", "systems people")
        .await
        .unwrap();

    assert_eq!(service.community_owner("rust").unwrap(), "ana");
    assert_eq!(service.community_description("rust").unwrap(), "systems people");
    assert_eq!(service.community_members("rust").unwrap(), "{ana}");
    assert_eq!(service.communities_of("ana").unwrap(), "{rust}");

    let err = service.create_community(&bia, "rust", "again").await.unwrap_err();
    assert_eq!(network_err(err), NetworkError::CommunityAlreadyExists);

    service.join_community(&bia, "rust").await.unwrap();
    let err = service.join_community(&bia, "rust").await.unwrap_err();
    assert_eq!(network_err(err), NetworkError::AlreadyMember);

    // The owner is already a member through creation.
    let err = service.join_community(&ana, "rust").await.unwrap_err();
    assert_eq!(network_err(err), NetworkError::AlreadyMember);
}

#[tokio::test]
async fn test_member_listing_is_owner_first_then_join_order() {
    let dir = TempDir::new().unwrap();
    let mut service = service(&dir).await;

    for (login, name) in [("ana", "Ana"), ("bia", "Bia"), ("caio", "Caio")] {
        service.create_user(login, "pw", name).await.unwrap();
    }
    let ana = service.login("ana", "pw").unwrap();
    let bia = service.login("bia", "pw").unwrap();
    let caio = service.login("caio", "pw").unwrap();

    service.create_community(&bia, "c1", "d").await.unwrap();
    service.join_community(&caio, "c1").await.unwrap();
    service.join_community(&ana, "c1").await.unwrap();

    assert_eq!(service.community_members("c1").unwrap(), "{bia,caio,ana}");
}

#[tokio::test]
async fn test_unknown_community_queries() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir).await;

    for err in [
        service.community_members("ghost").unwrap_err(),
        service.community_owner("ghost").unwrap_err(),
        service.community_description("ghost").unwrap_err(),
    ] {
        assert_eq!(network_err(err), NetworkError::CommunityNotFound);
    }
}

#[tokio::test]
async fn test_profile_attributes_through_the_service() {
    let dir = TempDir::new().unwrap();
    let mut service = service(&dir).await;

    service.create_user("ana", "pw", "Ana").await.unwrap();
    let ana = service.login("ana", "pw").unwrap();

    // "name" is virtual and case-insensitive.
    assert_eq!(service.attribute("ana", "name").unwrap(), "Ana");
    assert_eq!(service.attribute("ana", "NAME").unwrap(), "Ana");

    let err = service.attribute("ana", "cidade").unwrap_err();
    assert_eq!(network_err(err), NetworkError::AttributeNotSet);

    service.set_attribute(&ana, "Cidade", "Recife").await.unwrap();
    assert_eq!(service.attribute("ana", "cidade").unwrap(), "Recife");

    let err = service.attribute("nobody", "cidade").unwrap_err();
    assert_eq!(network_err(err), NetworkError::UserNotFound);
}

#[tokio::test]
async fn test_authentication_is_generic_about_failures() {
    let dir = TempDir::new().unwrap();
    let mut service = service(&dir).await;

    service.create_user("ana", "pw", "Ana").await.unwrap();

    let err = service.login("ana", "wrong").unwrap_err();
    assert_eq!(network_err(err), NetworkError::AuthenticationFailed);
    let err = service.login("ghost", "pw").unwrap_err();
    assert_eq!(network_err(err), NetworkError::AuthenticationFailed);

    let err = service.create_user("", "pw", "X").await.unwrap_err();
    assert_eq!(network_err(err), NetworkError::InvalidArgument("login"));
    let err = service.create_user("x", " ", "X").await.unwrap_err();
    assert_eq!(network_err(err), NetworkError::InvalidArgument("password"));
}
