//! MongoDB repository tests.
//!
//! Run with `--features mongo-repo` and `MONGODB_TEST_URL` pointing at a
//! disposable server; each test writes to a fresh collection.

#![cfg(feature = "mongo-repo")]

use serde_json::json;
use tourconnect::db::repository::{RepositoryError, TourRepository};
use tourconnect::db::{services, MongoConfig, MongoRepository};
use tourconnect::models::{NewTour, TourId, TourPatch};

fn test_url() -> Option<String> {
    match std::env::var("MONGODB_TEST_URL") {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!("MONGODB_TEST_URL not set, skipping");
            None
        }
    }
}

fn fresh_collection() -> String {
    format!("tours_{}", uuid::Uuid::new_v4().simple())
}

async fn connect_to(url: &str, collection: &str, unique: bool) -> MongoRepository {
    let config = MongoConfig {
        database: Some("tourconnect_test".to_string()),
        collection: collection.to_string(),
        unique_tour_ids: unique,
        ..MongoConfig::with_url(url)
    };
    MongoRepository::connect(config).await.unwrap()
}

async fn test_repository(unique: bool) -> Option<MongoRepository> {
    let url = test_url()?;
    Some(connect_to(&url, &fresh_collection(), unique).await)
}

#[tokio::test]
async fn test_mongo_crud_round() {
    let Some(repo) = test_repository(true).await else {
        return;
    };
    assert!(repo.health_check().await.unwrap());

    let tour = NewTour::from_value(json!({
        "tour_id": 1,
        "name": "Shimla Trip",
        "location": "Shimla",
        "price": 2500
    }))
    .unwrap();
    let storage_id = repo.insert_tour(tour).await.unwrap();
    assert_eq!(storage_id.as_str().len(), 24);

    let tours = repo.list_tours().await.unwrap();
    assert_eq!(tours.len(), 1);
    assert_eq!(tours[0].storage_id(), Some(storage_id.as_str()));
    assert_eq!(tours[0].get("price"), Some(&json!(2500)));

    let patch = TourPatch::from_value(TourId::new(1), json!({ "price": 3000 })).unwrap();
    assert_eq!(repo.update_tour(TourId::new(1), patch.clone()).await.unwrap(), 1);
    // Same values again: matched but not modified.
    assert_eq!(repo.update_tour(TourId::new(1), patch).await.unwrap(), 0);

    let tours = repo.list_tours().await.unwrap();
    assert_eq!(tours[0].get("price"), Some(&json!(3000)));
    assert_eq!(tours[0].get("name"), Some(&json!("Shimla Trip")));

    assert_eq!(services::delete_tour(&repo, "1").await.unwrap(), 1);
    let err = services::delete_tour(&repo, "1").await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
async fn test_mongo_unique_index_rejects_duplicates() {
    let Some(repo) = test_repository(true).await else {
        return;
    };

    services::create_tour(&repo, json!({ "tour_id": 9 }))
        .await
        .unwrap();
    let err = services::create_tour(&repo, json!({ "tour_id": 9, "name": "again" }))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict { .. }));
    assert_eq!(repo.list_tours().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_mongo_update_miss_reports_zero() {
    let Some(repo) = test_repository(false).await else {
        return;
    };

    let modified = services::update_tour(&repo, "404", json!({ "price": 1 }))
        .await
        .unwrap();
    assert_eq!(modified, 0);
    assert_eq!(services::update_tour(&repo, "404", json!({})).await.unwrap(), 0);
}

#[tokio::test]
async fn test_mongo_disabling_uniqueness_drops_existing_index() {
    let Some(url) = test_url() else {
        return;
    };
    let collection = fresh_collection();

    let strict = connect_to(&url, &collection, true).await;
    services::create_tour(&strict, json!({ "tour_id": 5 }))
        .await
        .unwrap();
    let err = services::create_tour(&strict, json!({ "tour_id": 5 }))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict { .. }));

    let relaxed = connect_to(&url, &collection, false).await;
    services::create_tour(&relaxed, json!({ "tour_id": 5, "name": "second" }))
        .await
        .unwrap();
    assert_eq!(relaxed.list_tours().await.unwrap().len(), 2);

    // Reconnecting without the index present is not an error.
    connect_to(&url, &collection, false).await;
}

#[tokio::test]
async fn test_mongo_fresh_collection_without_uniqueness_connects() {
    let Some(repo) = test_repository(false).await else {
        return;
    };
    assert!(repo.list_tours().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mongo_list_keeps_insertion_order() {
    let Some(repo) = test_repository(true).await else {
        return;
    };

    for id in [3, 1, 2] {
        services::create_tour(&repo, json!({ "tour_id": id }))
            .await
            .unwrap();
    }

    let ids: Vec<i64> = repo
        .list_tours()
        .await
        .unwrap()
        .iter()
        .map(|tour| tour.tour_id().unwrap().value())
        .collect();
    assert_eq!(ids, vec![3, 1, 2]);
}
