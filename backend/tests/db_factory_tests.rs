//! Tests for db::factory module - repository creation and configuration.

mod support;

use std::str::FromStr;
use tourconnect::db::factory::{unique_tour_ids_from_env, RepositoryFactory, RepositoryType};
use tourconnect::db::{RepositoryError, TourRepository};

#[test]
fn test_repository_type_from_str_mongo() {
    assert_eq!(RepositoryType::from_str("mongo").unwrap(), RepositoryType::Mongo);
    assert_eq!(RepositoryType::from_str("MONGODB").unwrap(), RepositoryType::Mongo);
}

#[test]
fn test_repository_type_from_str_local() {
    assert_eq!(RepositoryType::from_str("local").unwrap(), RepositoryType::Local);
    assert_eq!(RepositoryType::from_str("Memory").unwrap(), RepositoryType::Local);
}

#[test]
fn test_repository_type_from_str_invalid() {
    let result = RepositoryType::from_str("invalid");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Unknown repository type"));
}

#[test]
fn test_repository_type_from_env_default() {
    support::with_scoped_env(
        &[("REPOSITORY_TYPE", None), ("MONGODB_URL", None)],
        || {
            let rt = RepositoryType::from_env().unwrap();
            assert_eq!(rt, RepositoryType::Local);
        },
    );
}

#[test]
fn test_repository_type_from_env_with_mongodb_url() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("MONGODB_URL", Some("mongodb://localhost:27017/tours")),
        ],
        || {
            let rt = RepositoryType::from_env().unwrap();
            assert_eq!(rt, RepositoryType::Mongo);
        },
    );
}

#[test]
fn test_repository_type_explicit_overrides_url() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("local")),
            ("MONGODB_URL", Some("mongodb://localhost:27017/tours")),
        ],
        || {
            let rt = RepositoryType::from_env().unwrap();
            assert_eq!(rt, RepositoryType::Local);
        },
    );
}

#[test]
fn test_repository_type_from_env_invalid() {
    support::with_scoped_env(&[("REPOSITORY_TYPE", Some("postgres"))], || {
        let err = RepositoryType::from_env().unwrap_err();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    });
}

#[test]
fn test_unique_tour_ids_from_env() {
    support::with_scoped_env(&[("TOUR_UNIQUE_IDS", None)], || {
        assert!(unique_tour_ids_from_env().unwrap());
    });
    support::with_scoped_env(&[("TOUR_UNIQUE_IDS", Some("false"))], || {
        assert!(!unique_tour_ids_from_env().unwrap());
    });
    support::with_scoped_env(&[("TOUR_UNIQUE_IDS", Some("sometimes"))], || {
        assert!(unique_tour_ids_from_env().is_err());
    });
}

#[test]
fn test_from_env_builds_local_repository() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("local")),
            ("TOUR_UNIQUE_IDS", Some("0")),
        ],
        || {
            support::block_on(async {
                let repo = RepositoryFactory::from_env().await.unwrap();
                assert!(repo.health_check().await.unwrap());

                let first = serde_json::json!({ "tour_id": 1 });
                tourconnect::db::services::create_tour(repo.as_ref(), first.clone())
                    .await
                    .unwrap();
                // Uniqueness is off, so the same tour_id is accepted twice.
                tourconnect::db::services::create_tour(repo.as_ref(), first)
                    .await
                    .unwrap();
                assert_eq!(repo.list_tours().await.unwrap().len(), 2);
            })
        },
    );
}

#[tokio::test]
async fn test_create_local_repository() {
    let repo = RepositoryFactory::create_local(true);
    assert!(repo.health_check().await.unwrap());
    assert!(repo.list_tours().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("repository.toml");
    std::fs::write(&path, "[repository]\ntype = \"local\"\nunique_tour_ids = true\n").unwrap();

    let repo = RepositoryFactory::from_config_file(&path).await.unwrap();
    assert!(repo.health_check().await.unwrap());

    let missing = RepositoryFactory::from_config_file(dir.path().join("absent.toml")).await;
    assert!(matches!(
        missing,
        Err(RepositoryError::ConfigurationError { .. })
    ));
}

#[cfg(not(feature = "mongo-repo"))]
#[tokio::test]
async fn test_mongo_without_feature_is_configuration_error() {
    let result = RepositoryFactory::create(RepositoryType::Mongo, None, true).await;
    assert!(matches!(
        result,
        Err(RepositoryError::ConfigurationError { .. })
    ));
}

#[cfg(feature = "mongo-repo")]
#[test]
fn test_mongo_config_from_env() {
    use tourconnect::db::MongoConfig;

    support::with_scoped_env(
        &[
            ("MONGODB_URL", Some("mongodb://localhost:27017/tours")),
            ("MONGODB_DATABASE", Some("tours_test")),
            ("MONGODB_COLLECTION", None),
            ("MONGODB_POOL_MAX", Some("4")),
            ("MONGODB_CONN_TIMEOUT_SEC", None),
        ],
        || {
            let config = MongoConfig::from_env().unwrap();
            assert_eq!(config.url, "mongodb://localhost:27017/tours");
            assert_eq!(config.database.as_deref(), Some("tours_test"));
            assert_eq!(config.collection, "tours");
            assert_eq!(config.max_pool_size, 4);
            assert_eq!(config.connection_timeout_sec, 10);
        },
    );

    support::with_scoped_env(&[("MONGODB_URL", None)], || {
        assert!(MongoConfig::from_env().is_err());
    });
}
