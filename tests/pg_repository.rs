//! Round trip against a real PostgreSQL. Run with `--ignored` and TEST_DB_* set.

use crud_action::{AppError, EntityRepository, PgRepository, Record, RepositoryConfig};
use serde_json::json;
use uuid::Uuid;

fn config() -> RepositoryConfig {
    let var = |k: &str, d: &str| std::env::var(k).unwrap_or_else(|_| d.to_string());
    RepositoryConfig {
        host: var("TEST_DB_SERVER", "localhost"),
        port: var("TEST_DB_PORT", "5432").parse().unwrap(),
        database: var("TEST_DB_NAME", "postgres"),
        user: var("TEST_DB_USER", "postgres"),
        password: var("TEST_DB_PASSWORD", "postgres"),
        action_name: format!("RoundTrip{}", Uuid::new_v4().simple()),
    }
}

#[tokio::test]
#[ignore]
async fn crud_round_trip() {
    let repo = PgRepository::new(&config()).unwrap();
    repo.create_table().await.unwrap();
    repo.create_table().await.unwrap();

    let mut record = Record::new(Some("first".into()));
    assert_eq!(repo.insert(&record).await.unwrap(), record.id);
    assert_eq!(repo.get_by_id(record.id).await.unwrap(), Some(record.clone()));
    assert!(matches!(repo.insert(&record).await, Err(AppError::Conflict(_))));

    record.descr = Some("second".into());
    record.enabled = Some(false);
    repo.update(&record).await.unwrap();
    assert_eq!(repo.get_by_id(record.id).await.unwrap(), Some(record.clone()));
    assert_eq!(repo.get_all().await.unwrap().len(), 1);

    let rows = repo
        .execute_query(&format!("SELECT descr FROM {}", repo.table_name()))
        .await
        .unwrap();
    assert_eq!(rows, vec![json!({ "descr": "second" })]);

    let absent = Uuid::new_v4();
    assert_eq!(repo.delete(absent).await.unwrap(), absent);
    assert_eq!(repo.get_by_id(absent).await.unwrap(), None);

    repo.delete(record.id).await.unwrap();
    assert!(repo.get_by_id(record.id).await.unwrap().is_none());

    repo.truncate_table().await.unwrap();
    repo.drop_table().await.unwrap();
    assert!(matches!(repo.drop_table().await, Err(AppError::Schema(_))));
}
