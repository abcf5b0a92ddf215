use exam_core::model::BestScore;
use storage::repository::BestScoreRepository;
use storage::sqlite::{BEST_SCORE_KEY, SqliteRepository};

async fn open(name: &str) -> SqliteRepository {
    SqliteRepository::open(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("open")
}

#[tokio::test]
async fn best_score_is_absent_until_first_exam() {
    let repo = open("memdb_absent").await;
    assert_eq!(repo.get_best_score().await.unwrap(), None);
}

#[tokio::test]
async fn best_score_only_increases() {
    let repo = open("memdb_monotone").await;

    let best = repo.record_score(12.5).await.unwrap();
    assert_eq!(best.format(), "12.50");

    let best = repo.record_score(8.0).await.unwrap();
    assert_eq!(best.format(), "12.50");

    let best = repo.record_score(37.25).await.unwrap();
    assert_eq!(best.format(), "37.25");

    let stored: String = sqlx::query_scalar("SELECT value FROM key_values WHERE key = ?1")
        .bind(BEST_SCORE_KEY)
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(stored, "37.25");
}

#[tokio::test]
async fn negative_score_on_empty_store_records_zero() {
    let repo = open("memdb_negative").await;
    let best = repo.record_score(-2.75).await.unwrap();
    assert_eq!(best, BestScore::ZERO);
    assert_eq!(
        repo.get_best_score().await.unwrap().map(BestScore::format),
        Some("0.00".to_owned())
    );
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = open("memdb_migrate_twice").await;
    repo.record_score(3.0).await.unwrap();
    repo.migrate().await.unwrap();
    assert_eq!(repo.get_best_score().await.unwrap().unwrap().format(), "3.00");
}

#[tokio::test]
async fn concurrent_updates_keep_the_maximum() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("scores.sqlite3").display());
    let repo = SqliteRepository::open(&url).await.expect("open");
    let scores = [4.0, 19.75, 7.5, 11.0, 2.25, 19.5];

    let handles: Vec<_> = scores
        .iter()
        .map(|&score| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.record_score(score).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(repo.get_best_score().await.unwrap().unwrap().format(), "19.75");
}
