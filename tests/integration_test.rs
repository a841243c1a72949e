// Integration tests for celebmatch
use async_trait::async_trait;
use celebmatch_core::{
    EmbedError, EmbeddingStore, Error, FetchError, NoopCleaner, PostFetcher, SentenceEncoder,
    UserMatcher,
};
use celebmatch_pipeline::{HashingEncoder, StoreBuilder, TweetCleaner};
use std::io::Write;
use std::sync::Arc;

struct NoFetch;

#[async_trait]
impl PostFetcher for NoFetch {
    async fn fetch_posts(&self, handle: &str) -> Result<Vec<String>, FetchError> {
        Err(FetchError::UserNotFound(handle.to_string()))
    }
}

struct CannedFetch {
    posts: Vec<String>,
}

#[async_trait]
impl PostFetcher for CannedFetch {
    async fn fetch_posts(&self, _handle: &str) -> Result<Vec<String>, FetchError> {
        Ok(self.posts.clone())
    }
}

/// Encodes every text to a constant vector, configurable per test.
struct ConstEncoder {
    vector: Vec<f32>,
}

#[async_trait]
impl SentenceEncoder for ConstEncoder {
    async fn encode(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(batch.iter().map(|_| self.vector.clone()).collect())
    }
}

fn abc_store() -> Arc<EmbeddingStore> {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "username,v1,v2,v3\nA,1.0,0.0,0.0\nB,0.0,1.0,0.0\nC,0.7,0.7,0.0\n"
    )
    .unwrap();
    file.flush().unwrap();
    let store = EmbeddingStore::load(file.path()).unwrap();
    file.close().unwrap();
    Arc::new(store)
}

fn store_matcher() -> UserMatcher {
    UserMatcher::new(
        abc_store(),
        Arc::new(NoFetch),
        Arc::new(NoopCleaner),
        Arc::new(HashingEncoder::new(3)),
    )
}

#[tokio::test]
async fn compare_known_pair_end_to_end() {
    let matcher = store_matcher();
    let result = matcher.compare("A", "C").await.unwrap();
    assert!((result.score - 0.707).abs() < 1e-3);
}

#[tokio::test]
async fn ranking_end_to_end_order() {
    let matcher = store_matcher();
    let mut entries = matcher.rank_against_store("A").await.unwrap();
    entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());

    let names: Vec<&str> = entries.iter().map(|e| e.candidate.as_str()).collect();
    assert_eq!(names, vec!["A", "C", "B"]);
    assert!((entries[0].score - 1.0).abs() < 1e-5);
    assert!((entries[1].score - 0.707).abs() < 1e-3);
    assert!(entries[2].score.abs() < 1e-6);
}

#[tokio::test]
async fn scraped_subject_ranks_against_full_store() {
    let matcher = UserMatcher::new(
        abc_store(),
        Arc::new(CannedFetch {
            posts: vec!["any post".to_string()],
        }),
        Arc::new(NoopCleaner),
        Arc::new(ConstEncoder {
            vector: vec![0.7, 0.7, 0.0],
        }),
    );

    let top = matcher.top_matches("stranger", 10).await.unwrap();
    // Subject is not store-resident: all three entries survive, and the best
    // one is the aligned celebrity, not silently dropped.
    assert_eq!(top.len(), 3);
    assert_eq!(top[0].candidate, "C");
    assert!((top[0].score - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn resolution_failure_names_the_failed_user() {
    let matcher = store_matcher();
    let err = matcher.compare("nobody", "A").await.unwrap_err();
    match err {
        Error::Resolution { username, source } => {
            assert_eq!(username, "nobody");
            assert!(matches!(*source, Error::NotFound(_)));
        }
        other => panic!("expected Resolution error, got {other:?}"),
    }
}

#[tokio::test]
async fn random_pair_respects_seed_across_matchers() {
    let first = store_matcher().compare_random_pair(43).await.unwrap();
    let second = store_matcher().compare_random_pair(43).await.unwrap();
    assert_eq!(first.subject, second.subject);
    assert_eq!(first.candidate, second.candidate);
}

#[tokio::test]
async fn prepared_store_round_trips_into_matcher() {
    let dir = tempfile::tempdir().unwrap();
    let posts = |lines: &[&str]| {
        let mut body = String::from("twitter_id,date,tweet\n");
        for (i, line) in lines.iter().enumerate() {
            body.push_str(&format!("{i},2022-01-01,{line}\n"));
        }
        body
    };
    std::fs::write(
        dir.path().join("rustfan.csv"),
        posts(&["borrow checker appreciation post", "lifetimes are fine"]),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("chef.csv"),
        posts(&["tonight we braise short ribs", "a good stock takes hours"]),
    )
    .unwrap();

    let out = dir.path().join("embeddings.csv");
    let builder = StoreBuilder::new(
        Arc::new(TweetCleaner::new()),
        Arc::new(HashingEncoder::new(64)),
    );
    let summary = builder.build(dir.path(), &out).await.unwrap();
    assert_eq!(summary.processed, 2);

    let store = Arc::new(EmbeddingStore::load(&out).unwrap());
    let matcher = UserMatcher::new(
        store,
        Arc::new(NoFetch),
        Arc::new(TweetCleaner::new()),
        Arc::new(HashingEncoder::new(64)),
    );

    let result = matcher.compare("rustfan", "chef").await.unwrap();
    assert!(result.score >= -1.0 && result.score <= 1.0);
    let own = matcher.compare("rustfan", "RUSTFAN").await.unwrap();
    assert!((own.score - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn scrape_clean_encode_pipeline_end_to_end() {
    // Posts that are pure noise after cleaning must not contribute.
    let matcher = UserMatcher::new(
        abc_store(),
        Arc::new(CannedFetch {
            posts: vec![
                "@someone https://t.co/abc #hype".to_string(),
                "real words here".to_string(),
            ],
        }),
        Arc::new(TweetCleaner::new()),
        Arc::new(ConstEncoder {
            vector: vec![1.0, 0.0, 0.0],
        }),
    );

    let result = matcher.compare("visitor", "A").await.unwrap();
    assert!((result.score - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn all_noise_posts_fail_as_no_content() {
    let matcher = UserMatcher::new(
        abc_store(),
        Arc::new(CannedFetch {
            posts: vec!["@a #b https://t.co/c".to_string()],
        }),
        Arc::new(TweetCleaner::new()),
        Arc::new(ConstEncoder {
            vector: vec![1.0, 0.0, 0.0],
        }),
    );

    let err = matcher.compare("visitor", "A").await.unwrap_err();
    match err {
        Error::Resolution { username, source } => {
            assert_eq!(username, "visitor");
            assert!(matches!(*source, Error::NoContent(_)));
        }
        other => panic!("expected Resolution error, got {other:?}"),
    }
}
