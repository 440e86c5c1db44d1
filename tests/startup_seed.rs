//! Store assembly from configuration and the shipped development seed

use std::io::Write;

use intent_service::{startup, AppConfig, StoreBackend, TextNormalizer};
use tempfile::NamedTempFile;

fn seed_config(path: &str) -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "KNOWLEDGE_SEED" => Some(path.to_string()),
        _ => None,
    })
    .unwrap()
}

#[tokio::test]
async fn test_build_store_from_seed_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
intents:
  - intent: greeting
    response: "Здравствуйте!"
    keywords: [привет]
  - intent: farewell
    response: "До свидания!"
"#
    )
    .unwrap();

    let config = seed_config(file.path().to_str().unwrap());
    assert!(matches!(config.store, StoreBackend::Seed { .. }));

    let normalizer = TextNormalizer::new(config.language);
    let store = startup::build_store(&config, &normalizer).await.unwrap();

    assert_eq!(store.list_intents().await.unwrap(), vec!["farewell", "greeting"]);
    let hit = store
        .find_by_keyword(&normalizer.normalize("Привет"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hit.intent, "greeting");
}

#[tokio::test]
async fn test_missing_seed_file_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.yaml");
    let config = seed_config(missing.to_str().unwrap());

    let err = startup::build_store(&config, &TextNormalizer::default())
        .await
        .err()
        .unwrap();

    assert!(format!("{:#}", err).contains("Failed to read knowledge seed"));
}

#[tokio::test]
async fn test_malformed_seed_file_fails_startup() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "intents: [{{ intent: 42").unwrap();
    let config = seed_config(file.path().to_str().unwrap());

    assert!(startup::build_store(&config, &TextNormalizer::default())
        .await
        .is_err());
}

#[tokio::test]
async fn test_shipped_seed_answers_common_questions() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/knowledge_seed.yaml");
    let config = seed_config(path);
    let normalizer = TextNormalizer::new(config.language);
    let store = startup::build_store(&config, &normalizer).await.unwrap();

    for (query, intent) in [
        ("Привет", "greeting"),
        ("спасибо большое", "thanks"),
        ("где мой заказ", "order_status"),
        ("позовите оператора", "operator"),
    ] {
        let hit = store
            .find_by_keyword(&normalizer.normalize(query))
            .await
            .unwrap();
        assert_eq!(
            hit.map(|m| m.intent).as_deref(),
            Some(intent),
            "query: {}",
            query
        );
    }
}
