use std::collections::BTreeMap;

use docbot::application::ports::{KnowledgeBase, KnowledgeBaseError};
use docbot::domain::{Chunk, DocumentId, Embedding, KnowledgeEntry};
use docbot::infrastructure::persistence::{
    InMemoryKnowledgeBase, JsonFileKnowledgeBase, embedding_collection_filename,
    write_embedding_collection, write_text_dump,
};

fn chunk(text: &str, source: &str) -> Chunk {
    Chunk::new(text.to_string(), DocumentId::new(), source, 0)
}

fn embedding(values: &[f32]) -> Embedding {
    Embedding::new(values.to_vec())
}

#[tokio::test]
async fn given_entries_when_searching_then_results_are_ranked_by_similarity() {
    let kb = InMemoryKnowledgeBase::new();
    kb.upsert(
        &[chunk("far", "a.pdf"), chunk("near", "a.pdf"), chunk("mid", "b.pdf")],
        &[embedding(&[0.0, 1.0]), embedding(&[1.0, 0.0]), embedding(&[1.0, 1.0])],
    )
    .await
    .unwrap();

    let results = kb.search(&embedding(&[1.0, 0.0]), 3).await.unwrap();

    let texts: Vec<&str> = results.iter().map(|r| r.chunk.text.as_str()).collect();
    assert_eq!(texts, vec!["near", "mid", "far"]);
    assert!((results[0].score - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn given_equal_scores_when_searching_then_first_inserted_wins() {
    let kb = InMemoryKnowledgeBase::new();
    kb.upsert(
        &[chunk("first", "a.pdf"), chunk("second", "a.pdf")],
        &[embedding(&[2.0, 0.0]), embedding(&[1.0, 0.0])],
    )
    .await
    .unwrap();

    let results = kb.search(&embedding(&[1.0, 0.0]), 1).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk.text, "first");
}

#[tokio::test]
async fn given_top_k_zero_when_searching_then_returns_nothing() {
    let kb = InMemoryKnowledgeBase::new();
    kb.upsert(&[chunk("text", "a.pdf")], &[embedding(&[1.0])])
        .await
        .unwrap();

    let results = kb.search(&embedding(&[1.0]), 0).await.unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn given_empty_knowledge_base_when_searching_then_returns_nothing() {
    let kb = InMemoryKnowledgeBase::new();

    let results = kb.search(&embedding(&[1.0]), 5).await.unwrap();

    assert!(results.is_empty());
    assert!(kb.is_empty().await.unwrap());
}

#[tokio::test]
async fn given_mismatched_lengths_when_upserting_then_returns_length_mismatch() {
    let kb = InMemoryKnowledgeBase::new();

    let result = kb
        .upsert(&[chunk("a", "a.pdf"), chunk("b", "a.pdf")], &[embedding(&[1.0])])
        .await;

    assert!(matches!(
        result,
        Err(KnowledgeBaseError::LengthMismatch {
            chunks: 2,
            embeddings: 1
        })
    ));
    assert_eq!(kb.len().await.unwrap(), 0);
}

#[tokio::test]
async fn given_existing_chunk_id_when_upserting_then_entry_is_replaced_in_place() {
    let kb = InMemoryKnowledgeBase::new();
    let original = chunk("original", "a.pdf");
    let other = chunk("other", "a.pdf");
    kb.upsert(
        &[original.clone(), other],
        &[embedding(&[1.0, 0.0]), embedding(&[0.0, 1.0])],
    )
    .await
    .unwrap();

    let mut updated = original.clone();
    updated.text = "updated".to_string();
    kb.upsert(&[updated], &[embedding(&[1.0, 0.0])]).await.unwrap();

    let snapshot = kb.snapshot().await;
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0].chunk.text, "updated");
    assert_eq!(snapshot[0].chunk.id, original.id);
}

#[tokio::test]
async fn given_chunks_from_two_sources_when_listing_sources_then_counts_follow_first_appearance() {
    let kb = InMemoryKnowledgeBase::new();
    kb.upsert(
        &[chunk("1", "b.pdf"), chunk("2", "a.pdf"), chunk("3", "b.pdf")],
        &[embedding(&[1.0]), embedding(&[1.0]), embedding(&[1.0])],
    )
    .await
    .unwrap();

    let sources = kb.sources().await.unwrap();

    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].source, "b.pdf");
    assert_eq!(sources[0].chunk_count, 2);
    assert_eq!(sources[1].source, "a.pdf");
    assert_eq!(sources[1].chunk_count, 1);
}

#[tokio::test]
async fn given_entries_when_clearing_then_knowledge_base_is_empty() {
    let kb = InMemoryKnowledgeBase::from_entries(vec![KnowledgeEntry::new(
        chunk("text", "a.pdf"),
        embedding(&[1.0]),
    )]);

    kb.clear().await.unwrap();

    assert!(kb.is_empty().await.unwrap());
}

#[tokio::test]
async fn given_missing_file_when_opening_json_knowledge_base_then_it_starts_empty() {
    let dir = tempfile::tempdir().unwrap();

    let kb = JsonFileKnowledgeBase::open(dir.path().join("kb.json"))
        .await
        .unwrap();

    assert_eq!(kb.len().await.unwrap(), 0);
}

#[tokio::test]
async fn given_upserted_entries_when_reopening_json_knowledge_base_then_entries_survive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("kb.json");
    let stored = chunk("persisted text", "guide.pdf").with_section("OVERVIEW");

    {
        let kb = JsonFileKnowledgeBase::open(&path).await.unwrap();
        kb.upsert(&[stored.clone()], &[embedding(&[0.5, 0.5])])
            .await
            .unwrap();
    }

    let reopened = JsonFileKnowledgeBase::open(&path).await.unwrap();
    let results = reopened.search(&embedding(&[0.5, 0.5]), 1).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk, stored);
}

#[tokio::test]
async fn given_cleared_json_knowledge_base_when_reopening_then_it_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kb.json");
    let kb = JsonFileKnowledgeBase::open(&path).await.unwrap();
    kb.upsert(&[chunk("text", "a.pdf")], &[embedding(&[1.0])])
        .await
        .unwrap();

    kb.clear().await.unwrap();

    let reopened = JsonFileKnowledgeBase::open(&path).await.unwrap();
    assert!(reopened.is_empty().await.unwrap());
}

#[tokio::test]
async fn given_corrupted_file_when_opening_json_knowledge_base_then_returns_load_failed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kb.json");
    std::fs::write(&path, b"{ not json").unwrap();

    let result = JsonFileKnowledgeBase::open(&path).await;

    assert!(matches!(result, Err(KnowledgeBaseError::LoadFailed(_))));
}

#[test]
fn given_pdf_filename_when_naming_collection_then_stem_gets_suffix() {
    assert_eq!(
        embedding_collection_filename("report.v2.pdf"),
        "report.v2_embeddings.json"
    );
}

#[test]
fn given_relative_source_path_when_naming_collection_then_separators_are_flattened() {
    assert_eq!(
        embedding_collection_filename("a/guide.pdf"),
        "a_guide_embeddings.json"
    );
    assert_eq!(
        embedding_collection_filename("b\\specs\\guide.pdf"),
        "b_specs_guide_embeddings.json"
    );
    assert_ne!(
        embedding_collection_filename("a/guide.pdf"),
        embedding_collection_filename("b/guide.pdf")
    );
}

#[tokio::test]
async fn given_entries_when_writing_embedding_collection_then_json_file_holds_them() {
    let dir = tempfile::tempdir().unwrap();
    let entries = vec![KnowledgeEntry::new(
        chunk("text", "manual.pdf"),
        embedding(&[0.25, 0.75]),
    )];

    let path = write_embedding_collection(dir.path(), "manual.pdf", &entries)
        .await
        .unwrap();

    assert_eq!(path, dir.path().join("manual_embeddings.json"));
    let json: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(json["source"], "manual.pdf");
    assert_eq!(json["entries"][0]["chunk"]["text"], "text");
    assert_eq!(json["entries"][0]["embedding"][1], 0.75);
}

#[tokio::test]
async fn given_extracted_texts_when_writing_dump_then_filenames_map_to_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("extracted_data.json");
    let mut texts = BTreeMap::new();
    texts.insert("a.pdf".to_string(), "alpha".to_string());
    texts.insert("b.pdf".to_string(), "beta".to_string());

    write_text_dump(&path, &texts).await.unwrap();

    let loaded: BTreeMap<String, String> =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(loaded, texts);
}
