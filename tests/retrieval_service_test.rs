use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use docbot::application::ports::{
    Embedder, EmbedderError, KnowledgeBase, LlmClient, LlmClientError, SearchResult,
};
use docbot::application::services::{
    NO_RELEVANT_INFORMATION, NO_RESPONSE_GENERATED, PromptTemplate, RetrievalError,
    RetrievalOptions, RetrievalService, assemble_context,
};
use docbot::domain::{Chunk, DocumentId, Embedding};
use docbot::infrastructure::persistence::InMemoryKnowledgeBase;

struct FixedEmbedder;

#[async_trait::async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Embedding, EmbedderError> {
        Ok(Embedding::new(vec![1.0, 0.0]))
    }
}

struct FailingEmbedder;

#[async_trait::async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Embedding, EmbedderError> {
        Err(EmbedderError::ApiRequestFailed("connection refused".to_string()))
    }
}

#[derive(Default)]
struct RecordingLlmClient {
    reply: String,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl RecordingLlmClient {
    fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for RecordingLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        Ok(self.reply.clone())
    }
}

struct FailingLlmClient;

#[async_trait::async_trait]
impl LlmClient for FailingLlmClient {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmClientError> {
        Err(LlmClientError::RateLimited)
    }
}

async fn knowledge_base_with(entries: &[(&str, &[f32])]) -> Arc<InMemoryKnowledgeBase> {
    let kb = Arc::new(InMemoryKnowledgeBase::new());
    let chunks: Vec<Chunk> = entries
        .iter()
        .map(|(text, _)| {
            Chunk::new(text.to_string(), DocumentId::new(), "guide.pdf", 0)
                .with_section("OVERVIEW")
        })
        .collect();
    let embeddings: Vec<Embedding> = entries
        .iter()
        .map(|(_, values)| Embedding::new(values.to_vec()))
        .collect();
    kb.upsert(&chunks, &embeddings).await.unwrap();
    kb
}

fn service(
    embedder: Arc<dyn Embedder>,
    llm: Arc<dyn LlmClient>,
    kb: Arc<InMemoryKnowledgeBase>,
    options: RetrievalOptions,
) -> RetrievalService {
    RetrievalService::new(embedder, llm, kb, options)
}

#[tokio::test]
async fn given_empty_knowledge_base_when_answering_then_returns_fallback_without_calling_llm() {
    let llm = Arc::new(RecordingLlmClient::replying("unused"));
    let kb = Arc::new(InMemoryKnowledgeBase::new());
    let service = service(
        Arc::new(FixedEmbedder),
        llm.clone(),
        kb,
        RetrievalOptions::default(),
    );

    let answer = service.answer("What is this?").await;

    assert_eq!(answer, NO_RELEVANT_INFORMATION);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_matching_chunk_when_answering_then_prompt_holds_context_and_question() {
    let llm = Arc::new(RecordingLlmClient::replying("  Deploy with the CLI.  "));
    let kb = knowledge_base_with(&[("Use the CLI to deploy.", &[1.0, 0.0])]).await;
    let service = service(
        Arc::new(FixedEmbedder),
        llm.clone(),
        kb,
        RetrievalOptions::default(),
    );

    let answer = service.answer("How do I deploy?").await;

    assert_eq!(answer, "Deploy with the CLI.");
    let prompt = llm.last_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.contains("Use the CLI to deploy."));
    assert!(prompt.contains("Section: OVERVIEW"));
    assert!(prompt.contains("How do I deploy?"));
}

#[tokio::test]
async fn given_default_top_k_when_querying_then_only_best_chunk_is_used() {
    let llm = Arc::new(RecordingLlmClient::replying("answer"));
    let kb = knowledge_base_with(&[
        ("less relevant", &[0.0, 1.0]),
        ("most relevant", &[1.0, 0.0]),
    ])
    .await;
    let service = service(
        Arc::new(FixedEmbedder),
        llm.clone(),
        kb,
        RetrievalOptions::default(),
    );

    let response = service.query("question").await.unwrap();

    assert_eq!(response.sources.len(), 1);
    assert_eq!(response.sources[0].text, "most relevant");
    assert_eq!(response.sources[0].source, "guide.pdf");
    let prompt = llm.last_prompt.lock().unwrap().clone().unwrap();
    assert!(!prompt.contains("less relevant"));
}

#[tokio::test]
async fn given_min_score_above_every_match_when_answering_then_returns_fallback() {
    let llm = Arc::new(RecordingLlmClient::replying("unused"));
    let kb = knowledge_base_with(&[("unrelated", &[0.0, 1.0])]).await;
    let options = RetrievalOptions {
        min_score: Some(0.5),
        ..RetrievalOptions::default()
    };
    let service = service(Arc::new(FixedEmbedder), llm.clone(), kb, options);

    let answer = service.answer("question").await;

    assert_eq!(answer, NO_RELEVANT_INFORMATION);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_blank_llm_reply_when_answering_then_returns_no_response_message() {
    let llm = Arc::new(RecordingLlmClient::replying("   "));
    let kb = knowledge_base_with(&[("context", &[1.0, 0.0])]).await;
    let service = service(Arc::new(FixedEmbedder), llm, kb, RetrievalOptions::default());

    let answer = service.answer("question").await;

    assert_eq!(answer, NO_RESPONSE_GENERATED);
}

#[tokio::test]
async fn given_failing_llm_when_answering_then_error_is_folded_into_answer() {
    let kb = knowledge_base_with(&[("context", &[1.0, 0.0])]).await;
    let service = service(
        Arc::new(FixedEmbedder),
        Arc::new(FailingLlmClient),
        kb,
        RetrievalOptions::default(),
    );

    let response = service.query("question").await.unwrap();

    assert!(response.generation_failed);
    assert!(response.answer.starts_with("Error generating response: "));
    assert!(response.answer.contains("rate limited"));
}

#[tokio::test]
async fn given_failing_embedder_when_answering_then_returns_error_string() {
    let kb = knowledge_base_with(&[("context", &[1.0, 0.0])]).await;
    let service = service(
        Arc::new(FailingEmbedder),
        Arc::new(RecordingLlmClient::replying("unused")),
        kb,
        RetrievalOptions::default(),
    );

    let answer = service.answer("question").await;

    assert!(answer.starts_with("Error generating response: "));
    assert!(answer.contains("connection refused"));
}

#[tokio::test]
async fn given_failing_embedder_when_querying_then_returns_embedding_error() {
    let kb = knowledge_base_with(&[("context", &[1.0, 0.0])]).await;
    let service = service(
        Arc::new(FailingEmbedder),
        Arc::new(RecordingLlmClient::replying("unused")),
        kb,
        RetrievalOptions::default(),
    );

    let result = service.query("question").await;

    assert!(matches!(result, Err(RetrievalError::Embedding(_))));
}

#[tokio::test]
async fn given_custom_template_when_answering_then_it_is_rendered() {
    let llm = Arc::new(RecordingLlmClient::replying("ok"));
    let kb = knowledge_base_with(&[("the context", &[1.0, 0.0])]).await;
    let options = RetrievalOptions {
        prompt: PromptTemplate::new("Q={question}"),
        ..RetrievalOptions::default()
    };
    let service = service(Arc::new(FixedEmbedder), llm.clone(), kb, options);

    service.answer("why?").await;

    let prompt = llm.last_prompt.lock().unwrap().clone().unwrap();
    assert_eq!(prompt, "Q=why?");
}

#[test]
fn given_placeholders_inside_question_when_rendering_then_they_are_not_expanded() {
    let template = PromptTemplate::new("C:{context} Q:{question} {other}");

    let rendered = template.render("ctx", "{context}?");

    assert_eq!(rendered, "C:ctx Q:{context}? {other}");
}

#[test]
fn given_tight_budget_when_assembling_context_then_best_result_is_always_kept() {
    let long_text = "word ".repeat(200);
    let results = vec![
        SearchResult {
            chunk: Chunk::new(long_text.clone(), DocumentId::new(), "a.pdf", 0),
            score: 0.9,
        },
        SearchResult {
            chunk: Chunk::new("second".to_string(), DocumentId::new(), "b.pdf", 0),
            score: 0.8,
        },
    ];

    let context = assemble_context(&results, 10);

    assert_eq!(context.used, 1);
    assert!(context.text.starts_with("Source: a.pdf\n"));
    assert!(!context.text.contains("second"));
}

#[test]
fn given_roomy_budget_when_assembling_context_then_passages_are_joined_in_order() {
    let results = vec![
        SearchResult {
            chunk: Chunk::new("first".to_string(), DocumentId::new(), "a.pdf", 0),
            score: 0.9,
        },
        SearchResult {
            chunk: Chunk::new("second".to_string(), DocumentId::new(), "b.pdf", 0)
                .with_section("FAQ"),
            score: 0.8,
        },
    ];

    let context = assemble_context(&results, 1000);

    assert_eq!(context.used, 2);
    assert_eq!(
        context.text,
        "Source: a.pdf\nfirst\n\nSource: b.pdf\nSection: FAQ\nsecond"
    );
}
