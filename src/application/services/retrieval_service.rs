use std::sync::Arc;

use crate::application::ports::{
    Embedder, EmbedderError, KnowledgeBase, KnowledgeBaseError, LlmClient,
};
use crate::application::services::context_builder::assemble_context;
use crate::application::services::prompt::PromptTemplate;

pub const NO_RELEVANT_INFORMATION: &str =
    "I'm sorry, I couldn't find relevant information in the documents.";
pub const NO_RESPONSE_GENERATED: &str = "No response generated.";
const GENERATION_ERROR_PREFIX: &str = "Error generating response";

#[derive(Debug, Clone)]
pub struct RetrievalOptions {
    pub top_k: usize,
    pub min_score: Option<f32>,
    pub max_context_tokens: usize,
    pub prompt: PromptTemplate,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            top_k: 1,
            min_score: None,
            max_context_tokens: 3072,
            prompt: PromptTemplate::default(),
        }
    }
}

pub struct RetrievalService {
    embedder: Arc<dyn Embedder>,
    llm_client: Arc<dyn LlmClient>,
    knowledge_base: Arc<dyn KnowledgeBase>,
    options: RetrievalOptions,
}

impl RetrievalService {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        llm_client: Arc<dyn LlmClient>,
        knowledge_base: Arc<dyn KnowledgeBase>,
        options: RetrievalOptions,
    ) -> Self {
        Self {
            embedder,
            llm_client,
            knowledge_base,
            options,
        }
    }

    /// Answers a question, never failing: every error becomes a readable
    /// `"Error generating response: ..."` string.
    pub async fn answer(&self, question: &str) -> String {
        match self.query(question).await {
            Ok(response) => response.answer,
            Err(e) => {
                tracing::error!(error = %e, "Retrieval failed");
                generation_error(&e)
            }
        }
    }

    /// Retrieves the best matching chunks and asks the LLM.
    ///
    /// Embedding and search failures propagate. A failed LLM call is folded
    /// into the answer text and flagged with `generation_failed`.
    #[tracing::instrument(skip(self, question), fields(top_k = self.options.top_k))]
    pub async fn query(&self, question: &str) -> Result<QueryResponse, RetrievalError> {
        let query_embedding = self
            .embedder
            .embed(question)
            .await
            .map_err(RetrievalError::Embedding)?;

        let mut results = self
            .knowledge_base
            .search(&query_embedding, self.options.top_k)
            .await?;

        if let Some(min_score) = self.options.min_score {
            results.retain(|r| r.score >= min_score);
        }

        if results.is_empty() {
            tracing::info!("No relevant chunks found");
            return Ok(QueryResponse {
                answer: NO_RELEVANT_INFORMATION.to_string(),
                sources: Vec::new(),
                generation_failed: false,
            });
        }

        let context = assemble_context(&results, self.options.max_context_tokens);
        results.truncate(context.used);

        tracing::debug!(
            chunks = context.used,
            context_tokens = context.tokens,
            best_score = results[0].score,
            "Context assembled"
        );

        let prompt = self.options.prompt.render(&context.text, question);

        let (answer, generation_failed) = match self.llm_client.complete(&prompt).await {
            Ok(text) if text.trim().is_empty() => (NO_RESPONSE_GENERATED.to_string(), false),
            Ok(text) => (text.trim().to_string(), false),
            Err(e) => {
                tracing::error!(error = %e, "LLM completion failed");
                (generation_error(&e), true)
            }
        };

        let sources = results
            .into_iter()
            .map(|r| SourceChunk {
                text: r.chunk.text,
                source: r.chunk.source,
                section: r.chunk.section,
                page: r.chunk.page,
                score: r.score,
            })
            .collect();

        Ok(QueryResponse {
            answer,
            sources,
            generation_failed,
        })
    }
}

fn generation_error(error: &dyn std::fmt::Display) -> String {
    format!("{GENERATION_ERROR_PREFIX}: {error}")
}

#[derive(Debug, Clone)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<SourceChunk>,
    pub generation_failed: bool,
}

#[derive(Debug, Clone)]
pub struct SourceChunk {
    pub text: String,
    pub source: String,
    pub section: Option<String>,
    pub page: Option<u32>,
    pub score: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("embedding: {0}")]
    Embedding(EmbedderError),
    #[error("search: {0}")]
    Search(#[from] KnowledgeBaseError),
}
