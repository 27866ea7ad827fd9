use config::{Config, FileFormat};

use docbot::presentation::config::{
    ChunkingStrategy, EmbeddingProvider, Environment, KnowledgeBaseBackend, LlmProvider, Settings,
};

fn settings_from_toml(toml: &str) -> Settings {
    Config::builder()
        .add_source(config::File::from_str(toml, FileFormat::Toml))
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap()
}

#[test]
fn given_environment_names_when_parsing_then_aliases_are_accepted() {
    assert_eq!(Environment::try_from("local".to_string()), Ok(Environment::Local));
    assert_eq!(Environment::try_from(" Dev ".to_string()), Ok(Environment::Local));
    assert_eq!(Environment::try_from("TEST".to_string()), Ok(Environment::Test));
    assert_eq!(Environment::try_from("production".to_string()), Ok(Environment::Prod));
}

#[test]
fn given_unknown_environment_when_parsing_then_error_names_it() {
    let error = Environment::try_from("staging".to_string()).unwrap_err();

    assert!(error.contains("staging"));
}

#[test]
fn given_no_sources_when_using_defaults_then_bedrock_file_backed_setup_is_described() {
    let settings = Settings::default();

    assert_eq!(settings.server.port, 3000);
    assert_eq!(settings.embeddings.provider, EmbeddingProvider::Bedrock);
    assert_eq!(settings.embeddings.model, "amazon.titan-embed-text-v2:0");
    assert_eq!(settings.llm.provider, LlmProvider::Bedrock);
    assert_eq!(settings.llm.max_tokens, 512);
    assert_eq!(settings.chunking.strategy, ChunkingStrategy::Fixed);
    assert_eq!(settings.chunking.chunk_size, 500);
    assert_eq!(settings.chunking.chunk_overlap, 100);
    assert_eq!(settings.retrieval.top_k, 1);
    assert_eq!(settings.retrieval.min_score, None);
    assert_eq!(settings.knowledge_base.backend, KnowledgeBaseBackend::File);
    assert!(settings.confluence.base_url.is_none());
    assert_eq!(settings.ingestion.max_file_size_bytes(), 50 * 1024 * 1024);
}

#[test]
fn given_partial_toml_when_deserializing_then_missing_fields_keep_defaults() {
    let settings = settings_from_toml(
        r#"
        [server]
        port = 8080

        [embeddings]
        provider = "openai"
        model = "text-embedding-3-small"

        [llm]
        provider = "mock"

        [chunking]
        strategy = "equal_parts"
        parts = 6

        [retrieval]
        top_k = 3
        min_score = 0.25

        [knowledge_base]
        backend = "memory"
        "#,
    );

    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.embeddings.provider, EmbeddingProvider::OpenAi);
    assert_eq!(settings.embeddings.model, "text-embedding-3-small");
    assert_eq!(settings.embeddings.timeout_secs, 60);
    assert_eq!(settings.llm.provider, LlmProvider::Mock);
    assert_eq!(settings.chunking.strategy, ChunkingStrategy::EqualParts);
    assert_eq!(settings.chunking.parts, 6);
    assert_eq!(settings.retrieval.top_k, 3);
    assert_eq!(settings.retrieval.min_score, Some(0.25));
    assert_eq!(settings.knowledge_base.backend, KnowledgeBaseBackend::Memory);
}

#[test]
fn given_confluence_section_when_deserializing_then_connection_is_configured() {
    let settings = settings_from_toml(
        r#"
        [confluence]
        base_url = "https://wiki.example.com"
        access_token = "pat"
        timeout_secs = 10
        "#,
    );

    assert_eq!(
        settings.confluence.base_url.as_deref(),
        Some("https://wiki.example.com")
    );
    assert_eq!(settings.confluence.access_token.as_deref(), Some("pat"));
    assert_eq!(settings.confluence.timeout_secs, Some(10));
}

#[test]
fn given_unknown_provider_when_deserializing_then_fails() {
    let result = Config::builder()
        .add_source(config::File::from_str(
            "[llm]\nprovider = \"gemini\"",
            FileFormat::Toml,
        ))
        .build()
        .unwrap()
        .try_deserialize::<Settings>();

    assert!(result.is_err());
}
