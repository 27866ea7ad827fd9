use std::sync::LazyLock;

use tiktoken_rs::CoreBPE;

use crate::application::ports::SearchResult;

static TOKENIZER: LazyLock<CoreBPE> = LazyLock::new(|| {
    tiktoken_rs::cl100k_base().expect("Failed to initialize cl100k_base tokenizer")
});

pub fn count_tokens(text: &str) -> usize {
    TOKENIZER.encode_with_special_tokens(text).len()
}

/// Retrieved passages rendered for the prompt, plus how many results made it in.
#[derive(Debug, Clone)]
pub struct AssembledContext {
    pub text: String,
    pub used: usize,
    pub tokens: usize,
}

/// Joins results in rank order until the token budget is spent.
///
/// The best result is always included, even when it alone exceeds the budget.
pub fn assemble_context(results: &[SearchResult], max_tokens: usize) -> AssembledContext {
    let mut blocks: Vec<String> = Vec::with_capacity(results.len());
    let mut tokens = 0;

    for result in results {
        let block = format_passage(result);
        let block_tokens = count_tokens(&block);

        if !blocks.is_empty() && tokens + block_tokens > max_tokens {
            tracing::debug!(
                included = blocks.len(),
                dropped = results.len() - blocks.len(),
                tokens,
                max_tokens,
                "Context budget reached"
            );
            break;
        }

        tokens += block_tokens;
        blocks.push(block);
    }

    AssembledContext {
        used: blocks.len(),
        text: blocks.join("\n\n"),
        tokens,
    }
}

fn format_passage(result: &SearchResult) -> String {
    let chunk = &result.chunk;
    match &chunk.section {
        Some(section) => format!(
            "Source: {}\nSection: {}\n{}",
            chunk.source, section, chunk.text
        ),
        None => format!("Source: {}\n{}", chunk.source, chunk.text),
    }
}
