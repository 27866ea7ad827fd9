use std::sync::Arc;

use crate::application::ports::TextSplitter;
use crate::presentation::config::{ChunkingSettings, ChunkingStrategy};

use super::{EqualPartsSplitter, FixedSizeSplitter, SectionSplitter};

pub struct TextSplitterFactory;

impl TextSplitterFactory {
    pub fn create(settings: &ChunkingSettings) -> Arc<dyn TextSplitter> {
        match settings.strategy {
            ChunkingStrategy::Fixed => Arc::new(FixedSizeSplitter::new(
                settings.chunk_size,
                settings.chunk_overlap,
            )),
            ChunkingStrategy::Section => {
                Arc::new(SectionSplitter::new(settings.section_keywords.clone()))
            }
            ChunkingStrategy::EqualParts => Arc::new(EqualPartsSplitter::new(settings.parts)),
        }
    }
}
