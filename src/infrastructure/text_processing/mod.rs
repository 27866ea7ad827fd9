mod composite_file_loader;
mod equal_parts_splitter;
mod fixed_size_splitter;
mod html_adapter;
mod pdf_adapter;
mod plain_text_adapter;
mod section_splitter;
mod text_sanitizer;
mod text_splitter_factory;

pub use composite_file_loader::CompositeFileLoader;
pub use equal_parts_splitter::EqualPartsSplitter;
pub use fixed_size_splitter::FixedSizeSplitter;
pub use html_adapter::{HtmlAdapter, html_to_text};
pub use pdf_adapter::{PdfAdapter, PdfPage, join_pages};
pub use plain_text_adapter::PlainTextAdapter;
pub use section_splitter::{DEFAULT_SECTION_KEYWORDS, SectionSplitter};
pub use text_sanitizer::{clean_text, sanitize_extracted_text};
pub use text_splitter_factory::TextSplitterFactory;
