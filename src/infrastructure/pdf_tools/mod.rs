mod pdf_categorizer;
mod pdf_splitter;
mod pdf_tool_error;

pub use pdf_categorizer::categorize_pdfs;
pub use pdf_splitter::{SplitPart, split_pdf_by_size};
pub use pdf_tool_error::PdfToolError;
