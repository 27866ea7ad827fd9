pub mod confluence;
pub mod llm;
pub mod observability;
pub mod pdf_tools;
pub mod persistence;
pub mod text_processing;
