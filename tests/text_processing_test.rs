use docbot::application::ports::{ExtractedText, FileLoader, FileLoaderError};
use docbot::domain::{ContentType, Document};
use docbot::infrastructure::text_processing::{
    CompositeFileLoader, HtmlAdapter, PdfAdapter, PdfPage, PlainTextAdapter, clean_text,
    html_to_text, join_pages, sanitize_extracted_text,
};
use lopdf::content::{Content, Operation};
use lopdf::{Object, Stream, dictionary};

fn document(filename: &str, content_type: ContentType, data: &[u8]) -> Document {
    Document::new(filename.to_string(), content_type, data.len() as u64)
}

fn single_page_pdf(text: &str) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[test]
fn given_hyphenated_line_break_when_sanitizing_then_word_is_rejoined() {
    let raw = "configu-\nration   of    the\tservice";

    assert_eq!(sanitize_extracted_text(raw), "configuration of the service");
}

#[test]
fn given_multiple_blank_lines_when_sanitizing_then_single_paragraph_break_remains() {
    let raw = "First paragraph.\n\n\n\n  Second paragraph.  ";

    assert_eq!(
        sanitize_extracted_text(raw),
        "First paragraph.\n\nSecond paragraph."
    );
}

#[test]
fn given_compatibility_characters_when_sanitizing_then_nfkc_is_applied() {
    assert_eq!(sanitize_extracted_text("ﬁle"), "file");
}

#[test]
fn given_text_with_newlines_and_tabs_when_cleaning_then_single_line_is_returned() {
    assert_eq!(clean_text("  a\n\nb\t c  "), "a b c");
}

#[test]
fn given_html_with_markup_when_converting_then_text_and_entities_remain() {
    let html = "<html><head><title>x</title></head><body><h1>Deploy</h1><p>Use &amp; enjoy&#33;</p><script>alert(1)</script></body></html>";

    let text = html_to_text(html);

    assert_eq!(text, "Deploy\n\nUse & enjoy!");
}

#[test]
fn given_confluence_storage_format_when_converting_then_macros_are_stripped() {
    let html = r#"<p>Step one</p><ac:structured-macro ac:name="info"><ac:rich-text-body><p>Note&nbsp;this</p></ac:rich-text-body></ac:structured-macro>"#;

    let text = html_to_text(html);

    assert_eq!(text, "Step one\n\nNote this");
}

#[test]
fn given_unknown_entity_when_converting_then_it_is_left_as_is() {
    assert_eq!(html_to_text("<p>a &bogus; b</p>"), "a &bogus; b");
}

#[tokio::test]
async fn given_valid_utf8_when_plain_text_adapter_extracts_then_returns_text() {
    let data = b"Hello, this is plain text.";
    let doc = document("readme.txt", ContentType::Text, data);

    let text = PlainTextAdapter.extract_text(data, &doc).await.unwrap();

    assert_eq!(text, "Hello, this is plain text.");
}

#[tokio::test]
async fn given_whitespace_only_when_plain_text_adapter_extracts_then_returns_no_text_found() {
    let data = b"   \n  ";
    let doc = document("empty.txt", ContentType::Text, data);

    let result = PlainTextAdapter.extract_text(data, &doc).await;

    assert!(matches!(result, Err(FileLoaderError::NoTextFound(_))));
}

#[tokio::test]
async fn given_invalid_utf8_when_plain_text_adapter_extracts_then_returns_extraction_failed() {
    let data: &[u8] = &[0xFF, 0xFE, 0xFD];
    let doc = document("broken.txt", ContentType::Text, data);

    let result = PlainTextAdapter.extract_text(data, &doc).await;

    assert!(matches!(result, Err(FileLoaderError::ExtractionFailed(_))));
}

#[tokio::test]
async fn given_markup_only_page_when_html_adapter_extracts_then_returns_no_text_found() {
    let data = b"<div><script>var x = 1;</script></div>";
    let doc = document("blank.html", ContentType::Html, data);

    let result = HtmlAdapter.extract_text(data, &doc).await;

    assert!(matches!(result, Err(FileLoaderError::NoTextFound(_))));
}

#[tokio::test]
async fn given_html_document_when_composite_loader_extracts_then_html_adapter_is_used() {
    let loader = CompositeFileLoader::with_default_adapters();
    let data = b"<p>Hello <b>world</b></p>";
    let doc = document("page.html", ContentType::Html, data);

    let text = loader.extract_text(data, &doc).await.unwrap();

    assert_eq!(text, "Hello world");
}

#[tokio::test]
async fn given_no_registered_adapter_when_composite_loader_extracts_then_returns_unsupported() {
    let loader = CompositeFileLoader::new(Vec::new());
    let data = b"text";
    let doc = document("a.txt", ContentType::Text, data);

    let result = loader.extract_text(data, &doc).await;

    assert!(matches!(
        result,
        Err(FileLoaderError::UnsupportedContentType(_))
    ));
}

#[tokio::test]
async fn given_non_pdf_bytes_when_pdf_adapter_extracts_then_returns_extraction_failed() {
    let data = b"definitely not a pdf";
    let doc = document("fake.pdf", ContentType::Pdf, data);

    let result = PdfAdapter::new().extract_text(data, &doc).await;

    assert!(matches!(result, Err(FileLoaderError::ExtractionFailed(_))));
}

#[tokio::test]
async fn given_text_pdf_when_pdf_adapter_extracts_then_page_text_is_returned() {
    let data = single_page_pdf("Hello World");
    let doc = document("hello.pdf", ContentType::Pdf, &data);

    let text = PdfAdapter::new().extract_text(&data, &doc).await.unwrap();

    assert!(text.contains("Hello"), "unexpected text: {text}");
}

#[tokio::test]
async fn given_text_pdf_when_composite_loader_extracts_with_pages_then_first_page_starts_at_zero() {
    let data = single_page_pdf("Hello World");
    let doc = document("hello.pdf", ContentType::Pdf, &data);

    let extracted = CompositeFileLoader::with_default_adapters()
        .extract(&data, &doc)
        .await
        .unwrap();

    assert_eq!(extracted.pages.len(), 1);
    assert_eq!(extracted.page_at(0), Some(1));
}

#[test]
fn given_pages_when_joining_then_offsets_mark_each_page_start() {
    let extracted = join_pages(vec![
        PdfPage {
            number: 1,
            text: "Intro".to_string(),
        },
        PdfPage {
            number: 3,
            text: "Größe".to_string(),
        },
        PdfPage {
            number: 4,
            text: "End".to_string(),
        },
    ]);

    assert_eq!(extracted.text, "Intro\n\nGröße\n\nEnd");
    assert_eq!(extracted.page_at(0), Some(1));
    assert_eq!(extracted.page_at(6), Some(1));
    assert_eq!(extracted.page_at(7), Some(3));
    assert_eq!(extracted.page_at(14), Some(4));
    assert_eq!(extracted.page_at(500), Some(4));
}

#[test]
fn given_plain_text_when_looking_up_page_then_none() {
    assert_eq!(ExtractedText::plain("text".to_string()).page_at(0), None);
}

#[tokio::test]
async fn given_plain_text_when_extracting_with_pages_then_no_boundaries_are_reported() {
    let data = b"just text";
    let doc = document("a.txt", ContentType::Text, data);

    let extracted = PlainTextAdapter.extract(data, &doc).await.unwrap();

    assert_eq!(extracted.text, "just text");
    assert!(extracted.pages.is_empty());
}
