//! PDF fixtures for unit tests.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat};

/// Build a PDF whose pages carry the given text lines, one text object per line.
pub fn build_pdf(pages: &[Vec<String>]) -> Vec<u8> {
    let segmented: Vec<Vec<Vec<String>>> = pages
        .iter()
        .map(|lines| lines.iter().map(|line| vec![line.clone()]).collect())
        .collect();
    build_segmented_pdf(&segmented)
}

/// Like [`build_pdf`], but every line is drawn as separate `Tj` segments
/// spaced out with relative `Td` moves, the way form exporters lay out a
/// title and its page number.
pub fn build_segmented_pdf(pages: &[Vec<Vec<String>>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ]));
    let resources_id = doc.add_object(Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![(
            "F1",
            Object::Reference(font_id),
        )])),
    )]));

    let mut page_ids = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for (idx, line) in lines.iter().enumerate() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
            ));
            operations.push(Operation::new(
                "Td",
                vec![Object::Integer(72), Object::Integer(720 - 16 * idx as i64)],
            ));
            for (segment_idx, segment) in line.iter().enumerate() {
                if segment_idx > 0 {
                    operations.push(Operation::new(
                        "Td",
                        vec![Object::Integer(400), Object::Integer(0)],
                    ));
                }
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::String(segment.clone().into_bytes(), StringFormat::Literal)],
                ));
            }
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().expect("encode content"),
        ));

        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Reference(resources_id)),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(page_ids.len() as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("save test pdf");
    buffer
}

/// A form export: TOC lines on page 1, a `Page N` marker on every page.
pub fn build_export(total_pages: u32, toc_lines: &[&str]) -> Vec<u8> {
    let pages: Vec<Vec<String>> = (1..=total_pages)
        .map(|page| {
            let mut lines = vec![format!("Page {}", page)];
            if page == 1 {
                lines.push("Table of Contents".to_string());
                lines.extend(toc_lines.iter().map(|l| l.to_string()));
            }
            lines
        })
        .collect();
    build_pdf(&pages)
}

/// A form export whose TOC entries are drawn as a title segment followed by
/// a page number segment.
pub fn build_segmented_export(total_pages: u32, toc: &[(&str, u32)]) -> Vec<u8> {
    let pages: Vec<Vec<Vec<String>>> = (1..=total_pages)
        .map(|page| {
            let mut lines = vec![vec![format!("Page {}", page)]];
            if page == 1 {
                lines.push(vec!["Table of Contents".to_string()]);
                lines.extend(
                    toc.iter()
                        .map(|(title, start)| vec![title.to_string(), start.to_string()]),
                );
            }
            lines
        })
        .collect();
    build_segmented_pdf(&pages)
}

pub fn source(name: &str, bytes: Vec<u8>) -> crate::types::SourceDocument {
    use crate::types::{DocumentMetadata, SourceDocument, SourceType};

    let metadata = DocumentMetadata {
        filename: name.to_string(),
        source_type: SourceType::LocalFile,
        fetched_at: chrono::Utc::now().to_rfc3339(),
        size_bytes: bytes.len(),
    };
    SourceDocument::new(name, bytes, metadata)
}
