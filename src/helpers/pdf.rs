//! Timetable PDF rendering.
//!
//! Builds the document from scratch with lopdf: a "Generated Timetable"
//! header line, then one fixed-height line per timetable row with the cells
//! joined by `" | "`, breaking onto a new page when the content area fills.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::info;

use crate::error::Result;
use crate::models::timetable::Timetable;

// A4 in points, with the same margins and row height the tool has always
// used (15 mm margin, 10 mm line height).
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 42.5;
const LINE_HEIGHT: f32 = 28.35;
const FONT_SIZE: f32 = 12.0;

const HEADER: &str = "Generated Timetable";

// Rough Helvetica advance used only to center the header line.
const AVG_GLYPH_WIDTH: f32 = 0.5;

fn lines_per_page() -> usize {
    ((PAGE_HEIGHT - 2.0 * MARGIN) / LINE_HEIGHT) as usize
}

struct Line {
    text: String,
    centered: bool,
}

fn page_operations(lines: &[Line]) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(lines.len() * 5);
    let mut y = PAGE_HEIGHT - MARGIN - LINE_HEIGHT;

    for line in lines {
        let x = if line.centered {
            let width = line.text.chars().count() as f32 * FONT_SIZE * AVG_GLYPH_WIDTH;
            ((PAGE_WIDTH - width) / 2.0).max(MARGIN)
        } else {
            MARGIN
        };

        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]));
        ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(line.text.as_str())],
        ));
        ops.push(Operation::new("ET", vec![]));

        y -= LINE_HEIGHT;
    }

    ops
}

/// Serialize the timetable into PDF bytes.
///
/// Any lopdf failure surfaces as [`crate::error::TimetableError::Render`];
/// no partial document is returned.
pub fn render_timetable(timetable: &Timetable) -> Result<Vec<u8>> {
    let mut lines = vec![Line {
        text: HEADER.to_string(),
        centered: true,
    }];
    lines.extend(timetable.display_rows().into_iter().map(|cells| Line {
        text: cells.join(" | "),
        centered: false,
    }));

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page_lines in lines.chunks(lines_per_page()) {
        let content = Content {
            operations: page_operations(page_lines),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer: Vec<u8> = Vec::new();
    // save_to reports std::io::Error; route it through lopdf's IO variant so
    // it lands in TimetableError::Render like every other rendering failure.
    doc.save_to(&mut buffer).map_err(lopdf::Error::from)?;

    info!(
        "Rendered timetable PDF: {} row(s), {} page(s), {} bytes",
        timetable.rows.len(),
        page_count,
        buffer.len()
    );

    Ok(buffer)
}
