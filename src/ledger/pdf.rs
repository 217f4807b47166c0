// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! PDF output for a composed ledger.
//!
//! Geometry is laid out in millimetres from the top-left corner of the page
//! and converted here to PDF points with the origin at the bottom left.

use super::layout::{Rect, HEADER_HEIGHT, PAGE_HEIGHT, PAGE_MARGIN, PAGE_WIDTH};
use super::{Footer, Header, LedgerDocument, LedgerPage, Slot, SlotContent};
use crate::error::Result;
use crate::io::media::{self, LEDGER_JPEG_QUALITY};
use crate::io::serialization::write_atomically;
use chrono::{DateTime, Local};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::path::Path;

const MM_TO_PT: f32 = 72.0 / 25.4;

const CAPTION_SIZE: f32 = 8.0;
const METADATA_SIZE: f32 = 6.0;
const COMPANY_SIZE: f32 = 14.0;
const PROJECT_SIZE: f32 = 12.0;
const FOOTER_SIZE: f32 = 8.0;
const PLACEHOLDER_SIZE: f32 = 10.0;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

fn pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

/// PDF y coordinate for a top-down millimetre position.
fn flip(y_mm: f32) -> f32 {
    pt(PAGE_HEIGHT - y_mm)
}

fn real(v: f32) -> Object {
    Object::Real(v)
}

/// Build the PDF bytes for `document`.
pub fn render_pdf(document: &LedgerDocument) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids: Vec<Object> = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let mut writer = PageWriter::default();
        let mut xobjects = lopdf::Dictionary::new();

        for (i, slot) in page.slots.iter().enumerate() {
            if let SlotContent::Image { bitmap, placement } = &slot.content {
                let name = format!("Im{}", i + 1);
                let image_id = add_jpeg(&mut doc, bitmap)?;
                xobjects.set(name.as_bytes().to_vec(), image_id);
                writer.image(&name, placement);
            }
        }
        write_page(&mut writer, page, document.pages.len());

        let content = Content {
            operations: writer.ops,
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR => regular_id,
                BOLD => bold_id,
            },
            "XObject" => xobjects,
        });
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![real(0.0), real(0.0), real(pt(PAGE_WIDTH)), real(pt(PAGE_HEIGHT))],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(&document_title(document)),
        "Producer" => Object::string_literal(concat!("sitemark ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Render `document` and write it to `path` without leaving a partial file.
pub fn export_pdf(document: &LedgerDocument, path: &Path) -> Result<()> {
    let bytes = render_pdf(document)?;
    write_atomically(path, &bytes)?;
    log::info!(
        "Exported ledger with {} pages to {}",
        document.page_count(),
        path.display()
    );
    Ok(())
}

/// File name for an export made at `now`, naming the project when one is
/// selected.
pub fn ledger_filename(project_name: Option<&str>, now: DateTime<Local>) -> String {
    let stamp = now.format("%Y-%m-%dT%H-%M-%S");
    match project_name.map(sanitize_filename).filter(|p| !p.is_empty()) {
        Some(project) => format!("photos_{}_{}.pdf", project, stamp),
        None => format!("photos_{}.pdf", stamp),
    }
}

fn sanitize_filename(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}

fn document_title(document: &LedgerDocument) -> String {
    let project = document.config.project_name.trim();
    if project.is_empty() {
        "Photo ledger".to_string()
    } else {
        format!("Photo ledger - {}", project)
    }
}

/// A PDF text string: a plain literal for ASCII, otherwise UTF-16BE with a
/// byte order mark.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xfe, 0xff];
    bytes.extend(text.encode_utf16().flat_map(|unit| unit.to_be_bytes()));
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn add_jpeg(doc: &mut Document, bitmap: &image::RgbaImage) -> Result<ObjectId> {
    let jpeg = media::encode_jpeg(bitmap, LEDGER_JPEG_QUALITY)?;
    let stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => bitmap.width() as i64,
            "Height" => bitmap.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg,
    )
    .with_compression(false);
    Ok(doc.add_object(stream))
}

fn write_page(w: &mut PageWriter, page: &LedgerPage, total: usize) {
    if let Some(header) = &page.header {
        write_header(w, header);
    }
    for slot in &page.slots {
        write_slot(w, slot);
    }
    if let Some(footer) = &page.footer {
        write_footer(w, footer);
    }
    log::debug!("Wrote ledger page {}/{}", page.number, total);
}

fn write_header(w: &mut PageWriter, header: &Header) {
    let center = PAGE_WIDTH / 2.0;
    let mut y = PAGE_MARGIN + 7.0;
    if let Some(company) = &header.company {
        w.text(company, center, y, COMPANY_SIZE, Font::Bold, Align::Center);
        y += 6.0;
    }
    if let Some(project) = &header.project {
        w.text(project, center, y, PROJECT_SIZE, Font::Regular, Align::Center);
    }
    let rule_y = PAGE_MARGIN + HEADER_HEIGHT - 2.0;
    w.line(PAGE_MARGIN, rule_y, PAGE_WIDTH - PAGE_MARGIN, rule_y, 0.5);
}

fn write_footer(w: &mut PageWriter, footer: &Footer) {
    let y = PAGE_HEIGHT - PAGE_MARGIN - 5.0;
    if let Some(date) = &footer.date {
        w.text(date, PAGE_MARGIN, y, FOOTER_SIZE, Font::Regular, Align::Start);
    }
    if let Some(label) = &footer.page_label {
        w.text(label, PAGE_WIDTH - PAGE_MARGIN, y, FOOTER_SIZE, Font::Regular, Align::End);
    }
}

fn write_slot(w: &mut PageWriter, slot: &Slot) {
    if let SlotContent::Placeholder { area, message } = &slot.content {
        w.placeholder(area);
        let mid = area.y + area.height / 2.0;
        w.text(message, area.center_x(), mid, PLACEHOLDER_SIZE, Font::Regular, Align::Center);
    }
    let x = slot.cell.center_x();
    w.text(&slot.caption, x, slot.cell.bottom() - 5.0, CAPTION_SIZE, Font::Regular, Align::Center);
    w.gray(0.4);
    w.text(&slot.metadata_line(), x, slot.cell.bottom() - 2.0, METADATA_SIZE, Font::Regular, Align::Center);
    w.gray(0.0);
}

#[derive(Debug, Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy)]
enum Align {
    Start,
    Center,
    End,
}

#[derive(Default)]
struct PageWriter {
    ops: Vec<Operation>,
}

impl PageWriter {
    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.ops.push(Operation::new(operator, operands));
    }

    fn image(&mut self, name: &str, placement: &Rect) {
        self.push("q", vec![]);
        self.push(
            "cm",
            vec![
                real(pt(placement.width)),
                real(0.0),
                real(0.0),
                real(pt(placement.height)),
                real(pt(placement.x)),
                real(flip(placement.bottom())),
            ],
        );
        self.push("Do", vec![Object::Name(name.as_bytes().to_vec())]);
        self.push("Q", vec![]);
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) {
        self.push("w", vec![real(width)]);
        self.push("m", vec![real(pt(x1)), real(flip(y1))]);
        self.push("l", vec![real(pt(x2)), real(flip(y2))]);
        self.push("S", vec![]);
    }

    fn placeholder(&mut self, area: &Rect) {
        let rect = vec![
            real(pt(area.x)),
            real(flip(area.bottom())),
            real(pt(area.width)),
            real(pt(area.height)),
        ];
        self.push("q", vec![]);
        self.push("g", vec![real(0.94)]);
        self.push("G", vec![real(0.6)]);
        self.push("w", vec![real(0.5)]);
        self.push("re", rect);
        self.push("B", vec![]);
        self.push("Q", vec![]);
    }

    fn gray(&mut self, level: f32) {
        self.push("g", vec![real(level)]);
    }

    fn text(&mut self, text: &str, x: f32, y: f32, size: f32, font: Font, align: Align) {
        let bytes = win_ansi(text);
        let width = text_width(&bytes, size, font);
        let x_pt = match align {
            Align::Start => pt(x),
            Align::Center => pt(x) - width / 2.0,
            Align::End => pt(x) - width,
        };
        let font_name = match font {
            Font::Regular => REGULAR,
            Font::Bold => BOLD,
        };
        self.push("BT", vec![]);
        self.push("Tf", vec![Object::Name(font_name.as_bytes().to_vec()), real(size)]);
        self.push("Td", vec![real(x_pt), real(flip(y))]);
        self.push("Tj", vec![Object::String(bytes, StringFormat::Literal)]);
        self.push("ET", vec![]);
    }
}

/// Encode `text` as WinAnsi, replacing anything outside it with '?'.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

/// Width in points of WinAnsi `bytes` set in `font` at `size`.
fn text_width(bytes: &[u8], size: f32, font: Font) -> f32 {
    let table = match font {
        Font::Regular => &HELVETICA_WIDTHS,
        Font::Bold => &HELVETICA_BOLD_WIDTHS,
    };
    let units: u32 = bytes
        .iter()
        .map(|&b| match b {
            0x20..=0x7e => table[(b - 0x20) as usize] as u32,
            _ => 556,
        })
        .sum();
    units as f32 * size / 1000.0
}

// Advance widths for 0x20..=0x7e, from the standard Type1 metrics.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerConfig;
    use chrono::TimeZone;

    #[test]
    fn test_win_ansi_replaces_unsupported() {
        assert_eq!(win_ansi("Caf\u{e9} (A)"), b"Caf\xe9 (A)".to_vec());
        assert_eq!(win_ansi("基礎 ok"), b"?? ok".to_vec());
        assert_eq!(win_ansi("a\u{2014}b"), vec![b'a', 0x97, b'b']);
    }

    #[test]
    fn test_text_width_uses_font_metrics() {
        // "Hi": H = 722, i = 222 regular / 278 bold
        assert!((text_width(b"Hi", 10.0, Font::Regular) - 9.44).abs() < 1e-4);
        assert!((text_width(b"Hi", 10.0, Font::Bold) - 10.0).abs() < 1e-4);
        assert_eq!(text_width(b"", 12.0, Font::Regular), 0.0);
    }

    #[test]
    fn test_info_title_is_utf16_when_not_ascii() {
        let document = LedgerDocument {
            config: LedgerConfig {
                project_name: "Shinagawa 現場".into(),
                ..Default::default()
            },
            pages: Vec::new(),
        };
        let loaded = Document::load_mem(&render_pdf(&document).unwrap()).unwrap();
        let info_id = loaded.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let title = match loaded.get_dictionary(info_id).unwrap().get(b"Title").unwrap() {
            Object::String(bytes, _) => bytes.clone(),
            other => panic!("unexpected title {:?}", other),
        };
        assert_eq!(&title[..2], &[0xfe, 0xff]);
        let units: Vec<u16> = title[2..]
            .chunks(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        assert_eq!(String::from_utf16(&units).unwrap(), "Photo ledger - Shinagawa 現場");

        assert_eq!(text_string("Photo ledger"), Object::string_literal("Photo ledger"));
    }

    #[test]
    fn test_flip_maps_top_to_page_height() {
        assert!((flip(0.0) - 841.8898).abs() < 1e-2);
        assert!(flip(PAGE_HEIGHT).abs() < 1e-4);
    }

    #[test]
    fn test_filename_with_and_without_project() {
        let now = Local.with_ymd_and_hms(2025, 6, 3, 14, 5, 9).unwrap();
        assert_eq!(ledger_filename(None, now), "photos_2025-06-03T14-05-09.pdf");
        assert_eq!(
            ledger_filename(Some("Riverside Depot/Phase 2"), now),
            "photos_Riverside_Depot_Phase_2_2025-06-03T14-05-09.pdf"
        );
        assert_eq!(ledger_filename(Some("  "), now), "photos_2025-06-03T14-05-09.pdf");
    }

    #[test]
    fn test_text_ops_center_and_right_align() {
        let mut w = PageWriter::default();
        w.text("Hi", 100.0, 50.0, 10.0, Font::Regular, Align::Center);
        w.text("Hi", 100.0, 50.0, 10.0, Font::Regular, Align::End);
        let tds: Vec<&Operation> = w.ops.iter().filter(|op| op.operator == "Td").collect();
        assert_eq!(tds.len(), 2);
        let x = |op: &Operation| match op.operands[0] {
            Object::Real(v) => v,
            _ => panic!("expected real"),
        };
        assert!((x(tds[0]) - (pt(100.0) - 4.72)).abs() < 1e-3);
        assert!((x(tds[1]) - (pt(100.0) - 9.44)).abs() < 1e-3);
    }
}
