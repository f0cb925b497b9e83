//! Minimal PDF 1.4 writer for tabular reports.
//!
//! Only the two standard Helvetica faces are used, so no font data is
//! embedded. Text is encoded as WinAnsi; characters outside that set are
//! transliterated or replaced with `?`. Output is byte-for-byte
//! deterministic for a given document.

use std::{io::Write, ops::Range};

use super::{DocumentRenderer, ExportError, ReportDocument};

const A4_WIDTH: f32 = 595.0;
const A4_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;
const BOTTOM_LIMIT: f32 = 50.0;
const FOOTER_BASELINE: f32 = 24.0;
const HEADING_BLOCK: f32 = 120.0;
const ROW_HEIGHT: f32 = 16.0;
const TABLE_FONT_SIZE: f32 = 9.0;
const CELL_PADDING: f32 = 4.0;

const ACCENT: Rgb = Rgb(0.4, 0.494, 0.918);
const STRIPE: Rgb = Rgb(0.961, 0.969, 1.0);
const MUTED: Rgb = Rgb(0.392, 0.392, 0.392);
const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FONT_REGULAR_ID: usize = 3;
const FONT_BOLD_ID: usize = 4;
const INFO_ID: usize = 5;
const FIRST_PAGE_ID: usize = 6;

/// Fixed column widths in points; `None` takes the remaining table width.
const COLUMN_LAYOUT: [(Option<f32>, Align); 5] = [
    (Some(62.0), Align::Center),
    (None, Align::Left),
    (Some(86.0), Align::Left),
    (Some(56.0), Align::Center),
    (Some(100.0), Align::Right),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfRenderer {
    pub page_width: f32,
    pub page_height: f32,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
        }
    }
}

impl DocumentRenderer for PdfRenderer {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, document: &ReportDocument, out: &mut dyn Write) -> Result<(), ExportError> {
        let columns = self.columns(document)?;
        let pages = self.paginate(document.rows.len());
        let page_count = pages.len();

        let mut streams = Vec::with_capacity(page_count);
        for (index, rows) in pages.into_iter().enumerate() {
            let mut canvas = Canvas::default();
            let mut y = self.page_height - MARGIN;
            if index == 0 {
                y = self.draw_heading(&mut canvas, document, y);
            }
            y = self.draw_header_row(&mut canvas, document, &columns, y);
            for row_index in rows {
                let cells = document.rows[row_index].cells();
                y = self.draw_body_row(&mut canvas, &cells, &columns, y, row_index % 2 == 1);
            }
            let footer = encode_win_ansi(&format!("Page {} of {}", index + 1, page_count));
            let footer_x = self.page_width - MARGIN - text_width(&footer, 8.0, Font::Regular);
            canvas.text(footer_x, FOOTER_BASELINE, 8.0, Font::Regular, MUTED, &footer);
            streams.push(canvas.into_bytes());
        }

        let bytes = self.assemble(document, &streams);
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(())
    }
}

impl PdfRenderer {
    fn table_width(&self) -> f32 {
        self.page_width - 2.0 * MARGIN
    }

    fn columns(&self, document: &ReportDocument) -> Result<Vec<Column>, ExportError> {
        if document.columns.len() != COLUMN_LAYOUT.len() {
            return Err(ExportError::Render(format!(
                "expected {} columns, found {}",
                COLUMN_LAYOUT.len(),
                document.columns.len()
            )));
        }
        let fixed: f32 = COLUMN_LAYOUT.iter().filter_map(|(width, _)| *width).sum();
        let flexible = self.table_width() - fixed;
        if flexible < 40.0 {
            return Err(ExportError::Render("page is too narrow for the table".into()));
        }

        let mut x = MARGIN;
        Ok(COLUMN_LAYOUT
            .iter()
            .map(|(width, align)| {
                let width = width.unwrap_or(flexible);
                let column = Column {
                    x,
                    width,
                    align: *align,
                };
                x += width;
                column
            })
            .collect())
    }

    fn rows_per_page(&self, first: bool) -> usize {
        let mut top = self.page_height - MARGIN - ROW_HEIGHT;
        if first {
            top -= HEADING_BLOCK;
        }
        (((top - BOTTOM_LIMIT) / ROW_HEIGHT).floor() as usize).max(1)
    }

    /// Row index ranges for each page. An empty table still gets one page.
    fn paginate(&self, rows: usize) -> Vec<Range<usize>> {
        let mut pages = Vec::new();
        let mut start = 0;
        loop {
            let capacity = self.rows_per_page(pages.is_empty());
            let end = (start + capacity).min(rows);
            pages.push(start..end);
            if end >= rows {
                return pages;
            }
            start = end;
        }
    }

    fn draw_heading(&self, canvas: &mut Canvas, document: &ReportDocument, top: f32) -> f32 {
        let mut y = top - 20.0;
        canvas.text(
            MARGIN,
            y,
            20.0,
            Font::Bold,
            ACCENT,
            &encode_win_ansi(&document.heading),
        );
        y -= 24.0;
        canvas.text(
            MARGIN,
            y,
            13.0,
            Font::Regular,
            MUTED,
            &encode_win_ansi(&document.title),
        );
        y -= 10.0;
        for line in document.summary_lines() {
            y -= 16.0;
            canvas.text(MARGIN, y, 11.0, Font::Regular, BLACK, &encode_win_ansi(&line));
        }
        top - HEADING_BLOCK
    }

    fn draw_header_row(
        &self,
        canvas: &mut Canvas,
        document: &ReportDocument,
        columns: &[Column],
        top: f32,
    ) -> f32 {
        let bottom = top - ROW_HEIGHT;
        canvas.fill_rect(MARGIN, bottom, self.table_width(), ROW_HEIGHT, ACCENT);
        for (column, label) in columns.iter().zip(&document.columns) {
            column.draw(canvas, bottom, label, Font::Bold, WHITE);
        }
        bottom
    }

    fn draw_body_row(
        &self,
        canvas: &mut Canvas,
        cells: &[&str],
        columns: &[Column],
        top: f32,
        striped: bool,
    ) -> f32 {
        let bottom = top - ROW_HEIGHT;
        if striped {
            canvas.fill_rect(MARGIN, bottom, self.table_width(), ROW_HEIGHT, STRIPE);
        }
        for (column, cell) in columns.iter().zip(cells) {
            column.draw(canvas, bottom, cell, Font::Regular, BLACK);
        }
        canvas.line(MARGIN, bottom, MARGIN + self.table_width(), bottom, 0.85);
        bottom
    }

    fn assemble(&self, document: &ReportDocument, streams: &[Vec<u8>]) -> Vec<u8> {
        let mut writer = ObjectWriter::new();
        let page_ids: Vec<usize> = (0..streams.len())
            .map(|index| FIRST_PAGE_ID + 2 * index)
            .collect();

        writer.object(
            CATALOG_ID,
            format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>").as_bytes(),
        );
        let kids: Vec<String> = page_ids.iter().map(|id| format!("{id} 0 R")).collect();
        writer.object(
            PAGES_ID,
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                page_ids.len()
            )
            .as_bytes(),
        );
        writer.object(FONT_REGULAR_ID, font_dictionary("Helvetica").as_bytes());
        writer.object(FONT_BOLD_ID, font_dictionary("Helvetica-Bold").as_bytes());

        let mut info = b"<< /Title (".to_vec();
        info.extend(escape_text(&encode_win_ansi(&document.title)));
        info.extend_from_slice(b") /Producer (expense_ledger) >>");
        writer.object(INFO_ID, &info);

        for (page_id, stream) in page_ids.iter().zip(streams) {
            let contents_id = page_id + 1;
            writer.object(
                *page_id,
                format!(
                    "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox [0 0 {} {}] \
                     /Resources << /Font << /F1 {FONT_REGULAR_ID} 0 R /F2 {FONT_BOLD_ID} 0 R >> >> \
                     /Contents {contents_id} 0 R >>",
                    number(self.page_width),
                    number(self.page_height)
                )
                .as_bytes(),
            );
            let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
            body.extend_from_slice(stream);
            body.extend_from_slice(b"\nendstream");
            writer.object(contents_id, &body);
        }

        writer.finish(CATALOG_ID, INFO_ID)
    }
}

fn font_dictionary(base: &str) -> String {
    format!("<< /Type /Font /Subtype /Type1 /BaseFont /{base} /Encoding /WinAnsiEncoding >>")
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rgb(f32, f32, f32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Column {
    x: f32,
    width: f32,
    align: Align,
}

impl Column {
    fn draw(&self, canvas: &mut Canvas, bottom: f32, text: &str, font: Font, color: Rgb) {
        let available = self.width - 2.0 * CELL_PADDING;
        let encoded = fit_to_width(encode_win_ansi(text), available, TABLE_FONT_SIZE, font);
        let width = text_width(&encoded, TABLE_FONT_SIZE, font);
        let x = match self.align {
            Align::Left => self.x + CELL_PADDING,
            Align::Center => self.x + (self.width - width) / 2.0,
            Align::Right => self.x + self.width - CELL_PADDING - width,
        };
        canvas.text(x, bottom + 5.0, TABLE_FONT_SIZE, font, color, &encoded);
    }
}

/// Content stream under construction.
#[derive(Debug, Default)]
struct Canvas {
    ops: Vec<u8>,
}

impl Canvas {
    fn push(&mut self, op: String) {
        self.ops.extend_from_slice(op.as_bytes());
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.push(format!(
            "{} rg\n{} {} {} {} re f\n",
            color.operands(),
            number(x),
            number(y),
            number(width),
            number(height)
        ));
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, gray: f32) {
        self.push(format!(
            "{} G 0.5 w\n{} {} m {} {} l S\n",
            number(gray),
            number(x1),
            number(y1),
            number(x2),
            number(y2)
        ));
    }

    fn text(&mut self, x: f32, y: f32, size: f32, font: Font, color: Rgb, encoded: &[u8]) {
        self.push(format!(
            "BT\n/{} {} Tf\n{} rg\n{} {} Td\n(",
            font.resource(),
            number(size),
            color.operands(),
            number(x),
            number(y)
        ));
        self.ops.extend(escape_text(encoded));
        self.ops.extend_from_slice(b") Tj\nET\n");
    }

    fn into_bytes(self) -> Vec<u8> {
        self.ops
    }
}

impl Rgb {
    fn operands(&self) -> String {
        format!("{} {} {}", number(self.0), number(self.1), number(self.2))
    }
}

/// Serializes numbered objects and tracks their byte offsets for the xref table.
struct ObjectWriter {
    buffer: Vec<u8>,
    offsets: Vec<usize>,
}

impl ObjectWriter {
    fn new() -> Self {
        let mut buffer = b"%PDF-1.4\n".to_vec();
        // binary marker so transfer tools treat the file as binary
        buffer.extend_from_slice(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n']);
        Self {
            buffer,
            offsets: Vec::new(),
        }
    }

    /// Objects must be written in id order starting at 1.
    fn object(&mut self, id: usize, body: &[u8]) {
        debug_assert_eq!(id, self.offsets.len() + 1);
        self.offsets.push(self.buffer.len());
        self.buffer
            .extend_from_slice(format!("{id} 0 obj\n").as_bytes());
        self.buffer.extend_from_slice(body);
        self.buffer.extend_from_slice(b"\nendobj\n");
    }

    fn finish(mut self, root: usize, info: usize) -> Vec<u8> {
        let xref_offset = self.buffer.len();
        let size = self.offsets.len() + 1;
        let mut xref = format!("xref\n0 {size}\n0000000000 65535 f \n");
        for offset in &self.offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {size} /Root {root} 0 R /Info {info} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        ));
        self.buffer.extend_from_slice(xref.as_bytes());
        self.buffer
    }
}

/// Compact decimal form used for every operand.
fn number(value: f32) -> String {
    let text = format!("{value:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() || text == "-" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            ' '..='~' => out.push(ch as u8),
            '\t' | '\n' | '\r' => out.push(b' '),
            '\u{20B9}' => out.extend_from_slice(b"Rs."),
            '\u{20AC}' => out.push(0x80),
            '\u{2026}' => out.push(0x85),
            '\u{2018}' => out.push(0x91),
            '\u{2019}' => out.push(0x92),
            '\u{201C}' => out.push(0x93),
            '\u{201D}' => out.push(0x94),
            '\u{2022}' => out.push(0x95),
            '\u{2013}' => out.push(0x96),
            '\u{2014}' => out.push(0x97),
            '\u{2122}' => out.push(0x99),
            '\u{202F}' => out.push(b' '),
            '\u{A0}'..='\u{FF}' => out.push(ch as u32 as u8),
            // zero width joiners and emoji presentation selectors
            '\u{200D}' | '\u{FE0E}' | '\u{FE0F}' => {}
            _ => out.push(b'?'),
        }
    }
    out
}

fn escape_text(encoded: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded.len());
    for &byte in encoded {
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out
}

/// Helvetica advance widths for 0x20..=0x7E, in thousandths of an em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

fn glyph_width(byte: u8) -> f32 {
    match byte {
        0x20..=0x7E => f32::from(HELVETICA_WIDTHS[usize::from(byte - 0x20)]),
        _ => 556.0,
    }
}

/// Approximate rendered width; the bold face is treated as slightly wider.
fn text_width(encoded: &[u8], size: f32, font: Font) -> f32 {
    let scale = match font {
        Font::Regular => 1.0,
        Font::Bold => 1.06,
    };
    encoded.iter().map(|&b| glyph_width(b)).sum::<f32>() * size * scale / 1000.0
}

/// Truncates with `...` until the text fits in `available` points.
fn fit_to_width(mut encoded: Vec<u8>, available: f32, size: f32, font: Font) -> Vec<u8> {
    if text_width(&encoded, size, font) <= available {
        return encoded;
    }
    let ellipsis = text_width(b"...", size, font);
    while !encoded.is_empty() && text_width(&encoded, size, font) + ellipsis > available {
        encoded.pop();
    }
    encoded.extend_from_slice(b"...");
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::sample_document;

    fn render(document: &ReportDocument) -> Vec<u8> {
        let mut buffer = Vec::new();
        PdfRenderer::default()
            .render(document, &mut buffer)
            .expect("render pdf");
        buffer
    }

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|window| window == needle.as_bytes())
    }

    #[test]
    fn single_page_document_structure() {
        let pdf = render(&sample_document(3));
        assert!(pdf.starts_with(b"%PDF-1.4\n"));
        assert!(pdf.ends_with(b"%%EOF\n"));
        assert!(contains(&pdf, "/Count 1 "));
        assert!(contains(&pdf, "(Expense Tracker Report) Tj"));
        assert!(contains(&pdf, "(Annual Report: 2024) Tj"));
        assert!(contains(&pdf, "(Total Income: Rs.101.00) Tj"));
        assert!(contains(&pdf, "(Page 1 of 1) Tj"));
        assert!(!contains(&pdf, "\u{20B9}"));
    }

    #[test]
    fn long_tables_span_pages_with_repeated_header() {
        let pdf = render(&sample_document(100));
        assert!(contains(&pdf, "/Count 3 "));
        assert!(contains(&pdf, "(Page 3 of 3) Tj"));
        let headers = pdf
            .windows(b"(Description) Tj".len())
            .filter(|w| *w == b"(Description) Tj")
            .count();
        assert_eq!(headers, 3);
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let pdf = render(&sample_document(2));
        let text = String::from_utf8_lossy(&pdf);
        let startxref: usize = text
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .and_then(|n| n.parse().ok())
            .expect("startxref offset");
        assert!(pdf[startxref..].starts_with(b"xref\n0 "));

        let table = String::from_utf8_lossy(&pdf[startxref..]);
        let first_entry = table.lines().nth(3).expect("object 1 entry");
        let offset: usize = first_entry[..10].parse().unwrap();
        assert!(pdf[offset..].starts_with(b"1 0 obj\n"));
    }

    #[test]
    fn output_is_deterministic() {
        let document = sample_document(5);
        assert_eq!(render(&document), render(&document));
    }

    #[test]
    fn text_is_escaped_and_transliterated() {
        assert_eq!(encode_win_ansi("\u{20B9}5 caf\u{e9}"), b"Rs.5 caf\xe9".to_vec());
        assert_eq!(encode_win_ansi("\u{1F354}x"), b"?x".to_vec());
        assert_eq!(escape_text(b"Lunch (team)\\"), b"Lunch \\(team\\)\\\\".to_vec());
    }

    #[test]
    fn overlong_cells_are_truncated() {
        let fitted = fit_to_width(vec![b'W'; 200], 100.0, TABLE_FONT_SIZE, Font::Regular);
        assert!(fitted.ends_with(b"..."));
        assert!(text_width(&fitted, TABLE_FONT_SIZE, Font::Regular) <= 100.0);
    }

    #[test]
    fn wrong_column_count_is_a_render_error() {
        let mut document = sample_document(1);
        document.columns.pop();
        let mut buffer = Vec::new();
        let err = PdfRenderer::default()
            .render(&document, &mut buffer)
            .unwrap_err();
        assert!(matches!(err, ExportError::Render(_)));
    }
}
