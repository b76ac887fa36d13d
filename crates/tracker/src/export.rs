//! Single-sheet .xlsx export
//!
//! Writes the minimal Office Open XML package: content types, relationships,
//! a workbook and one worksheet with inline strings. The header row is the
//! table's column order.

use std::io::{Cursor, Write};
use trophytrack_core::{Cell, Table};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

const SHEET_NAME_MAX: usize = 31;

/// Serialize `table` as an .xlsx file with a single sheet named `sheet_name`
pub fn export_xlsx(table: &Table, sheet_name: &str) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/workbook.xml", workbook_xml(sheet_name)),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/worksheets/sheet1.xml", worksheet_xml(table)),
    ];
    for (name, content) in parts {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }

    let bytes = zip.finish()?.into_inner();
    tracing::debug!(rows = table.len(), bytes = bytes.len(), "xlsx export built");
    Ok(bytes)
}

fn workbook_xml(sheet_name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        escape(&sanitize_sheet_name(sheet_name))
    )
}

fn worksheet_xml(table: &Table) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    let header: Vec<Cell> = table.columns().iter().map(|c| Cell::from(c.as_str())).collect();
    push_row(&mut xml, 1, header.iter());
    for (index, row) in table.rows().iter().enumerate() {
        let cells = table.columns().iter().map(|column| row.get(column));
        push_row(&mut xml, index + 2, cells);
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn push_row<'a>(xml: &mut String, number: usize, cells: impl Iterator<Item = &'a Cell>) {
    xml.push_str(&format!(r#"<row r="{}">"#, number));
    for (column, cell) in cells.enumerate() {
        let reference = format!("{}{}", column_name(column), number);
        match cell {
            Cell::Empty => {}
            Cell::Bool(b) => {
                xml.push_str(&format!(r#"<c r="{}" t="b"><v>{}</v></c>"#, reference, u8::from(*b)));
            }
            Cell::Number(n) if n.is_finite() => {
                xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n));
            }
            other => {
                xml.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                    reference,
                    escape(&other.to_string())
                ));
            }
        }
    }
    xml.push_str("</row>");
}

/// Spreadsheet column letters: 0 -> A, 25 -> Z, 26 -> AA
fn column_name(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\') { '_' } else { c })
        .take(SHEET_NAME_MAX)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

/// XML text escaping; control characters XML 1.0 cannot carry are dropped
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 => {}
            c => out.push(c),
        }
    }
    out
}
