//! XLSX writer
//!
//! Serializes a [`Dataset`] into a minimal workbook package: one worksheet
//! part per table, a header row followed by the data rows, every cell an
//! inline string with a freshly computed address. Values round-trip as text;
//! no type inference happens on write.

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use log::debug;

use crate::error::XlsxResult;
use gridset_core::address::column_letters;
use gridset_core::{Dataset, Table};

/// Identity of one sheet within the package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetIdentity {
    /// Sheet name (the table name)
    pub name: String,
    /// Numeric sheet id, unique and ascending within the package
    pub sheet_id: u32,
    /// Relationship id linking the manifest entry to the worksheet part
    pub rel_id: String,
}

/// Assign identities to the dataset's tables, in order.
///
/// Each sheet id is one past the maximum already assigned, starting at 1.
pub fn assign_identities(dataset: &Dataset) -> Vec<SheetIdentity> {
    let mut identities: Vec<SheetIdentity> = Vec::new();

    for table in dataset.tables() {
        let sheet_id = identities.iter().map(|s| s.sheet_id).max().unwrap_or(0) + 1;
        let rel_id = format!("rId{}", identities.len() + 1);
        identities.push(SheetIdentity {
            name: table.name().to_string(),
            sheet_id,
            rel_id,
        });
    }

    identities
}

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a dataset to a file path
    pub fn write_file<P: AsRef<Path>>(dataset: &Dataset, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write(dataset, file)
    }

    /// Write a dataset to a writer
    pub fn write<W: Write + Seek>(dataset: &Dataset, writer: W) -> XlsxResult<()> {
        let mut zip = zip::ZipWriter::new(writer);
        let identities = assign_identities(dataset);

        Self::write_content_types(&mut zip, identities.len())?;
        Self::write_root_rels(&mut zip)?;
        Self::write_workbook_xml(&mut zip, &identities)?;
        Self::write_workbook_rels(&mut zip, &identities)?;

        for (i, table) in dataset.tables().enumerate() {
            debug!(
                "writing sheet '{}' ({} columns, {} rows)",
                table.name(),
                table.column_count(),
                table.row_count()
            );
            Self::write_worksheet(&mut zip, i, table)?;
        }

        zip.finish()?;
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet_count: usize,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
        );

        for i in 0..sheet_count {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }

        content.push_str("\n</Types>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("_rels/.rels", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        identities: &[SheetIdentity],
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/workbook.xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>"#,
        );

        for identity in identities {
            content.push_str(&format!(
                r#"
        <sheet name="{}" sheetId="{}" r:id="{}"/>"#,
                escape_xml(&identity.name),
                identity.sheet_id,
                identity.rel_id
            ));
        }

        content.push_str(
            r#"
    </sheets>
</workbook>"#,
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_rels<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        identities: &[SheetIdentity],
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/_rels/workbook.xml.rels", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for (i, identity) in identities.iter().enumerate() {
            content.push_str(&format!(
                r#"
    <Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                identity.rel_id,
                i + 1
            ));
        }

        content.push_str(
            r#"
</Relationships>"#,
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_worksheet<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        index: usize,
        table: &Table,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(format!("xl/worksheets/sheet{}.xml", index + 1), options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <sheetData>"#,
        );

        // Header row at index 1
        let mut row_index: u32 = 1;
        content.push_str(&format!("\n        <row r=\"{}\">", row_index));
        for (col, name) in table.columns().iter().enumerate() {
            push_text_cell(&mut content, col as u32, row_index, name);
        }
        content.push_str("\n        </row>");

        // Data rows at sequential indices
        for row in table.rows() {
            row_index += 1;
            content.push_str(&format!("\n        <row r=\"{}\">", row_index));
            for (col, value) in row.iter().enumerate() {
                push_text_cell(&mut content, col as u32, row_index, value);
            }
            content.push_str("\n        </row>");
        }

        content.push_str("\n    </sheetData>\n</worksheet>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Append one inline-string cell at the computed address
fn push_text_cell(content: &mut String, col: u32, row: u32, text: &str) {
    content.push_str(&format!(
        "\n            <c r=\"{}{}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
        column_letters(col),
        row,
        escape_xml(text)
    ));
}

/// Escape the five XML-reserved characters
fn escape_xml(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
