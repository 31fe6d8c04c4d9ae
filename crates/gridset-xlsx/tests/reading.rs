//! Reading tests against hand-built workbook packages
//!
//! Packages are assembled in memory with the zip crate so malformed
//! worksheet XML can be exercised directly.

use std::io::{Cursor, Write};

use gridset_core::HeaderPolicy;
use gridset_xlsx::{XlsxError, XlsxReader};

/// Build a package holding the given worksheet parts (name, sheetData XML)
/// and an optional shared-string table.
fn build_package(sheets: &[(&str, &str)], shared_strings: Option<&[&str]>) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
    let options = zip::write::SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
</Types>"#,
    )
    .unwrap();

    zip.start_file("xl/workbook.xml", options).unwrap();
    let mut workbook = String::from(
        r#"<?xml version="1.0"?>
<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    for (i, (name, _)) in sheets.iter().enumerate() {
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            name,
            i + 1,
            i + 1
        ));
    }
    workbook.push_str("</sheets></workbook>");
    zip.write_all(workbook.as_bytes()).unwrap();

    zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
    let mut rels = String::from(
        r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for i in 0..sheets.len() {
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            i + 1,
            i + 1
        ));
    }
    rels.push_str("</Relationships>");
    zip.write_all(rels.as_bytes()).unwrap();

    for (i, (_, sheet_data)) in sheets.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
            .unwrap();
        zip.write_all(
            format!(
                r#"<?xml version="1.0"?><worksheet><sheetData>{}</sheetData></worksheet>"#,
                sheet_data
            )
            .as_bytes(),
        )
        .unwrap();
    }

    if let Some(strings) = shared_strings {
        zip.start_file("xl/sharedStrings.xml", options).unwrap();
        let mut sst = String::from(r#"<?xml version="1.0"?><sst>"#);
        for s in strings {
            sst.push_str(&format!("<si><t>{}</t></si>", s));
        }
        sst.push_str("</sst>");
        zip.write_all(sst.as_bytes()).unwrap();
    }

    zip.finish().unwrap();
    buf
}

#[test]
fn test_header_policy_divergence() {
    let package = build_package(
        &[(
            "Sheet1",
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
               <row r="2"><c r="A2" t="inlineStr"><is><t>x</t></is></c><c r="B2" t="inlineStr"><is><t>y</t></is></c></row>"#,
        )],
        Some(&["Header 1", "Header 2"]),
    );

    // Explicit: row 1 names the columns and is excluded from the data
    let ds = XlsxReader::read(Cursor::new(&package), HeaderPolicy::Explicit).unwrap();
    let table = ds.table(0).unwrap();
    assert_eq!(
        table.columns(),
        &["Header 1".to_string(), "Header 2".to_string()]
    );
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.value(0, "Header 1"), Some("x"));
    assert_eq!(table.value(0, "Header 2"), Some("y"));

    // Positional: letters name the columns and row 1 becomes data
    let ds = XlsxReader::read(Cursor::new(&package), HeaderPolicy::Positional).unwrap();
    let table = ds.table(0).unwrap();
    assert_eq!(table.columns(), &["A".to_string(), "B".to_string()]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.value(0, "A"), Some("Header 1"));
    assert_eq!(table.value(1, "B"), Some("y"));
}

#[test]
fn test_sparse_gap_fills_with_empty() {
    let package = build_package(
        &[(
            "Sparse",
            r#"<row r="1"><c r="A1" t="inlineStr"><is><t>one</t></is></c><c r="B1" t="inlineStr"><is><t>two</t></is></c></row>
               <row r="2"><c r="B2" t="inlineStr"><is><t>lonely</t></is></c></row>"#,
        )],
        None,
    );

    let ds = XlsxReader::read(Cursor::new(&package), HeaderPolicy::Positional).unwrap();
    let table = ds.table(0).unwrap();

    assert_eq!(table.columns(), &["A".to_string(), "B".to_string()]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.value(1, "A"), Some(""));
    assert_eq!(table.value(1, "B"), Some("lonely"));
}

#[test]
fn test_shared_string_out_of_range() {
    let package = build_package(
        &[("S", r#"<row r="1"><c r="A1" t="s"><v>7</v></c></row>"#)],
        Some(&["only", "two", "three"]),
    );

    let err = XlsxReader::read(Cursor::new(&package), HeaderPolicy::Positional).unwrap_err();
    assert!(matches!(err, XlsxError::CellResolution(_)), "got {err:?}");
}

#[test]
fn test_boolean_cells() {
    let package = build_package(
        &[(
            "Bools",
            r#"<row r="1"><c r="A1" t="b"><v>1</v></c><c r="B1" t="b"><v>0</v></c></row>"#,
        )],
        None,
    );

    let ds = XlsxReader::read(Cursor::new(&package), HeaderPolicy::Positional).unwrap();
    let table = ds.table(0).unwrap();
    assert_eq!(table.value(0, "A"), Some("TRUE"));
    assert_eq!(table.value(0, "B"), Some("FALSE"));
}

#[test]
fn test_formula_uses_cached_value() {
    let package = build_package(
        &[(
            "Calc",
            r#"<row r="1"><c r="A1"><f>1+2</f><v>3</v></c></row>"#,
        )],
        None,
    );

    let ds = XlsxReader::read(Cursor::new(&package), HeaderPolicy::Positional).unwrap();
    assert_eq!(ds.table(0).unwrap().value(0, "A"), Some("3"));
}

#[test]
fn test_plain_values_trimmed() {
    let package = build_package(
        &[("T", r#"<row r="1"><c r="A1"><v>  42  </v></c></row>"#)],
        None,
    );

    let ds = XlsxReader::read(Cursor::new(&package), HeaderPolicy::Positional).unwrap();
    assert_eq!(ds.table(0).unwrap().value(0, "A"), Some("42"));
}

#[test]
fn test_row_without_index_is_unsupported() {
    let package = build_package(
        &[(
            "Bad",
            r#"<row r="1"><c r="A1"><v>ok</v></c></row>
               <row><c r="A2"><v>no index</v></c></row>"#,
        )],
        None,
    );

    let err = XlsxReader::read(Cursor::new(&package), HeaderPolicy::Positional).unwrap_err();
    assert!(matches!(err, XlsxError::UnsupportedVersion(_)), "got {err:?}");
}

#[test]
fn test_missing_header_row() {
    // No row with index 1 at all
    let package = build_package(
        &[("S", r#"<row r="2"><c r="A2"><v>data</v></c></row>"#)],
        None,
    );

    let err = XlsxReader::read(Cursor::new(&package), HeaderPolicy::Explicit).unwrap_err();
    assert!(matches!(err, XlsxError::MissingHeaderRow(_)), "got {err:?}");
}

#[test]
fn test_empty_header_row() {
    // Row 1 exists as an element but holds zero cells
    let package = build_package(
        &[(
            "S",
            r#"<row r="1"/><row r="2"><c r="A2"><v>data</v></c></row>"#,
        )],
        None,
    );

    let err = XlsxReader::read(Cursor::new(&package), HeaderPolicy::Explicit).unwrap_err();
    assert!(matches!(err, XlsxError::MissingHeader(_)), "got {err:?}");
}

#[test]
fn test_header_only_sheet_has_zero_rows() {
    let package = build_package(
        &[("S", r#"<row r="1"><c r="A1"><v>Col</v></c></row>"#)],
        None,
    );

    let ds = XlsxReader::read(Cursor::new(&package), HeaderPolicy::Explicit).unwrap();
    let table = ds.table(0).unwrap();
    assert_eq!(table.columns(), &["Col".to_string()]);
    assert_eq!(table.row_count(), 0);
}

#[test]
fn test_multiple_sheets_in_order() {
    let package = build_package(
        &[
            ("First", r#"<row r="1"><c r="A1"><v>1</v></c></row>"#),
            ("Second", r#"<row r="1"><c r="A1"><v>2</v></c></row>"#),
        ],
        None,
    );

    let ds = XlsxReader::read(Cursor::new(&package), HeaderPolicy::Positional).unwrap();
    assert_eq!(ds.table_count(), 2);
    assert_eq!(ds.table(0).unwrap().name(), "First");
    assert_eq!(ds.table(1).unwrap().name(), "Second");
    assert_eq!(ds.table(1).unwrap().value(0, "A"), Some("2"));
}

#[test]
fn test_sheet_without_worksheet_part_is_an_error() {
    // workbook.xml lists two sheets but the rels map only resolves rId1;
    // the dangling entry must fail the read, not drop the table
    let mut buf = Vec::new();
    let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
    let options = zip::write::SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(br#"<?xml version="1.0"?><Types/>"#).unwrap();

    zip.start_file("xl/workbook.xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0"?>
<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>
<sheet name="One" sheetId="1" r:id="rId1"/>
<sheet name="Two" sheetId="2" r:id="rId2"/>
</sheets></workbook>"#,
    )
    .unwrap();

    zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#,
    )
    .unwrap();

    zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0"?><worksheet><sheetData><row r="1"><c r="A1"><v>1</v></c></row></sheetData></worksheet>"#,
    )
    .unwrap();

    zip.finish().unwrap();

    let err = XlsxReader::read(Cursor::new(&buf), HeaderPolicy::Positional).unwrap_err();
    assert!(matches!(err, XlsxError::MissingPart(_)), "got {err:?}");
}

#[test]
fn test_positional_columns_sorted_lexically() {
    // Stream order is C, A; declared order must be lexical
    let package = build_package(
        &[(
            "S",
            r#"<row r="1"><c r="C1"><v>c</v></c><c r="A1"><v>a</v></c></row>"#,
        )],
        None,
    );

    let ds = XlsxReader::read(Cursor::new(&package), HeaderPolicy::Positional).unwrap();
    assert_eq!(
        ds.table(0).unwrap().columns(),
        &["A".to_string(), "C".to_string()]
    );
}

#[test]
fn test_not_a_package() {
    let err = XlsxReader::read(Cursor::new(b"not a zip".to_vec()), HeaderPolicy::Positional)
        .unwrap_err();
    assert!(matches!(err, XlsxError::Zip(_)), "got {err:?}");
}

#[test]
fn test_zip_without_content_types() {
    let mut buf = Vec::new();
    let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
    zip.start_file("random.txt", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"hello").unwrap();
    zip.finish().unwrap();

    let err = XlsxReader::read(Cursor::new(&buf), HeaderPolicy::Positional).unwrap_err();
    assert!(matches!(err, XlsxError::InvalidFormat(_)), "got {err:?}");
}
