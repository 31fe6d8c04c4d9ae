//! XLSX reader
//!
//! Reads a packaged workbook into a [`Dataset`], one table per sheet. The
//! worksheet parse produces a sparse, order-independent cell stream; header
//! resolution and sheet assembly then rebuild a dense table from it
//! according to the requested [`HeaderPolicy`].

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use log::debug;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use gridset_core::address::split_cell_ref;
use gridset_core::{Dataset, HeaderPolicy, Table};

/// How a raw cell's value is encoded in the worksheet part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellKind {
    /// Plain numeric/text value, or an inline string
    Plain,
    /// Integer index into the shared-string table
    SharedString,
    /// "0"/"1" boolean encoding
    Boolean,
}

/// One cell as parsed from the worksheet XML, before value resolution
#[derive(Debug, Clone)]
pub(crate) struct RawCell {
    pub row: u32,
    pub column: String,
    pub kind: CellKind,
    pub value: String,
    /// The value is a cached formula result and must be used verbatim
    pub from_formula: bool,
}

/// Parsed contents of one worksheet part
#[derive(Debug, Default)]
pub(crate) struct SheetData {
    /// Row indices of every `<row>` element, including empty rows
    pub row_indices: Vec<u32>,
    /// Cells in document order
    pub cells: Vec<RawCell>,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a dataset from a file path
    pub fn read_file<P: AsRef<Path>>(path: P, policy: HeaderPolicy) -> XlsxResult<Dataset> {
        let file = File::open(path)?;
        Self::read(file, policy)
    }

    /// Read a dataset from a reader
    pub fn read<R: Read + Seek>(reader: R, policy: HeaderPolicy) -> XlsxResult<Dataset> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX package
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        // The shared-string table is package-wide; read it once and pass it
        // by reference into every per-sheet pass.
        let shared_strings = Self::read_shared_strings(&mut archive)?;

        let sheet_info = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let mut dataset = Dataset::new();

        for (name, r_id) in &sheet_info {
            // Every manifest entry must resolve to a worksheet part; a
            // dangling relationship would otherwise drop the table.
            let path = sheet_paths.get(r_id).ok_or_else(|| {
                XlsxError::MissingPart(format!("worksheet part for sheet '{name}' ({r_id})"))
            })?;

            let data = Self::read_sheet_data(&mut archive, path, name)?;
            debug!(
                "sheet '{}': {} rows, {} cells",
                name,
                data.row_indices.len(),
                data.cells.len()
            );

            let headers = resolve_headers(name, &data, &shared_strings, policy)?;
            let table = assemble_table(name, &data, &headers, &shared_strings, policy)?;
            dataset.push_table(table);
        }

        Ok(dataset)
    }

    /// Read the shared strings table, if present
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        // No whitespace trimming here: shared strings round-trip verbatim.
        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"t" if in_si => in_t = true,
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(std::mem::take(&mut current_string));
                        in_si = false;
                    }
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    current_string.push_str(&e.unescape()?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// Read workbook.xml for the ordered sheet list (name, rId)
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                    let mut name = None;
                    let mut r_id = None;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => {
                                name = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"r:id" => {
                                r_id = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            _ => {}
                        }
                    }

                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to map rIds to worksheet part paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut target = None;
                    let mut rel_type = None;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => {
                                id = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"Target" => {
                                target = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"Type" => {
                                rel_type = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            _ => {}
                        }
                    }

                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to the xl/ folder
                            let full_path = if let Some(stripped) = target.strip_prefix('/') {
                                stripped.to_string()
                            } else {
                                format!("xl/{}", target)
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Parse one worksheet part into its raw cell stream.
    ///
    /// Every `<row>` must carry an `r` attribute; a row without one fails
    /// the sheet with [`XlsxError::UnsupportedVersion`] before any header
    /// or data work happens.
    fn read_sheet_data<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        sheet_name: &str,
    ) -> XlsxResult<SheetData> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        // Text events are kept untrimmed: cached formula results are used
        // verbatim, and trimming of ordinary values happens at resolution.
        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut data = SheetData::default();

        let mut current_row: Option<u32> = None;
        let mut cell_ref: Option<String> = None;
        let mut cell_type: Option<String> = None;
        let mut cell_value = String::new();
        let mut has_formula = false;
        let mut in_cell = false;
        let mut in_value = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;

        loop {
            let event = xml_reader.read_event_into(&mut buf)?;
            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(&event, Event::Empty(_));
                    match e.name().as_ref() {
                        b"row" => {
                            let mut row_index = None;
                            for attr in e.attributes().flatten() {
                                if attr.key.as_ref() == b"r" {
                                    row_index = attr
                                        .unescape_value()
                                        .ok()
                                        .and_then(|v| v.parse::<u32>().ok());
                                }
                            }

                            match row_index {
                                Some(r) => {
                                    data.row_indices.push(r);
                                    current_row = Some(r);
                                }
                                None => {
                                    return Err(XlsxError::UnsupportedVersion(
                                        sheet_name.to_string(),
                                    ))
                                }
                            }
                        }
                        b"c" => {
                            cell_ref = None;
                            cell_type = None;
                            cell_value.clear();
                            has_formula = false;

                            for attr in e.attributes().flatten() {
                                match attr.key.as_ref() {
                                    b"r" => {
                                        cell_ref =
                                            attr.unescape_value().ok().map(|s| s.to_string());
                                    }
                                    b"t" => {
                                        cell_type =
                                            attr.unescape_value().ok().map(|s| s.to_string());
                                    }
                                    _ => {}
                                }
                            }

                            if is_empty {
                                Self::push_cell(
                                    &mut data,
                                    sheet_name,
                                    current_row,
                                    cell_ref.take(),
                                    cell_type.take(),
                                    String::new(),
                                    false,
                                )?;
                            } else {
                                in_cell = true;
                            }
                        }
                        b"v" if in_cell && !is_empty => in_value = true,
                        b"f" if in_cell => has_formula = true,
                        b"is" if in_cell && !is_empty => in_inline_str = true,
                        b"t" if in_inline_str && !is_empty => in_inline_text = true,
                        _ => {}
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    b"c" => {
                        Self::push_cell(
                            &mut data,
                            sheet_name,
                            current_row,
                            cell_ref.take(),
                            cell_type.take(),
                            std::mem::take(&mut cell_value),
                            has_formula,
                        )?;
                        in_cell = false;
                        in_value = false;
                        in_inline_str = false;
                        in_inline_text = false;
                    }
                    b"v" => in_value = false,
                    b"is" => in_inline_str = false,
                    b"t" => in_inline_text = false,
                    _ => {}
                },
                Event::Text(e) if in_value || in_inline_text => {
                    cell_value.push_str(&e.unescape()?);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(data)
    }

    fn push_cell(
        data: &mut SheetData,
        sheet_name: &str,
        current_row: Option<u32>,
        cell_ref: Option<String>,
        cell_type: Option<String>,
        value: String,
        from_formula: bool,
    ) -> XlsxResult<()> {
        let reference = cell_ref.ok_or_else(|| {
            XlsxError::InvalidFormat(format!("sheet '{}' has a cell without a reference", sheet_name))
        })?;

        let (ref_row, column) = split_cell_ref(&reference)?;
        // The row attribute wins when both are present; cells outside any
        // row element keep their own row number.
        let row = current_row.unwrap_or(ref_row);

        let kind = match cell_type.as_deref() {
            Some("s") => CellKind::SharedString,
            Some("b") => CellKind::Boolean,
            _ => CellKind::Plain,
        };

        data.cells.push(RawCell {
            row,
            column,
            kind,
            value,
            from_formula,
        });

        Ok(())
    }
}

/// Resolve one raw cell to its textual value.
///
/// Pure function of the cell and the shared-string table. A cached formula
/// result is used verbatim; everything else is trimmed before the kind
/// mapping applies.
pub(crate) fn resolve_cell(cell: &RawCell, shared_strings: &[String]) -> XlsxResult<String> {
    let value = if cell.from_formula {
        cell.value.clone()
    } else {
        cell.value.trim().to_string()
    };

    match cell.kind {
        CellKind::Plain => Ok(value),
        CellKind::Boolean => Ok(match value.as_str() {
            "0" => "FALSE".to_string(),
            _ => "TRUE".to_string(),
        }),
        CellKind::SharedString => {
            let index: usize = value.parse().map_err(|_| {
                XlsxError::CellResolution(format!(
                    "shared string reference '{}' is not an index",
                    value
                ))
            })?;

            shared_strings.get(index).cloned().ok_or_else(|| {
                XlsxError::CellResolution(format!(
                    "shared string index {} out of range (table has {} entries)",
                    index,
                    shared_strings.len()
                ))
            })
        }
    }
}

/// Build the ordered (column letters, column name) mapping for one sheet.
///
/// Under [`HeaderPolicy::Explicit`] the names come from the resolved row-1
/// cell values, keyed by column address, first occurrence winning, insertion
/// order preserved. Under [`HeaderPolicy::Positional`] every cell maps its
/// address to itself and the result is sorted lexically by address; the
/// ordering difference between the two policies is intentional.
pub(crate) fn resolve_headers(
    sheet_name: &str,
    data: &SheetData,
    shared_strings: &[String],
    policy: HeaderPolicy,
) -> XlsxResult<Vec<(String, String)>> {
    let mut headers: Vec<(String, String)> = Vec::new();

    match policy {
        HeaderPolicy::Explicit => {
            if !data.row_indices.contains(&1) {
                return Err(XlsxError::MissingHeaderRow(sheet_name.to_string()));
            }

            for cell in data.cells.iter().filter(|c| c.row == 1) {
                if headers.iter().any(|(addr, _)| *addr == cell.column) {
                    continue;
                }
                let name = resolve_cell(cell, shared_strings)?;
                headers.push((cell.column.clone(), name));
            }

            if headers.is_empty() {
                return Err(XlsxError::MissingHeader(sheet_name.to_string()));
            }
        }
        HeaderPolicy::Positional => {
            for cell in &data.cells {
                if headers.iter().any(|(addr, _)| *addr == cell.column) {
                    continue;
                }
                headers.push((cell.column.clone(), cell.column.clone()));
            }
            headers.sort();
        }
    }

    Ok(headers)
}

/// Reconstruct a dense table from the sparse cell stream.
///
/// Cells at or before the header boundary are discarded; the remaining rows
/// are materialized contiguously from the first data row through the
/// maximum observed row index, with absent cells left as empty strings. An
/// empty retained set yields a zero-row table.
pub(crate) fn assemble_table(
    sheet_name: &str,
    data: &SheetData,
    headers: &[(String, String)],
    shared_strings: &[String],
    policy: HeaderPolicy,
) -> XlsxResult<Table> {
    let columns: Vec<String> = headers.iter().map(|(_, name)| name.clone()).collect();
    let mut table = Table::with_columns(sheet_name, columns);

    let positions: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, (addr, _))| (addr.as_str(), i))
        .collect();

    let boundary: u32 = match policy {
        HeaderPolicy::Explicit => 1,
        HeaderPolicy::Positional => 0,
    };
    let first_data_row = boundary + 1;

    // Cells whose column never made it into the header map are dropped;
    // they have no slot in the dense grid.
    let mut resolved: Vec<(u32, usize, String)> = Vec::new();
    for cell in data.cells.iter().filter(|c| c.row > boundary) {
        if let Some(&pos) = positions.get(cell.column.as_str()) {
            let value = resolve_cell(cell, shared_strings)?;
            resolved.push((cell.row, pos, value));
        }
    }

    let max_row = match resolved.iter().map(|(row, _, _)| *row).max() {
        Some(max) => max,
        None => return Ok(table), // no data rows
    };

    let row_count = (max_row - first_data_row + 1) as usize;
    let mut grid = vec![vec![String::new(); table.column_count()]; row_count];

    for (row, pos, value) in resolved {
        grid[(row - first_data_row) as usize][pos] = value;
    }

    for row in grid {
        table.push_row(row)?;
    }

    Ok(table)
}
