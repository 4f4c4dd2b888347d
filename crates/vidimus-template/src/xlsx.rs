//! Office Open XML spreadsheet import.
//!
//! Reads only the parts the compiler needs out of an xlsx package: sheet
//! order and names, workbook-level defined names, shared strings, cell text,
//! merged regions, data validations, and cell comments. Everything else in
//! the package is ignored. The importer is deliberately lenient about
//! content it does not understand; structural breakage (missing mandatory
//! parts, invalid XML) is an error.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::addr::{CellAddr, CellRange};
use crate::error::{Error, Result};
use crate::workbook::{DefinedName, Sheet, Validation, ValidationKind, Workbook};

/// ZIP local-file-header magic.
const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";

/// Cheap check that bytes look like an xlsx package: ZIP magic plus an
/// `xl/workbook.xml` entry. Legacy `.xls` and arbitrary files fail here
/// before any parsing happens.
pub fn sniff_ooxml(bytes: &[u8]) -> bool {
    if bytes.len() < 4 || &bytes[..4] != ZIP_MAGIC {
        return false;
    }
    match ZipArchive::new(Cursor::new(bytes)) {
        Ok(mut archive) => archive.by_name("xl/workbook.xml").is_ok(),
        Err(_) => false,
    }
}

/// Load a workbook model from xlsx bytes.
pub fn read_workbook(bytes: &[u8]) -> Result<Workbook> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let workbook_xml = read_part(&mut archive, "xl/workbook.xml")?
        .ok_or_else(|| Error::malformed("missing xl/workbook.xml"))?;
    let (sheet_entries, defined_names) = parse_workbook_xml(&workbook_xml)?;

    let rels_xml = read_part(&mut archive, "xl/_rels/workbook.xml.rels")?
        .ok_or_else(|| Error::malformed("missing workbook relationships"))?;
    let workbook_rels = parse_relationships(&rels_xml)?;

    let shared_strings = match read_part(&mut archive, "xl/sharedStrings.xml")? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };

    let mut workbook = Workbook {
        sheets: Vec::new(),
        defined_names,
    };

    for entry in sheet_entries {
        let Some(rel) = workbook_rels.get(&entry.rel_id) else {
            tracing::warn!(sheet = %entry.name, "sheet has no relationship entry, skipping");
            continue;
        };
        let part_name = resolve_target("xl", &rel.target);
        let sheet_xml = read_part(&mut archive, &part_name)?
            .ok_or_else(|| Error::malformed(format!("missing sheet part {part_name}")))?;
        let mut sheet = Sheet::new(&entry.name);
        parse_worksheet(&sheet_xml, &shared_strings, &mut sheet)?;
        apply_comments(&mut archive, &part_name, &mut sheet)?;
        workbook.sheets.push(sheet);
    }

    Ok(workbook)
}

// ============================================================================
// Package plumbing
// ============================================================================

fn read_part(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> Result<Option<String>> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut raw = Vec::new();
            file.read_to_end(&mut raw)?;
            Ok(Some(String::from_utf8_lossy(&raw).into_owned()))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Resolve a relationship target against its source part's directory.
/// Handles package-absolute targets (leading `/`) and `..` segments.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

struct SheetEntry {
    name: String,
    rel_id: String,
}

struct Relationship {
    target: String,
    rel_type: String,
}

fn attr(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

// ============================================================================
// Part parsers
// ============================================================================

fn parse_workbook_xml(xml: &str) -> Result<(Vec<SheetEntry>, Vec<DefinedName>)> {
    let mut reader = Reader::from_str(xml);
    let mut sheets = Vec::new();
    let mut defined_names = Vec::new();
    let mut pending_name: Option<String> = None;
    let mut name_text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"sheet" => {
                    let name = attr(&e, b"name");
                    let rel_id = attr(&e, b"r:id").or_else(|| attr(&e, b"id"));
                    if let (Some(name), Some(rel_id)) = (name, rel_id) {
                        sheets.push(SheetEntry { name, rel_id });
                    }
                }
                b"definedName" => {
                    pending_name = attr(&e, b"name");
                    name_text.clear();
                }
                _ => {}
            },
            Event::Text(t) => {
                if pending_name.is_some() {
                    name_text.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => {
                if e.local_name().as_ref() == b"definedName" {
                    if let Some(name) = pending_name.take() {
                        defined_names.push(DefinedName {
                            name,
                            refers_to: name_text.trim().to_string(),
                        });
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok((sheets, defined_names))
}

fn parse_relationships(xml: &str) -> Result<HashMap<String, Relationship>> {
    let mut reader = Reader::from_str(xml);
    let mut rels = HashMap::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let id = attr(&e, b"Id");
                    let target = attr(&e, b"Target");
                    let rel_type = attr(&e, b"Type").unwrap_or_default();
                    if let (Some(id), Some(target)) = (id, target) {
                        rels.insert(id, Relationship { target, rel_type });
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(rels)
}

/// Shared strings: one entry per `<si>`, concatenating every `<t>` run.
fn parse_shared_strings(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_item = false;
    let mut in_text = false;
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => {
                    in_item = true;
                    current.clear();
                }
                b"t" if in_item => in_text = true,
                _ => {}
            },
            Event::Text(t) => {
                if in_text {
                    current.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => {
                    in_item = false;
                    strings.push(std::mem::take(&mut current));
                }
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(strings)
}

fn parse_worksheet(xml: &str, shared_strings: &[String], sheet: &mut Sheet) -> Result<()> {
    let mut reader = Reader::from_str(xml);

    // State for the cell currently being read.
    let mut cell_addr: Option<CellAddr> = None;
    let mut cell_type = String::new();
    let mut value = String::new();
    let mut in_value = false;
    let mut in_inline_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"c" => {
                    cell_addr = attr(&e, b"r").and_then(|r| r.parse().ok());
                    cell_type = attr(&e, b"t").unwrap_or_default();
                    value.clear();
                }
                b"v" => in_value = true,
                b"t" if cell_type == "inlineStr" => in_inline_text = true,
                b"mergeCell" => {
                    if let Some(range) = attr(&e, b"ref").and_then(|r| r.parse::<CellRange>().ok())
                    {
                        sheet.merged.push(range);
                    }
                }
                b"dataValidation" => {
                    let kind =
                        ValidationKind::from_ooxml(&attr(&e, b"type").unwrap_or_default());
                    let ranges: Vec<CellRange> = attr(&e, b"sqref")
                        .unwrap_or_default()
                        .split_whitespace()
                        .filter_map(|r| r.parse().ok())
                        .collect();
                    if !ranges.is_empty() {
                        sheet.validations.push(Validation { kind, ranges });
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                if in_value || in_inline_text {
                    value.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"v" => in_value = false,
                b"t" => in_inline_text = false,
                b"c" => {
                    if let Some(addr) = cell_addr.take() {
                        let text = if cell_type == "s" {
                            value
                                .trim()
                                .parse::<usize>()
                                .ok()
                                .and_then(|idx| shared_strings.get(idx))
                                .cloned()
                                .unwrap_or_default()
                        } else {
                            value.clone()
                        };
                        if !text.is_empty() {
                            sheet.set_text(addr, text);
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(())
}

/// Attach comments from the sheet's comments part, found via its `.rels`.
fn apply_comments(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    sheet_part: &str,
    sheet: &mut Sheet,
) -> Result<()> {
    let (dir, file) = match sheet_part.rsplit_once('/') {
        Some(split) => split,
        None => return Ok(()),
    };
    let rels_part = format!("{dir}/_rels/{file}.rels");
    let Some(rels_xml) = read_part(archive, &rels_part)? else {
        return Ok(());
    };
    let comments_target = parse_relationships(&rels_xml)?
        .into_values()
        .find(|rel| rel.rel_type.ends_with("/comments"))
        .map(|rel| resolve_target(dir, &rel.target));
    let Some(part) = comments_target else {
        return Ok(());
    };
    let Some(xml) = read_part(archive, &part)? else {
        return Ok(());
    };
    for (addr, text) in parse_comments(&xml)? {
        sheet.set_comment(addr, text);
    }
    Ok(())
}

/// Comments part: `(cell, text)` pairs, concatenating all `<t>` runs of each
/// comment body.
fn parse_comments(xml: &str) -> Result<Vec<(CellAddr, String)>> {
    let mut reader = Reader::from_str(xml);
    let mut comments = Vec::new();
    let mut current_addr: Option<CellAddr> = None;
    let mut current_text = String::new();
    let mut in_text_run = false;
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"comment" => {
                    current_addr = attr(&e, b"ref").and_then(|r| r.parse().ok());
                    current_text.clear();
                }
                b"t" if current_addr.is_some() => in_text_run = true,
                _ => {}
            },
            Event::Text(t) => {
                if in_text_run {
                    current_text.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"comment" => {
                    if let Some(addr) = current_addr.take() {
                        comments.push((addr, current_text.clone()));
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(comments)
}

// ============================================================================
// Tests
// ============================================================================
