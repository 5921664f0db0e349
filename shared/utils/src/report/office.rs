//! Raw text readers for Office Open XML packages.
//!
//! Both readers open the package as a zip archive and walk the XML parts with
//! `quick_xml`, keeping only character data.

use std::io::{Cursor, Read};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use quick_xml::events::{BytesText, Event};
use quick_xml::Reader;
use regex::Regex;
use zip::ZipArchive;

static SLIDE_PART_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ppt/slides/slide(\d+)\.xml$").expect("hardcoded regex pattern")
});

const DOCUMENT_PART: &str = "word/document.xml";

fn read_part<R: Read + std::io::Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut part = archive
        .by_name(name)
        .with_context(|| format!("Missing package part {}", name))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .with_context(|| format!("Failed to read package part {}", name))?;
    Ok(xml)
}

fn text_of(event: &BytesText<'_>) -> String {
    match event.unescape() {
        Ok(text) => text.into_owned(),
        Err(_) => String::from_utf8_lossy(event).into_owned(),
    }
}

/// Plain text of a Word document.
///
/// Paragraphs end with a blank line, `w:tab` becomes a TAB and `w:br`/`w:cr`
/// a newline. Table cells of one row are TAB-joined on a single line.
pub fn word_text(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).context("Failed to open Word package")?;
    let xml = read_part(&mut archive, DOCUMENT_PART)?;

    let mut reader = Reader::from_str(&xml);
    let mut out = String::new();
    let mut row: Option<Vec<String>> = None;
    let mut cell: Option<String> = None;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .with_context(|| format!("Malformed XML at position {}", reader.buffer_position()))?;
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"r" => in_run = true,
                b"t" => in_text = true,
                b"tr" => row = Some(Vec::new()),
                b"tc" => cell = Some(String::new()),
                _ => {}
            },
            Event::Empty(e) => {
                let target = cell.as_mut().unwrap_or(&mut out);
                match e.local_name().as_ref() {
                    // A TAB inside a cell would split the column.
                    b"tab" if in_run && row.is_some() => target.push(' '),
                    b"tab" if in_run => target.push('\t'),
                    b"br" | b"cr" if in_run => target.push('\n'),
                    _ => {}
                }
            }
            Event::Text(e) if in_text => {
                let text = text_of(&e);
                cell.as_mut().unwrap_or(&mut out).push_str(&text);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"r" => in_run = false,
                b"t" => in_text = false,
                b"p" => match cell.as_mut() {
                    Some(c) if !c.is_empty() => c.push(' '),
                    Some(_) => {}
                    None => out.push_str("\n\n"),
                },
                b"tc" => {
                    if let (Some(c), Some(r)) = (cell.take(), row.as_mut()) {
                        r.push(c.trim().to_string());
                    }
                }
                b"tr" => {
                    if let Some(cells) = row.take() {
                        out.push_str(&cells.join("\t"));
                        out.push('\n');
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}

/// Text of each slide that has at least one text run, in slide order.
/// Runs of one slide are joined with single spaces.
pub fn presentation_slides(bytes: &[u8]) -> Result<Vec<String>> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).context("Failed to open presentation package")?;

    let mut parts: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = SLIDE_PART_RE.captures(name)?.get(1)?.as_str().parse().ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    parts.sort_by_key(|(number, _)| *number);

    let mut slides = Vec::new();
    for (_, name) in parts {
        let xml = read_part(&mut archive, &name)?;
        let runs = slide_runs(&xml).with_context(|| format!("Failed to parse {}", name))?;
        if !runs.is_empty() {
            slides.push(runs.join(" "));
        }
    }
    Ok(slides)
}

fn slide_runs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut runs = Vec::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"a:t" => in_run_text = true,
            Event::End(e) if e.name().as_ref() == b"a:t" => in_run_text = false,
            Event::Text(e) if in_run_text => {
                let text = text_of(&e);
                if !text.is_empty() {
                    runs.push(text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(runs)
}
