//! In-memory `.docx` documents.
//!
//! Only the main document part (`word/document.xml`) is parsed for editing.
//! Header and footer parts contribute to the plain text but are never
//! rewritten. Every other archive entry is carried through untouched, so
//! saving a document that was not modified reproduces the original parts byte
//! for byte.

use crate::{Result, SpellCheckerError};
use once_cell::sync::Lazy;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use regex::Regex;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use tracing::debug;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const DOCX_EXTENSION: &str = "docx";

static HEADER_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^word/header[0-9]*\.xml$").unwrap());
static FOOTER_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^word/footer[0-9]*\.xml$").unwrap());

#[derive(Debug, Clone)]
enum Node {
    Markup(Event<'static>),
    Paragraph(Paragraph),
}

/// A body-level paragraph of the document.
#[derive(Debug, Clone)]
pub struct Paragraph {
    start: BytesStart<'static>,
    events: Vec<Event<'static>>,
    properties: Vec<Event<'static>>,
    original: String,
    text: String,
}

impl Paragraph {
    fn from_events(events: Vec<Event<'static>>) -> Result<Self> {
        let start = match events.first() {
            Some(Event::Start(e)) | Some(Event::Empty(e)) => e.clone(),
            _ => return Err(SpellCheckerError::MissingPart("w:p".to_string())),
        };

        let mut collector = TextCollector::new(false);
        for event in &events {
            collector.feed(event)?;
        }

        let properties = paragraph_properties(&events);
        let text = collector.finish();

        Ok(Self {
            start,
            events,
            properties,
            original: text.clone(),
            text,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the paragraph text. On save, a modified paragraph keeps its
    /// paragraph properties and holds the new text in a single plain run.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn is_modified(&self) -> bool {
        self.text != self.original
    }

    fn write(&self, writer: &mut Writer<Cursor<Vec<u8>>>) -> Result<()> {
        if !self.is_modified() {
            for event in &self.events {
                writer.write_event(event.clone())?;
            }
            return Ok(());
        }

        writer.write_event(Event::Start(self.start.clone()))?;
        for event in &self.properties {
            writer.write_event(event.clone())?;
        }
        write_run(writer, &self.text)?;
        writer.write_event(Event::End(self.start.to_end()))?;
        Ok(())
    }
}

/// A `.docx` document loaded into memory.
#[derive(Debug, Clone)]
pub struct Document {
    name: String,
    archive: Vec<u8>,
    nodes: Vec<Node>,
    text: String,
}

impl Document {
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.docx".to_string());
        Self::from_bytes(name, bytes)
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        let xml = read_part(&bytes, DOCUMENT_PART)?;
        let nodes = parse_body(&xml)?;
        let text = document_text(&bytes, &xml)?;

        debug!(
            document = %name,
            paragraphs = nodes.iter().filter(|n| matches!(n, Node::Paragraph(_))).count(),
            "loaded document"
        );

        Ok(Self {
            name,
            archive: bytes,
            nodes,
            text,
        })
    }

    /// File name the document was uploaded under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Plain text as it was loaded: header parts, then the main part, then
    /// footer parts, each in archive order. Includes paragraphs nested in
    /// tables. Every paragraph ends with a newline.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Paragraph(p) => Some(p),
            Node::Markup(_) => None,
        })
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.nodes.iter_mut().filter_map(|node| match node {
            Node::Paragraph(p) => Some(p),
            Node::Markup(_) => None,
        })
    }

    pub fn is_modified(&self) -> bool {
        self.paragraphs().any(Paragraph::is_modified)
    }

    /// Serializes the document back into a `.docx` archive.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut archive = ZipArchive::new(Cursor::new(self.archive.as_slice()))?;
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let modified = self.is_modified();

        for index in 0..archive.len() {
            let file = archive.by_index(index)?;
            if modified && file.name() == DOCUMENT_PART {
                let options = SimpleFileOptions::default()
                    .compression_method(CompressionMethod::Deflated)
                    .last_modified_time(file.last_modified().unwrap_or_default());
                writer.start_file(DOCUMENT_PART, options)?;
                writer.write_all(&write_body(&self.nodes)?)?;
            } else {
                writer.raw_copy_file(file)?;
            }
        }

        Ok(writer.finish()?.into_inner())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_bytes()?)?;
        debug!(path = %path.display(), "saved document");
        Ok(())
    }
}

fn read_part(bytes: &[u8], part: &str) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut file = match archive.by_name(part) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => {
            return Err(SpellCheckerError::MissingPart(part.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let mut raw = Vec::new();
    file.read_to_end(&mut raw)?;
    let (content, _, _) = encoding_rs::UTF_8.decode(&raw);
    Ok(content.into_owned())
}

fn part_names(bytes: &[u8]) -> Result<Vec<String>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    (0..archive.len())
        .map(|index| -> Result<String> { Ok(archive.by_index_raw(index)?.name().to_string()) })
        .collect()
}

fn document_text(bytes: &[u8], main: &str) -> Result<String> {
    let names = part_names(bytes)?;
    let mut text = String::new();
    for name in names.iter().filter(|n| HEADER_PART.is_match(n)) {
        text.push_str(&plain_text(&read_part(bytes, name)?)?);
    }
    text.push_str(&plain_text(main)?);
    for name in names.iter().filter(|n| FOOTER_PART.is_match(n)) {
        text.push_str(&plain_text(&read_part(bytes, name)?)?);
    }
    Ok(text)
}

/// Accumulates run text the way Word renders it: `w:t` content, `w:tab` as a
/// tab and `w:br`/`w:cr` as a newline.
struct TextCollector {
    stack: Vec<Vec<u8>>,
    out: String,
    // Whole-part extraction also reads paragraphs nested in text boxes and
    // terminates each paragraph with a newline.
    whole_part: bool,
}

impl TextCollector {
    fn new(whole_part: bool) -> Self {
        Self {
            stack: Vec::new(),
            out: String::new(),
            whole_part,
        }
    }

    fn feed(&mut self, event: &Event<'_>) -> Result<()> {
        match event {
            Event::Start(e) => self.stack.push(e.name().as_ref().to_vec()),
            Event::End(e) => {
                self.stack.pop();
                if self.whole_part && e.name().as_ref() == b"w:p" {
                    self.out.push('\n');
                }
            }
            Event::Empty(e) => {
                let name = e.name();
                if self.whole_part && name.as_ref() == b"w:p" {
                    self.out.push('\n');
                } else if self.parent_is(b"w:r") {
                    match name.as_ref() {
                        b"w:tab" => self.out.push('\t'),
                        b"w:br" | b"w:cr" => self.out.push('\n'),
                        _ => {}
                    }
                }
            }
            Event::Text(t) if self.parent_is(b"w:t") => {
                self.out.push_str(&t.unescape()?);
            }
            _ => {}
        }
        Ok(())
    }

    fn parent_is(&self, name: &[u8]) -> bool {
        let in_scope = self.whole_part
            || self.stack.iter().filter(|n| n.as_slice() == b"w:p").count() <= 1;
        in_scope && self.stack.last().is_some_and(|n| n.as_slice() == name)
    }

    fn finish(self) -> String {
        self.out
    }
}

fn plain_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut collector = TextCollector::new(true);
    loop {
        let event = reader.read_event()?;
        if matches!(event, Event::Eof) {
            break;
        }
        collector.feed(&event)?;
    }
    Ok(collector.finish())
}

fn parse_body(xml: &str) -> Result<Vec<Node>> {
    let mut reader = Reader::from_str(xml);
    let mut nodes = Vec::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    // Events of the body paragraph being collected, with its nesting depth.
    let mut paragraph: Option<(Vec<Event<'static>>, usize)> = None;

    loop {
        let event = reader.read_event()?.into_owned();
        if matches!(event, Event::Eof) {
            break;
        }

        if let Some((mut events, mut depth)) = paragraph.take() {
            match &event {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth -= 1,
                _ => {}
            }
            events.push(event);
            if depth == 0 {
                nodes.push(Node::Paragraph(Paragraph::from_events(events)?));
            } else {
                paragraph = Some((events, depth));
            }
            continue;
        }

        let at_body = stack.last().is_some_and(|n| n.as_slice() == b"w:body");
        let is_paragraph = at_body
            && matches!(&event, Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"w:p");

        if is_paragraph {
            if matches!(event, Event::Start(_)) {
                paragraph = Some((vec![event], 1));
            } else {
                nodes.push(Node::Paragraph(Paragraph::from_events(vec![event])?));
            }
            continue;
        }

        match &event {
            Event::Start(e) => stack.push(e.name().as_ref().to_vec()),
            Event::End(_) => {
                stack.pop();
            }
            _ => {}
        }
        nodes.push(Node::Markup(event));
    }

    Ok(nodes)
}

/// The `w:pPr` subtree directly under the paragraph element.
fn paragraph_properties(events: &[Event<'static>]) -> Vec<Event<'static>> {
    let mut properties = Vec::new();
    let mut depth = 0usize;
    let mut capturing = false;

    for event in events.iter().skip(1) {
        match event {
            Event::Start(e) => {
                if depth == 0 && e.name().as_ref() == b"w:pPr" {
                    capturing = true;
                }
                depth += 1;
            }
            Event::Empty(e) if depth == 0 && e.name().as_ref() == b"w:pPr" => {
                properties.push(event.clone());
                break;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if capturing && depth == 0 {
                    properties.push(event.clone());
                    break;
                }
            }
            _ => {}
        }
        if capturing {
            properties.push(event.clone());
        }
    }

    properties
}

fn write_body(nodes: &[Node]) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    for node in nodes {
        match node {
            Node::Markup(event) => writer.write_event(event.clone())?,
            Node::Paragraph(paragraph) => paragraph.write(&mut writer)?,
        }
    }
    Ok(writer.into_inner().into_inner())
}

fn write_run(writer: &mut Writer<Cursor<Vec<u8>>>, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new("w:r")))?;
    let mut segment = String::new();
    for ch in text.chars() {
        let marker = match ch {
            '\t' => "w:tab",
            '\n' => "w:br",
            _ => {
                segment.push(ch);
                continue;
            }
        };
        flush_segment(writer, &mut segment)?;
        writer.write_event(Event::Empty(BytesStart::new(marker)))?;
    }
    flush_segment(writer, &mut segment)?;
    writer.write_event(Event::End(BytesEnd::new("w:r")))?;
    Ok(())
}

fn flush_segment(writer: &mut Writer<Cursor<Vec<u8>>>, segment: &mut String) -> Result<()> {
    if segment.is_empty() {
        return Ok(());
    }
    writer.write_event(Event::Start(
        BytesStart::new("w:t").with_attributes([("xml:space", "preserve")]),
    ))?;
    writer.write_event(Event::Text(BytesText::new(segment.as_str())))?;
    writer.write_event(Event::End(BytesEnd::new("w:t")))?;
    segment.clear();
    Ok(())
}
