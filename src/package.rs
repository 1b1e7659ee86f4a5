//! ZIP package access for WordprocessingML files.

use crate::error::{Error, Result};
use crate::xml::{DecodeOptions, XmlStream};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Path of the part listing content types.
pub const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";

const EMPTY_RELATIONSHIPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#;

/// A relationship entry from a .rels part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path or URL
    pub target: String,
    /// Whether the target lives outside the package
    pub external: bool,
}

/// Relationships of one part, indexed by id and by type.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    /// Relationships by ID
    pub by_id: HashMap<String, Relationship>,
    /// Relationships by type URI, in part order
    pub by_type: HashMap<String, Vec<Relationship>>,
}

impl Relationships {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the markup of a .rels part.
    ///
    /// Entries without an `Id` are ignored.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut rels = Self::new();
        if xml.trim().is_empty() {
            return Ok(rels);
        }
        let mut stream = XmlStream::new(xml, DecodeOptions::default());
        let root = stream.root()?;
        stream.read_children(&root, |stream, child| {
            if child.local_name() != b"Relationship" {
                return stream.skip(&child);
            }
            let attrs = stream.leaf(&child)?;
            let Some(id) = attrs.get("Id") else {
                return Ok(());
            };
            rels.add(Relationship {
                id: id.to_string(),
                rel_type: attrs.get("Type").unwrap_or_default().to_string(),
                target: attrs.get("Target").unwrap_or_default().to_string(),
                external: attrs
                    .get("TargetMode")
                    .is_some_and(|mode| mode.eq_ignore_ascii_case("external")),
            });
            Ok(())
        })?;
        Ok(rels)
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    /// Get relationships by type.
    pub fn get_by_type(&self, rel_type: &str) -> &[Relationship] {
        self.by_type.get(rel_type).map_or(&[], Vec::as_slice)
    }

    /// Add a relationship.
    pub fn add(&mut self, rel: Relationship) {
        self.by_type
            .entry(rel.rel_type.clone())
            .or_default()
            .push(rel.clone());
        self.by_id.insert(rel.id.clone(), rel);
    }

    /// An id of the form `rIdN` that no relationship uses yet.
    pub fn next_id(&self) -> String {
        let mut n = self
            .by_id
            .keys()
            .filter_map(|id| id.strip_prefix("rId")?.parse::<usize>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        while self.by_id.contains_key(&format!("rId{}", n)) {
            n += 1;
        }
        format!("rId{}", n)
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if there are no relationships.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Maps a relationship id to its target.
pub trait RelationshipResolver {
    /// Target of relationship `id`, if known.
    fn resolve(&self, id: &str) -> Option<&str>;
}

impl RelationshipResolver for Relationships {
    fn resolve(&self, id: &str) -> Option<&str> {
        self.get(id).map(|rel| rel.target.as_str())
    }
}

impl RelationshipResolver for HashMap<String, String> {
    fn resolve(&self, id: &str) -> Option<&str> {
        self.get(id).map(String::as_str)
    }
}

/// An OOXML package held in memory.
pub struct Package {
    archive: RefCell<ZipArchive<Cursor<Vec<u8>>>>,
}

impl Package {
    /// Open a package from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Open a package from its bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Open a package from a reader.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Read a part as text.
    ///
    /// UTF-8 (with or without BOM) and UTF-16 (LE or BE) are accepted.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        decode_xml_bytes(&self.read_binary(path)?)
    }

    /// Read a part as text, or `None` if the package has no such part.
    pub fn read_optional_xml(&self, path: &str) -> Result<Option<String>> {
        if !self.exists(path) {
            return Ok(None);
        }
        self.read_xml(path).map(Some)
    }

    /// Read a part's raw bytes.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Check if a part exists.
    pub fn exists(&self, path: &str) -> bool {
        self.archive.borrow().file_names().any(|n| n == path)
    }

    /// List all parts, in archive order.
    pub fn list_files(&self) -> Vec<String> {
        self.archive
            .borrow()
            .file_names()
            .map(String::from)
            .collect()
    }

    /// Read the relationships of a part (`word/document.xml` reads
    /// `word/_rels/document.xml.rels`). A missing .rels part yields an
    /// empty collection.
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        match self.read_optional_xml(&rels_path(part_path))? {
            Some(xml) => Relationships::from_xml(&xml),
            None => Ok(Relationships::new()),
        }
    }

    /// Path of the .rels part holding the relationships of `part_path`.
    pub fn relationships_path(part_path: &str) -> String {
        rels_path(part_path)
    }

    /// Markup of the .rels part of `part_path` with `rel` appended.
    ///
    /// A package without that .rels part gets a new one.
    pub fn relationships_with(&self, part_path: &str, rel: &Relationship) -> Result<Vec<u8>> {
        let xml = self
            .read_optional_xml(&rels_path(part_path))?
            .unwrap_or_else(|| EMPTY_RELATIONSHIPS.to_string());
        let mut attributes = vec![
            ("Id", rel.id.as_str()),
            ("Type", rel.rel_type.as_str()),
            ("Target", rel.target.as_str()),
        ];
        if rel.external {
            attributes.push(("TargetMode", "External"));
        }
        append_to_root(&xml, "Relationship", &attributes)
    }

    /// Markup of `[Content_Types].xml` with an override for `part_path`,
    /// or `None` if the package has no content types part or already
    /// declares one for that part.
    pub fn content_types_with(&self, part_path: &str, content_type: &str) -> Result<Option<Vec<u8>>> {
        let Some(xml) = self.read_optional_xml(CONTENT_TYPES_PATH)? else {
            return Ok(None);
        };
        let part_name = format!("/{}", part_path.trim_start_matches('/'));
        if has_override(&xml, &part_name)? {
            return Ok(None);
        }
        append_to_root(
            &xml,
            "Override",
            &[("PartName", part_name.as_str()), ("ContentType", content_type)],
        )
        .map(Some)
    }

    /// Resolve a relationship target against the part that references it.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }
        let mut parts: Vec<&str> = base.split('/').collect();
        parts.pop();
        for segment in relative.split('/') {
            match segment {
                ".." => {
                    parts.pop();
                }
                "." | "" => {}
                other => parts.push(other),
            }
        }
        parts.join("/")
    }

    /// Write the package out with some parts replaced.
    ///
    /// Replaced parts are recompressed; every other entry is copied raw, in
    /// its original position. Replacements naming a part the package does
    /// not have are appended.
    pub fn rewrite(&self, replacements: &BTreeMap<String, Vec<u8>>) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut written = Vec::new();
        for i in 0..archive.len() {
            let file = archive.by_index_raw(i)?;
            let name = file.name().to_string();
            match replacements.get(&name) {
                Some(data) => {
                    drop(file);
                    writer.start_file(name.as_str(), options)?;
                    writer.write_all(data)?;
                    written.push(name);
                }
                None => writer.raw_copy_file(file)?,
            }
        }
        for (name, data) in replacements {
            if !written.contains(name) {
                writer.start_file(name.as_str(), options)?;
                writer.write_all(data)?;
            }
        }

        log::debug!(
            "rewrote package: {} entries, {} replaced",
            archive.len(),
            replacements.len()
        );
        Ok(writer.finish()?.into_inner())
    }
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("files", &self.archive.borrow().len())
            .finish()
    }
}

fn rels_path(part_path: &str) -> String {
    let part_path = part_path.trim_start_matches('/');
    match part_path.rsplit_once('/') {
        _ if part_path.is_empty() => "_rels/.rels".to_string(),
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part_path),
    }
}

/// Part names compare case-insensitively.
fn has_override(xml: &str, part_name: &str) -> Result<bool> {
    let mut stream = XmlStream::new(xml, DecodeOptions::default());
    let root = stream.root()?;
    let mut found = false;
    stream.read_children(&root, |stream, child| {
        if child.local_name() != b"Override" {
            return stream.skip(&child);
        }
        let attrs = stream.leaf(&child)?;
        found |= attrs
            .get("PartName")
            .is_some_and(|name| name.eq_ignore_ascii_case(part_name));
        Ok(())
    })?;
    Ok(found)
}

/// Copy `xml` with an empty `name` element added as the root's last child.
fn append_to_root(xml: &str, name: &str, attributes: &[(&str, &str)]) -> Result<Vec<u8>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + 256));
    let child = BytesStart::new(name).with_attributes(attributes.iter().copied());
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                depth += 1;
                writer.write_event(Event::Start(start))?;
            }
            Event::End(end) => {
                if depth == 1 {
                    writer.write_event(Event::Empty(child.borrow()))?;
                }
                depth = depth.saturating_sub(1);
                writer.write_event(Event::End(end))?;
            }
            Event::Empty(root) if depth == 0 => {
                writer.write_event(Event::Start(root.borrow()))?;
                writer.write_event(Event::Empty(child.borrow()))?;
                writer.write_event(Event::End(root.to_end()))?;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    Ok(writer.into_inner())
}

/// Decode part bytes to text, honouring a byte order mark.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec()).map_err(|e| Error::Encoding(e.to_string()));
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes).map(|s| fix_declared_encoding(&s));
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes).map(|s| fix_declared_encoding(&s));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        // ASCII markup in UTF-16 has a zero in every other byte.
        Err(_) if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 => {
            decode_utf16(bytes, u16::from_le_bytes).map(|s| fix_declared_encoding(&s))
        }
        Err(_) if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 => {
            decode_utf16(bytes, u16::from_be_bytes).map(|s| fix_declared_encoding(&s))
        }
        Err(_) => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Encoding(e.to_string()))
}

/// The text is UTF-8 now; a declaration still claiming UTF-16 would
/// mislead the tokenizer.
fn fix_declared_encoding(content: &str) -> String {
    let Some(end) = content
        .starts_with("<?xml")
        .then(|| content.find("?>"))
        .flatten()
    else {
        return content.to_string();
    };
    let (decl, rest) = content.split_at(end + 2);
    let fixed = decl
        .replace("\"UTF-16\"", "\"UTF-8\"")
        .replace("'UTF-16'", "'UTF-8'")
        .replace("\"utf-16\"", "\"UTF-8\"")
        .replace("'utf-16'", "'UTF-8'");
    format!("{}{}", fixed, rest)
}
