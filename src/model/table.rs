//! Tables.
//!
//! Table, row and cell properties are not interpreted; they are kept as
//! verbatim markup so a rewritten part keeps its layout.

use super::{BodyItem, BLOCK_PASS_THROUGH};
use crate::error::Result;
use crate::xml::{Attributes, Decode, Element, Encode, RawElement, XmlStream, XmlWriter};
use serde::{Deserialize, Serialize};

/// A table (`w:tbl`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// `w:tblPr`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<RawElement>,
    /// `w:tblGrid`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<RawElement>,
    /// Rows and the markup kept between them, in document order.
    #[serde(default)]
    pub content: Vec<TableContent>,
}

/// A child of a table after its properties and grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TableContent {
    Row(TableRow),
    /// Bookmarks, revision marks and other kept markup between rows.
    Unknown(RawElement),
}

/// A table row (`w:tr`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    /// `w:tblPrEx`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exceptions: Option<RawElement>,
    /// `w:trPr`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<RawElement>,
    /// Cells and the markup kept between them, in document order.
    #[serde(default)]
    pub content: Vec<RowContent>,
}

/// A child of a row after its properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RowContent {
    Cell(TableCell),
    Unknown(RawElement),
}

/// A table cell (`w:tc`) holding block content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    /// `w:tcPr`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<RawElement>,
    #[serde(default)]
    pub content: Vec<BodyItem>,
}

impl Table {
    /// Rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &TableRow> {
        self.content.iter().filter_map(|item| match item {
            TableContent::Row(row) => Some(row),
            TableContent::Unknown(_) => None,
        })
    }

    /// Plain text: cells separated by tabs, rows by newlines.
    pub fn text(&self) -> String {
        self.rows()
            .map(|row| row.cells().map(TableCell::text).collect::<Vec<_>>().join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TableRow {
    /// Cells in order.
    pub fn cells(&self) -> impl Iterator<Item = &TableCell> {
        self.content.iter().filter_map(|item| match item {
            RowContent::Cell(cell) => Some(cell),
            RowContent::Unknown(_) => None,
        })
    }
}

impl TableCell {
    /// Plain text of the cell's blocks, joined with spaces.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(BodyItem::text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Decode for Table {
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        let mut table = Self::default();
        stream.read_children(start, |stream, child| {
            match child.local_name() {
                b"tblPr" => table.properties = Some(stream.capture(&child)?),
                b"tblGrid" => table.grid = Some(stream.capture(&child)?),
                b"tr" => table
                    .content
                    .push(TableContent::Row(TableRow::decode(stream, &child)?)),
                _ => table.content.extend(
                    stream
                        .capture_listed(&child, BLOCK_PASS_THROUGH)?
                        .map(TableContent::Unknown),
                ),
            }
            Ok(())
        })?;
        Ok(table)
    }
}

impl Decode for TableRow {
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        let mut row = Self {
            attributes: start.attributes()?,
            ..Default::default()
        };
        stream.read_children(start, |stream, child| {
            match child.local_name() {
                b"tblPrEx" => row.exceptions = Some(stream.capture(&child)?),
                b"trPr" => row.properties = Some(stream.capture(&child)?),
                b"tc" => row
                    .content
                    .push(RowContent::Cell(TableCell::decode(stream, &child)?)),
                _ => row.content.extend(
                    stream
                        .capture_listed(&child, BLOCK_PASS_THROUGH)?
                        .map(RowContent::Unknown),
                ),
            }
            Ok(())
        })?;
        Ok(row)
    }
}

impl Decode for TableCell {
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        let mut cell = Self::default();
        stream.read_children(start, |stream, child| {
            if child.local_name() == b"tcPr" {
                cell.properties = Some(stream.capture(&child)?);
            } else {
                cell.content.extend(BodyItem::decode_block(stream, &child)?);
            }
            Ok(())
        })?;
        Ok(cell)
    }
}

impl Encode for Table {
    fn encode(&self, writer: &mut XmlWriter) {
        writer.start_with("w:tbl", &[]);
        if let Some(props) = &self.properties {
            writer.raw(props);
        }
        if let Some(grid) = &self.grid {
            writer.raw(grid);
        }
        for item in &self.content {
            match item {
                TableContent::Row(row) => row.encode(writer),
                TableContent::Unknown(raw) => writer.raw(raw),
            }
        }
        writer.end();
    }
}

impl Encode for TableRow {
    fn encode(&self, writer: &mut XmlWriter) {
        writer.start("w:tr", &self.attributes);
        for raw in self.exceptions.iter().chain(&self.properties) {
            writer.raw(raw);
        }
        for item in &self.content {
            match item {
                RowContent::Cell(cell) => cell.encode(writer),
                RowContent::Unknown(raw) => writer.raw(raw),
            }
        }
        writer.end();
    }
}

impl Encode for TableCell {
    fn encode(&self, writer: &mut XmlWriter) {
        writer.start_with("w:tc", &[]);
        if let Some(props) = &self.properties {
            writer.raw(props);
        }
        for item in &self.content {
            item.encode(writer);
        }
        writer.end();
    }
}
