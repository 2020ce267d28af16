//! WordprocessingML writer for a finished block sequence.

use std::collections::BTreeSet;
use std::io::{Cursor, Write};
use std::path::Path;

use tracing::{debug, info};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::model::{Block, TableBlock};
use crate::styles::{
    heading_style, style_id, ListKind, StyleRegistry, MAX_HEADING_LEVEL, MAX_LIST_LEVELS, TABLE_GRID,
    TITLE,
};

const NUM_ID_BULLET: u32 = 1;
const NUM_ID_DECIMAL: u32 = 2;

fn xml_escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // not allowed anywhere in an XML 1.0 document
            '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Runs for `text`, one `<w:br/>` per embedded newline.
fn runs_xml(text: &str, bold: bool) -> String {
    let mut out = String::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<w:r><w:br/></w:r>");
        }
        if line.is_empty() {
            continue;
        }
        out.push_str("<w:r>");
        if bold {
            out.push_str("<w:rPr><w:b/></w:rPr>");
        }
        out.push_str("<w:t xml:space=\"preserve\">");
        out.push_str(&xml_escape_text(line));
        out.push_str("</w:t></w:r>");
    }
    out
}

fn paragraph_xml(style: Option<&str>, text: &str, bold: bool) -> String {
    let mut out = String::from("<w:p>");
    if let Some(name) = style {
        out.push_str(&format!(
            "<w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>",
            xml_escape_text(&style_id(name))
        ));
    }
    out.push_str(&runs_xml(text, bold));
    out.push_str("</w:p>");
    out
}

fn table_xml(t: &TableBlock) -> String {
    let mut out = String::from("<w:tbl>");
    out.push_str("<w:tblPr>");
    out.push_str(&format!("<w:tblStyle w:val=\"{}\"/>", style_id(TABLE_GRID)));
    out.push_str("<w:tblW w:w=\"0\" w:type=\"auto\"/>");
    out.push_str("<w:tblLook w:val=\"04A0\" w:firstRow=\"1\" w:lastRow=\"0\" w:firstColumn=\"1\" w:lastColumn=\"0\" w:noHBand=\"0\" w:noVBand=\"1\"/>");
    out.push_str("</w:tblPr>");

    out.push_str("<w:tblGrid>");
    for _ in 0..t.col_count {
        out.push_str("<w:gridCol/>");
    }
    out.push_str("</w:tblGrid>");

    for (i, row) in t.cells.iter().enumerate() {
        let bold = t.is_header_row(i);
        out.push_str("<w:tr>");
        for cell in row {
            out.push_str("<w:tc>");
            out.push_str("<w:tcPr><w:tcW w:w=\"0\" w:type=\"auto\"/></w:tcPr>");
            out.push_str(&paragraph_xml(None, cell, bold));
            out.push_str("</w:tc>");
        }
        out.push_str("</w:tr>");
    }

    out.push_str("</w:tbl>");
    out
}

fn content_types_xml(has_numbering: bool) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    out.push('\n');
    out.push_str(
        r#"  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    );
    out.push('\n');
    out.push_str(r#"  <Default Extension="xml" ContentType="application/xml"/>"#);
    out.push('\n');
    out.push_str(r#"  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#);
    out.push('\n');
    out.push_str(r#"  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#);
    out.push('\n');
    if has_numbering {
        out.push_str(r#"  <Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>"#);
        out.push('\n');
    }
    out.push_str("</Types>");
    out
}

fn rels_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#
}

fn document_rels_xml(has_numbering: bool) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    out.push('\n');
    out.push_str(r#"  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#);
    out.push('\n');
    if has_numbering {
        out.push_str(r#"  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>"#);
        out.push('\n');
    }
    out.push_str("</Relationships>");
    out
}

/// "List Number 3" -> (Number, 3); "List Bullet" -> (Bullet, 1).
fn parse_list_style(name: &str) -> Option<(ListKind, u32)> {
    for kind in [ListKind::Bullet, ListKind::Number] {
        let Some(rest) = name.strip_prefix(kind.base_style()) else {
            continue;
        };
        if rest.is_empty() {
            return Some((kind, 1));
        }
        if let Some(level) = rest.strip_prefix(' ').and_then(|n| n.parse().ok()) {
            return Some((kind, level));
        }
    }
    None
}

fn list_style_xml(name: &str, kind: ListKind, level: u32, has_numbering: bool) -> String {
    let ilvl = level.saturating_sub(1).min(MAX_LIST_LEVELS - 1);
    let num_id = match kind {
        ListKind::Bullet => NUM_ID_BULLET,
        ListKind::Number => NUM_ID_DECIMAL,
    };
    let mut out = format!(
        "  <w:style w:type=\"paragraph\" w:styleId=\"{id}\">\n    <w:name w:val=\"{name}\"/>\n    <w:basedOn w:val=\"Normal\"/>\n    <w:uiPriority w:val=\"99\"/>\n    <w:pPr>",
        id = xml_escape_text(&style_id(name)),
        name = xml_escape_text(name),
    );
    if has_numbering {
        out.push_str(&format!(
            "<w:numPr><w:ilvl w:val=\"{ilvl}\"/><w:numId w:val=\"{num_id}\"/></w:numPr>"
        ));
    }
    out.push_str(&format!(
        "<w:ind w:left=\"{}\" w:hanging=\"360\"/><w:contextualSpacing/></w:pPr>\n  </w:style>\n",
        360 * (ilvl + 1)
    ));
    out
}

fn heading_style_xml(level: u8) -> String {
    let size = match level {
        1 => 32,
        2 => 28,
        3 => 26,
        _ => 24,
    };
    format!(
        r#"  <w:style w:type="paragraph" w:styleId="Heading{level}">
    <w:name w:val="heading {level}"/>
    <w:basedOn w:val="Normal"/>
    <w:next w:val="Normal"/>
    <w:uiPriority w:val="9"/>
    <w:qFormat/>
    <w:pPr>
      <w:keepNext/>
      <w:spacing w:before="240" w:after="120"/>
      <w:outlineLvl w:val="{outline}"/>
    </w:pPr>
    <w:rPr>
      <w:b/>
      <w:sz w:val="{size}"/>
    </w:rPr>
  </w:style>
"#,
        outline = level - 1,
    )
}

fn styles_xml(names: &BTreeSet<String>, has_numbering: bool) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:qFormat/>
  </w:style>
"#,
    );

    for name in names {
        let name = name.as_str();
        if name == TITLE {
            out.push_str(
                r#"  <w:style w:type="paragraph" w:styleId="Title">
    <w:name w:val="Title"/>
    <w:basedOn w:val="Normal"/>
    <w:next w:val="Normal"/>
    <w:uiPriority w:val="10"/>
    <w:qFormat/>
    <w:pPr><w:spacing w:after="240"/><w:jc w:val="center"/></w:pPr>
    <w:rPr><w:sz w:val="56"/></w:rPr>
  </w:style>
"#,
            );
        } else if name == TABLE_GRID {
            out.push_str(
                r#"  <w:style w:type="table" w:styleId="TableGrid">
    <w:name w:val="Table Grid"/>
    <w:uiPriority w:val="59"/>
    <w:tblPr>
      <w:tblBorders>
        <w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/>
        <w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/>
        <w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/>
        <w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/>
        <w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/>
        <w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/>
      </w:tblBorders>
    </w:tblPr>
  </w:style>
"#,
            );
        } else if let Some(level) = (1..=MAX_HEADING_LEVEL).find(|l| heading_style(*l) == name) {
            out.push_str(&heading_style_xml(level));
        } else if let Some((kind, level)) = parse_list_style(name) {
            out.push_str(&list_style_xml(name, kind, level, has_numbering));
        } else {
            out.push_str(&format!(
                "  <w:style w:type=\"paragraph\" w:customStyle=\"1\" w:styleId=\"{id}\">\n    <w:name w:val=\"{name}\"/>\n    <w:basedOn w:val=\"Normal\"/>\n  </w:style>\n",
                id = xml_escape_text(&style_id(name)),
                name = xml_escape_text(name),
            ));
        }
    }

    out.push_str("</w:styles>");
    out
}

fn abstract_num_xml(id: u32, bullet: bool) -> String {
    let mut out = format!(
        "  <w:abstractNum w:abstractNumId=\"{id}\">\n    <w:multiLevelType w:val=\"hybridMultilevel\"/>\n"
    );
    for ilvl in 0..MAX_LIST_LEVELS {
        let (fmt, text) = if bullet {
            ("bullet", "•".to_string())
        } else {
            ("decimal", format!("%{}.", ilvl + 1))
        };
        out.push_str(&format!(
            "    <w:lvl w:ilvl=\"{ilvl}\"><w:start w:val=\"1\"/><w:numFmt w:val=\"{fmt}\"/><w:lvlText w:val=\"{text}\"/><w:lvlJc w:val=\"left\"/><w:pPr><w:ind w:left=\"{left}\" w:hanging=\"360\"/></w:pPr></w:lvl>\n",
            left = 360 * (ilvl + 1),
        ));
    }
    out.push_str("  </w:abstractNum>\n");
    out
}

fn numbering_xml() -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
"#,
    );
    out.push_str(&abstract_num_xml(NUM_ID_BULLET, true));
    out.push_str(&abstract_num_xml(NUM_ID_DECIMAL, false));
    out.push_str(&format!(
        "  <w:num w:numId=\"{NUM_ID_BULLET}\"><w:abstractNumId w:val=\"{NUM_ID_BULLET}\"/></w:num>\n"
    ));
    out.push_str(&format!(
        "  <w:num w:numId=\"{NUM_ID_DECIMAL}\"><w:abstractNumId w:val=\"{NUM_ID_DECIMAL}\"/></w:num>\n"
    ));
    out.push_str("</w:numbering>");
    out
}

/// Serializes blocks against the styles of one template.
pub struct DocxWriter<'a> {
    styles: &'a StyleRegistry,
    title: Option<String>,
}

impl<'a> DocxWriter<'a> {
    pub fn new(styles: &'a StyleRegistry) -> Self {
        Self {
            styles,
            title: None,
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title.filter(|t| !t.trim().is_empty());
        self
    }

    /// Template styles plus any list style a block refers to.
    fn style_names(&self, blocks: &[Block]) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = self.styles.styles().map(str::to_string).collect();
        for b in blocks {
            if let Block::StyledList { style_name, .. } = b {
                names.insert(style_name.clone());
            }
        }
        names.insert(TITLE.to_string());
        names.insert(TABLE_GRID.to_string());
        names
    }

    pub fn document_xml(&self, blocks: &[Block]) -> String {
        let mut body = String::new();
        if let Some(title) = &self.title {
            body.push_str(&paragraph_xml(Some(TITLE), title, false));
        }
        for b in blocks {
            match b {
                Block::Heading { level, text } => {
                    body.push_str(&paragraph_xml(Some(heading_style(*level).as_str()), text, false))
                }
                Block::Paragraph { text } => body.push_str(&paragraph_xml(None, text, false)),
                Block::StyledList { text, style_name } => {
                    body.push_str(&paragraph_xml(Some(style_name.as_str()), text, false))
                }
                Block::Table(t) if t.col_count == 0 => {
                    debug!(rows = t.row_count, "skipping table without columns");
                }
                Block::Table(t) => {
                    body.push_str(&table_xml(t));
                    // Word merges adjacent tables unless a paragraph separates them
                    body.push_str("<w:p/>");
                }
            }
        }

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
 xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    {body}
    <w:sectPr>
      <w:pgSz w:w="12240" w:h="15840"/>
      <w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/>
      <w:cols w:space="708"/>
      <w:docGrid w:linePitch="360"/>
    </w:sectPr>
  </w:body>
</w:document>"#,
            body = body
        )
    }

    /// Build the whole package in memory.
    pub fn to_bytes(&self, blocks: &[Block]) -> Result<Vec<u8>> {
        let has_numbering = blocks.iter().any(Block::is_list);
        let names = self.style_names(blocks);

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut add = |name: &str, content: &str| -> Result<()> {
            zip.start_file(name, opts)?;
            zip.write_all(content.as_bytes()).map_err(ZipError::Io)?;
            Ok(())
        };

        add("[Content_Types].xml", &content_types_xml(has_numbering))?;
        add("_rels/.rels", rels_xml())?;
        add("word/document.xml", &self.document_xml(blocks))?;
        add("word/styles.xml", &styles_xml(&names, has_numbering))?;
        if has_numbering {
            add("word/numbering.xml", &numbering_xml())?;
        }
        add("word/_rels/document.xml.rels", &document_rels_xml(has_numbering))?;

        let bytes = zip.finish()?.into_inner();
        info!(blocks = blocks.len(), bytes = bytes.len(), "docx package built");
        Ok(bytes)
    }

    pub fn write_to(&self, blocks: &[Block], path: &Path) -> Result<()> {
        let bytes = self.to_bytes(blocks)?;
        std::fs::write(path, bytes).map_err(|e| Error::io(path, e))
    }
}
