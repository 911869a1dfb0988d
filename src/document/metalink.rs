//! Metalink v4 (RFC 5854) document.
//!
//! Rendered with two-space indentation. Elements holding only text stay on
//! one line, so hashes and URLs carry no surrounding whitespace.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::{Names, mirror_url};
use crate::error::Result;
use crate::hash::FILE_HASH_NAME;
use crate::ingest::Ingested;
use crate::scan::Source;

/// Metalink XML namespace.
pub const METALINK_NS: &str = "urn:ietf:params:xml:ns:metalink";

const METALINK_VERSION: &str = "4.0";
const TORRENT_MEDIA_TYPE: &str = "application/x-bittorrent";
const PGP_MEDIA_TYPE: &str = "application/pgp-signature";

/// The `<metalink>` root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metalink {
    /// Links to alternative descriptors, i.e. the torrent.
    pub metaurls: Vec<MetaUrl>,
    /// One element per file.
    pub files: Vec<MetalinkFile>,
    /// Detached signature over the unsigned document.
    pub signature: Option<Signature>,
}

/// A `<metaurl>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaUrl {
    /// Preference, 1 is highest.
    pub priority: u32,
    /// Media type of the linked descriptor.
    pub media_type: String,
    /// The link itself.
    pub value: String,
}

/// A `<file>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetalinkFile {
    /// Path of the file as downloaded.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Whole-file hash.
    pub hash: TypedValue,
    /// Per-file piece hashes.
    pub pieces: Pieces,
    /// Mirrors in priority order.
    pub urls: Vec<Url>,
}

/// An element with a `type` attribute and text content, e.g. `<hash>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedValue {
    /// Hash algorithm name.
    pub kind: String,
    /// Lowercase hex digest.
    pub value: String,
}

/// The `<pieces>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pieces {
    /// Hash algorithm name.
    pub kind: String,
    /// Piece length in bytes.
    pub length: u64,
    /// One hash per piece.
    pub hashes: Vec<TypedValue>,
}

/// A `<url>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    /// Preference, 1 is highest.
    pub priority: u32,
    /// The mirror URL.
    pub value: String,
}

/// The `<signature>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Signature media type.
    pub media_type: String,
    /// Armored signature text.
    pub value: String,
}

impl Metalink {
    /// Builds the document for an ingested source.
    pub fn build(source: &Source, ingested: &Ingested, mirrors: &[String]) -> Self {
        let names = Names::for_source(source);
        let piece_length = ingested.piece_length.get();

        let files = ingested
            .files
            .iter()
            .map(|file| {
                let name = if source.is_dir() {
                    format!("{}/{}", names.base, file.path)
                } else {
                    file.path.clone()
                };

                let urls = mirrors
                    .iter()
                    .zip(1..)
                    .map(|(mirror, priority)| Url {
                        priority,
                        value: mirror_url(mirror, &name, &file.path, source.is_dir()),
                    })
                    .collect();

                MetalinkFile {
                    size: file.size,
                    hash: TypedValue::hash(file.digest.to_hex()),
                    pieces: Pieces {
                        kind: FILE_HASH_NAME.to_string(),
                        length: piece_length,
                        hashes: file.pieces.to_hex().into_iter().map(TypedValue::hash).collect(),
                    },
                    urls,
                    name,
                }
            })
            .collect();

        Self {
            metaurls: vec![MetaUrl {
                priority: 1,
                media_type: TORRENT_MEDIA_TYPE.to_string(),
                value: names.torrent,
            }],
            files,
            signature: None,
        }
    }

    /// Embeds an armored PGP signature.
    pub fn set_signature(&mut self, armored: impl Into<String>) {
        self.signature = Some(Signature {
            media_type: PGP_MEDIA_TYPE.to_string(),
            value: armored.into(),
        });
    }

    /// Renders the document as indented XML with a declaration.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(
            BytesStart::new("metalink")
                .with_attributes([("xmlns", METALINK_NS), ("version", METALINK_VERSION)]),
        ))?;

        for metaurl in &self.metaurls {
            let priority = metaurl.priority.to_string();
            text_element(
                &mut writer,
                "metaurl",
                &[("priority", priority.as_str()), ("mediatype", metaurl.media_type.as_str())],
                &metaurl.value,
            )?;
        }

        for file in &self.files {
            write_file(&mut writer, file)?;
        }

        if let Some(signature) = &self.signature {
            text_element(
                &mut writer,
                "signature",
                &[("mediatype", signature.media_type.as_str())],
                &signature.value,
            )?;
        }

        writer.write_event(Event::End(BytesEnd::new("metalink")))?;

        let mut out = String::from_utf8(writer.into_inner())
            .map_err(|e| quick_xml::Error::NonDecodable(Some(e.utf8_error())))?;
        out.push('\n');
        Ok(out)
    }
}

impl TypedValue {
    fn hash(value: String) -> Self {
        Self {
            kind: FILE_HASH_NAME.to_string(),
            value,
        }
    }
}

fn write_file<W: Write>(writer: &mut Writer<W>, file: &MetalinkFile) -> Result<()> {
    writer.write_event(Event::Start(
        BytesStart::new("file").with_attributes([("name", file.name.as_str())]),
    ))?;

    text_element(writer, "size", &[], &file.size.to_string())?;
    text_element(writer, "hash", &[("type", file.hash.kind.as_str())], &file.hash.value)?;

    let length = file.pieces.length.to_string();
    let pieces = BytesStart::new("pieces")
        .with_attributes([("type", file.pieces.kind.as_str()), ("length", length.as_str())]);
    if file.pieces.hashes.is_empty() {
        writer.write_event(Event::Empty(pieces))?;
    } else {
        writer.write_event(Event::Start(pieces))?;
        for hash in &file.pieces.hashes {
            text_element(writer, "hash", &[("type", hash.kind.as_str())], &hash.value)?;
        }
        writer.write_event(Event::End(BytesEnd::new("pieces")))?;
    }

    for url in &file.urls {
        let priority = url.priority.to_string();
        text_element(writer, "url", &[("priority", priority.as_str())], &url.value)?;
    }

    writer.write_event(Event::End(BytesEnd::new("file")))?;
    Ok(())
}

/// Writes `<name attrs>text</name>` on one line.
fn text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
    text: &str,
) -> Result<()> {
    writer.write_event(Event::Start(
        BytesStart::new(name).with_attributes(attributes.iter().copied()),
    ))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
