//! XML document format for a tree.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <directory name="" permissions="755">
//!     <directory name="docs" permissions="755">
//!         <file name="a.txt" permissions="644" encoding="base64">aGVsbG8Kd29ybGQ=</file>
//!     </directory>
//! </directory>
//! ```
//!
//! File text is Base64 encoded on write. On read it is decoded only when the
//! element carries `encoding="base64"`; any other text is taken literally.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::VfsError;
use crate::node::{Directory, File, Node, NodeKind};
use crate::path::{DEFAULT_DIR_PERMISSIONS, DEFAULT_FILE_PERMISSIONS, validate_name};

const ATTR_NAME: &str = "name";
const ATTR_PERMISSIONS: &str = "permissions";
const ATTR_ENCODING: &str = "encoding";
const ENCODING_BASE64: &str = "base64";
const INDENT_WIDTH: usize = 4;

// ── Encoding ────────────────────────────────────────────────────────────────

/// Serialize `node` and everything below it into an indented, newline
/// terminated XML document.
pub fn encode(node: &Node) -> Result<String, VfsError> {
    document(|writer| write_node(writer, node))
}

/// Serialize a directory tree without wrapping it in a `Node`.
pub fn encode_directory(dir: &Directory) -> Result<String, VfsError> {
    document(|writer| write_directory(writer, dir))
}

fn document(
    body: impl FnOnce(&mut Writer<Vec<u8>>) -> Result<(), VfsError>,
) -> Result<String, VfsError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_error)?;
    body(&mut writer)?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(write_error)?;
    xml.push('\n');
    Ok(xml)
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), VfsError> {
    match node {
        Node::Directory(dir) => write_directory(writer, dir),
        Node::File(file) => write_file(writer, file),
    }
}

fn write_directory(writer: &mut Writer<Vec<u8>>, dir: &Directory) -> Result<(), VfsError> {
    let mut start = BytesStart::new(NodeKind::Directory.as_str());
    start.push_attribute((ATTR_NAME, dir.name()));
    start.push_attribute((ATTR_PERMISSIONS, dir.permissions()));

    if dir.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }
    writer.write_event(Event::Start(start)).map_err(write_error)?;
    for child in dir.children() {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(NodeKind::Directory.as_str())))
        .map_err(write_error)
}

fn write_file(writer: &mut Writer<Vec<u8>>, file: &File) -> Result<(), VfsError> {
    let mut start = BytesStart::new(NodeKind::File.as_str());
    start.push_attribute((ATTR_NAME, file.name()));
    start.push_attribute((ATTR_PERMISSIONS, file.permissions()));
    start.push_attribute((ATTR_ENCODING, ENCODING_BASE64));

    if file.content().is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }
    let encoded = BASE64.encode(file.content().as_bytes());
    writer.write_event(Event::Start(start)).map_err(write_error)?;
    writer
        .write_event(Event::Text(BytesText::new(&encoded)))
        .map_err(write_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(NodeKind::File.as_str())))
        .map_err(write_error)
}

fn write_error(err: impl std::fmt::Display) -> VfsError {
    VfsError::Io(std::io::Error::other(err.to_string()))
}

// ── Decoding ────────────────────────────────────────────────────────────────

/// An element whose end tag has not been read yet.
struct OpenElement {
    kind: OpenKind,
    /// Depth of elements nested inside a `file`; their content is skipped.
    ignored_depth: usize,
}

enum OpenKind {
    Directory(Directory),
    File {
        name: String,
        permissions: String,
        base64: bool,
        text: String,
    },
}

impl OpenElement {
    fn open(start: &BytesStart<'_>, kind: NodeKind, is_root: bool) -> Result<Self, VfsError> {
        let mut name = None;
        let mut permissions = None;
        let mut encoding = None;
        for attr in start.attributes() {
            let attr = attr.map_err(malformed)?;
            let value = attr.unescape_value().map_err(malformed)?.into_owned();
            match attr.key.as_ref() {
                b"name" => name = Some(value),
                b"permissions" => permissions = Some(value),
                b"encoding" => encoding = Some(value),
                _ => {}
            }
        }

        let name = name.unwrap_or_default();
        if !is_root {
            if let Some(err) = validate_name(&name) {
                return Err(VfsError::MalformedDocument(format!(
                    "<{}> element has an unusable name: {}",
                    kind.as_str(),
                    err
                )));
            }
        }

        let kind = match kind {
            NodeKind::Directory => OpenKind::Directory(Directory::new(
                name,
                permissions.unwrap_or_else(|| DEFAULT_DIR_PERMISSIONS.to_string()),
            )),
            NodeKind::File => OpenKind::File {
                name,
                permissions: permissions.unwrap_or_else(|| DEFAULT_FILE_PERMISSIONS.to_string()),
                base64: encoding.as_deref() == Some(ENCODING_BASE64),
                text: String::new(),
            },
        };

        Ok(Self {
            kind,
            ignored_depth: 0,
        })
    }

    /// Tree elements nested in a `file` are not part of the tree.
    fn skips_children(&self) -> bool {
        matches!(self.kind, OpenKind::File { .. })
    }

    fn push_text(&mut self, chunk: &str) {
        if self.ignored_depth > 0 {
            return;
        }
        // Whitespace between directory children is layout only.
        if let OpenKind::File { text, .. } = &mut self.kind {
            text.push_str(chunk);
        }
    }

    fn attach(&mut self, child: Node) -> Result<(), VfsError> {
        if let OpenKind::Directory(dir) = &mut self.kind {
            dir.attach(child).map_err(malformed)?;
        }
        Ok(())
    }

    fn finish(self) -> Result<Node, VfsError> {
        match self.kind {
            OpenKind::Directory(dir) => Ok(Node::Directory(dir)),
            OpenKind::File {
                name,
                permissions,
                base64,
                text,
            } => {
                let content = if base64 {
                    decode_base64(&text, &name)?
                } else {
                    text
                };
                Ok(Node::File(File::new(name, permissions, content)))
            }
        }
    }
}

fn decode_base64(text: &str, name: &str) -> Result<String, VfsError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BASE64.decode(compact.as_bytes()).map_err(|e| {
        VfsError::MalformedDocument(format!("Invalid base64 content in {}: {}", name, e))
    })?;
    String::from_utf8(bytes).map_err(|_| {
        VfsError::MalformedDocument(format!("Content of {} is not valid UTF-8", name))
    })
}

/// Map an element's tag to the node kind it encodes.
fn element_kind(start: &BytesStart<'_>) -> Result<NodeKind, VfsError> {
    let qname = start.name();
    let tag = std::str::from_utf8(qname.as_ref()).map_err(malformed)?;
    [NodeKind::Directory, NodeKind::File]
        .into_iter()
        .find(|kind| kind.as_str() == tag)
        .ok_or_else(|| VfsError::MalformedDocument(format!("Unknown element: <{}>", tag)))
}

fn malformed(err: impl std::fmt::Display) -> VfsError {
    VfsError::MalformedDocument(err.to_string())
}

/// Parse an XML document into a tree.
pub fn decode(xml: &str) -> Result<Node, VfsError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            VfsError::MalformedDocument(format!(
                "XML error at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(start) => {
                let kind = element_kind(&start)?;
                if let Some(top) = stack.last_mut() {
                    if top.skips_children() {
                        top.ignored_depth += 1;
                        continue;
                    }
                }
                if root.is_some() {
                    return Err(malformed("Document has more than one root element"));
                }
                stack.push(OpenElement::open(&start, kind, stack.is_empty())?);
            }
            Event::Empty(start) => {
                let kind = element_kind(&start)?;
                if stack.last().is_some_and(OpenElement::skips_children) {
                    continue;
                }
                if root.is_some() {
                    return Err(malformed("Document has more than one root element"));
                }
                let node = OpenElement::open(&start, kind, stack.is_empty())?.finish()?;
                close(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                if let Some(top) = stack.last_mut() {
                    if top.ignored_depth > 0 {
                        top.ignored_depth -= 1;
                        continue;
                    }
                }
                let open = stack
                    .pop()
                    .ok_or_else(|| malformed("Unexpected closing tag"))?;
                let node = open.finish()?;
                close(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(malformed)?;
                match stack.last_mut() {
                    Some(top) => top.push_text(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(malformed("Text outside of the root element")),
                }
            }
            Event::CData(data) => {
                let text = std::str::from_utf8(&data).map_err(malformed)?;
                match stack.last_mut() {
                    Some(top) => top.push_text(text),
                    None => return Err(malformed("CDATA outside of the root element")),
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(malformed("Unexpected end of document: unclosed element"));
    }
    root.ok_or_else(|| malformed("Document has no root element"))
}

fn close(
    stack: &mut [OpenElement],
    root: &mut Option<Node>,
    node: Node,
) -> Result<(), VfsError> {
    match stack.last_mut() {
        Some(parent) => parent.attach(node),
        None => {
            *root = Some(node);
            Ok(())
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
