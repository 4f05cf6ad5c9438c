//! XML rendering of a [`Descriptor`].
//!
//! The layout is fixed: `base`, then `provider`, `properties`,
//! `dynamicProperties` and `files`, each section omitted when empty. Entries
//! and properties keep the order they have in the descriptor, so the same
//! descriptor always renders to the same bytes.

use crate::model::{Descriptor, FileEntry, Property};
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::Write;
use upmanifest_common::{Error, Result};

const INDENT: usize = 4;

/// Render the descriptor to UTF-8 XML bytes, terminated by a newline.
pub fn to_xml_bytes(descriptor: &Descriptor) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    emit(&mut writer, Event::Start(BytesStart::new("configuration")))?;

    let mut base = BytesStart::new("base");
    base.push_attribute(("uri", descriptor.base_uri()));
    base.push_attribute(("path", descriptor.base_path()));
    emit(&mut writer, Event::Empty(base))?;

    if descriptor.update_handler().is_some() || descriptor.launcher().is_some() {
        let mut provider = BytesStart::new("provider");
        if let Some(handler) = descriptor.update_handler() {
            provider.push_attribute(("updateHandler", handler));
        }
        if let Some(launcher) = descriptor.launcher() {
            provider.push_attribute(("launcher", launcher));
        }
        emit(&mut writer, Event::Empty(provider))?;
    }

    write_properties(&mut writer, "properties", descriptor.properties())?;
    write_properties(
        &mut writer,
        "dynamicProperties",
        descriptor.dynamic_properties(),
    )?;

    if !descriptor.files().is_empty() {
        emit(&mut writer, Event::Start(BytesStart::new("files")))?;
        for entry in descriptor.files() {
            emit(&mut writer, Event::Empty(file_element(entry)))?;
        }
        emit(&mut writer, Event::End(BytesEnd::new("files")))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("configuration")))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

/// Render the descriptor to an XML string.
pub fn to_xml_string(descriptor: &Descriptor) -> Result<String> {
    let bytes = to_xml_bytes(descriptor)?;
    String::from_utf8(bytes).map_err(|e| Error::Xml(e.to_string()))
}

/// Render the descriptor into `out` and flush it.
pub fn write_descriptor<W: Write>(descriptor: &Descriptor, mut out: W) -> Result<()> {
    let bytes = to_xml_bytes(descriptor)?;
    out.write_all(&bytes)?;
    out.flush()?;
    Ok(())
}

fn write_properties(
    writer: &mut Writer<Vec<u8>>,
    section: &str,
    properties: &[Property],
) -> Result<()> {
    if properties.is_empty() {
        return Ok(());
    }

    emit(writer, Event::Start(BytesStart::new(section)))?;
    for property in properties {
        let mut element = BytesStart::new("property");
        element.push_attribute(attribute("key", &property.key));
        element.push_attribute(attribute("value", &property.value));
        emit(writer, Event::Empty(element))?;
    }
    emit(writer, Event::End(BytesEnd::new(section)))
}

// Boolean attributes default to false when absent, so only `true` is written.
fn file_element(entry: &FileEntry) -> BytesStart<'static> {
    let mut element = BytesStart::new("file");
    element.push_attribute(("path", entry.path.as_str()));
    let size = entry.metadata.size.to_string();
    element.push_attribute(("size", size.as_str()));
    element.push_attribute(("checksum", entry.metadata.checksum.as_str()));
    if let Some(os) = entry.os {
        element.push_attribute(("os", os.short_name()));
    }
    if entry.classpath {
        element.push_attribute(("classpath", "true"));
    }
    if entry.modulepath {
        element.push_attribute(("modulepath", "true"));
    }
    if entry.ignore_boot_conflict {
        element.push_attribute(("ignoreBootConflict", "true"));
    }
    if let Some(comment) = &entry.comment {
        element.push_attribute(attribute("comment", comment));
    }
    element
}

// Readers normalize raw tabs and line breaks inside attribute values to
// spaces, so they are written as character references.
fn attribute<'a>(key: &'a str, value: &str) -> Attribute<'a> {
    let mut escaped = String::with_capacity(value.len());
    for c in escape(value).chars() {
        match c {
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            _ => escaped.push(c),
        }
    }
    Attribute {
        key: QName(key.as_bytes()),
        value: Cow::Owned(escaped.into_bytes()),
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Xml(e.to_string()))
}
