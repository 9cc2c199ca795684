//! XML rendering of instance documents.
//!
//! Records travel to legacy clients as XML derived mechanically from the
//! JSON instance document, with two quirks preserved for wire
//! compatibility: no XML attributes are ever emitted (every subfield is an
//! element), and a key beginning with `@` has the `@` rewritten to `__` in
//! both the open and close tags.

use std::borrow::Cow;
use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::Value;

use crate::error::GatewayError;

/// Renders one instance document as an XML string rooted at `<record>`.
///
/// Arrays repeat their element once per item; nested objects nest; `null`
/// values render as empty elements; scalars render as escaped text.
pub fn render_record(instance: &Value) -> Result<String, GatewayError> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, "record", instance)?;
    String::from_utf8(writer.into_inner()).map_err(|e| GatewayError::Render(e.to_string()))
}

fn write_element<W: Write>(
    writer: &mut Writer<W>,
    key: &str,
    value: &Value,
) -> Result<(), GatewayError> {
    if let Value::Array(items) = value {
        // One element per item, all under the same name.
        for item in items {
            write_element(writer, key, item)?;
        }
        return Ok(());
    }

    let name = element_name(key);
    writer
        .write_event(Event::Start(BytesStart::new(name.as_ref())))
        .map_err(render_error)?;
    match value {
        Value::Object(map) => {
            for (child_key, child) in map {
                write_element(writer, child_key, child)?;
            }
        }
        Value::Null => {}
        Value::String(text) => {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(render_error)?;
        }
        other => {
            let text = other.to_string();
            writer
                .write_event(Event::Text(BytesText::new(&text)))
                .map_err(render_error)?;
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(name.as_ref())))
        .map_err(render_error)?;
    Ok(())
}

/// Rewrites a leading `@` to `__`; other keys pass through.
fn element_name(key: &str) -> Cow<'_, str> {
    match key.strip_prefix('@') {
        Some(rest) => Cow::Owned(format!("__{rest}")),
        None => Cow::Borrowed(key),
    }
}

fn render_error(err: impl std::fmt::Display) -> GatewayError {
    GatewayError::Render(err.to_string())
}
