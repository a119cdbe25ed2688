use std::borrow::Cow;

use crate::placemark::TextContent;

const CDATA_START: &str = "<![CDATA[";
const CDATA_END: &str = "]]>";

/// Escapes characters that cannot appear in XML character data.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }

    Cow::Owned(escaped)
}

/// Wraps text into a CDATA section. A `]]>` sequence inside the text is split between two sections.
pub fn cdata(text: &str) -> String {
    let inner = text.replace(CDATA_END, "]]]]><![CDATA[>");
    format!("{CDATA_START}{inner}{CDATA_END}")
}

/// Text content as it must appear in the document.
pub fn content(text: &TextContent) -> Cow<'_, str> {
    match text {
        TextContent::Plain(v) => escape(v),
        TextContent::Markup(v) => Cow::Owned(cdata(v)),
    }
}
