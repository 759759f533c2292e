//! Single File Component host.
//!
//! Locates the `<script>` block of a `.vue` document by byte offsets and
//! splices the converted script back as `<script setup>`. Everything outside
//! the script element is kept byte for byte.

use std::ops::Range;

use memchr::{memchr, memmem};

use crate::driver::{convert_script, Conversion};
use crate::error::ConvertError;
use crate::options::{ConvertOptions, ScriptLang};

const TAG_TEMPLATE: &[u8] = b"template";
const TAG_SCRIPT: &[u8] = b"script";
const CLOSING_TEMPLATE: &[u8] = b"</template>";

/// A top-level `<script>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBlock {
    /// Whole element, from `<script` to `</script>`
    pub element: Range<usize>,
    /// Text between the tags
    pub content: Range<usize>,
    /// Raw attribute text of the opening tag, including leading whitespace
    pub attrs: String,
    pub lang: Option<String>,
    pub setup: bool,
}

/// A converted document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfcConversion {
    pub code: String,
    pub conversion: Conversion,
}

/// First top-level `<script>` element without `setup`.
pub fn locate_script(source: &str) -> Option<ScriptBlock> {
    scripts(source).into_iter().find(|script| !script.setup)
}

/// Convert the `<script>` block of a `.vue` document in place.
pub fn convert_sfc(source: &str, options: &ConvertOptions) -> Result<SfcConversion, ConvertError> {
    let block = locate_script(source).ok_or(ConvertError::NoConvertTarget)?;
    let options = match block.lang.as_deref() {
        Some(lang) => options.clone().with_lang(ScriptLang::from_attr(Some(lang))),
        None => options.clone(),
    };
    let conversion = convert_script(&source[block.content.clone()], &options)?;

    let mut code = String::with_capacity(source.len() + conversion.code.len());
    code.push_str(&source[..block.element.start]);
    code.push_str("<script setup");
    code.push_str(&block.attrs);
    code.push_str(">\n");
    code.push_str(&conversion.code);
    code.push_str("</script>");
    code.push_str(&source[block.element.end..]);

    Ok(SfcConversion { code, conversion })
}

/// Every top-level `<script>` element, in document order.
fn scripts(source: &str) -> Vec<ScriptBlock> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut scripts = Vec::new();
    let mut pos = 0;

    while let Some(offset) = memchr(b'<', &bytes[pos..]) {
        pos += offset;

        if bytes[pos..].starts_with(b"<!--") {
            match memmem::find(&bytes[pos..], b"-->") {
                Some(end) => {
                    pos += end + 3;
                    continue;
                }
                None => break,
            }
        }

        let name_start = pos + 1;
        let mut name_end = name_start;
        while name_end < len && is_tag_name_char(bytes[name_end]) {
            name_end += 1;
        }
        if name_end == name_start {
            pos += 1;
            continue;
        }
        let tag_name = &bytes[name_start..name_end];

        let Some(open_end) = find_tag_end(bytes, name_end) else {
            break;
        };
        let self_closing = open_end > name_end && bytes[open_end - 1] == b'/';
        if self_closing {
            pos = open_end + 1;
            continue;
        }
        let content_start = open_end + 1;

        let close = if tag_name.eq_ignore_ascii_case(TAG_TEMPLATE) {
            find_template_close(bytes, content_start)
        } else {
            find_close(bytes, tag_name, content_start)
        };
        let Some((content_end, element_end)) = close else {
            break;
        };

        if tag_name.eq_ignore_ascii_case(TAG_SCRIPT) {
            let attrs = &source[name_end..open_end];
            scripts.push(ScriptBlock {
                element: pos..element_end,
                content: content_start..content_end,
                attrs: attrs.to_string(),
                lang: attribute(attrs, "lang").map(str::to_string),
                setup: attribute(attrs, "setup").is_some(),
            });
        }
        pos = element_end;
    }

    scripts
}

/// Position of the `>` closing an opening tag, skipping quoted values.
fn find_tag_end(bytes: &[u8], mut pos: usize) -> Option<usize> {
    while pos < bytes.len() {
        match bytes[pos] {
            b'>' => return Some(pos),
            quote @ (b'"' | b'\'') => {
                pos += 1;
                pos += memchr(quote, &bytes[pos..])?;
            }
            _ => {}
        }
        pos += 1;
    }
    None
}

/// `(content end, element end)` of a raw-text block.
fn find_close(bytes: &[u8], tag_name: &[u8], from: usize) -> Option<(usize, usize)> {
    let mut pos = from;
    while let Some(offset) = memmem::find(&bytes[pos..], b"</") {
        pos += offset;
        let name_start = pos + 2;
        let name_end = name_start + tag_name.len();
        if name_end <= bytes.len() && bytes[name_start..name_end].eq_ignore_ascii_case(tag_name) {
            if let Some(gt) = memchr(b'>', &bytes[name_end..]) {
                if bytes[name_end..name_end + gt].iter().all(u8::is_ascii_whitespace) {
                    return Some((pos, name_end + gt + 1));
                }
            }
        }
        pos += 2;
    }
    None
}

/// `(content end, element end)` of a `<template>` block, counting nested
/// templates.
fn find_template_close(bytes: &[u8], from: usize) -> Option<(usize, usize)> {
    let mut depth = 1usize;
    let mut pos = from;
    while let Some(offset) = memchr(b'<', &bytes[pos..]) {
        pos += offset;
        let rest = &bytes[pos..];
        if starts_with_ignore_case(rest, CLOSING_TEMPLATE) {
            depth -= 1;
            if depth == 0 {
                return Some((pos, pos + CLOSING_TEMPLATE.len()));
            }
            pos += CLOSING_TEMPLATE.len();
            continue;
        }
        if starts_with_ignore_case(&rest[1..], TAG_TEMPLATE)
            && rest
                .get(1 + TAG_TEMPLATE.len())
                .is_some_and(|&b| b == b'>' || b.is_ascii_whitespace())
        {
            let end = find_tag_end(bytes, pos + 1 + TAG_TEMPLATE.len())?;
            if bytes[end - 1] != b'/' {
                depth += 1;
            }
            pos = end + 1;
            continue;
        }
        pos += 1;
    }
    None
}

/// Value of attribute `name` in raw attribute text. Boolean attributes yield
/// an empty string.
fn attribute<'s>(attrs: &'s str, name: &str) -> Option<&'s str> {
    let bytes = attrs.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() {
        while pos < bytes.len() && (bytes[pos].is_ascii_whitespace() || bytes[pos] == b'/') {
            pos += 1;
        }
        let key_start = pos;
        while pos < bytes.len() && !matches!(bytes[pos], b'=' | b'/') && !bytes[pos].is_ascii_whitespace()
        {
            pos += 1;
        }
        let key = &attrs[key_start..pos];
        if key.is_empty() {
            break;
        }

        let mut value = "";
        if pos < bytes.len() && bytes[pos] == b'=' {
            pos += 1;
            match bytes.get(pos) {
                Some(&quote @ (b'"' | b'\'')) => {
                    let value_start = pos + 1;
                    let value_end = memchr(quote, &bytes[value_start..])
                        .map_or(bytes.len(), |offset| value_start + offset);
                    value = &attrs[value_start..value_end];
                    pos = value_end + 1;
                }
                _ => {
                    let value_start = pos;
                    while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() {
                        pos += 1;
                    }
                    value = &attrs[value_start..pos];
                }
            }
        }

        if key.eq_ignore_ascii_case(name) {
            return Some(value);
        }
    }
    None
}

#[inline]
fn starts_with_ignore_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack[..needle.len()].eq_ignore_ascii_case(needle)
}

#[inline]
fn is_tag_name_char(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_')
}
