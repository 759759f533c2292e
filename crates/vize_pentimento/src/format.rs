//! Optional reprint of converted scripts through oxc_codegen.

use memchr::memchr;
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_parser::Parser;

use crate::error::FormatError;
use crate::options::ScriptLang;

/// Spaces per indentation level in formatted output
const INDENT_WIDTH: usize = 2;

/// Parse and reprint `source`.
pub fn format_script(
    source: &str,
    lang: ScriptLang,
    single_quote: bool,
) -> Result<String, FormatError> {
    if source.trim().is_empty() {
        return Ok(String::new());
    }

    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, lang.source_type()).parse();
    if parsed.panicked {
        return Err(FormatError::ParserPanicked);
    }
    if !parsed.errors.is_empty() {
        let messages: Vec<String> = parsed.errors.iter().map(|e| e.to_string()).collect();
        return Err(FormatError::ScriptParseError(messages.join("; ")));
    }

    let options = CodegenOptions {
        single_quote,
        ..Default::default()
    };
    let code = Codegen::new().with_options(options).build(&parsed.program).code;
    Ok(expand_indentation(&code))
}

/// Replace leading tabs with spaces and end with a single newline.
fn expand_indentation(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut result = Vec::with_capacity(bytes.len() + bytes.len() / 4);
    let mut pos = 0;

    while pos < bytes.len() {
        let mut depth = 0;
        while pos < bytes.len() && bytes[pos] == b'\t' {
            depth += 1;
            pos += 1;
        }
        let line_end = memchr(b'\n', &bytes[pos..]).map_or(bytes.len(), |offset| pos + offset);

        result.extend(std::iter::repeat_n(b' ', depth * INDENT_WIDTH));
        result.extend_from_slice(bytes[pos..line_end].trim_ascii_end());
        result.push(b'\n');
        pos = line_end + 1;
    }

    while result.ends_with(b"\n\n") {
        result.pop();
    }
    // Only ASCII whitespace was inserted or removed
    String::from_utf8(result).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}
