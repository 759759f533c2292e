//! Conversion options.

use oxc_span::SourceType;
use serde::{Deserialize, Serialize};

/// Script language of the block being converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptLang {
    #[default]
    Ts,
    Tsx,
    Js,
    Jsx,
}

impl ScriptLang {
    /// Resolve from a `lang` attribute value. Unknown values fall back to `ts`.
    pub fn from_attr(lang: Option<&str>) -> Self {
        match lang {
            Some("tsx") => ScriptLang::Tsx,
            Some("js") => ScriptLang::Js,
            Some("jsx") => ScriptLang::Jsx,
            _ => ScriptLang::Ts,
        }
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            ScriptLang::Ts => "ts",
            ScriptLang::Tsx => "tsx",
            ScriptLang::Js => "js",
            ScriptLang::Jsx => "jsx",
        }
    }

    pub fn source_type(self) -> SourceType {
        let source_type = match self {
            ScriptLang::Ts => SourceType::ts(),
            ScriptLang::Tsx => SourceType::tsx(),
            ScriptLang::Js => SourceType::mjs(),
            ScriptLang::Jsx => SourceType::jsx(),
        };
        source_type.with_module(true)
    }
}

/// Whether to synthesize an `import { ... } from 'vue'` line for the
/// Composition API helpers used by the emitted declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HelperImports {
    /// Options API scripts get an import line; class components do not
    /// (they are assumed to run with an auto-import plugin).
    #[default]
    Legacy,
    Always,
    Never,
}

/// Options for a single conversion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertOptions {
    /// Language used to parse the script
    pub lang: ScriptLang,

    /// Helper import synthesis
    pub imports: HelperImports,

    /// Reprint the result through oxc_codegen
    pub format: bool,

    /// Use single quotes when formatting
    pub single_quote: bool,
}

impl ConvertOptions {
    pub fn with_lang(mut self, lang: ScriptLang) -> Self {
        self.lang = lang;
        self
    }
}
