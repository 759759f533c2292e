//! Migrate command - Class component and Options API migration using vize_pentimento

use clap::{Args, ValueEnum};
use glob::{MatchOptions, Pattern};
use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use vize_pentimento::{convert_sfc, Conversion, ConvertError, ConvertOptions, HelperImports};

use crate::config::{load_config, VIZE_CONFIG_SCHEMA};

const DEFAULT_PATTERN: &str = "./**/*.vue";

#[derive(Args)]
pub struct MigrateArgs {
    /// Glob pattern(s), files or directories to match .vue files
    #[arg(default_value = DEFAULT_PATTERN)]
    pub patterns: Vec<String>,

    /// Check for unmigrated components without writing (exit with error if any)
    #[arg(long)]
    pub check: bool,

    /// Write migrated output to files
    #[arg(short, long)]
    pub write: bool,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Reprint converted scripts with the code generator
    #[arg(long)]
    pub format: bool,

    /// Use single quotes when reprinting
    #[arg(long)]
    pub single_quote: bool,

    /// When to import Composition API helpers from 'vue'
    #[arg(long, value_enum)]
    pub imports: Option<ImportsArg>,

    /// Print one JSON report per migrated file to stdout
    #[arg(long)]
    pub json: bool,

    /// Print the JSON Schema of vize.config.json and exit
    #[arg(long)]
    pub schema: bool,
}

impl Default for MigrateArgs {
    fn default() -> Self {
        Self {
            patterns: vec![DEFAULT_PATTERN.to_string()],
            check: false,
            write: false,
            config: None,
            format: false,
            single_quote: false,
            imports: None,
            json: false,
            schema: false,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ImportsArg {
    /// Only for Options API objects
    Legacy,
    Always,
    Never,
}

impl From<ImportsArg> for HelperImports {
    fn from(arg: ImportsArg) -> Self {
        match arg {
            ImportsArg::Legacy => HelperImports::Legacy,
            ImportsArg::Always => HelperImports::Always,
            ImportsArg::Never => HelperImports::Never,
        }
    }
}

/// What happened to a single file
enum Outcome {
    Migrated(Conversion),
    NothingToMigrate,
}

#[derive(Serialize)]
struct FileReport<'a> {
    path: String,
    #[serde(flatten)]
    conversion: &'a Conversion,
}

pub fn run(args: MigrateArgs) {
    if args.schema {
        println!("{}", VIZE_CONFIG_SCHEMA);
        return;
    }

    let options = build_convert_options(&args);
    tracing::debug!(?options, "resolved migrate options");

    // Collect files to migrate
    let files: Vec<PathBuf> = collect_files(&args.patterns);

    if files.is_empty() {
        eprintln!("No .vue files found matching the patterns");
        return;
    }

    eprintln!("Found {} .vue file(s)", files.len());

    let has_errors = AtomicBool::new(false);
    let files_migrated = AtomicUsize::new(0);
    let files_unchanged = AtomicUsize::new(0);
    let files_errored = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        match process_file(path, &options, args.check, args.write) {
            Ok(Outcome::Migrated(conversion)) => {
                files_migrated.fetch_add(1, Ordering::Relaxed);
                if args.check {
                    has_errors.store(true, Ordering::Relaxed);
                }
                if args.json {
                    print_report(path, &conversion);
                }
            }
            Ok(Outcome::NothingToMigrate) => {
                files_unchanged.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                eprintln!("Error migrating {}: {}", path.display(), err);
                files_errored.fetch_add(1, Ordering::Relaxed);
                has_errors.store(true, Ordering::Relaxed);
            }
        }
    });

    // Print summary
    let migrated = files_migrated.load(Ordering::Relaxed);
    let unchanged = files_unchanged.load(Ordering::Relaxed);
    let errored = files_errored.load(Ordering::Relaxed);

    eprintln!();
    if args.check {
        eprintln!("Checked {} file(s)", files.len());
        if migrated > 0 {
            eprintln!("  {} file(s) would be migrated", migrated);
        }
        if unchanged > 0 {
            eprintln!("  {} file(s) already migrated", unchanged);
        }
    } else if args.write {
        eprintln!("Migrated {} file(s)", files.len());
        if migrated > 0 {
            eprintln!("  {} file(s) rewritten", migrated);
        }
        if unchanged > 0 {
            eprintln!("  {} file(s) unchanged", unchanged);
        }
    } else {
        eprintln!(
            "Checked {} file(s) (use --write to apply changes)",
            files.len()
        );
        if migrated > 0 {
            eprintln!("  {} file(s) would be migrated", migrated);
        }
    }

    if errored > 0 {
        eprintln!("  {} file(s) had errors", errored);
    }

    if has_errors.load(Ordering::Relaxed) {
        std::process::exit(1);
    }
}

/// Config file options, overridden by flags.
fn build_convert_options(args: &MigrateArgs) -> ConvertOptions {
    let mut options = load_config(args.config.as_deref()).migrate;
    if args.format {
        options.format = true;
    }
    if args.single_quote {
        options.single_quote = true;
    }
    if let Some(imports) = args.imports {
        options.imports = imports.into();
    }
    options
}

fn collect_files(patterns: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for pattern in patterns {
        let literal = Path::new(pattern);
        if literal.is_file() {
            files.push(literal.to_path_buf());
            continue;
        }

        let (root, matcher) = if literal.is_dir() {
            (literal, None)
        } else {
            match Pattern::new(normalize(pattern)) {
                Ok(matcher) => (Path::new("."), Some(matcher)),
                Err(e) => {
                    eprintln!("Invalid pattern {}: {}", pattern, e);
                    continue;
                }
            }
        };

        // Use ignore crate to walk directories respecting .gitignore
        let walker = WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .build();

        for entry in walker.filter_map(Result::ok) {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "vue")
                && matcher
                    .as_ref()
                    .map_or(true, |matcher| matches_pattern(path, matcher))
            {
                files.push(path.to_path_buf());
            }
        }
    }

    // Remove duplicates
    files.sort();
    files.dedup();

    files
}

#[inline]
fn normalize(path: &str) -> &str {
    path.strip_prefix("./").unwrap_or(path)
}

#[inline]
fn matches_pattern(path: &Path, pattern: &Pattern) -> bool {
    let options = MatchOptions {
        require_literal_separator: true,
        ..MatchOptions::new()
    };
    let path_str = path.to_string_lossy();
    pattern.matches_with(normalize(&path_str), options)
}

fn process_file(
    path: &Path,
    options: &ConvertOptions,
    check: bool,
    write: bool,
) -> Result<Outcome, String> {
    let source = fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;

    let result = match convert_sfc(&source, options) {
        Ok(result) => result,
        Err(ConvertError::NoConvertTarget) => {
            tracing::debug!(path = %path.display(), "nothing to migrate");
            return Ok(Outcome::NothingToMigrate);
        }
        Err(ConvertError::Unparseable { lang }) => {
            tracing::warn!(path = %path.display(), lang, "script could not be parsed");
            return Err(format!("Unparseable <script> ({})", lang));
        }
        Err(e) => return Err(e.to_string()),
    };

    for name in &result.conversion.skipped {
        eprintln!("  {}: skipped `{}`", path.display(), name);
    }
    for diagnostic in &result.conversion.diagnostics {
        tracing::warn!(path = %path.display(), ?diagnostic, "migration diagnostic");
    }

    if check || !write {
        eprintln!("Would migrate: {}", path.display());
    } else {
        fs::write(path, &result.code).map_err(|e| format!("Failed to write file: {}", e))?;
        eprintln!("Migrated: {}", path.display());
    }

    Ok(Outcome::Migrated(result.conversion))
}

fn print_report(path: &Path, conversion: &Conversion) {
    let report = FileReport {
        path: path.display().to_string(),
        conversion,
    };
    match serde_json::to_string(&report) {
        Ok(line) => println!("{}", line),
        Err(e) => eprintln!("Failed to serialize report for {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(path: &str, pattern: &str) -> bool {
        let pattern = Pattern::new(normalize(pattern)).unwrap();
        matches_pattern(Path::new(path), &pattern)
    }

    #[test]
    fn test_default_pattern_matches_nested() {
        assert!(matches("./App.vue", DEFAULT_PATTERN));
        assert!(matches("./src/components/Counter.vue", DEFAULT_PATTERN));
    }

    #[test]
    fn test_directory_pattern() {
        assert!(matches("./src/components/Counter.vue", "src/**/*.vue"));
        assert!(matches("./src/Counter.vue", "./src/*.vue"));
        assert!(!matches("./src/components/Counter.vue", "./src/*.vue"));
        assert!(!matches("./lib/Counter.vue", "src/**/*.vue"));
    }

    #[test]
    fn test_flags_override_config() {
        let args = MigrateArgs {
            config: Some(PathBuf::from("/nonexistent/vize")),
            format: true,
            imports: Some(ImportsArg::Never),
            ..MigrateArgs::default()
        };
        let options = build_convert_options(&args);
        assert!(options.format);
        assert!(!options.single_quote);
        assert_eq!(options.imports, HelperImports::Never);
    }

    #[test]
    fn test_process_file() {
        let dir = std::env::temp_dir().join(format!("vize-migrate-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let legacy = dir.join("Legacy.vue");
        let migrated = dir.join("Migrated.vue");
        fs::write(
            &legacy,
            "<script>\nexport default { data() { return { a: 1 } } }\n</script>\n",
        )
        .unwrap();
        fs::write(&migrated, "<script setup>\nconst a = 1\n</script>\n").unwrap();
        let broken = dir.join("Broken.vue");
        fs::write(
            &broken,
            "<script>\nconst = ;\nexport default { data() { return { a: 1 } } }\n</script>\n",
        )
        .unwrap();

        let options = ConvertOptions::default();
        assert!(matches!(
            process_file(&migrated, &options, false, true),
            Ok(Outcome::NothingToMigrate)
        ));
        let err = process_file(&broken, &options, false, true).err().unwrap();
        assert!(err.starts_with("Unparseable <script>"), "{err}");
        assert!(fs::read_to_string(&broken).unwrap().starts_with("<script>\nconst = ;"));
        assert!(matches!(
            process_file(&legacy, &options, false, true),
            Ok(Outcome::Migrated(_))
        ));
        let written = fs::read_to_string(&legacy).unwrap();
        assert!(written.starts_with("<script setup>\nimport { ref } from 'vue';"));
        assert!(written.contains("const a = ref(1);"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
