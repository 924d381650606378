//! Identifier derivation for generated source.
//!
//! The generated static is named in `UPPER_SNAKE_CASE` after the source
//! directory; the independent shape prefixes its types with the same name in
//! `PascalCase`.
//!
//! # Examples
//!
//! ```
//! use embedfs_codegen::naming;
//!
//! assert_eq!(naming::to_upper_snake_case("web-assets"), "WEB_ASSETS");
//! assert_eq!(naming::to_pascal_case("WEB_ASSETS"), "WebAssets");
//! ```

use crate::error::{CodegenError, Result};
use std::path::Path;

/// Name used when nothing usable can be derived from the source path.
pub const FALLBACK_NAME: &str = "ASSETS";

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try",
];

/// Splits a name into lowercase words at separators and camelCase boundaries.
fn words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in name.chars() {
        if !ch.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_ascii_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        current.push(ch.to_ascii_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Converts any name to `UPPER_SNAKE_CASE`.
///
/// Characters outside `[A-Za-z0-9]` act as separators. A leading digit gets
/// an underscore prefix so the result stays a valid identifier.
///
/// # Examples
///
/// ```
/// use embedfs_codegen::naming::to_upper_snake_case;
///
/// assert_eq!(to_upper_snake_case("staticFiles"), "STATIC_FILES");
/// assert_eq!(to_upper_snake_case("my assets.v2"), "MY_ASSETS_V2");
/// assert_eq!(to_upper_snake_case("2024"), "_2024");
/// ```
#[must_use]
pub fn to_upper_snake_case(name: &str) -> String {
    let joined = words(name).join("_").to_ascii_uppercase();
    if joined.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{joined}")
    } else {
        joined
    }
}

/// Converts any name to `PascalCase`.
///
/// # Examples
///
/// ```
/// use embedfs_codegen::naming::to_pascal_case;
///
/// assert_eq!(to_pascal_case("static_files"), "StaticFiles");
/// assert_eq!(to_pascal_case("web-assets"), "WebAssets");
/// assert_eq!(to_pascal_case("hello"), "Hello");
/// ```
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    let mut result = String::new();
    for word in words(name) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.push(first.to_ascii_uppercase());
            result.push_str(chars.as_str());
        }
    }
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, 'N');
    }
    result
}

/// Derives the static name from a source path.
///
/// Uses the directory name, or the file stem for a single file, falling
/// back to [`FALLBACK_NAME`].
///
/// # Examples
///
/// ```
/// use embedfs_codegen::naming::var_name_for;
/// use std::path::Path;
///
/// assert_eq!(var_name_for(Path::new("web/public")), "PUBLIC");
/// assert_eq!(var_name_for(Path::new("logo.svg")), "LOGO");
/// assert_eq!(var_name_for(Path::new("/")), "ASSETS");
/// ```
#[must_use]
pub fn var_name_for(source: &Path) -> String {
    let base = if source.extension().is_some() {
        source.file_stem()
    } else {
        source.file_name()
    };
    base.map(|name| to_upper_snake_case(&name.to_string_lossy()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

/// Checks that `name` can be used as a Rust identifier.
///
/// # Errors
///
/// Returns [`CodegenError::InvalidName`] if the name is empty, contains
/// characters other than ASCII letters, digits and `_`, starts with a digit,
/// or is a keyword.
pub fn validate_identifier(name: &str) -> Result<()> {
    let invalid = |reason: &str| CodegenError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() || name == "_" {
        return Err(invalid("identifier cannot be empty"));
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid("identifier cannot start with a digit"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("only ASCII letters, digits and '_' are allowed"));
    }
    if KEYWORDS.contains(&name) {
        return Err(invalid("identifier is a reserved keyword"));
    }
    Ok(())
}
