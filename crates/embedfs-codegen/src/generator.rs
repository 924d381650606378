//! Pack generator.
//!
//! Turns a validated [`VirtualFs`] into one of the four output shapes:
//!
//! - dependent source: a `LazyLock<VirtualFs>` built from `embedfs_vfs::Node`
//! - independent source: a self-contained module with its own node type
//! - nested JSON: the serialized node tree
//! - flat JSON: the directory-to-children view
//!
//! Source shapes embed the tree as a constructor expression. Payloads are
//! written as raw string literals with their line wrapping intact, so the
//! generated file stays readable in a diff.
//!
//! # Examples
//!
//! ```
//! use embedfs_codegen::{GenerateOptions, SourceGenerator};
//! use embedfs_vfs::VfsBuilder;
//!
//! let vfs = VfsBuilder::new().add_file("/index.html", "<h1>hi</h1>").build()?;
//!
//! let generator = SourceGenerator::new()?;
//! let pack = generator.generate(&vfs, &GenerateOptions::new("SITE"))?;
//!
//! assert!(pack.content.contains("pub static SITE: LazyLock<VirtualFs>"));
//! assert!(pack.content.contains("Node::file(\"index.html\", 11,"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::Result;
use crate::naming;
use crate::template_engine::{DEPENDENT_TEMPLATE, INDEPENDENT_TEMPLATE, TemplateEngine};
use crate::types::{GenerateOptions, GeneratedPack, SourceContext};
use embedfs_core::OutputShape;
use embedfs_vfs::{FlatTree, Node, VirtualFs};
use std::fmt::Write as _;

const INDENT: &str = "    ";

/// Generator for embeddable packs.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`, allowing safe use across threads.
#[derive(Debug)]
pub struct SourceGenerator<'a> {
    engine: TemplateEngine<'a>,
}

impl SourceGenerator<'_> {
    /// Creates a generator with the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns an error if template registration fails.
    pub fn new() -> Result<Self> {
        let engine = TemplateEngine::new()?;
        Ok(Self { engine })
    }

    /// Renders the tree of `fs` in the shape selected by `options`.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::InvalidName`](crate::CodegenError::InvalidName)
    /// for an unusable static name, and template or serialization errors
    /// from rendering.
    pub fn generate(&self, fs: &VirtualFs, options: &GenerateOptions) -> Result<GeneratedPack> {
        tracing::info!(
            "Generating {} pack with {} files",
            options.shape,
            fs.file_count()
        );

        let content = match options.shape {
            OutputShape::Dependent => self.render_source(fs, options, DEPENDENT_TEMPLATE, "Node")?,
            OutputShape::Independent => {
                let prefix = naming::to_pascal_case(&options.var_name);
                let ctor = format!("{prefix}Node");
                self.render_source(fs, options, INDEPENDENT_TEMPLATE, &ctor)?
            }
            OutputShape::Json => serde_json::to_string_pretty(fs.root())?,
            OutputShape::FlatJson => serde_json::to_string_pretty(&FlatTree::from_node(fs.root()))?,
        };

        tracing::debug!("Rendered {} bytes of {}", content.len(), options.shape);
        Ok(GeneratedPack::new(options, content))
    }

    fn render_source(
        &self,
        fs: &VirtualFs,
        options: &GenerateOptions,
        template: &str,
        ctor: &str,
    ) -> Result<String> {
        naming::validate_identifier(&options.var_name)?;

        let mut tree = String::new();
        render_node(fs.root(), ctor, 2, &mut tree);

        let context = SourceContext {
            version: env!("CARGO_PKG_VERSION").to_string(),
            doc_lines: doc_lines(options.module_doc.as_deref()),
            var_name: options.var_name.clone(),
            type_prefix: naming::to_pascal_case(&options.var_name),
            file_count: fs.file_count(),
            dir_count: dir_count(fs.root()),
            tree,
        };
        self.engine.render(template, &context)
    }
}

fn doc_lines(module_doc: Option<&str>) -> Vec<String> {
    module_doc
        .map(|doc| doc.lines().map(|line| line.trim_end().to_string()).collect())
        .unwrap_or_default()
}

fn dir_count(node: &Node) -> usize {
    node.as_dir().map_or(0, |dir| {
        1 + dir.children().iter().map(dir_count).sum::<usize>()
    })
}

/// Appends the constructor expression for `node` at the given indent level.
fn render_node(node: &Node, ctor: &str, depth: usize, out: &mut String) {
    let pad = INDENT.repeat(depth);
    match node {
        Node::Dir(dir) if dir.is_empty() => {
            let _ = write!(out, "{pad}{ctor}::dir({:?}, {}, vec![])", dir.name(), dir.mod_time());
        }
        Node::Dir(dir) => {
            let _ = writeln!(out, "{pad}{ctor}::dir({:?}, {}, vec![", dir.name(), dir.mod_time());
            for child in dir.children() {
                render_node(child, ctor, depth + 1, out);
                out.push_str(",\n");
            }
            let _ = write!(out, "{pad}])");
        }
        Node::File(file) => {
            let _ = write!(
                out,
                "{pad}{ctor}::file({:?}, {}, {}, {})",
                file.name(),
                file.size(),
                file.mod_time(),
                payload_literal(file.payload())
            );
        }
    }
}

/// Quotes a payload as a Rust string literal.
///
/// Well-formed payloads only hold base64 characters and line breaks, so a
/// raw string keeps their wrapping. Anything else falls back to an escaped
/// literal.
fn payload_literal(payload: &str) -> String {
    let raw_safe = payload
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=' | '\n'));
    if raw_safe && !payload.is_empty() {
        format!("r\"{payload}\"")
    } else {
        format!("{payload:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedfs_vfs::VfsBuilder;

    fn sample() -> VirtualFs {
        VfsBuilder::new()
            .mod_time(1_700_000_000)
            .add_file("/index.html", "<h1>hi</h1>")
            .add_file("/css/site.css", "body {}")
            .add_file("/empty.txt", "")
            .add_dir("/hollow")
            .build()
            .unwrap()
    }

    #[test]
    fn test_payload_literal_raw_for_base64() {
        assert_eq!(payload_literal("QUJD\nREVG\n"), "r\"QUJD\nREVG\n\"");
    }

    #[test]
    fn test_payload_literal_escapes_other_text() {
        assert_eq!(payload_literal(""), "\"\"");
        assert_eq!(payload_literal("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_doc_lines_split() {
        assert!(doc_lines(None).is_empty());
        assert_eq!(doc_lines(Some("One.  \nTwo.")), vec!["One.", "Two."]);
    }

    #[test]
    fn test_dir_count_includes_root() {
        assert_eq!(dir_count(sample().root()), 3);
    }

    #[test]
    fn test_render_node_nests_children() {
        let fs = sample();
        let mut out = String::new();
        render_node(fs.root(), "Node", 0, &mut out);

        assert!(out.starts_with("Node::dir(\"\", 1700000000, vec![\n"));
        assert!(out.contains("    Node::dir(\"css\", 1700000000, vec![\n"));
        assert!(out.contains("    Node::dir(\"hollow\", 1700000000, vec![])"));
        assert!(out.contains("Node::file(\"empty.txt\", 0, 1700000000, \"\")"));
        assert!(out.ends_with("])"));
    }

    #[test]
    fn test_generate_dependent() {
        let generator = SourceGenerator::new().unwrap();
        let options = GenerateOptions::new("SITE").with_module_doc("Site assets.");
        let pack = generator.generate(&sample(), &options).unwrap();

        assert_eq!(pack.shape, OutputShape::Dependent);
        assert!(pack.content.starts_with("//! Site assets.\n"));
        assert!(pack.content.contains("3 files in 3 directories"));
        assert!(pack.content.contains("use embedfs_vfs::{Node, VirtualFs};"));
        assert!(pack.content.contains("pub static SITE: LazyLock<VirtualFs>"));
    }

    #[test]
    fn test_generate_independent_uses_prefixed_types() {
        let generator = SourceGenerator::new().unwrap();
        let options = GenerateOptions::new("WEB_ASSETS").with_shape(OutputShape::Independent);
        let pack = generator.generate(&sample(), &options).unwrap();

        assert!(pack.content.contains("pub enum WebAssetsNode"));
        assert!(pack.content.contains("WebAssetsNode::dir(\"\", 1700000000, vec!["));
        assert!(pack.content.contains("pub static WEB_ASSETS: LazyLock<WebAssetsNode>"));
        assert!(!pack.content.contains("embedfs_vfs"));
    }

    #[test]
    fn test_generate_json_shapes_reload() {
        let generator = SourceGenerator::new().unwrap();
        let fs = sample();

        for shape in [OutputShape::Json, OutputShape::FlatJson] {
            let options = GenerateOptions::new("SITE").with_shape(shape);
            let pack = generator.generate(&fs, &options).unwrap();
            let reloaded = VirtualFs::from_json(&pack.content).unwrap();
            assert_eq!(reloaded.file_paths(), fs.file_paths());
            assert_eq!(reloaded.read("/index.html").unwrap(), b"<h1>hi</h1>");
        }
    }

    #[test]
    fn test_generate_rejects_bad_name_for_source() {
        let generator = SourceGenerator::new().unwrap();
        let err = generator
            .generate(&sample(), &GenerateOptions::new("not valid"))
            .unwrap_err();
        assert!(err.is_invalid_name());
    }
}
