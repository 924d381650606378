//! Integration tests for the pack and inspect workflow.

use embedfs_cli::ShapeArg;
use embedfs_cli::commands::{inspect, pack};
use embedfs_core::cli::{ExitCode, OutputFormat};
use std::fs;
use tempfile::TempDir;

fn site() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("public/css")).unwrap();
    fs::write(dir.path().join("public/index.html"), "<p>home</p>").unwrap();
    fs::write(dir.path().join("public/css/site.css"), "p { color: red }").unwrap();
    fs::write(dir.path().join("public/css/site.css.map"), "{}").unwrap();
    dir
}

fn args(dir: &TempDir, out: &str) -> pack::PackArgs {
    pack::PackArgs {
        source: dir.path().join("public"),
        out: Some(dir.path().join(out)),
        yes: true,
        ..pack::PackArgs::default()
    }
}

#[test]
fn test_pack_json_then_inspect() {
    let dir = site();
    let out = dir.path().join("public.json");
    let args = pack::PackArgs {
        shape: Some(ShapeArg::Json),
        exclude: vec!["\\.map$".to_string()],
        ..args(&dir, "public.json")
    };

    let code = pack::run(args, OutputFormat::Json).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let vfs = inspect::load(&out).unwrap();
    assert_eq!(vfs.file_paths(), ["/css/site.css", "/index.html"]);
    assert_eq!(vfs.read("/index.html").unwrap(), b"<p>home</p>");

    let listing = inspect::list(&vfs, "/css").unwrap();
    assert_eq!(listing.entries.len(), 1);
    assert_eq!(listing.entries[0].size, 16);
}

#[test]
fn test_pack_flat_json_loads_like_nested() {
    let dir = site();
    let args = pack::PackArgs {
        shape: Some(ShapeArg::FlatJson),
        ..args(&dir, "flat.json")
    };
    assert_eq!(pack::run(args, OutputFormat::Text).unwrap(), ExitCode::SUCCESS);

    let vfs = inspect::load(&dir.path().join("flat.json")).unwrap();
    assert_eq!(vfs.file_count(), 3);
    assert_eq!(vfs.read("/css/site.css.map").unwrap(), b"{}");
}

#[test]
fn test_pack_source_uses_directory_name() {
    let dir = site();
    let code = pack::run(args(&dir, "src/assets.rs"), OutputFormat::Pretty).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let source = fs::read_to_string(dir.path().join("src/assets.rs")).unwrap();
    assert!(source.contains("pub static PUBLIC: LazyLock<VirtualFs>"));
    assert!(source.contains("Node::file(\"index.html\", 11,"));
}

#[test]
fn test_pack_overwrites_with_yes() {
    let dir = site();
    fs::write(dir.path().join("out.rs"), "old").unwrap();

    let args = pack::PackArgs {
        shape: Some(ShapeArg::Independent),
        var_name: Some("WEB".to_string()),
        ..args(&dir, "out.rs")
    };
    assert_eq!(pack::run(args, OutputFormat::Json).unwrap(), ExitCode::SUCCESS);

    let source = fs::read_to_string(dir.path().join("out.rs")).unwrap();
    assert!(source.contains("pub enum WebNode"));
}

#[test]
fn test_pack_discovers_config_in_source() {
    let dir = site();
    fs::write(
        dir.path().join("public/embedfs.toml"),
        "shape = \"json\"\nexclude = [\"^/css/\"]\n",
    )
    .unwrap();

    assert_eq!(
        pack::run(args(&dir, "pack.json"), OutputFormat::Json).unwrap(),
        ExitCode::SUCCESS
    );

    let vfs = inspect::load(&dir.path().join("pack.json")).unwrap();
    assert_eq!(vfs.file_paths(), ["/index.html"]);
}

#[test]
fn test_pack_invalid_input_codes() {
    let dir = site();

    let zero_width = pack::PackArgs {
        chunk_width: Some(0),
        ..args(&dir, "a.rs")
    };
    assert_eq!(
        pack::run(zero_width, OutputFormat::Json).unwrap(),
        ExitCode::INVALID_INPUT
    );

    let keyword = pack::PackArgs {
        var_name: Some("static".to_string()),
        ..args(&dir, "b.rs")
    };
    assert_eq!(
        pack::run(keyword, OutputFormat::Json).unwrap(),
        ExitCode::INVALID_INPUT
    );
    assert!(!dir.path().join("b.rs").exists());
}

#[test]
fn test_pack_missing_source_fails() {
    let dir = TempDir::new().unwrap();
    let args = pack::PackArgs {
        source: dir.path().join("missing"),
        out: Some(dir.path().join("out.rs")),
        yes: true,
        ..pack::PackArgs::default()
    };
    assert!(pack::run(args, OutputFormat::Json).is_err());
}

#[test]
fn test_pack_bad_pattern_fails() {
    let dir = site();
    let args = pack::PackArgs {
        exclude: vec!["(".to_string()],
        ..args(&dir, "out.rs")
    };
    let err = pack::run(args, OutputFormat::Json).unwrap_err();
    assert!(format!("{err:#}").contains("failed to pack"));
}
