//! CLI integration tests for the `autoheckin` binary.
//!
//! The real toolchain is not available in CI, so each test builds a tools
//! directory of small shell scripts that mimic the four programs: they copy
//! their input to the expected output path and log their arguments to
//! `calls.log`. Unix only.

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::TempDir;

// Executing a script while another thread still holds it open for writing
// fails with ETXTBSY, so tests that write tools run one at a time.
static TOOLS_LOCK: Mutex<()> = Mutex::new(());

fn lock() -> MutexGuard<'static, ()> {
    TOOLS_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

// ── Fake toolchain ───────────────────────────────────────────────────────────

const NVDECOMPRESS: &str = r#"#!/bin/sh
echo "nvdecompress $@" >> "$(dirname "$0")/calls.log"
cp "$1" "$2"
"#;

const CUTTLEFISH: &str = r#"#!/bin/sh
echo "cuttlefish $@" >> "$(dirname "$0")/calls.log"
while [ $# -gt 0 ]; do
  case "$1" in
    --input) src="$2"; shift ;;
    --output) dst="$2"; shift ;;
  esac
  shift
done
cp "$src" "$dst"
"#;

const DIVINITY_MACHINE: &str = r#"#!/bin/sh
echo "DivinityMachine $@" >> "$(dirname "$0")/calls.log"
cp "$1" "${1%.dds}.tga"
"#;

const ETERNAL_OK: &str = r#"#!/bin/sh
echo "EternalTextureCompressor $@" >> "$(dirname "$0")/calls.log"
"#;

const ETERNAL_FAIL: &str = r#"#!/bin/sh
echo "EternalTextureCompressor $@" >> "$(dirname "$0")/calls.log"
exit 3
"#;

struct Workspace {
    _tmp: TempDir,
    tools: PathBuf,
    textures: PathBuf,
}

impl Workspace {
    /// Tools dir with every required file, using `eternal` as the final
    /// compressor script.
    fn new(eternal: &str) -> Self {
        let tmp = TempDir::new().unwrap();
        let tools = tmp.path().join("tools");
        let textures = tmp.path().join("textures");
        fs::create_dir(&tools).unwrap();
        fs::create_dir(&textures).unwrap();

        for name in texture_tools::required_files() {
            let body = match *name {
                "nvdecompress" => NVDECOMPRESS,
                "cuttlefish" => CUTTLEFISH,
                "DivinityMachine" => DIVINITY_MACHINE,
                "EternalTextureCompressor" => eternal,
                _ => "",
            };
            write_executable(&tools.join(name), body);
        }

        Self {
            _tmp: tmp,
            tools,
            textures,
        }
    }

    fn texture(&self, name: &str) -> PathBuf {
        let path = self.textures.join(name);
        fs::write(&path, b"pixels").unwrap();
        path
    }

    fn calls(&self) -> String {
        fs::read_to_string(self.tools.join("calls.log")).unwrap_or_default()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("autoheckin").unwrap();
        cmd.env_remove("AUTOHECKIN_SKIP_COMPRESSION")
            .env_remove("AUTOHECKIN_NO_CLOBBER")
            .env_remove("AUTOHECKIN_QUALITY")
            .env_remove("RUST_LOG")
            .env("AUTOHECKIN_TOOLS_DIR", &self.tools);
        cmd
    }
}

fn write_executable(path: &Path, body: &str) {
    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn test_cli_no_inputs_prints_usage() {
    let _guard = lock();
    let ws = Workspace::new(ETERNAL_OK);

    ws.cmd()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("[texture1] [texture2] [...]"));
    assert!(ws.calls().is_empty());
}

#[test]
fn test_cli_usage_checked_before_tools() {
    let _guard = lock();
    let ws = Workspace::new(ETERNAL_OK);
    fs::remove_file(ws.tools.join("cuttlefish")).unwrap();

    ws.cmd()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage:"))
        .stderr(predicate::str::contains("not found").not());
}

#[test]
fn test_cli_missing_tool_aborts_before_any_work() {
    let _guard = lock();
    let ws = Workspace::new(ETERNAL_OK);
    fs::remove_file(ws.tools.join("DivinityMachine")).unwrap();
    let input = ws.texture("foo.png");

    ws.cmd()
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "'DivinityMachine' not found! Did you extract everything in the tools folder?",
        ));

    assert!(ws.calls().is_empty());
    assert_eq!(listing(&ws.textures), vec!["foo.png"]);
}

#[test]
fn test_cli_missing_support_library_is_reported() {
    let _guard = lock();
    let ws = Workspace::new(ETERNAL_OK);
    fs::remove_file(ws.tools.join("libPVRTexLib.so")).unwrap();
    let input = ws.texture("foo.png");

    ws.cmd()
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("'libPVRTexLib.so' not found!"));
}

#[test]
fn test_cli_converts_png() {
    let _guard = lock();
    let ws = Workspace::new(ETERNAL_OK);
    let input = ws.texture("foo.png");

    ws.cmd()
        .arg(&input)
        .assert()
        .code(0)
        .stdout(predicate::str::contains(format!(
            "Converting '{}'...",
            input.display()
        )))
        .stdout(predicate::str::contains(
            "Successfully converted foo.png into foo.tga.",
        ))
        .stdout(predicate::str::ends_with("Done.\n"));

    assert_eq!(listing(&ws.textures), vec!["foo.png", "foo.tga"]);

    let calls = ws.calls();
    assert!(!calls.contains("nvdecompress"), "calls: {calls}");
    assert!(calls.contains("--format BC1_RGBA"), "calls: {calls}");
    assert!(calls.contains("EternalTextureCompressor"), "calls: {calls}");
}

#[test]
fn test_cli_converts_dds_normal_map() {
    let _guard = lock();
    let ws = Workspace::new(ETERNAL_OK);
    let input = ws.texture("rock_n.dds");

    ws.cmd()
        .arg(&input)
        .assert()
        .code(0)
        .stdout(predicate::str::contains(
            "Successfully converted rock_n.dds into rock_n.tga.",
        ));

    assert_eq!(listing(&ws.textures), vec!["rock_n.dds", "rock_n.tga"]);

    let calls = ws.calls();
    assert!(calls.starts_with("nvdecompress"), "calls: {calls}");
    assert!(calls.contains("--format BC5"), "calls: {calls}");
}

#[test]
fn test_cli_property_suffix_names_output() {
    let _guard = lock();
    let ws = Workspace::new(ETERNAL_OK);
    let input = ws.texture("wall$bc7.tga");

    ws.cmd()
        .arg(&input)
        .assert()
        .code(0)
        .stdout(predicate::str::contains(
            "Successfully converted wall$bc7.tga into wall.",
        ));

    assert_eq!(listing(&ws.textures), vec!["wall", "wall$bc7.tga"]);
    assert!(ws.calls().contains("--format BC7"));
}

#[test]
fn test_cli_exit_code_counts_failures_and_cleans_up() {
    let _guard = lock();
    let ws = Workspace::new(ETERNAL_FAIL);
    let a = ws.texture("a.png");
    let b = ws.texture("b.png");

    ws.cmd()
        .arg(&a)
        .arg(&b)
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "ERROR: Failed to compress texture using EternalTextureCompressor (exit code 3).",
        ))
        .stdout(predicate::str::contains("Done."));

    assert_eq!(listing(&ws.textures), vec!["a.png", "b.png"]);
}

#[test]
fn test_cli_missing_input_does_not_stop_batch() {
    let _guard = lock();
    let ws = Workspace::new(ETERNAL_OK);
    let missing = ws.textures.join("ghost.png");
    let good = ws.texture("good.png");

    ws.cmd()
        .arg(&missing)
        .arg(&good)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(format!(
            "{} was not found.",
            missing.display()
        )))
        .stdout(predicate::str::contains(
            "Successfully converted good.png into good.tga.",
        ));

    assert_eq!(listing(&ws.textures), vec!["good.png", "good.tga"]);
}

#[test]
fn test_cli_skip_compression_from_env() {
    let _guard = lock();
    let ws = Workspace::new(ETERNAL_FAIL);
    let input = ws.texture("foo.png");

    ws.cmd()
        .env("AUTOHECKIN_SKIP_COMPRESSION", "1")
        .arg(&input)
        .assert()
        .code(0);

    assert!(ws.textures.join("foo.tga").is_file());
    assert!(!ws.calls().contains("EternalTextureCompressor"));
}

#[test]
fn test_cli_no_clobber_keeps_existing_output() {
    let _guard = lock();
    let ws = Workspace::new(ETERNAL_OK);
    let input = ws.texture("foo.png");
    fs::write(ws.textures.join("foo.tga"), b"keep me").unwrap();

    ws.cmd()
        .arg("--no-clobber")
        .arg(&input)
        .assert()
        .code(0)
        .stdout(predicate::str::contains(
            "Successfully converted foo.png into foo-2.tga.",
        ));

    assert_eq!(fs::read(ws.textures.join("foo.tga")).unwrap(), b"keep me");
    assert!(ws.textures.join("foo-2.tga").is_file());
}

#[test]
fn test_cli_skip_compression_env_accepts_any_set_value() {
    let _guard = lock();
    let ws = Workspace::new(ETERNAL_FAIL);
    let input = ws.texture("foo.png");

    ws.cmd()
        .env("AUTOHECKIN_SKIP_COMPRESSION", "yes")
        .arg(&input)
        .assert()
        .code(0);

    assert!(ws.textures.join("foo.tga").is_file());
}

#[test]
fn test_cli_no_clobber_from_env() {
    let _guard = lock();
    let ws = Workspace::new(ETERNAL_OK);
    let input = ws.texture("foo.png");
    fs::write(ws.textures.join("foo.tga"), b"keep me").unwrap();

    ws.cmd()
        .env("AUTOHECKIN_NO_CLOBBER", "1")
        .arg(&input)
        .assert()
        .code(0)
        .stdout(predicate::str::contains(
            "Successfully converted foo.png into foo-2.tga.",
        ));

    assert_eq!(fs::read(ws.textures.join("foo.tga")).unwrap(), b"keep me");
    assert!(ws.textures.join("foo-2.tga").is_file());
}

#[test]
fn test_cli_no_clobber_env_zero_means_off() {
    let _guard = lock();
    let ws = Workspace::new(ETERNAL_OK);
    let input = ws.texture("foo.png");
    fs::write(ws.textures.join("foo.tga"), b"old").unwrap();

    ws.cmd()
        .env("AUTOHECKIN_NO_CLOBBER", "0")
        .arg(&input)
        .assert()
        .code(0);

    assert_eq!(fs::read(ws.textures.join("foo.tga")).unwrap(), b"pixels");
    assert!(!ws.textures.join("foo-2.tga").exists());
}

#[test]
fn test_cli_quality_flag_reaches_compressor() {
    let _guard = lock();
    let ws = Workspace::new(ETERNAL_OK);
    let input = ws.texture("foo.png");

    ws.cmd()
        .args(["--quality", "high"])
        .arg(&input)
        .assert()
        .code(0);

    assert!(ws.calls().contains("--quality high"));
}

#[test]
fn test_cli_json_report() {
    let _guard = lock();
    let ws = Workspace::new(ETERNAL_OK);
    let good = ws.texture("good.png");
    let missing = ws.textures.join("ghost.png");

    let output = ws
        .cmd()
        .arg("--json")
        .arg(&good)
        .arg(&missing)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["stats"]["total"], 2);
    assert_eq!(report["stats"]["succeeded"], 1);
    assert_eq!(report["stats"]["failed"], 1);
    assert_eq!(report["jobs"][0]["format"], "BC1_RGBA");
    assert!(report["jobs"][1]["error"]
        .as_str()
        .unwrap()
        .ends_with("was not found."));
}
