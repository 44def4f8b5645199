//! End-to-end tests for the tileplan binary.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use image::{ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;

const PLAN: &str = r#"
[plan]
sources = single
source = tile.png

[level.0]
dimension = 4x4
tile_size = 64x64
scale = 1.0

[level.1]
dimension = 8x8
tile_size = 64x64
scale = 2.0

[marker.0]
kind = Text
position = 100,60
icon_size = 16x16
"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();

        let mut png = Vec::new();
        RgbaImage::from_pixel(64, 64, Rgba([20, 120, 220, 255]))
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        fs::write(dir.path().join("tile.png"), png).unwrap();
        fs::write(dir.path().join("plan.ini"), PLAN).unwrap();

        let config = format!(
            "[viewport]\nwidth = 128\nheight = 128\n\n[logging]\nfile = {}\n",
            dir.path().join("logs").join("tileplan.log").display()
        );
        fs::write(dir.path().join("config.ini"), config).unwrap();

        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_tileplan"))
            .args(args)
            .arg("--config")
            .arg(self.path("config.ini"))
            .output()
            .unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn plan_arg(fixture: &Fixture) -> String {
    path_str(&fixture.path("plan.ini"))
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn test_info_lists_levels_and_markers() {
    let fixture = Fixture::new();
    let output = fixture.run(&["info", &plan_arg(&fixture)]);

    assert!(output.status.success(), "{:?}", output);
    let out = stdout(&output);
    assert!(out.contains("Reference size: 256x256 px"), "{}", out);
    let reference = "0: 4x4 tiles of 64x64 px = 256x256 px, scale 1 [reference, initial]";
    assert!(out.contains(reference), "{}", out);
    assert!(out.contains("1: 8x8 tiles of 64x64 px = 512x512 px, scale 2"), "{}", out);
    assert!(out.contains("Text"), "{}", out);
}

#[test]
fn test_order_prints_ring() {
    let fixture = Fixture::new();
    let output = fixture.run(&["order", &plan_arg(&fixture), "--position", "64,64"]);

    assert!(output.status.success(), "{:?}", output);
    let out = stdout(&output);
    assert!(out.contains("Loading radius: 1"), "{}", out);
    assert!(out.contains("Center tile: (2, 2)"), "{}", out);
    assert!(out.contains("Load order (9 tiles):"), "{}", out);
    assert!(out.contains("1. (2, 2)"), "{}", out);
}

#[test]
fn test_order_rejects_missing_level() {
    let fixture = Fixture::new();
    let output = fixture.run(&["order", &plan_arg(&fixture), "--level", "7"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("level 7 does not exist"));
}

#[test]
fn test_view_session() {
    let fixture = Fixture::new();
    let output = fixture.run(&["view", &plan_arg(&fixture), "pan:64,0", "zoom:in", "zoom:in"]);

    assert!(output.status.success(), "{:?}", output);
    let out = stdout(&output);
    assert!(out.contains("level 0 completed: 9 submitted, 9 loaded"), "{}", out);
    assert!(out.contains("Level 0 -> 1"), "{}", out);
    assert!(out.contains("Notice: maximum zoom level already reached"), "{}", out);
    assert!(out.contains("Summary:"), "{}", out);
    assert!(fixture.path("logs").join("tileplan.log").exists());
}

#[test]
fn test_missing_plan_fails() {
    let fixture = Fixture::new();
    let missing = path_str(&fixture.path("nope.ini"));
    let output = fixture.run(&["info", &missing]);

    assert_eq!(output.status.code(), Some(1));
}
