//! Shell script standing in for the external downloader.
//!
//! It reads the `-o` template, substitutes `%(title)s` with `title` and
//! `%(ext)s` with `mp4` (or `mp3` when `--extract-audio` is passed), writes a
//! small file there and prints the same destination line the real tool does.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const SCRIPT: &str = r#"#!/bin/sh
tmpl=""
ext="mp4"
while [ $# -gt 0 ]; do
  case "$1" in
    -o) tmpl="$2"; shift ;;
    --extract-audio) ext="mp3" ;;
  esac
  shift
done
file=$(printf '%s' "$tmpl" | sed -e "s/%(title)s/title/" -e "s/%(ext)s/$ext/")
printf 'fake media' > "$file"
echo "[download] Destination: $file"
"#;

/// Writes the script into `dir` and returns its path.
pub fn install(dir: &Path) -> PathBuf {
    let path = dir.join("fake-downloader.sh");
    fs::write(&path, SCRIPT).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
