//! Idempotent edits to shell profile and Nix configuration files.
//!
//! Installers in the bootstrap sequence need two kinds of persistent
//! environment changes: an activation line in the shell profile
//! (Homebrew's `shellenv`) and experimental-feature flags in nix.conf.
//! Both edits must survive re-runs without duplicating themselves.

use crate::error::Result;
use std::fs;
use std::path::Path;

/// Ensure `line` is present in `file`, appending it if missing.
///
/// Returns `true` when the file was modified. Matching is on trimmed
/// whole lines; the file and its parent directories are created as
/// needed.
pub fn ensure_line(file: &Path, line: &str) -> Result<bool> {
    let wanted = line.trim();
    let existing = match fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    if existing.lines().any(|l| l.trim() == wanted) {
        return Ok(false);
    }

    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut content = existing;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(wanted);
    content.push('\n');
    fs::write(file, content)?;
    Ok(true)
}

/// Ensure the named experimental features are enabled in a nix.conf file.
///
/// Extends an existing `experimental-features =` assignment in place, or
/// appends a fresh one. Unrelated lines are preserved untouched. Returns
/// `true` when the file was modified.
pub fn ensure_nix_features(file: &Path, features: &[&str]) -> Result<bool> {
    let existing = match fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let mut lines: Vec<String> = existing.lines().map(str::to_string).collect();
    let mut changed = false;
    let mut found = false;

    for line in lines.iter_mut() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if key.trim() != "experimental-features" {
            continue;
        }
        found = true;
        let mut enabled: Vec<&str> = value.split_whitespace().collect();
        for feature in features {
            if !enabled.contains(feature) {
                enabled.push(feature);
                changed = true;
            }
        }
        if changed {
            *line = format!("experimental-features = {}", enabled.join(" "));
        }
        break;
    }

    if !found {
        lines.push(format!("experimental-features = {}", features.join(" ")));
        changed = true;
    }

    if changed {
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(file, content)?;
    }
    Ok(changed)
}
