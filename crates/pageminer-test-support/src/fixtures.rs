//! On-disk site fixtures.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Create a temporary site root containing `locales/<code>.json` for each
/// entry, plus any extra files given as `(relative path, contents)`.
///
/// # Errors
///
/// Returns an error if the directory or any file cannot be written.
pub fn site_with_locales(locales: &[(&str, &str)], extra: &[(&str, &str)]) -> Result<TempDir> {
    let dir = tempfile::tempdir().context("failed to create site root")?;
    for (code, body) in locales {
        write_file(dir.path(), &format!("locales/{code}.json"), body)?;
    }
    for (path, body) in extra {
        write_file(dir.path(), path, body)?;
    }
    Ok(dir)
}

fn write_file(root: &Path, relative: &str, body: &str) -> Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_locale_and_extra_files() -> Result<()> {
        let site = site_with_locales(
            &[("en", r#"{"meta":{"title":"Hello"}}"#)],
            &[("index.html", "<html></html>")],
        )?;
        assert_eq!(
            fs::read_to_string(site.path().join("locales/en.json"))?,
            r#"{"meta":{"title":"Hello"}}"#
        );
        assert!(site.path().join("index.html").exists());
        Ok(())
    }
}
