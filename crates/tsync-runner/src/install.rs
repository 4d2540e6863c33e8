use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use crate::util::list_files;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub copied: Vec<PathBuf>,
    /// Paths already supplied by an earlier source; the first source wins.
    pub excluded: Vec<PathBuf>,
}

/// Copy downloaded translations into the packaging resource directory.
/// Target files are overwritten so fresh translations always land.
pub fn install<P: AsRef<Path>>(sources: &[P], target: &Path) -> Result<InstallReport> {
    let mut report = InstallReport::default();
    let mut seen = HashSet::new();
    for source in sources {
        let source = source.as_ref();
        if !source.is_dir() {
            return Err(anyhow!("nothing to install: {} does not exist, run download first", source.display()));
        }
        for rel in list_files(source).with_context(|| format!("list {}", source.display()))? {
            if !seen.insert(rel.clone()) {
                debug!(file = %rel.display(), source = %source.display(), "excluded, duplicate path");
                report.excluded.push(rel);
                continue;
            }
            let dest = target.join(&rel);
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
            }
            std::fs::copy(source.join(&rel), &dest).with_context(|| format!("copy into {}", dest.display()))?;
            report.copied.push(rel);
        }
    }
    info!(copied = report.copied.len(), excluded = report.excluded.len(), target = %target.display(), "installed translations");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn overwrites_files_already_at_target() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("crowdin");
        let dst = dir.path().join("classes");
        std::fs::create_dir_all(src.join("lang")).unwrap();
        std::fs::create_dir_all(dst.join("lang")).unwrap();
        std::fs::write(src.join("lang/fr.json"), "fr-new").unwrap();
        std::fs::write(src.join("lang/de.json"), "de-new").unwrap();
        std::fs::write(dst.join("lang/fr.json"), "fr-old").unwrap();
        std::fs::write(dst.join("lang/keep.json"), "untouched").unwrap();

        let report = install(&[&src], &dst).unwrap();
        assert_eq!(report.copied, vec![PathBuf::from("lang/de.json"), PathBuf::from("lang/fr.json")]);
        assert!(report.excluded.is_empty());
        assert_eq!(std::fs::read_to_string(dst.join("lang/fr.json")).unwrap(), "fr-new");
        assert_eq!(std::fs::read_to_string(dst.join("lang/de.json")).unwrap(), "de-new");
        assert_eq!(std::fs::read_to_string(dst.join("lang/keep.json")).unwrap(), "untouched");
        // source untouched
        assert_eq!(std::fs::read_to_string(src.join("lang/fr.json")).unwrap(), "fr-new");
    }

    #[test]
    fn duplicate_paths_across_sources_keep_the_first() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        let dst = dir.path().join("classes");
        std::fs::create_dir_all(&a).unwrap();
        std::fs::create_dir_all(&b).unwrap();
        std::fs::write(a.join("fr.json"), "from-a").unwrap();
        std::fs::write(b.join("fr.json"), "from-b").unwrap();
        std::fs::write(b.join("de.json"), "from-b").unwrap();

        let report = install(&[&a, &b], &dst).unwrap();
        assert_eq!(report.copied, vec![PathBuf::from("fr.json"), PathBuf::from("de.json")]);
        assert_eq!(report.excluded, vec![PathBuf::from("fr.json")]);
        assert_eq!(std::fs::read_to_string(dst.join("fr.json")).unwrap(), "from-a");
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = tempdir().unwrap();
        let absent = dir.path().join("absent");
        assert!(install(&[&absent], &dir.path().join("dst")).is_err());
    }
}
