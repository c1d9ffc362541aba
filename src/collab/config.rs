//! Configuration variable lookup collaborator (spec.md §1, §4.6, §4.9):
//! `TMPPATH`, `SOURCEDIR`, `SPECDIR`. The teacher has no config layer of
//! its own (it's a read-only inspection tool); defaults below mirror the
//! classic `rpmrc` values.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ConfigVars {
    pub tmp_path: PathBuf,
    pub source_dir: PathBuf,
    pub spec_dir: PathBuf,
}

impl Default for ConfigVars {
    fn default() -> Self {
        ConfigVars {
            tmp_path: PathBuf::from("/var/tmp"),
            source_dir: PathBuf::from("/usr/src/redhat/SOURCES"),
            spec_dir: PathBuf::from("/usr/src/redhat/SPECS"),
        }
    }
}

impl ConfigVars {
    pub fn tmp_path_under(&self, rootdir: &Path) -> PathBuf {
        join_under_root(rootdir, &self.tmp_path)
    }

    pub fn source_dir_under(&self, rootdir: &Path) -> PathBuf {
        join_under_root(rootdir, &self.source_dir)
    }

    pub fn spec_dir_under(&self, rootdir: &Path) -> PathBuf {
        join_under_root(rootdir, &self.spec_dir)
    }
}

fn join_under_root(rootdir: &Path, var: &Path) -> PathBuf {
    if rootdir == Path::new("/") {
        return var.to_path_buf();
    }
    let relative = var.strip_prefix("/").unwrap_or(var);
    rootdir.join(relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_root_keeps_absolute_path() {
        let cfg = ConfigVars::default();
        assert_eq!(cfg.tmp_path_under(Path::new("/")), Path::new("/var/tmp"));
    }

    #[test]
    fn nontrivial_root_joins_under_prefix() {
        let cfg = ConfigVars::default();
        assert_eq!(
            cfg.source_dir_under(Path::new("/mnt/target")),
            Path::new("/mnt/target/usr/src/redhat/SOURCES")
        );
    }
}
