//! Source-package installer (spec.md §4.9): a variant install flow that
//! lays a source package's contents into the configured sources directory
//! and relocates its discovered `.spec` file into the specs directory.
//! Never touches the package database -- spec.md is explicit that source
//! packages don't get a database record.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::collab::ConfigVars;

use super::archive::{install_archive, FileSelection};
use super::error::InstallError;
use super::flags::InstallFlags;

/// Installs a source package's payload under `rootdir`. Returns `None`
/// under `--test` (the pipeline stops before any filesystem mutation) or
/// the final path of the relocated `.spec` file on success.
pub fn install_source<R: Read>(
    rootdir: &Path,
    reader: &mut R,
    config: &ConfigVars,
    flags: InstallFlags,
    progress: impl FnMut(u64, u64),
) -> Result<Option<PathBuf>, InstallError> {
    if flags.contains(InstallFlags::TEST) {
        return Ok(None);
    }

    let source_dir = config.source_dir_under(rootdir);
    let spec_dir = config.spec_dir_under(rootdir);
    fs::create_dir_all(&source_dir).map_err(|source| InstallError::Mkdir { path: source_dir.clone(), source })?;
    fs::create_dir_all(&spec_dir).map_err(|source| InstallError::Mkdir { path: spec_dir.clone(), source })?;

    let tmp_path = config.tmp_path_under(rootdir);
    let outcome = install_archive(reader, &source_dir, &FileSelection::All, &tmp_path, progress)?;

    let Some(spec_name) = outcome.spec_file else {
        return Err(InstallError::NoSpec);
    };

    let from = source_dir.join(&spec_name);
    let file_name = Path::new(&spec_name)
        .file_name()
        .ok_or_else(|| InstallError::Internal(format!("spec file name {spec_name} has no final component")))?;
    let to = spec_dir.join(file_name);

    move_file(&from, &to)?;
    Ok(Some(to))
}

/// `rename`, falling back to copy+unlink across filesystem boundaries
/// (spec.md §4.9: "Move (rename, falling back to copy+unlink)").
fn move_file(from: &Path, to: &Path) -> Result<(), InstallError> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    let rename_err = |source| InstallError::Rename { from: from.to_path_buf(), to: to.to_path_buf(), source };
    fs::copy(from, to).map_err(rename_err)?;
    fs::remove_file(from).map_err(rename_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{CpioWriter, FileEntry};
    use std::io::Cursor;

    fn archive_with_spec() -> Vec<u8> {
        let mut buf = Vec::new();
        let entry = FileEntry {
            name: "foo.spec".to_string(),
            ino: 1,
            mode: 0o100644,
            uid: 0,
            gid: 0,
            nlink: 1,
            mtime: 0,
            file_size: 5,
            dev_major: 0,
            dev_minor: 0,
            rdev_major: 0,
            rdev_minor: 0,
        };
        buf.write_cpio_record(entry, &mut Cursor::new(b"Name:".to_vec())).unwrap();
        buf.write_cpio_entry(FileEntry::default()).unwrap();
        buf
    }

    #[test]
    fn test_mode_makes_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigVars::default();
        let mut reader = Cursor::new(archive_with_spec());
        let result = install_source(dir.path(), &mut reader, &config, InstallFlags::TEST, |_, _| {}).unwrap();
        assert!(result.is_none());
        assert!(!dir.path().join("usr/src/redhat/SPECS").exists());
    }

    #[test]
    fn spec_file_relocated_to_specdir() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigVars::default();
        let mut reader = Cursor::new(archive_with_spec());
        let result = install_source(dir.path(), &mut reader, &config, InstallFlags::empty(), |_, _| {}).unwrap();

        let expected = dir.path().join("usr/src/redhat/SPECS/foo.spec");
        assert_eq!(result, Some(expected.clone()));
        assert!(expected.is_file());
        assert!(!dir.path().join("usr/src/redhat/SOURCES/foo.spec").exists());
    }

    #[test]
    fn missing_spec_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigVars::default();
        let mut buf = Vec::new();
        buf.write_cpio_entry(FileEntry::default()).unwrap();
        let mut reader = Cursor::new(buf);

        let result = install_source(dir.path(), &mut reader, &config, InstallFlags::empty(), |_, _| {});
        assert!(matches!(result, Err(InstallError::NoSpec)));
    }
}
