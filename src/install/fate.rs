//! File-fate decider (spec.md §4.3): given a file's attributes on disk, in
//! the installed-package database, and in the incoming package, decides
//! whether to create, back up, save aside, keep, or skip it.

use std::fs;
use std::path::Path;

use crate::collab::FileHasher;

use super::types::{FileType, InstallAction};

/// `decide(path, dbMode, dbMd5, dbLink, newMode, newMd5, newLink, brokenMd5Flag) -> action`.
/// Rule ordering is load-bearing: CREATE is preferred over KEEP whenever the
/// on-disk file still matches the database, so non-content attribute changes
/// (ownership, timestamps) from the new package still land.
#[allow(clippy::too_many_arguments)]
pub fn decide(
    hasher: &dyn FileHasher,
    path: &Path,
    db_mode: u32,
    db_md5: &str,
    db_link: &str,
    new_mode: u32,
    new_md5: &str,
    new_link: &str,
    broken_md5: bool,
) -> InstallAction {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return InstallAction::Create;
    };

    let disk_type = FileType::from_mode(meta.mode_bits());
    let db_type = FileType::from_mode(db_mode);
    let new_type = FileType::from_mode(new_mode);

    if disk_type != new_type {
        return InstallAction::Save;
    }
    if new_type != db_type && disk_type != db_type {
        return InstallAction::Save;
    }
    if db_type != new_type {
        return InstallAction::Create;
    }
    if !matches!(db_type, FileType::Reg | FileType::Link) {
        return InstallAction::Create;
    }

    if db_type == FileType::Reg {
        let Ok(disk_md5) = hasher.hash_file(path, broken_md5) else {
            return InstallAction::Create;
        };
        if disk_md5 == db_md5 {
            return InstallAction::Create;
        }
    }

    if db_type == FileType::Link {
        let Ok(disk_link) = fs::read_link(path) else {
            return InstallAction::Create;
        };
        if disk_link.to_string_lossy() == db_link {
            return InstallAction::Create;
        }
    }

    let attrs_equal = match db_type {
        FileType::Reg => db_md5 == new_md5,
        FileType::Link => db_link == new_link,
        _ => true,
    };
    if attrs_equal {
        return InstallAction::Keep;
    }

    InstallAction::Save
}

trait ModeBits {
    fn mode_bits(&self) -> u32;
}

impl ModeBits for fs::Metadata {
    #[cfg(unix)]
    fn mode_bits(&self) -> u32 {
        use std::os::unix::fs::MetadataExt;
        self.mode()
    }

    #[cfg(not(unix))]
    fn mode_bits(&self) -> u32 {
        if self.is_dir() {
            0o040000
        } else if self.file_type().is_symlink() {
            0o120000
        } else {
            0o100000
        }
    }
}
