//! Database updater (spec.md §4.8): the ordered writes that commit a
//! successful install.

use std::path::Path;

use crate::db::PackageDatabase;
use crate::header::{RType, Tag, Tags};

use super::shared::Replacement;
use super::types::PostInstallState;

/// Step 1: walk the replacement list, flipping each referenced file's
/// state to REPLACED. Best-effort -- an individual record failing to
/// load or persist is logged and does not abort the install, since the
/// incoming package has already been extracted by this point.
pub fn mark_replaced(db: &mut dyn PackageDatabase, replacements: &[Replacement]) {
    let mut by_offset: std::collections::HashMap<u64, Vec<usize>> = std::collections::HashMap::new();
    for r in replacements {
        by_offset.entry(r.rec_offset).or_default().push(r.file_number);
    }

    for (offset, file_numbers) in by_offset {
        let Some(mut record) = db.get_record(offset) else {
            log::warn!("replacement record at offset {offset} vanished before it could be marked");
            continue;
        };
        let mut states = record.file_states();
        for fln in file_numbers {
            if let Some(slot) = states.get_mut(fln) {
                *slot = PostInstallState::Replaced as u8;
            }
        }
        record.header.insert(Tag::FilesStates, RType::Int8Array(states));
        if let Err(err) = db.update_record(offset, record.header) {
            log::warn!("failed to persist replaced-file states at offset {offset}: {err}");
        }
    }
}

/// Step 2: drop the previous record for an identical version being
/// reinstalled, if the caller decided to replace it.
pub fn remove_previous_same_version(db: &mut dyn PackageDatabase, offset: Option<u64>) -> std::io::Result<()> {
    match offset {
        Some(offset) => db.remove(offset),
        None => Ok(()),
    }
}

/// Step 3: annotate the incoming header with `FILESTATES` and
/// `INSTALLTIME`, then insert it. Fatal on failure -- this is the record
/// of the install actually having happened.
pub fn add_header(
    db: &mut dyn PackageDatabase,
    mut header: Tags<Tag>,
    file_states: Vec<u8>,
    install_time: u64,
) -> std::io::Result<u64> {
    header.insert(Tag::FilesStates, RType::Int8Array(file_states));
    header.insert(Tag::InstallTime, RType::Int32(install_time as u32));
    db.add(header)
}

/// Step 4: remove every old-version record being superseded by this
/// upgrade. `rootdir` and `db` are accepted for parity with the
/// collaborator signature spec.md names (`remove-package(rootdir, db,
/// offset, flags)`); this crate has no separate uninstall pipeline, so
/// "removing a package" is exactly dropping its database record.
pub fn remove_old_versions(_rootdir: &Path, db: &mut dyn PackageDatabase, offsets: &[u64]) {
    for &offset in offsets {
        if let Err(err) = db.remove(offset) {
            log::warn!("failed to remove superseded package record at offset {offset}: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::JsonPackageDatabase;

    fn header_for(name: &str, files: &[&str]) -> Tags<Tag> {
        let mut h = Tags::new();
        h.insert(Tag::Name, RType::String(name.to_owned()));
        h.insert(
            Tag::Filenames,
            RType::StringArray(files.iter().map(|s| s.to_string()).collect()),
        );
        h.insert(Tag::FilesStates, RType::Int8Array(vec![0; files.len()]));
        h
    }

    #[test]
    fn mark_replaced_flips_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = JsonPackageDatabase::open(dir.path().join("db.json")).unwrap();
        let offset = db.add(header_for("foo", &["/a", "/b"])).unwrap();

        mark_replaced(&mut db, &[Replacement { rec_offset: offset, file_number: 1 }]);

        let record = db.get_record(offset).unwrap();
        assert_eq!(record.file_states(), vec![0, PostInstallState::Replaced as u8]);
    }

    #[test]
    fn add_header_sets_states_and_time() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = JsonPackageDatabase::open(dir.path().join("db.json")).unwrap();
        let offset = add_header(&mut db, header_for("foo", &["/a"]), vec![0], 1_700_000_000).unwrap();

        let record = db.get_record(offset).unwrap();
        assert_eq!(record.header.get_u32(Tag::InstallTime), 1_700_000_000);
    }

    #[test]
    fn remove_old_versions_drops_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = JsonPackageDatabase::open(dir.path().join("db.json")).unwrap();
        let offset = db.add(header_for("foo", &["/a"])).unwrap();

        remove_old_versions(Path::new("/"), &mut db, &[offset]);
        assert!(db.get_record(offset).is_none());
    }
}
