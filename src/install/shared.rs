//! Shared-file reconciler (spec.md §4.4): cross-checks the incoming
//! package's files against every other installed package that already
//! owns one of the same paths.

use std::path::Path;

use crate::collab::FileHasher;
use crate::db::{PackageDatabase, PackageRecord};
use crate::header::Tag;

use super::error::InstallError;
use super::fate::decide;
use super::flags::InstallFlags;
use super::types::{FileTable, FileType, PostInstallState};

/// A `(secRecOffset, secFileNumber)` pair whose state must be flipped to
/// REPLACED once the incoming install commits (spec.md §4.8 step 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replacement {
    pub rec_offset: u64,
    pub file_number: usize,
}

/// Reconciles `incoming` against every installed package sharing a file
/// path with it, mutating `actions` in place for files where a CONFIG
/// attribute comparison overrides the pre-seeded action. `ignore_offsets`
/// are old-version records the caller is about to replace -- they are not
/// conflicts.
pub fn reconcile(
    db: &dyn PackageDatabase,
    hasher: &dyn FileHasher,
    rootdir: &Path,
    incoming: &FileTable,
    actions: &mut [super::types::InstallAction],
    ignore_offsets: &[u64],
    flags: InstallFlags,
) -> Result<Vec<Replacement>, InstallError> {
    let shared = db.find_shared_files(&incoming.names);
    let mut replacements = Vec::new();

    let mut cached: Option<(u64, PackageRecord)> = None;

    for record in shared {
        if ignore_offsets.contains(&record.sec_rec_offset) {
            continue;
        }

        if cached.as_ref().map(|(off, _)| *off) != Some(record.sec_rec_offset) {
            cached = db.get_record(record.sec_rec_offset).map(|r| (record.sec_rec_offset, r));
        }
        let Some((_, shared_pkg)) = cached.as_ref() else {
            continue;
        };

        let states = shared_pkg.file_states();
        if let Some(&state) = states.get(record.sec_file_number) {
            if state == PostInstallState::Replaced as u8 || state == PostInstallState::NotInstalled as u8 {
                continue;
            }
        }

        let shared_table = FileTable::from_header(&shared_pkg.header);
        let main = record.main_file_number;
        let sec = record.sec_file_number;

        let equal = filecmp(incoming, main, &shared_table, sec);

        if !equal {
            if !flags.contains(InstallFlags::REPLACEFILES) {
                return Err(InstallError::Conflict(incoming.names[main].clone()));
            }
            replacements.push(Replacement {
                rec_offset: record.sec_rec_offset,
                file_number: sec,
            });
        }

        if incoming.is_config(main) || shared_table.is_config(sec) {
            let broken_md5 = !shared_pkg.header.contains(Tag::Rpmversion);
            let path = rootdir.join(incoming.names[main].trim_start_matches('/'));
            actions[main] = decide(
                hasher,
                &path,
                u32::from(shared_table.modes[sec]),
                &shared_table.md5s[sec],
                &shared_table.linktos[sec],
                u32::from(incoming.modes[main]),
                &incoming.md5s[main],
                &incoming.linktos[main],
                broken_md5,
            );
        }
    }

    Ok(replacements)
}

fn filecmp(a: &FileTable, ai: usize, b: &FileTable, bi: usize) -> bool {
    let at = a.file_type(ai);
    let bt = b.file_type(bi);
    if at != bt {
        return false;
    }
    match at {
        FileType::Link => a.linktos[ai] == b.linktos[bi],
        FileType::Reg => a.md5s[ai] == b.md5s[bi],
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::Md5Hasher;
    use crate::db::JsonPackageDatabase;
    use crate::header::RType;
    use crate::header::Tags;
    use crate::install::types::InstallAction;

    fn header_with_file(name: &str, path: &str, md5: &str, config: bool) -> Tags<Tag> {
        let mut h = Tags::new();
        h.insert(Tag::Name, RType::String(name.to_owned()));
        h.insert(Tag::Rpmversion, RType::String("4.18".into()));
        h.insert(Tag::Filenames, RType::StringArray(vec![path.to_owned()]));
        h.insert(Tag::FileModes, RType::Int16Array(vec![0o100644]));
        h.insert(Tag::FileMD5s, RType::StringArray(vec![md5.to_owned()]));
        h.insert(Tag::FileLinktos, RType::StringArray(vec![String::new()]));
        h.insert(
            Tag::FileFlags,
            RType::Int32Array(vec![if config { 1 } else { 0 }]),
        );
        h.insert(Tag::FilesStates, RType::Int8Array(vec![0]));
        h
    }

    #[test]
    fn matching_files_produce_no_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = JsonPackageDatabase::open(dir.path().join("db.json")).unwrap();
        db.add(header_with_file("foo", "/usr/bin/foo", "samehash", false)).unwrap();

        let incoming = FileTable::from_header(&header_with_file("bar", "/usr/bin/foo", "samehash", false));
        let mut actions = vec![InstallAction::Create];
        let hasher = Md5Hasher;

        let replacements = reconcile(&db, &hasher, Path::new("/"), &incoming, &mut actions, &[], InstallFlags::empty()).unwrap();
        assert!(replacements.is_empty());
    }

    #[test]
    fn conflicting_files_fail_without_replacefiles() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = JsonPackageDatabase::open(dir.path().join("db.json")).unwrap();
        db.add(header_with_file("foo", "/usr/bin/foo", "oldhash", false)).unwrap();

        let incoming = FileTable::from_header(&header_with_file("bar", "/usr/bin/foo", "newhash", false));
        let mut actions = vec![InstallAction::Create];
        let hasher = Md5Hasher;

        let result = reconcile(&db, &hasher, Path::new("/"), &incoming, &mut actions, &[], InstallFlags::empty());
        assert!(matches!(result, Err(InstallError::Conflict(_))));
    }

    #[test]
    fn conflicting_files_replace_with_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = JsonPackageDatabase::open(dir.path().join("db.json")).unwrap();
        let offset = db.add(header_with_file("foo", "/usr/bin/foo", "oldhash", false)).unwrap();

        let incoming = FileTable::from_header(&header_with_file("bar", "/usr/bin/foo", "newhash", false));
        let mut actions = vec![InstallAction::Create];
        let hasher = Md5Hasher;

        let replacements = reconcile(&db, &hasher, Path::new("/"), &incoming, &mut actions, &[], InstallFlags::REPLACEFILES).unwrap();
        assert_eq!(replacements, vec![Replacement { rec_offset: offset, file_number: 0 }]);
    }

    #[test]
    fn ignored_offsets_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = JsonPackageDatabase::open(dir.path().join("db.json")).unwrap();
        let offset = db.add(header_with_file("foo", "/usr/bin/foo", "oldhash", false)).unwrap();

        let incoming = FileTable::from_header(&header_with_file("foo", "/usr/bin/foo", "newhash", false));
        let mut actions = vec![InstallAction::Create];
        let hasher = Md5Hasher;

        let replacements = reconcile(&db, &hasher, Path::new("/"), &incoming, &mut actions, &[offset], InstallFlags::empty()).unwrap();
        assert!(replacements.is_empty());
    }
}
