//! Package database collaborator (spec.md §1, §6): persistent store of
//! installed-package headers plus indices keyed by name and file-path.
//! The teacher crate has no notion of a database at all -- it only reads
//! RPM files -- so this is grounded on the pack's idiom for small
//! persistent stores: `serde` + `serde_json`, the same pairing
//! `apl-core`/`apl-schema` and `coreos-installer` use for their own
//! on-disk metadata.
//!
//! This is deliberately not a b-tree-indexed `rpmdb`-alike: spec.md treats
//! the database as an external collaborator consumed through five
//! operations, so a flat JSON file plus in-memory indices built at load
//! time satisfies the contract without pretending to be a production
//! database engine.

use crate::header::{Tag, Tags};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// A triple binding an incoming file index to an (installed-package,
/// file-index) pair that shares its path (spec.md §3 "Shared-file record").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedFileRecord {
    pub sec_rec_offset: u64,
    pub sec_file_number: usize,
    pub main_file_number: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageRecord {
    pub offset: u64,
    pub header: Tags<Tag>,
}

impl PackageRecord {
    pub fn name(&self) -> String {
        self.header.get_string(Tag::Name)
    }

    pub fn file_names(&self) -> Vec<String> {
        self.header.get_string_array(Tag::Filenames)
    }

    pub fn file_states(&self) -> Vec<u8> {
        self.header.get_u8_array(Tag::FilesStates)
    }
}

/// The five operations spec.md's core consumes: `find-by-name`,
/// `get-record`, `add`, `remove`, `update-record`, plus `find-shared-files`.
pub trait PackageDatabase {
    /// Offsets of every installed record with the given package name.
    fn find_by_name(&self, name: &str) -> Vec<u64>;

    fn get_record(&self, offset: u64) -> Option<PackageRecord>;

    /// Returns the new record's offset.
    fn add(&mut self, header: Tags<Tag>) -> io::Result<u64>;

    fn remove(&mut self, offset: u64) -> io::Result<()>;

    fn update_record(&mut self, offset: u64, header: Tags<Tag>) -> io::Result<()>;

    /// Shared-file records against `file_names`, sorted by `sec_rec_offset`
    /// so the caller can fetch each installed-package header once and
    /// reuse it across consecutive records (spec.md §4.4 step 1).
    fn find_shared_files(&self, file_names: &[String]) -> Vec<SharedFileRecord>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct DbFile {
    next_offset: u64,
    records: Vec<PackageRecord>,
}

/// Flat-file `PackageDatabase` backed by a single JSON document. Not
/// internally concurrency-safe (spec.md §5: "callers must not run two
/// install operations against the same database").
pub struct JsonPackageDatabase {
    path: PathBuf,
    file: DbFile,
}

impl JsonPackageDatabase {
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = if path.exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str(&data).map_err(io::Error::other)?
        } else {
            DbFile::default()
        };
        Ok(JsonPackageDatabase { path, file })
    }

    fn persist(&self) -> io::Result<()> {
        let data = serde_json::to_string_pretty(&self.file).map_err(io::Error::other)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, data)
    }
}

impl PackageDatabase for JsonPackageDatabase {
    fn find_by_name(&self, name: &str) -> Vec<u64> {
        self.file
            .records
            .iter()
            .filter(|r| r.name() == name)
            .map(|r| r.offset)
            .collect()
    }

    fn get_record(&self, offset: u64) -> Option<PackageRecord> {
        self.file.records.iter().find(|r| r.offset == offset).cloned()
    }

    fn add(&mut self, header: Tags<Tag>) -> io::Result<u64> {
        let offset = self.file.next_offset + 1;
        self.file.next_offset = offset;
        self.file.records.push(PackageRecord { offset, header });
        self.persist()?;
        Ok(offset)
    }

    fn remove(&mut self, offset: u64) -> io::Result<()> {
        self.file.records.retain(|r| r.offset != offset);
        self.persist()
    }

    fn update_record(&mut self, offset: u64, header: Tags<Tag>) -> io::Result<()> {
        match self.file.records.iter_mut().find(|r| r.offset == offset) {
            Some(record) => {
                record.header = header;
                self.persist()
            }
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no package record at offset {offset}"),
            )),
        }
    }

    fn find_shared_files(&self, file_names: &[String]) -> Vec<SharedFileRecord> {
        let mut by_path: HashMap<String, Vec<(u64, usize)>> = HashMap::new();
        for record in &self.file.records {
            for (i, name) in record.file_names().into_iter().enumerate() {
                by_path.entry(name).or_default().push((record.offset, i));
            }
        }

        let mut out = Vec::new();
        for (main_file_number, path) in file_names.iter().enumerate() {
            if let Some(hits) = by_path.get(path) {
                for &(sec_rec_offset, sec_file_number) in hits {
                    out.push(SharedFileRecord {
                        sec_rec_offset,
                        sec_file_number,
                        main_file_number,
                    });
                }
            }
        }
        out.sort_by_key(|r| r.sec_rec_offset);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::RType;

    fn header_for(name: &str, files: &[&str]) -> Tags<Tag> {
        let mut h = Tags::new();
        h.insert(Tag::Name, RType::String(name.to_owned()));
        h.insert(
            Tag::Filenames,
            RType::StringArray(files.iter().map(|s| s.to_string()).collect()),
        );
        h
    }

    #[test]
    fn add_then_find_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = JsonPackageDatabase::open(dir.path().join("db.json")).unwrap();
        let offset = db.add(header_for("foo", &["/usr/bin/foo"])).unwrap();
        assert_eq!(db.find_by_name("foo"), vec![offset]);
        assert!(db.find_by_name("bar").is_empty());
    }

    #[test]
    fn shared_files_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = JsonPackageDatabase::open(dir.path().join("db.json")).unwrap();
        db.add(header_for("foo", &["/usr/bin/foo", "/etc/foo.conf"])).unwrap();

        let shared = db.find_shared_files(&["/usr/bin/foo".to_string()]);
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].main_file_number, 0);
        assert_eq!(shared[0].sec_file_number, 0);
    }

    #[test]
    fn remove_then_get_record_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = JsonPackageDatabase::open(dir.path().join("db.json")).unwrap();
        let offset = db.add(header_for("foo", &[])).unwrap();
        db.remove(offset).unwrap();
        assert!(db.get_record(offset).is_none());
    }

    #[test]
    fn reopening_loads_persisted_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let mut db = JsonPackageDatabase::open(&path).unwrap();
        let offset = db.add(header_for("foo", &["/usr/bin/foo"])).unwrap();
        drop(db);

        let reopened = JsonPackageDatabase::open(&path).unwrap();
        assert_eq!(reopened.find_by_name("foo"), vec![offset]);
    }
}
