//! Shared value types for the install pipeline (spec.md §3 "Data model").

use crate::header::{Tag, Tags};
use bitflags::bitflags;

bitflags! {
    /// Per-file flag bits consumed from the `FILEFLAGS` tag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileAttrFlags: u32 {
        const CONFIG = 1 << 0;
        const DOC = 1 << 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Dir,
    BlockDev,
    CharDev,
    Socket,
    Pipe,
    Reg,
    Link,
}

impl FileType {
    pub fn from_mode(mode: u32) -> Self {
        match mode & 0o170000 {
            0o040000 => FileType::Dir,
            0o060000 => FileType::BlockDev,
            0o020000 => FileType::CharDev,
            0o140000 => FileType::Socket,
            0o010000 => FileType::Pipe,
            0o120000 => FileType::Link,
            _ => FileType::Reg,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallAction {
    Create,
    Backup,
    Save,
    Keep,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PostInstallState {
    Normal = 0,
    NotInstalled = 1,
    Replaced = 2,
}

/// Borrowed-from-header view over the parallel per-file arrays (spec.md
/// §3 "File entry"). Every array shares `file_count()` as its length;
/// callers rely on this (testable property #2, "size parallelism").
#[derive(Debug, Clone)]
pub struct FileTable {
    pub names: Vec<String>,
    pub sizes: Vec<u64>,
    pub modes: Vec<u16>,
    pub md5s: Vec<String>,
    pub linktos: Vec<String>,
    pub flags: Vec<u32>,
    pub usernames: Vec<String>,
    pub groupnames: Vec<String>,
}

impl FileTable {
    pub fn from_header(header: &Tags<Tag>) -> Self {
        FileTable {
            names: header.get_string_array(Tag::Filenames),
            sizes: header.get_u64_array(Tag::FileSizes),
            modes: header.get_u16_array(Tag::FileModes),
            md5s: header.get_string_array(Tag::FileMD5s),
            linktos: header.get_string_array(Tag::FileLinktos),
            flags: header.get_u32_array(Tag::FileFlags),
            usernames: header.get_string_array(Tag::FileUserName),
            groupnames: header.get_string_array(Tag::FileGroupName),
        }
    }

    pub fn file_count(&self) -> usize {
        self.names.len()
    }

    pub fn file_type(&self, i: usize) -> FileType {
        FileType::from_mode(u32::from(self.modes[i]))
    }

    fn flags_at(&self, i: usize) -> FileAttrFlags {
        FileAttrFlags::from_bits_truncate(self.flags.get(i).copied().unwrap_or(0))
    }

    pub fn is_config(&self, i: usize) -> bool {
        self.flags_at(i).contains(FileAttrFlags::CONFIG)
    }

    pub fn is_doc(&self, i: usize) -> bool {
        self.flags_at(i).contains(FileAttrFlags::DOC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_type_from_mode() {
        assert_eq!(FileType::from_mode(0o100644), FileType::Reg);
        assert_eq!(FileType::from_mode(0o040755), FileType::Dir);
        assert_eq!(FileType::from_mode(0o120777), FileType::Link);
    }

    #[test]
    fn config_and_doc_flags() {
        let table = FileTable {
            names: vec!["/etc/foo.conf".into(), "/usr/share/doc/foo".into()],
            sizes: vec![10, 20],
            modes: vec![0o100644, 0o100644],
            md5s: vec!["a".into(), "b".into()],
            linktos: vec![String::new(), String::new()],
            flags: vec![FileAttrFlags::CONFIG.bits(), FileAttrFlags::DOC.bits()],
            usernames: vec!["root".into(), "root".into()],
            groupnames: vec!["root".into(), "root".into()],
        };
        assert!(table.is_config(0));
        assert!(!table.is_doc(0));
        assert!(table.is_doc(1));
        assert!(!table.is_config(1));
    }
}
