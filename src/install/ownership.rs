//! Ownership/mode applier (spec.md §4.7).

use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use nix::unistd::{chown, Gid, Uid};

use crate::collab::UserResolver;

use super::types::{FileTable, FileType, InstallAction};

/// Name -> id cache holding exactly one entry, an instance field per
/// spec.md's "replacing global caches" design note (§9) rather than the
/// process-wide mutable cache the original keeps.
#[derive(Default)]
struct NameCache {
    name: String,
    id: u32,
}

impl NameCache {
    fn resolve(&mut self, name: &str, lookup: impl FnOnce(&str) -> Option<u32>) -> Option<u32> {
        if self.name == name {
            return Some(self.id);
        }
        let id = lookup(name)?;
        self.name = name.to_owned();
        self.id = id;
        Some(id)
    }
}

pub struct OwnershipApplier<'a> {
    resolver: &'a dyn UserResolver,
    user_cache: NameCache,
    group_cache: NameCache,
}

impl<'a> OwnershipApplier<'a> {
    pub fn new(resolver: &'a dyn UserResolver) -> Self {
        OwnershipApplier {
            resolver,
            user_cache: NameCache::default(),
            group_cache: NameCache::default(),
        }
    }

    /// Applies ownership and mode to every file whose action is not SKIP.
    /// `rootdir` must already be the effective root (the caller is
    /// responsible for chrooting first when it isn't `/`, since `chown`
    /// must resolve names against the target's own user/group database).
    pub fn apply(&mut self, rootdir: &Path, table: &FileTable, actions: &[InstallAction]) {
        for i in 0..table.file_count() {
            if actions.get(i) == Some(&InstallAction::Skip) {
                continue;
            }
            self.apply_one(rootdir, table, i);
        }
    }

    fn apply_one(&mut self, rootdir: &Path, table: &FileTable, i: usize) {
        let path = rootdir.join(table.names[i].trim_start_matches('/'));

        let uid = self.resolve_uid(&table.usernames[i]);
        let gid = self.resolve_gid(&table.groupnames[i]);

        if let Err(err) = chown(&path, Some(Uid::from_raw(uid)), Some(Gid::from_raw(gid))) {
            log::error!("chown failed for {}: {err}", path.display());
            force_safe_mode(&path);
            return;
        }

        if table.file_type(i) == FileType::Link {
            return;
        }

        if let Ok(metadata) = path.metadata() {
            let mut perms = metadata.permissions();
            perms.set_mode(u32::from(table.modes[i]) & 0o7777);
            let _ = std::fs::set_permissions(&path, perms);
        }
    }

    fn resolve_uid(&mut self, name: &str) -> u32 {
        let resolver = self.resolver;
        self.user_cache.resolve(name, |n| resolver.uid_for(n)).unwrap_or_else(|| {
            log::warn!("unknown user {name}, falling back to uid 0");
            0
        })
    }

    fn resolve_gid(&mut self, name: &str) -> u32 {
        let resolver = self.resolver;
        self.group_cache.resolve(name, |n| resolver.gid_for(n)).unwrap_or_else(|| {
            log::warn!("unknown group {name}, falling back to gid 0");
            0
        })
    }

    /// Runs `apply` inside a forked, chrooted child when `rootdir` isn't
    /// `/`, since the uid/gid lookups above must see the target root's
    /// own `/etc/passwd` and `/etc/group`.
    pub fn apply_in_root(&mut self, rootdir: &Path, table: &FileTable, actions: &[InstallAction]) -> io::Result<()> {
        if rootdir == Path::new("/") {
            self.apply(rootdir, table, actions);
            return Ok(());
        }

        use nix::sys::wait::waitpid;
        use nix::unistd::{fork, ForkResult};

        match unsafe { fork() }.map_err(|e| io::Error::other(e.to_string()))? {
            ForkResult::Child => {
                if nix::unistd::chroot(rootdir).is_err() || std::env::set_current_dir("/").is_err() {
                    std::process::exit(1);
                }
                self.apply(Path::new("/"), table, actions);
                std::process::exit(0);
            }
            ForkResult::Parent { child } => {
                waitpid(child, None).map_err(|e| io::Error::other(e.to_string()))?;
                Ok(())
            }
        }
    }
}

fn force_safe_mode(path: &Path) {
    if let Ok(metadata) = path.metadata() {
        let mut perms = metadata.permissions();
        perms.set_mode(0o644);
        let _ = std::fs::set_permissions(path, perms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{RType, Tag, Tags};
    use std::io::Write;

    /// Resolves to the *current* process's own uid/gid so `chown` below
    /// succeeds without requiring root privileges in the test runner
    /// (unprivileged self-chown to an unchanged owner is always allowed).
    struct SelfResolver;
    impl UserResolver for SelfResolver {
        fn uid_for(&self, name: &str) -> Option<u32> {
            if name == "self" { Some(nix::unistd::getuid().as_raw()) } else { None }
        }
        fn gid_for(&self, name: &str) -> Option<u32> {
            if name == "self" { Some(nix::unistd::getgid().as_raw()) } else { None }
        }
    }

    fn table_with(path: &Path) -> FileTable {
        let mut h = Tags::new();
        h.insert(Tag::Filenames, RType::StringArray(vec![path.to_string_lossy().into_owned()]));
        h.insert(Tag::FileSizes, RType::Int64Array(vec![0]));
        h.insert(Tag::FileModes, RType::Int16Array(vec![0o100640]));
        h.insert(Tag::FileMD5s, RType::StringArray(vec![String::new()]));
        h.insert(Tag::FileLinktos, RType::StringArray(vec![String::new()]));
        h.insert(Tag::FileFlags, RType::Int32Array(vec![0]));
        h.insert(Tag::FileUserName, RType::StringArray(vec!["self".into()]));
        h.insert(Tag::FileGroupName, RType::StringArray(vec!["self".into()]));
        FileTable::from_header(&h)
    }

    #[test]
    fn name_cache_avoids_repeated_lookups() {
        let mut cache = NameCache::default();
        let mut calls = 0;
        assert_eq!(cache.resolve("daemon", |_| { calls += 1; Some(2) }), Some(2));
        assert_eq!(cache.resolve("daemon", |_| { calls += 1; Some(2) }), Some(2));
        assert_eq!(calls, 1);
    }

    #[test]
    fn root_applies_without_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        std::fs::File::create(&path).unwrap().write_all(b"x").unwrap();

        let table = table_with(&path);
        let actions = vec![InstallAction::Create];
        let resolver = SelfResolver;
        let mut applier = OwnershipApplier::new(&resolver);
        applier.apply(Path::new("/"), &table, &actions);

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o7777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn skipped_files_are_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        std::fs::File::create(&path).unwrap().write_all(b"x").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600)).unwrap();

        let table = table_with(&path);
        let actions = vec![InstallAction::Skip];
        let resolver = SelfResolver;
        let mut applier = OwnershipApplier::new(&resolver);
        applier.apply(Path::new("/"), &table, &actions);

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o7777;
        assert_eq!(mode, 0o600);
    }
}
