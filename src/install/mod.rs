//! Install orchestrator (spec.md §4.10): the top-level state machine that
//! sequences the platform check, relocation, shared-file reconciliation,
//! scriptlets, archive extraction, ownership, and the database update into
//! one install. Everything else in this module (`platform`, `relocate`,
//! `fate`, `shared`, `dirs`, `archive`, `ownership`, `dbupdate`, `source`)
//! is a leaf component the orchestrator sequences; none of them know about
//! each other.
//!
//! State order (spec.md §4.10): RELOCATE -> LOOKUP-NAME-MATCHES ->
//! PLATFORM-CHECK -> ALREADY-INSTALLED-CHECK -> BUILD-ACTION-TABLE ->
//! RECONCILE-SHARED -> (TEST-EXIT) -> PRE-SCRIPT -> MAKE-DIRS ->
//! BACKUP-EXISTING -> EXTRACT -> APPLY-OWNERSHIP -> POST-SCRIPT ->
//! MARK-REPLACED -> REMOVE-OLD-SAME -> ADD-HEADER -> REMOVE-OLD-VERSIONS
//! -> DONE. The `TEST-EXIT` placement follows §6's flag description
//! ("abort after reconciliation, before side effects") and §7's recovery
//! policy, which groups a reconciliation conflict and `--test` together
//! as "fatal-before-side-effect" -- both outrank the order §4.10's prose
//! diagram alone would suggest; see DESIGN.md.

pub mod archive;
pub mod dbupdate;
pub mod dirs;
pub mod error;
pub mod fate;
pub mod flags;
pub mod ownership;
pub mod platform;
pub mod relocate;
pub mod shared;
pub mod source;
pub mod types;

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::collab::{ArchScorer, ConfigVars, FileHasher, OsScorer, ScriptletRunner, UserResolver, VersionComparator};
use crate::db::PackageDatabase;
use crate::header::{RType, Tag};
use crate::lead::Type as LeadType;
use crate::PackageFile;

use archive::{install_archive, ExpectedFile, FileSelection};
use dbupdate::{add_header, mark_replaced, remove_old_versions, remove_previous_same_version};
use dirs::make_dirs;
use error::InstallError;
use flags::InstallFlags;
use ownership::OwnershipApplier;
use shared::reconcile;
use types::{FileTable, FileType, InstallAction, PostInstallState};

/// The collaborators spec.md §1 lists as external to the core, bundled so
/// call sites thread one reference instead of six.
pub struct Collaborators<'a> {
    pub arch_scorer: &'a dyn ArchScorer,
    pub os_scorer: &'a dyn OsScorer,
    pub hasher: &'a dyn FileHasher,
    pub users: &'a dyn UserResolver,
    pub scripts: &'a dyn ScriptletRunner,
    pub versions: &'a dyn VersionComparator,
    pub config: &'a ConfigVars,
}

/// `ensure-older` (spec.md §6): checks that the installed record at
/// `offset` is older than `(new_version, new_release)`, the version/
/// release about to be installed. Returns `Ok(())` ("older-ok") when it
/// is, `Err(OldPackage)` ("newer-already-installed") otherwise. A
/// vanished offset is treated as trivially satisfied -- there's nothing
/// left to be newer than.
pub fn ensure_older(
    db: &dyn PackageDatabase,
    versions: &dyn VersionComparator,
    offset: u64,
    new_version: &str,
    new_release: &str,
) -> Result<(), InstallError> {
    let Some(record) = db.get_record(offset) else {
        return Ok(());
    };
    let existing_version = record.header.get_string(Tag::Version);
    let existing_release = record.header.get_string(Tag::Release);

    if versions.is_older(&existing_version, &existing_release, new_version, new_release) {
        Ok(())
    } else {
        Err(InstallError::OldPackage(record.name()))
    }
}

/// `install-binary` (spec.md §6). `location` is the caller's requested
/// relocation prefix, if any; `flags` are the bits from §6's flag table;
/// `notify` is the progress callback driven by the archive install driver
/// (§4.6).
pub fn install_binary(
    rootdir: &Path,
    db: &mut dyn PackageDatabase,
    package: &mut PackageFile,
    location: Option<&str>,
    flags: InstallFlags,
    collab: &Collaborators,
    mut notify: impl FnMut(u64, u64),
) -> Result<(), InstallError> {
    if package.lead.rpm_type != LeadType::Binary {
        return Err(InstallError::NotSrpm);
    }

    // PLATFORM-CHECK (§4.1). Done before relocation since relocation may
    // clone the header and there's no reason to pay that cost for a
    // package this system can't run anyway.
    if !platform::arch_ok(&package.header_tags, collab.arch_scorer, flags) {
        return Err(InstallError::BadArch);
    }
    if !platform::os_ok(&package.header_tags, collab.os_scorer, flags) {
        return Err(InstallError::BadOs);
    }

    // RELOCATE (§4.2).
    let header = match location {
        Some(new_prefix) => relocate::relocate(&package.header_tags, new_prefix)?.header,
        None => package.header_tags.clone(),
    };

    let name = header.get_string(Tag::Name);
    let version = header.get_string(Tag::Version);
    let release = header.get_string(Tag::Release);

    // LOOKUP-NAME-MATCHES / ALREADY-INSTALLED-CHECK.
    let matches = db.find_by_name(&name);
    let mut replace_same_version = None;
    let mut upgrade_olds = Vec::new();

    for &offset in &matches {
        let Some(existing) = db.get_record(offset) else { continue };
        let existing_version = existing.header.get_string(Tag::Version);
        let existing_release = existing.header.get_string(Tag::Release);
        let same_version = existing_version == version && existing_release == release;

        if same_version {
            if flags.contains(InstallFlags::REPLACEPKG) {
                replace_same_version = Some(offset);
            } else {
                return Err(InstallError::AlreadyInstalled(name));
            }
        } else if flags.contains(InstallFlags::UPGRADE) {
            if !flags.contains(InstallFlags::UPGRADETOOLD) {
                ensure_older(&*db, collab.versions, offset, &version, &release)?;
            }
            upgrade_olds.push(offset);
        }
    }

    // scriptArg: |matches| + 1 (spec.md §4.10; SPEC_FULL.md resolves the
    // --replacepkg Open Question by counting the replaced record too).
    let script_arg = matches.len() as u32 + 1;

    // BUILD-ACTION-TABLE (§4.3 pre-stage). The payload's own cpio entry
    // names always carry the package's pre-relocation paths (whatever
    // DEFAULTPREFIX the packager built under); `original_table` keeps
    // those alongside `table`'s post-relocation ones, index-aligned,
    // since `relocate::relocate` rewrites `FILENAMES` in place without
    // reordering (spec.md §4.2).
    let original_table = FileTable::from_header(&package.header_tags);
    let table = FileTable::from_header(&header);
    let mut actions = vec![InstallAction::Create; table.file_count()];
    for i in 0..table.file_count() {
        let path = rootdir.join(table.names[i].trim_start_matches('/'));
        if table.is_config(i) && table.file_type(i) != FileType::Dir && std::fs::symlink_metadata(&path).is_ok() {
            actions[i] = InstallAction::Backup;
        } else if table.is_doc(i) && flags.contains(InstallFlags::NODOCS) {
            actions[i] = InstallAction::Skip;
        }
    }

    // RECONCILE-SHARED (§4.4). Old versions being upgraded aren't conflicts.
    let replacements = reconcile(&*db, collab.hasher, rootdir, &table, &mut actions, &upgrade_olds, flags)?;

    // (TEST-EXIT): dry run stops here, after reconciliation and before any
    // side effect (§6 flag table; §7 recovery policy).
    if flags.contains(InstallFlags::TEST) {
        return Ok(());
    }

    // PRE-SCRIPT. A failure here is fatal: nothing has been written to
    // disk or the database yet, so aborting leaves the system untouched.
    if !flags.contains(InstallFlags::NOSCRIPTS) {
        run_script(collab.scripts, rootdir, header.get_value(Tag::PreIn).and_then(RType::as_string).as_deref(), script_arg)?;
    }

    // MAKE-DIRS (§4.5).
    make_dirs(rootdir, &table.names).map_err(|source| InstallError::Mkdir { path: rootdir.to_path_buf(), source })?;

    // BACKUP-EXISTING: renames happen before extraction writes the same paths.
    for i in 0..table.file_count() {
        let path = rootdir.join(table.names[i].trim_start_matches('/'));
        match actions[i] {
            InstallAction::Backup => rename_aside(&path, "rpmorig")?,
            InstallAction::Save => rename_aside(&path, "rpmsave")?,
            _ => {}
        }
    }

    // EXTRACT (§4.6). KEEP files are already correct on disk (owned by a
    // cohabiting package); SKIP files are deliberately left untouched.
    // `archive_name` is the path under which the payload stores the entry
    // (pre-relocation); `name` is where it must land on disk (§4.2, S6).
    let expected: Vec<ExpectedFile> = (0..table.file_count())
        .filter(|&i| !matches!(actions[i], InstallAction::Skip | InstallAction::Keep))
        .map(|i| ExpectedFile {
            archive_name: original_table.names[i].clone(),
            name: table.names[i].clone(),
            size: table.sizes[i],
        })
        .collect();

    let tmp_path = collab.config.tmp_path_under(rootdir);
    {
        let mut reader = package.payload_reader().map_err(InstallError::Io)?;
        install_archive(&mut reader, rootdir, &FileSelection::Only(expected), &tmp_path, &mut notify)?;
    }

    // APPLY-OWNERSHIP (§4.7): only after extraction completes successfully.
    let mut applier = OwnershipApplier::new(collab.users);
    applier
        .apply_in_root(rootdir, &table, &actions)
        .map_err(|source| InstallError::Chown { path: rootdir.to_path_buf(), source })?;

    // POST-SCRIPT. Best-effort: files are already on disk, so aborting
    // now would leave a half-committed database without undoing them.
    if !flags.contains(InstallFlags::NOSCRIPTS) {
        if let Err(err) = run_script(collab.scripts, rootdir, header.get_value(Tag::PostIn).and_then(RType::as_string).as_deref(), script_arg) {
            log::error!("post-install scriptlet for {name} failed: {err}");
        }
    }

    // MARK-REPLACED before ADD-HEADER (§5 ordering guarantee): even if
    // adding the new header fails, other packages already reflect the
    // conflict outcome consistent with what's on disk.
    mark_replaced(&mut *db, &replacements);

    // REMOVE-OLD-SAME.
    remove_previous_same_version(&mut *db, replace_same_version).map_err(InstallError::Io)?;

    // ADD-HEADER. Fatal on failure -- this is the record of the install
    // having happened at all.
    let file_states: Vec<u8> = if table.file_count() == 0 {
        Vec::new()
    } else {
        (0..table.file_count())
            .map(|i| {
                if actions[i] == InstallAction::Skip {
                    PostInstallState::NotInstalled as u8
                } else {
                    PostInstallState::Normal as u8
                }
            })
            .collect()
    };
    let install_time = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    add_header(&mut *db, header, file_states, install_time).map_err(InstallError::Io)?;

    // REMOVE-OLD-VERSIONS.
    remove_old_versions(rootdir, &mut *db, &upgrade_olds);

    Ok(())
}

fn run_script(runner: &dyn ScriptletRunner, rootdir: &Path, script: Option<&str>, arg: u32) -> Result<(), InstallError> {
    runner
        .run(rootdir, script, arg)
        .map_err(|source| InstallError::Internal(format!("scriptlet failed: {source}")))
}

/// BACKUP-EXISTING's rename step (spec.md §4.10): `path -> path+".rpmorig"`
/// for BACKUP, `path -> path+".rpmsave"` for SAVE. Rename failure is fatal.
fn rename_aside(path: &Path, suffix: &str) -> Result<(), InstallError> {
    let mut new_name = path.as_os_str().to_os_string();
    new_name.push(format!(".{suffix}"));
    let backup = PathBuf::from(new_name);
    std::fs::rename(path, &backup).map_err(|source| InstallError::Rename { from: path.to_path_buf(), to: backup, source })
}

/// `install-source` (spec.md §6): detects the source-package branch from
/// the lead's type tag and hands off to [`source::install_source`].
pub fn install_source(
    rootdir: &Path,
    package: &mut PackageFile,
    config: &ConfigVars,
    flags: InstallFlags,
    notify: impl FnMut(u64, u64),
) -> Result<Option<PathBuf>, InstallError> {
    if package.lead.rpm_type != LeadType::Source {
        return Err(InstallError::NotSrpm);
    }
    let mut reader = package.payload_reader().map_err(InstallError::Io)?;
    source::install_source(rootdir, &mut reader, config, flags, notify)
}
