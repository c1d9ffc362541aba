//! Directory materializer (spec.md §4.5).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Creates every intermediate directory `names` will need once joined
/// under `rootdir`. Files are assumed to already be in their natural
/// list order; the last directory created is cached and re-creation
/// skipped when a file's parent is unchanged, the same optimization
/// spec.md names.
pub fn make_dirs(rootdir: &Path, names: &[String]) -> io::Result<()> {
    let mut last: Option<PathBuf> = None;

    for name in names {
        let Some(parent) = Path::new(name.trim_start_matches('/')).parent() else {
            continue;
        };
        let parent = rootdir.join(parent);
        if last.as_deref() == Some(parent.as_path()) {
            continue;
        }

        match fs::create_dir_all(&parent) {
            Ok(()) => set_mode_0755(&parent)?,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e),
        }
        last = Some(parent);
    }

    Ok(())
}

#[cfg(unix)]
fn set_mode_0755(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_mode_0755(_path: &Path) -> io::Result<()> {
    Ok(())
}
