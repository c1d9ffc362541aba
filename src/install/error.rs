//! Closed error surface for the install pipeline (spec.md §7 "Error
//! handling design"). `thiserror` derives the `Display`/`Error` impls the
//! way the teacher's own error types would if it had any fallible,
//! multi-stage operation; the CLI boundary wraps these in `anyhow`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("not an rpm-formatted file")]
    BadMagic,

    #[error("source packages cannot be installed with install-binary")]
    NotSrpm,

    #[error("package arch is not compatible with this system")]
    BadArch,

    #[error("package os is not compatible with this system")]
    BadOs,

    #[error("relocation requested but package has no relocatable prefix")]
    NoRelocate,

    #[error("package {0} is already installed")]
    AlreadyInstalled(String),

    #[error("a newer version of {0} is already installed")]
    OldPackage(String),

    #[error("package database is corrupt: {0}")]
    DbCorrupt(String),

    #[error("file {0} conflicts with an already-installed package")]
    Conflict(String),

    #[error("failed to create directory {path}: {source}")]
    Mkdir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to rename {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to change ownership of {path}: {source}")]
    Chown {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cpio archive error: {0}")]
    Cpio(String),

    #[error("no space left installing {0}")]
    NoSpace(String),

    #[error("source package contained no .spec file")]
    NoSpec,

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl InstallError {
    /// Roughly mirrors rpm's own exit-code bucketing: 0 success is
    /// represented by `Ok`, everything else gets a small, stable integer a
    /// calling script can branch on.
    pub fn exit_code(&self) -> i32 {
        match self {
            InstallError::BadMagic | InstallError::NotSrpm => 2,
            InstallError::BadArch | InstallError::BadOs => 3,
            InstallError::NoRelocate => 4,
            InstallError::AlreadyInstalled(_) | InstallError::OldPackage(_) => 5,
            InstallError::DbCorrupt(_) => 6,
            InstallError::Conflict(_) => 7,
            InstallError::Mkdir { .. } | InstallError::Rename { .. } | InstallError::Chown { .. } => 8,
            InstallError::Cpio(_) => 9,
            InstallError::NoSpace(_) => 10,
            InstallError::NoSpec => 11,
            InstallError::Internal(_) | InstallError::Io(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(InstallError::BadMagic.exit_code(), 2);
        assert_eq!(InstallError::Conflict("x".into()).exit_code(), 7);
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: InstallError = io_err.into();
        assert_eq!(err.exit_code(), 1);
    }
}
