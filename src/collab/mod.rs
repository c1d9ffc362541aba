//! Small collaborators the install engine consumes through narrow traits
//! (spec-speak: "Arch/OS compatibility scoring", "MD5 hashing", "version
//! comparator", "scriptlet runner", "configuration variable lookup"). None
//! of these exist in the teacher crate (it only ever reads RPM metadata, it
//! never installs a package), so each is grounded on the idiom the rest of
//! the example pack uses for the same kind of concern.

mod config;
mod hash;
mod platform;
mod scriptlet;
mod users;
mod version;

pub use config::ConfigVars;
pub use hash::{FileHasher, Md5Hasher};
pub use platform::{ArchScorer, OsScorer, RunningSystem};
pub use scriptlet::{ScriptletRunner, ShellScriptletRunner};
pub use users::{SystemUserResolver, UserResolver};
pub use version::{RpmVersionComparator, VersionComparator};
