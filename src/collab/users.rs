//! User/group name resolution (spec.md §4.7 "Ownership/mode applier").
//! The teacher never needs to map a name to a uid/gid; grounded on the
//! `nix` crate's user/group database bindings already pulled in for
//! `chown`/`chroot` elsewhere in this crate.

use nix::unistd::{Group, User};

pub trait UserResolver {
    fn uid_for(&self, name: &str) -> Option<u32>;
    fn gid_for(&self, name: &str) -> Option<u32>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemUserResolver;

impl UserResolver for SystemUserResolver {
    fn uid_for(&self, name: &str) -> Option<u32> {
        if name == "root" {
            return Some(0);
        }
        User::from_name(name).ok().flatten().map(|u| u.uid.as_raw())
    }

    fn gid_for(&self, name: &str) -> Option<u32> {
        if name == "root" {
            return Some(0);
        }
        Group::from_name(name).ok().flatten().map(|g| g.gid.as_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_never_needs_a_lookup() {
        let resolver = SystemUserResolver;
        assert_eq!(resolver.uid_for("root"), Some(0));
        assert_eq!(resolver.gid_for("root"), Some(0));
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        let resolver = SystemUserResolver;
        assert_eq!(resolver.uid_for("definitely-not-a-real-user-xyz"), None);
    }
}
