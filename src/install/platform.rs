//! Arch/OS compatibility gates (spec.md §4.1).
//!
//! Legacy headers (major version 1-2) store the running platform as an
//! 8-bit numeric id instead of a string; [`collab::platform`] only scores
//! the string form, so the numeric comparison lives here, the way its own
//! doc comment says it should.

use crate::collab::{ArchScorer, OsScorer};
use crate::header::{RType, Tag, Tags};

use super::flags::InstallFlags;

/// rpmrc arch-canon ids for the numeric `ARCH` tag, current as of the
/// last header format that used it. Anything not in this table is
/// rejected -- the numeric form predates every architecture that matters
/// today, so an unrecognized id is far more likely to be a corrupt
/// header than a real legacy package.
const LEGACY_ARCH_IDS: &[(&str, u8)] = &[
    ("i386", 1),
    ("alpha", 2),
    ("sparc", 3),
    ("mips", 4),
    ("ppc", 5),
    ("m68k", 6),
    ("sgi", 7),
    ("rs6000", 8),
    ("ia64", 9),
    ("arm", 12),
    ("x86_64", 14),
];

fn running_legacy_arch_id() -> Option<u8> {
    LEGACY_ARCH_IDS
        .iter()
        .find(|(name, _)| *name == std::env::consts::ARCH)
        .map(|&(_, id)| id)
}

/// True if the package's declared arch is acceptable on this system.
/// Legacy numeric tags must match the running arch's id exactly; string
/// tags are accepted if the scorer returns non-zero. Missing tag: accept
/// (matches the original's treatment of arch-less, typically noarch-like,
/// packages).
pub fn arch_ok(header: &Tags<Tag>, scorer: &dyn ArchScorer, flags: InstallFlags) -> bool {
    if flags.contains(InstallFlags::NOARCH) {
        return true;
    }
    match header.get_value(Tag::Arch) {
        Some(RType::Int8(id)) => running_legacy_arch_id() == Some(*id),
        Some(value) => value.as_string().is_some_and(|arch| scorer.score(&arch) > 0),
        None => true,
    }
}

/// The OS gate is looser than the arch gate: a legacy numeric OS tag is
/// unconditionally accepted for backward compatibility (spec.md §4.1),
/// only the string form is actually scored.
pub fn os_ok(header: &Tags<Tag>, scorer: &dyn OsScorer, flags: InstallFlags) -> bool {
    if flags.contains(InstallFlags::NOOS) {
        return true;
    }
    match header.get_value(Tag::Os) {
        Some(RType::Int8(_)) => true,
        Some(value) => value.as_string().is_some_and(|os| scorer.score(&os) > 0),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysZero;
    impl ArchScorer for AlwaysZero {
        fn score(&self, _arch: &str) -> u32 {
            0
        }
    }
    impl OsScorer for AlwaysZero {
        fn score(&self, _os: &str) -> u32 {
            0
        }
    }

    struct AlwaysOne;
    impl ArchScorer for AlwaysOne {
        fn score(&self, _arch: &str) -> u32 {
            1
        }
    }
    impl OsScorer for AlwaysOne {
        fn score(&self, _os: &str) -> u32 {
            1
        }
    }

    #[test]
    fn missing_arch_tag_accepted() {
        let header = Tags::new();
        assert!(arch_ok(&header, &AlwaysZero, InstallFlags::empty()));
    }

    #[test]
    fn string_arch_rejected_by_zero_scorer() {
        let mut header = Tags::new();
        header.insert(Tag::Arch, RType::String("x86_64".into()));
        assert!(!arch_ok(&header, &AlwaysZero, InstallFlags::empty()));
        assert!(arch_ok(&header, &AlwaysOne, InstallFlags::empty()));
    }

    #[test]
    fn noarch_flag_bypasses_gate() {
        let mut header = Tags::new();
        header.insert(Tag::Arch, RType::String("sparc64".into()));
        assert!(arch_ok(&header, &AlwaysZero, InstallFlags::NOARCH));
    }

    #[test]
    fn legacy_numeric_os_always_accepted() {
        let mut header = Tags::new();
        header.insert(Tag::Os, RType::Int8(99));
        assert!(os_ok(&header, &AlwaysZero, InstallFlags::empty()));
    }

    #[test]
    fn legacy_numeric_arch_requires_exact_match() {
        let mut header = Tags::new();
        header.insert(Tag::Arch, RType::Int8(200));
        assert!(!arch_ok(&header, &AlwaysOne, InstallFlags::empty()));
    }
}
