//! Arch/OS compatibility scoring (spec.md §4.1, §1 collaborator list).
//!
//! Legacy headers carry an 8-bit numeric arch/OS id (`RawLead.archnum`,
//! `osnum` in the teacher's `Lead`/`RawLead`); modern headers carry a
//! string tag (`ARCH`, `OS`). Scoring only matters for the string form --
//! the legacy numeric form is a simple equality test against the running
//! arch/OS id, done by the orchestrator itself (spec.md §4.1).

/// Yields a non-zero score if the running system can run packages built
/// for `arch`, zero otherwise. Mirrors the real rpmrc `arch_canon` table:
/// an exact match scores highest, a compatible 32/64-bit pairing scores
/// lower, anything else scores zero.
pub trait ArchScorer {
    fn score(&self, arch: &str) -> u32;
}

/// OS compatibility scoring for the string form of the OS tag. The
/// original treats the legacy numeric OS tag as always compatible (spec.md
/// §4.1); only the string form goes through a scorer at all.
pub trait OsScorer {
    fn score(&self, os: &str) -> u32;
}

/// Default scorer: the architecture/OS this binary was built for, plus a
/// short list of compatible fallbacks (e.g. an i686 package installs fine
/// on x86_64).
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningSystem;

const COMPATIBLE_ARCHES: &[&[&str]] = &[
    &["x86_64", "amd64"],
    &["i386", "i486", "i586", "i686", "athlon"],
    &["aarch64", "arm64"],
    &["noarch"],
];

impl ArchScorer for RunningSystem {
    fn score(&self, arch: &str) -> u32 {
        let running = std::env::consts::ARCH;
        if arch.eq_ignore_ascii_case(running) || arch.eq_ignore_ascii_case("noarch") {
            return 10;
        }
        for family in COMPATIBLE_ARCHES {
            if family.iter().any(|a| a.eq_ignore_ascii_case(running))
                && family.iter().any(|a| a.eq_ignore_ascii_case(arch))
            {
                return 5;
            }
        }
        0
    }
}

impl OsScorer for RunningSystem {
    fn score(&self, os: &str) -> u32 {
        let running = match std::env::consts::OS {
            "linux" => "linux",
            "macos" => "darwin",
            other => other,
        };
        if os.eq_ignore_ascii_case(running) {
            10
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_arch_scores_nonzero() {
        let scorer = RunningSystem;
        assert!(scorer.score(std::env::consts::ARCH) > 0);
    }

    #[test]
    fn unknown_arch_scores_zero() {
        let scorer = RunningSystem;
        assert_eq!(scorer.score("sparc64-unknown-exotic"), 0);
    }

    #[test]
    fn noarch_always_scores() {
        let scorer = RunningSystem;
        assert!(scorer.score("noarch") > 0);
    }
}
