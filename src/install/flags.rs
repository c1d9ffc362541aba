//! Install-time behavior flags (spec.md §6 "External interfaces").

use bitflags::bitflags;

bitflags! {
    /// Mirrors rpm's `rpmtransFlags`/`rpmInstallFlags` surface, trimmed to
    /// the bits spec.md's core actually branches on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InstallFlags: u32 {
        /// Run the whole pipeline up to and including the already-installed
        /// and platform checks, then stop before any filesystem mutation.
        const TEST = 1 << 0;
        /// Treat an equal-or-older installed version as replaceable rather
        /// than fatal.
        const UPGRADE = 1 << 1;
        /// Within an upgrade, also allow installing a version older than
        /// what's already on disk.
        const UPGRADETOOLD = 1 << 2;
        /// Allow reinstalling an already-installed exact version.
        const REPLACEPKG = 1 << 3;
        /// Allow taking ownership of files another installed package owns.
        const REPLACEFILES = 1 << 4;
        /// Skip the arch compatibility gate.
        const NOARCH = 1 << 5;
        /// Skip the OS compatibility gate.
        const NOOS = 1 << 6;
        /// Skip pre/post scriptlet execution.
        const NOSCRIPTS = 1 << 7;
        /// Skip files flagged DOC.
        const NODOCS = 1 << 8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinable() {
        let flags = InstallFlags::UPGRADE | InstallFlags::REPLACEFILES;
        assert!(flags.contains(InstallFlags::UPGRADE));
        assert!(flags.contains(InstallFlags::REPLACEFILES));
        assert!(!flags.contains(InstallFlags::TEST));
    }

    #[test]
    fn default_is_empty() {
        assert_eq!(InstallFlags::default(), InstallFlags::empty());
    }
}
