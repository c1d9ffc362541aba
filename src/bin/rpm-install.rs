//! CLI front-end over the install engine (spec.md §6 "External interfaces").
//! Thin: argument parsing, collaborator wiring, and the exit-code mapping
//! live here; every actual decision is made by `rpm_install_engine::install`.

use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result};
use clap::Parser;

use rpm_install_engine::collab::{ConfigVars, Md5Hasher, RpmVersionComparator, RunningSystem, ShellScriptletRunner, SystemUserResolver};
use rpm_install_engine::db::JsonPackageDatabase;
use rpm_install_engine::install::error::InstallError;
use rpm_install_engine::install::flags::InstallFlags;
use rpm_install_engine::install::{install_binary, install_source, Collaborators};
use rpm_install_engine::lead::Type as LeadType;
use rpm_install_engine::PackageFile;

#[derive(Debug, Parser)]
#[command(name = "rpm-install", about = "Install a binary or source package into a root tree")]
struct Args {
    /// Path to the package file to install.
    package: PathBuf,

    /// Target root directory; files are installed relative to this path.
    #[arg(long, default_value = "/")]
    root: PathBuf,

    /// Path to the package database file. Defaults to `<root>/var/lib/rpm-install/packages.json`.
    #[arg(long)]
    dbpath: Option<PathBuf>,

    /// Install under a different prefix than the package's own default.
    #[arg(long)]
    relocate: Option<String>,

    /// Run every check but make no changes to the filesystem or database.
    #[arg(long)]
    test: bool,

    /// Allow installing over an older, already-installed version.
    #[arg(long)]
    upgrade: bool,

    /// Within --upgrade, also allow installing an older version than what's installed.
    #[arg(long = "upgrade-to-old")]
    upgrade_to_old: bool,

    /// Allow reinstalling an identical version already installed.
    #[arg(long = "replace-pkg")]
    replace_pkg: bool,

    /// Allow taking ownership of files another installed package owns.
    #[arg(long = "replace-files")]
    replace_files: bool,

    /// Skip the architecture compatibility check.
    #[arg(long = "no-arch")]
    no_arch: bool,

    /// Skip the OS compatibility check.
    #[arg(long = "no-os")]
    no_os: bool,

    /// Skip running pre/post install scriptlets.
    #[arg(long = "no-scripts")]
    no_scripts: bool,

    /// Skip files marked as documentation.
    #[arg(long = "no-docs")]
    no_docs: bool,
}

impl Args {
    fn flags(&self) -> InstallFlags {
        let mut flags = InstallFlags::empty();
        flags.set(InstallFlags::TEST, self.test);
        flags.set(InstallFlags::UPGRADE, self.upgrade);
        flags.set(InstallFlags::UPGRADETOOLD, self.upgrade_to_old);
        flags.set(InstallFlags::REPLACEPKG, self.replace_pkg);
        flags.set(InstallFlags::REPLACEFILES, self.replace_files);
        flags.set(InstallFlags::NOARCH, self.no_arch);
        flags.set(InstallFlags::NOOS, self.no_os);
        flags.set(InstallFlags::NOSCRIPTS, self.no_scripts);
        flags.set(InstallFlags::NODOCS, self.no_docs);
        flags
    }

    fn db_path(&self) -> PathBuf {
        match &self.dbpath {
            Some(path) => path.clone(),
            None => self.root.join("var/lib/rpm-install/packages.json"),
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut package = PackageFile::open(&args.package).with_context(|| format!("opening {}", args.package.display()))?;

    let arch = RunningSystem;
    let hasher = Md5Hasher;
    let users = SystemUserResolver;
    let scripts = ShellScriptletRunner;
    let versions = RpmVersionComparator;
    let config = ConfigVars::default();
    let collab = Collaborators {
        arch_scorer: &arch,
        os_scorer: &arch,
        hasher: &hasher,
        users: &users,
        scripts: &scripts,
        versions: &versions,
        config: &config,
    };

    let progress = |installed: u64, total: u64| {
        log::debug!("installed {installed}/{total} bytes");
    };

    match package.lead.rpm_type {
        LeadType::Source => {
            let installed = install_source(&args.root, &mut package, &config, args.flags(), progress)?;
            match installed {
                Some(path) => println!("installed spec file {}", path.display()),
                None => println!("--test: nothing done"),
            }
        }
        LeadType::Binary => {
            let mut db = JsonPackageDatabase::open(args.db_path()).with_context(|| format!("opening database {}", args.db_path().display()))?;
            install_binary(&args.root, &mut db, &mut package, args.relocate.as_deref(), args.flags(), &collab, progress)?;
            println!("installed {}", args.package.display());
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(args) {
        eprintln!("error: {err:#}");
        let code = err.downcast_ref::<InstallError>().map_or(1, InstallError::exit_code);
        exit(code);
    }
}
