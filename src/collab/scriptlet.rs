//! Scriptlet runner collaborator (spec.md §1): executes pre/post install
//! scripts with an integer argument giving the install count. Grounded on
//! `lib/install.c`'s `runScript`, which shells the scriptlet body out to
//! `/bin/sh -s` with the count as `$1` and chroots into `rootdir` first
//! when `rootdir` isn't `/`.

use std::io;
use std::path::Path;
use std::process::Command;

pub trait ScriptletRunner {
    /// Runs `script` (a shell script body, or `None` if the package has no
    /// scriptlet for this phase) inside `rootdir`, passing `arg` as `$1`.
    fn run(&self, rootdir: &Path, script: Option<&str>, arg: u32) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShellScriptletRunner;

impl ScriptletRunner for ShellScriptletRunner {
    fn run(&self, rootdir: &Path, script: Option<&str>, arg: u32) -> io::Result<()> {
        let Some(body) = script else {
            return Ok(());
        };
        if body.trim().is_empty() {
            return Ok(());
        }

        let mut command = Command::new("/bin/sh");
        command.arg("-s").arg("--").arg(arg.to_string());
        if rootdir != Path::new("/") {
            #[cfg(unix)]
            {
                use std::os::unix::process::CommandExt;
                let rootdir = rootdir.to_path_buf();
                unsafe {
                    command.pre_exec(move || {
                        nix::unistd::chroot(&rootdir).map_err(io::Error::from)?;
                        std::env::set_current_dir("/")?;
                        Ok(())
                    });
                }
            }
        }

        use std::io::Write;
        let mut child = command
            .stdin(std::process::Stdio::piped())
            .spawn()?;
        child
            .stdin
            .take()
            .expect("piped stdin")
            .write_all(body.as_bytes())?;
        let status = child.wait()?;
        if !status.success() {
            return Err(io::Error::other(format!(
                "scriptlet exited with status {status}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_script_is_a_noop() {
        let runner = ShellScriptletRunner;
        assert!(runner.run(Path::new("/"), None, 1).is_ok());
    }

    #[test]
    fn blank_script_is_a_noop() {
        let runner = ShellScriptletRunner;
        assert!(runner.run(Path::new("/"), Some("   \n"), 1).is_ok());
    }

    #[test]
    fn successful_script_runs() {
        let runner = ShellScriptletRunner;
        assert!(runner.run(Path::new("/"), Some("exit 0"), 1).is_ok());
    }

    #[test]
    fn failing_script_is_reported() {
        let runner = ShellScriptletRunner;
        assert!(runner.run(Path::new("/"), Some("exit 1"), 1).is_err());
    }

    #[test]
    fn script_arg_is_passed() {
        let runner = ShellScriptletRunner;
        assert!(
            runner
                .run(Path::new("/"), Some("test \"$1\" = \"3\""), 3)
                .is_ok()
        );
    }
}
