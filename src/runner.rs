//! External command execution (xrandr and the post-set script)

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use crate::constants::xrandr;

/// Runs commands, or only prints them in dry-run mode
#[derive(Debug, Clone, Copy)]
pub struct Runner {
    pub dry_run: bool,
}

impl Runner {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Run `program` with `args`, failing on a non-zero exit status
    pub fn run(&self, program: &str, args: &[String]) -> Result<()> {
        if self.dry_run {
            println!("{}", format_command(program, args));
            return Ok(());
        }

        debug!(program, ?args, "running command");
        let status = Command::new(program)
            .args(args)
            .status()
            .context(format!("Failed to run {program}"))?;
        if !status.success() {
            bail!("{program} failed ({status})");
        }
        Ok(())
    }

    pub fn run_xrandr(&self, args: &[String]) -> Result<()> {
        self.run(xrandr::COMMAND, args)
    }

    /// Run the post-set script when it exists and is executable
    pub fn run_post_set(&self, script: &Path) -> Result<()> {
        if !is_executable(script) {
            debug!(path = %script.display(), "no executable post-set script");
            return Ok(());
        }
        info!(path = %script.display(), "Running post set script");
        println!("Running post set scripts");
        self.run(&script.to_string_lossy(), &[])
    }
}

/// Dry-run rendering: `+ program arg...`
pub fn format_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .fold(String::from("+"), |mut line, part| {
            line.push(' ');
            line.push_str(part);
            line
        })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_command() {
        let args = vec!["--output".to_string(), "DP-1".to_string(), "--auto".to_string()];
        assert_eq!(format_command("xrandr", &args), "+ xrandr --output DP-1 --auto");
        assert_eq!(format_command("/home/u/.xrpm/post", &[]), "+ /home/u/.xrpm/post");
    }

    #[test]
    fn test_dry_run_never_spawns() {
        let runner = Runner::new(true);
        assert!(runner.run("definitely-not-a-real-program-xrpm", &[]).is_ok());
    }

    #[test]
    fn test_missing_program_fails() {
        let runner = Runner::new(false);
        assert!(runner.run("definitely-not-a-real-program-xrpm", &[]).is_err());
    }

    #[test]
    fn test_post_set_skips_missing_script() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Runner::new(false);
        assert!(runner.run_post_set(&dir.path().join("post")).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_post_set_requires_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("post");
        std::fs::write(&script, "#!/bin/sh\nexit 1\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!is_executable(&script));
        // Not executable: skipped even though it would fail
        assert!(Runner::new(false).run_post_set(&script).is_ok());

        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert!(is_executable(&script));
        assert!(Runner::new(true).run_post_set(&script).is_ok());
    }
}
