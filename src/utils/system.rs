// file: src/utils/system.rs
// version: 0.3.0
// guid: 8d2c5f70-4e19-4b68-a3d7-f05b9c318e46

//! Host system utility functions

use crate::Result;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Host system utility functions
pub struct SystemUtils;

impl SystemUtils {
    /// Get the hostname of the machine
    pub async fn hostname() -> Result<String> {
        let output = Command::new("hostname").output().await.map_err(|e| {
            crate::error::OnboardError::SystemError(format!("Failed to get hostname: {}", e))
        })?;

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Get the architecture of the machine
    pub fn machine_arch() -> &'static str {
        match std::env::consts::ARCH {
            "x86_64" => "x86_64",
            "aarch64" => "aarch64",
            other => {
                debug!("Unrecognized architecture: {}", other);
                "x86_64" // Default fallback
            }
        }
    }

    /// Check whether the invoking user may talk to the Docker daemon.
    ///
    /// Root always passes; otherwise the user must be a member of the
    /// `docker` group, either through the process group IDs or through the
    /// group's member list.
    pub fn ensure_docker_group() -> Result<()> {
        #[cfg(unix)]
        {
            if Self::is_root() || Self::is_user_in_docker_group() {
                return Ok(());
            }

            let user = std::env::var("USER")
                .or_else(|_| std::env::var("LOGNAME"))
                .unwrap_or_else(|_| "<user>".to_string());
            Err(crate::error::OnboardError::SystemError(format!(
                "The current user is not in the 'docker' group. Add the user to the group and \
                 restart the terminal: `sudo usermod -a -G docker {}`",
                user
            )))
        }

        #[cfg(not(unix))]
        {
            Ok(())
        }
    }

    /// Check if running as root
    #[cfg(unix)]
    pub fn is_root() -> bool {
        unsafe { libc::getuid() == 0 }
    }

    /// Check if the current user is a member of the 'docker' group
    #[cfg(unix)]
    pub fn is_user_in_docker_group() -> bool {
        let Ok(groups) = std::fs::read_to_string("/etc/group") else {
            return false;
        };
        // docker:x:<gid>:<member>,<member>
        let Some(entry) = groups.lines().find(|line| line.starts_with("docker:")) else {
            return false;
        };
        let fields: Vec<&str> = entry.split(':').collect();
        if fields.len() < 4 {
            return false;
        }
        let Ok(docker_gid) = fields[2].parse::<libc::gid_t>() else {
            return false;
        };

        let mut gids = vec![0 as libc::gid_t; 128];
        let count = unsafe { libc::getgroups(gids.len() as libc::c_int, gids.as_mut_ptr()) };
        if count > 0 && gids[..count as usize].contains(&docker_gid) {
            return true;
        }

        let username = std::env::var("USER")
            .or_else(|_| std::env::var("LOGNAME"))
            .unwrap_or_default();
        !username.is_empty() && fields[3].split(',').any(|member| member == username)
    }

    /// Expand `~` and make a user-supplied path absolute.
    ///
    /// Existing paths are canonicalized; paths that do not exist yet are
    /// anchored to the current directory without further rewriting.
    pub fn resolve_path(raw: &str) -> PathBuf {
        let expanded = shellexpand::tilde(raw).into_owned();
        let path = Path::new(&expanded);
        match path.canonicalize() {
            Ok(resolved) => resolved,
            Err(_) => {
                if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    std::env::current_dir()
                        .unwrap_or_else(|_| PathBuf::from("."))
                        .join(path)
                }
            }
        }
    }
}
