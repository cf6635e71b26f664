// file: src/docker/mod.rs
// version: 0.3.0
// guid: 3f9b1e67-8a24-4c50-b7d3-64e2a90f1c85

//! Thin wrapper around the external `docker` command
//!
//! The helper never interprets, retries or recovers from docker failures; it
//! composes one invocation per command and surfaces the exit status verbatim.

use crate::Result;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Wrapper for invoking the `docker` binary
pub struct DockerCli;

impl DockerCli {
    /// Fail fast when docker is not installed on the host
    pub fn ensure_installed() -> Result<()> {
        which::which("docker").map_err(|_| {
            crate::error::OnboardError::SystemError(
                "Docker is not installed! Please install Docker following \
                 https://docs.docker.com/engine/install/ubuntu/ and try again."
                    .to_string(),
            )
        })?;
        Ok(())
    }

    /// Run a docker query, capturing stdout.
    ///
    /// The exit status is deliberately ignored: queries such as
    /// `container inspect` on a missing container exit non-zero while still
    /// being a meaningful "not there" answer.
    pub async fn query(args: &[&str]) -> Result<String> {
        debug!("docker {}", args.join(" "));

        let output = Command::new("docker")
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                crate::error::OnboardError::DockerError(format!(
                    "Failed to run docker {}: {}",
                    args.first().copied().unwrap_or_default(),
                    e
                ))
            })?;

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run a docker command with inherited stdio, relaying the exit status.
    ///
    /// Used for everything long-running or interactive: pull, build, run,
    /// exec, stop. Output streams straight to the user's terminal.
    pub async fn run(args: &[String]) -> Result<()> {
        debug!("docker {}", args.join(" "));

        let subcommand = args.first().cloned().unwrap_or_default();
        let status = Command::new("docker").args(args).status().await.map_err(|e| {
            crate::error::OnboardError::DockerError(format!(
                "Failed to run docker {}: {}",
                subcommand, e
            ))
        })?;

        if !status.success() {
            return Err(crate::error::OnboardError::CommandError {
                command: format!("docker {}", subcommand),
                code: status.code().unwrap_or(1),
            });
        }

        Ok(())
    }

    /// Look up the local image ID for a pinned digest
    pub async fn image_id_for_digest(digest: &str) -> Result<Option<String>> {
        let listing =
            Self::query(&["images", "--digests", "--format", "{{.Digest}},{{.ID}}"]).await?;
        Ok(parse_image_id(&listing, digest))
    }

    /// Check whether an image with the pinned digest is present locally
    pub async fn image_present(digest: &str) -> Result<bool> {
        let listing = Self::query(&["images", "--digests", "--format", "{{.Digest}}"]).await?;
        Ok(listing.lines().any(|line| line.trim() == digest))
    }

    /// Report the container state as docker sees it (`running`, `exited`, ...)
    ///
    /// Returns `None` when docker does not know the container at all.
    pub async fn container_status(name: &str) -> Result<Option<String>> {
        let status = Self::query(&[
            "container",
            "inspect",
            "-f",
            "{{.State.Status}}",
            name,
        ])
        .await?;

        if status.is_empty() {
            Ok(None)
        } else {
            Ok(Some(status))
        }
    }

    /// Check if the container is currently running
    pub async fn is_running(name: &str) -> Result<bool> {
        Ok(Self::container_status(name).await?.as_deref() == Some("running"))
    }
}

/// Find the image ID paired with `digest` in `docker images --digests` output
fn parse_image_id(listing: &str, digest: &str) -> Option<String> {
    for line in listing.lines() {
        if let Some((line_digest, id)) = line.split_once(',') {
            if line_digest == digest && !id.is_empty() {
                return Some(id.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "sha256:70346dc9a0f22cb477da23819b38b195836de9871254c0b0e38514fcf845bdd0";

    #[test]
    fn test_parse_image_id_match() {
        // Arrange
        let listing = format!(
            "sha256:aaaa,1111badcafe\n{},f00dfeed1234\nsha256:bbbb,2222deadbeef",
            DIGEST
        );

        // Act
        let id = parse_image_id(&listing, DIGEST);

        // Assert
        assert_eq!(id.as_deref(), Some("f00dfeed1234"));
    }

    #[test]
    fn test_parse_image_id_no_match() {
        // Arrange
        let listing = "sha256:aaaa,1111badcafe\n<none>,2222deadbeef";

        // Act
        let id = parse_image_id(listing, DIGEST);

        // Assert
        assert!(id.is_none());
    }

    #[test]
    fn test_parse_image_id_empty_listing() {
        // Act
        let id = parse_image_id("", DIGEST);

        // Assert
        assert!(id.is_none());
    }

    #[test]
    fn test_ensure_installed_reports_actionable_error() {
        // Act
        let result = DockerCli::ensure_installed();

        // Assert
        if let Err(err) = result {
            assert!(err.to_string().contains("install Docker"));
        }
    }
}
