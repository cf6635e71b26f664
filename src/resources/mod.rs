// file: src/resources/mod.rs
// version: 0.3.0
// guid: 6a0dc4e7-53b8-4f91-8e26-b1f74d09c352

//! Build context resource downloads
//!
//! The Dockerfile copies two artifacts that are not committed to the
//! repository: the acados template renderer binary and the librealsense udev
//! rules. `build` fetches them on demand, retrying GitHub URLs through a
//! proxy mirror once when the direct download fails.

use crate::Result;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// acados template renderer used by the MPC solver generation inside the image
pub const T_RENDERER_URL: &str =
    "https://github.com/acados/tera_renderer/releases/download/v0.0.34/t_renderer-v0.0.34-linux";

/// udev rules granting the container access to RealSense cameras over USB
pub const REALSENSE_RULES_URL: &str =
    "https://github.com/IntelRealSense/librealsense/blob/master/config/99-realsense-libusb.rules";

/// Mirror prefix for GitHub downloads from restricted networks
pub const GH_PROXY_PREFIX: &str = "http://gh-proxy.com/";

/// Mirror URL for a GitHub download; `None` for anything else
pub fn proxied_url(url: &str) -> Option<String> {
    url.starts_with("https://github.com")
        .then(|| format!("{}{}", GH_PROXY_PREFIX, url))
}

/// Downloader for docker build context resources
pub struct ResourceFetcher {
    client: reqwest::Client,
}

impl ResourceFetcher {
    /// Create a new resource fetcher
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Make sure every build resource is present in the context directory
    pub async fn ensure_build_resources(&self, context_dir: &Path) -> Result<()> {
        tokio::fs::create_dir_all(context_dir).await?;

        self.fetch(T_RENDERER_URL, &context_dir.join("t_renderer"))
            .await?;
        self.fetch(
            REALSENSE_RULES_URL,
            &context_dir.join("99-realsense-libusb.rules"),
        )
        .await?;

        Ok(())
    }

    /// Download `url` to `dest` unless the file already exists.
    ///
    /// GitHub URLs get one retry through the proxy mirror when the direct
    /// download fails; other URLs surface the first error.
    pub async fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        if dest.exists() {
            info!("Resource {} already exists. Skipping download.", dest.display());
            return Ok(());
        }

        match self.download_with_progress(url, dest).await {
            Ok(()) => Ok(()),
            Err(e) => match proxied_url(url) {
                Some(mirror) => {
                    warn!("Download failed with error: {}. Retrying with proxy...", e);
                    self.download_with_progress(&mirror, dest).await
                }
                None => Err(e),
            },
        }
    }

    /// Download a file with a progress bar
    async fn download_with_progress(&self, url: &str, dest: &Path) -> Result<()> {
        info!("Downloading: {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(crate::error::OnboardError::NetworkError(format!(
                "Download of {} failed with status: {}",
                url,
                response.status()
            )));
        }

        let total_size = response.content_length().unwrap_or(0);

        let pb = ProgressBar::new(total_size);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut file = File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            pb.set_position(downloaded);
        }

        file.flush().await?;
        pb.finish_with_message("Download completed");

        info!("Downloaded to: {}", dest.display());
        Ok(())
    }
}

impl Default for ResourceFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_proxied_url_for_github() {
        // Act
        let mirror = proxied_url(T_RENDERER_URL).unwrap();

        // Assert
        assert!(mirror.starts_with("http://gh-proxy.com/https://github.com"));
    }

    #[test]
    fn test_proxied_url_rejects_other_hosts() {
        // Act & Assert
        assert!(proxied_url("https://example.com/file").is_none());
    }

    #[tokio::test]
    async fn test_fetch_skips_existing_file() {
        // Arrange
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("t_renderer");
        tokio::fs::write(&dest, b"cached").await.unwrap();

        let fetcher = ResourceFetcher::new();

        // Act: must return without touching the network
        let result = fetcher.fetch(T_RENDERER_URL, &dest).await;

        // Assert
        assert!(result.is_ok());
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"cached");
    }

    #[tokio::test]
    async fn test_ensure_build_resources_with_cached_files() {
        // Arrange
        let temp_dir = TempDir::new().unwrap();
        let context_dir = temp_dir.path().join("resources");
        tokio::fs::create_dir_all(&context_dir).await.unwrap();
        tokio::fs::write(context_dir.join("t_renderer"), b"bin")
            .await
            .unwrap();
        tokio::fs::write(context_dir.join("99-realsense-libusb.rules"), b"rules")
            .await
            .unwrap();

        let fetcher = ResourceFetcher::new();

        // Act
        let result = fetcher.ensure_build_resources(&context_dir).await;

        // Assert
        assert!(result.is_ok());
    }
}
