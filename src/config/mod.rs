// file: src/config/mod.rs
// version: 0.3.0
// guid: a7e24c09-6b51-4df8-92c3-0e87b5d16f42

//! Configuration for the onboard environment container
//!
//! Project defaults live here as constants; a `ContainerConfig` carries the
//! effective settings and can be overridden from a YAML file loaded through
//! [`loader::ConfigLoader`].

pub mod loader;

pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Docker Hub repository for the onboard environment image
pub const DOCKER_HUB_REPOSITORY: &str = "deathhorn/onboard_env";

/// Alibaba ACR mirror repository, for hosts behind restricted networks
pub const ALIBABA_ACR_REPOSITORY: &str =
    "crpi-jq3nu6qbricb9zcb.cn-beijing.personal.cr.aliyuncs.com/zxh_in_bitac/drones";

/// Image version tag
pub const IMAGE_VERSION: &str = "deploy-v0.3";

/// Pinned content digest of the release image
pub const IMAGE_DIGEST: &str =
    "sha256:70346dc9a0f22cb477da23819b38b195836de9871254c0b0e38514fcf845bdd0";

/// Name given to the running container
pub const CONTAINER_NAME: &str = "onboard_env";

/// In-container path the host workspace is mounted at
pub const WORKSPACE_TARGET: &str = "/root/ws/workspace";

/// In-container PX4 source tree
pub const PX4_PATH: &str = "/root/ws/PX4-Autopilot";

/// Gazebo classic model directory inside the PX4 tree
pub const GAZEBO_MODELS_SUBDIR: &str =
    "Tools/simulation/gazebo-classic/sitl_gazebo-classic/models";

/// SITL airframe directory inside the PX4 tree
pub const AIRFRAMES_SUBDIR: &str = "ROMFS/px4fmu_common/init.d-posix/airframes";

/// SSH port the container's sshd listens on
pub const SSH_PORT: u16 = 2222;

/// ROS master / simulation port
pub const ROS_MASTER_PORT: u16 = 11311;

/// Default root password baked into the image (documented, not secret)
pub const DEFAULT_ROOT_PASSWORD: &str = "letmein";

/// Container network mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkMode {
    Host,
    Bridge,
}

impl NetworkMode {
    /// Get the network mode as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkMode::Host => "host",
            NetworkMode::Bridge => "bridge",
        }
    }
}

/// Effective settings for the container helper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Docker Hub repository
    pub repository: String,
    /// Alibaba ACR mirror repository
    pub acr_repository: String,
    /// Image version tag
    pub version: String,
    /// Pinned image digest
    pub digest: String,
    /// Container name
    pub container_name: String,
    /// Container network mode; ports are only published in bridge mode
    pub network: NetworkMode,
    /// Host port forwarded to the container's sshd
    pub ssh_port: u16,
    /// Host port forwarded to the ROS master
    pub ros_master_port: u16,
    /// Docker build context directory
    pub context_dir: PathBuf,
    /// Dockerfile used by `build`
    pub dockerfile: PathBuf,
    /// Directory holding files mounted into the container at start
    pub runtime_resources_dir: PathBuf,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            repository: DOCKER_HUB_REPOSITORY.to_string(),
            acr_repository: ALIBABA_ACR_REPOSITORY.to_string(),
            version: IMAGE_VERSION.to_string(),
            digest: IMAGE_DIGEST.to_string(),
            container_name: CONTAINER_NAME.to_string(),
            network: NetworkMode::Host,
            ssh_port: SSH_PORT,
            ros_master_port: ROS_MASTER_PORT,
            context_dir: PathBuf::from("resources"),
            dockerfile: PathBuf::from("dockerfiles/Dockerfile"),
            runtime_resources_dir: PathBuf::from("runtime_resources"),
        }
    }
}

impl ContainerConfig {
    /// Full image name for the selected registry
    pub fn image_name(&self, use_alibaba_acr: bool) -> String {
        let repository = if use_alibaba_acr {
            &self.acr_repository
        } else {
            &self.repository
        };
        format!("{}:{}", repository, self.version)
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.repository.is_empty() || self.acr_repository.is_empty() {
            return Err(crate::error::OnboardError::ValidationError(
                "Image repository must not be empty".to_string(),
            ));
        }
        if self.version.is_empty() {
            return Err(crate::error::OnboardError::ValidationError(
                "Image version tag must not be empty".to_string(),
            ));
        }
        if !self.digest.starts_with("sha256:") {
            return Err(crate::error::OnboardError::ValidationError(format!(
                "Image digest must be a sha256 digest, got '{}'",
                self.digest
            )));
        }
        if self.container_name.is_empty() {
            return Err(crate::error::OnboardError::ValidationError(
                "Container name must not be empty".to_string(),
            ));
        }
        if self.ssh_port == 0 || self.ros_master_port == 0 {
            return Err(crate::error::OnboardError::ValidationError(
                "Forwarded ports must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
