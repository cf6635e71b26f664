// file: src/container/mod.rs
// version: 0.3.0
// guid: 1b9e47f2-6c05-4d83-9a61-e7f20c593b48

//! Container lifecycle orchestration
//!
//! Mirrors the docker CLI one-to-one: every operation composes a single
//! `docker` invocation from the configuration and the parsed flags, then
//! relays the wrapped command's outcome. The argument vectors are assembled
//! as plain data so flag derivation stays deterministic and testable.

pub mod models;
pub mod mounts;

pub use mounts::MountSpec;

use crate::{
    config::{self, ContainerConfig, NetworkMode},
    docker::DockerCli,
    resources::ResourceFetcher,
    utils::system::SystemUtils,
    Result,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Container state snapshot for the `status` command
#[derive(Debug, Serialize)]
pub struct ContainerStatus {
    pub name: String,
    pub image: String,
    /// docker's view of the container state; `None` when it does not exist
    pub state: Option<String>,
}

/// Helper for managing the onboard environment container
pub struct ContainerInterface {
    config: ContainerConfig,
    workspace: PathBuf,
    custom_model_paths: Vec<PathBuf>,
    use_alibaba_acr: bool,
    hostname: String,
}

impl ContainerInterface {
    /// Create the interface, resolving user-supplied paths and the hostname
    pub async fn new(
        config: ContainerConfig,
        workspace: &str,
        custom_model_paths: &[String],
        use_alibaba_acr: bool,
    ) -> Result<Self> {
        let hostname = SystemUtils::hostname().await?;
        Ok(Self::with_hostname(
            config,
            workspace,
            custom_model_paths,
            use_alibaba_acr,
            hostname,
        ))
    }

    /// Create the interface with a fixed hostname
    pub fn with_hostname(
        config: ContainerConfig,
        workspace: &str,
        custom_model_paths: &[String],
        use_alibaba_acr: bool,
        hostname: String,
    ) -> Self {
        Self {
            config,
            workspace: SystemUtils::resolve_path(workspace),
            custom_model_paths: custom_model_paths
                .iter()
                .map(|path| SystemUtils::resolve_path(path))
                .collect(),
            use_alibaba_acr,
            hostname,
        }
    }

    /// Full image name for the selected registry
    pub fn image_name(&self) -> String {
        self.config.image_name(self.use_alibaba_acr)
    }

    /// Resolved host workspace directory
    pub fn workspace(&self) -> &PathBuf {
        &self.workspace
    }

    /// Mount table every container start gets, before custom models
    pub fn base_mounts(&self) -> Vec<MountSpec> {
        let xauthority = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/root"))
            .join(".Xauthority");

        vec![
            MountSpec::bind(&self.workspace, config::WORKSPACE_TARGET),
            MountSpec::bind("/tmp/.X11-unix", "/tmp/.X11-unix"),
            MountSpec::bind(xauthority, "/root/.Xauthority"),
            MountSpec::bind(self.workspace.join("ros_log"), "/root/.ros/log"),
            MountSpec::bind_readonly(
                self.config.runtime_resources_dir.join("px4_setup.bash"),
                "/root/ws/px4_setup.bash",
            ),
        ]
    }

    /// Derive the `docker run` argument vector
    pub fn run_args(&self, image_id: &str, display: &str, mounts: &[MountSpec]) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "run".into(),
            "--rm".into(),
            "-dit".into(),
            "--name".into(),
            self.config.container_name.clone(),
            "--hostname".into(),
            self.hostname.clone(),
        ];
        args.extend(mounts::mount_args(mounts));
        args.push(format!("--env=DISPLAY={}", display));
        args.push(format!("--env=ROS_HOSTNAME={}", self.hostname));
        args.push(format!(
            "--env=ROS_MASTER_URI=http://{}:{}",
            self.hostname, self.config.ros_master_port
        ));
        args.push("--privileged".into()); // for USB ports access
        match self.config.network {
            NetworkMode::Host => args.push("--network=host".into()),
            NetworkMode::Bridge => {
                args.push("-p".into());
                args.push(format!("{}:{}", self.config.ssh_port, config::SSH_PORT));
                args.push("-p".into());
                args.push(format!(
                    "{}:{}",
                    self.config.ros_master_port,
                    config::ROS_MASTER_PORT
                ));
            }
        }
        args.push(image_id.to_string());
        args
    }

    /// Derive the `docker build` argument vector
    pub fn build_args(&self, proxy: Option<&str>) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "build".into(),
            "-t".into(),
            self.image_name(),
            "--network=host".into(),
            self.config.context_dir.display().to_string(),
            "-f".into(),
            self.config.dockerfile.display().to_string(),
        ];
        if let Some(proxy) = proxy {
            args.push("--build-arg".into());
            args.push(format!("PROXY_HOST={}", proxy));
        }
        args
    }

    /// Derive the `docker exec` argument vector
    pub fn exec_args(&self, display: &str) -> Vec<String> {
        vec![
            "exec".into(),
            "--interactive".into(),
            "--tty".into(),
            format!("--env=DISPLAY={}", display),
            self.config.container_name.clone(),
            "bash".into(),
        ]
    }

    /// Pull the image from the selected registry
    pub async fn pull(&self) -> Result<()> {
        if DockerCli::image_present(&self.config.digest).await? {
            info!(
                "The image '{}' already exists. No need to pull it again.",
                self.image_name()
            );
            return Ok(());
        }

        DockerCli::run(&["pull".to_string(), self.image_name()]).await
    }

    /// Build the image from the Dockerfile
    pub async fn build(&self) -> Result<()> {
        let fetcher = ResourceFetcher::new();
        fetcher
            .ensure_build_resources(&self.config.context_dir)
            .await?;

        let proxy = select_proxy(
            std::env::var("http_proxy").ok().as_deref(),
            std::env::var("https_proxy").ok().as_deref(),
        );
        match &proxy {
            Some(proxy) => info!("Using proxy {} for building the image.", proxy),
            None => warn!(
                "No proxy environment variables found. Building without proxy. The build may \
                 stall or fail if the network is restricted."
            ),
        }

        DockerCli::run(&self.build_args(proxy.as_deref())).await
    }

    /// Create the container in detached mode
    pub async fn start(&self) -> Result<()> {
        if DockerCli::is_running(&self.config.container_name).await? {
            info!(
                "The container '{}' is already running.",
                self.config.container_name
            );
            return Ok(());
        }

        let image_id = DockerCli::image_id_for_digest(&self.config.digest)
            .await?
            .ok_or_else(|| {
                crate::error::OnboardError::ImageError(format!(
                    "The image '{}' does not exist. Please pull or build it first by \
                     `onboard-env pull/build`.",
                    self.image_name()
                ))
            })?;
        info!("Starting the container from image {}...", image_id);

        // ROS writes its logs through this mount; the host side must exist
        tokio::fs::create_dir_all(self.workspace.join("ros_log")).await?;

        let mut mounts = self.base_mounts();
        if !self.custom_model_paths.is_empty() {
            let model_mounts = models::prepare_model_mounts(
                &self.config.runtime_resources_dir,
                &self.custom_model_paths,
            )
            .await?;
            mounts.extend(model_mounts.mounts);
        }

        DockerCli::run(&self.run_args(&image_id, &display(), &mounts)).await
    }

    /// Begin a bash session within the running container
    pub async fn enter(&self) -> Result<()> {
        if !DockerCli::is_running(&self.config.container_name).await? {
            return Err(crate::error::OnboardError::ContainerError(format!(
                "The container '{}' is not running.",
                self.config.container_name
            )));
        }

        info!(
            "Entering the existing '{}' container in a bash session...",
            self.config.container_name
        );
        DockerCli::run(&self.exec_args(&display())).await
    }

    /// Stop the running container
    pub async fn stop(&self) -> Result<()> {
        if !DockerCli::is_running(&self.config.container_name).await? {
            return Err(crate::error::OnboardError::ContainerError(format!(
                "Can't stop container '{}' as it is not running.",
                self.config.container_name
            )));
        }

        info!(
            "Stopping the launched docker container '{}'...",
            self.config.container_name
        );
        DockerCli::run(&["stop".to_string(), self.config.container_name.clone()]).await
    }

    /// Report the container state as docker sees it
    pub async fn status(&self) -> Result<ContainerStatus> {
        let state = DockerCli::container_status(&self.config.container_name).await?;
        Ok(ContainerStatus {
            name: self.config.container_name.clone(),
            image: self.image_name(),
            state,
        })
    }
}

/// Proxy forwarded into the build, http taking precedence over https
pub fn select_proxy(http_proxy: Option<&str>, https_proxy: Option<&str>) -> Option<String> {
    match (http_proxy, https_proxy) {
        (Some(http), _) if !http.is_empty() => Some(http.to_string()),
        (_, Some(https)) if !https.is_empty() => Some(https.to_string()),
        _ => None,
    }
}

fn display() -> String {
    std::env::var("DISPLAY").unwrap_or_else(|_| ":0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn interface_for(workspace: &TempDir) -> ContainerInterface {
        ContainerInterface::with_hostname(
            ContainerConfig::default(),
            workspace.path().to_str().unwrap(),
            &[],
            false,
            "drone-host".to_string(),
        )
    }

    #[test]
    fn test_run_args_host_network() {
        // Arrange
        let workspace = TempDir::new().unwrap();
        let interface = interface_for(&workspace);
        let mounts = vec![MountSpec::bind("/ws", "/root/ws/workspace")];

        // Act
        let args = interface.run_args("f00dfeed1234", ":1", &mounts);

        // Assert
        assert_eq!(
            args,
            vec![
                "run",
                "--rm",
                "-dit",
                "--name",
                "onboard_env",
                "--hostname",
                "drone-host",
                "--mount",
                "type=bind,source=/ws,target=/root/ws/workspace",
                "--env=DISPLAY=:1",
                "--env=ROS_HOSTNAME=drone-host",
                "--env=ROS_MASTER_URI=http://drone-host:11311",
                "--privileged",
                "--network=host",
                "f00dfeed1234",
            ]
        );
    }

    #[test]
    fn test_run_args_bridge_network_publishes_ports() {
        // Arrange
        let workspace = TempDir::new().unwrap();
        let mut config = ContainerConfig::default();
        config.network = NetworkMode::Bridge;
        let interface = ContainerInterface::with_hostname(
            config,
            workspace.path().to_str().unwrap(),
            &[],
            false,
            "drone-host".to_string(),
        );

        // Act
        let args = interface.run_args("f00dfeed1234", ":0", &[]);

        // Assert
        assert!(!args.contains(&"--network=host".to_string()));
        let joined = args.join(" ");
        assert!(joined.contains("-p 2222:2222"));
        assert!(joined.contains("-p 11311:11311"));
    }

    #[test]
    fn test_build_args_with_proxy() {
        // Arrange
        let workspace = TempDir::new().unwrap();
        let interface = interface_for(&workspace);

        // Act
        let args = interface.build_args(Some("http://127.0.0.1:7890"));

        // Assert
        assert_eq!(
            args,
            vec![
                "build",
                "-t",
                "deathhorn/onboard_env:deploy-v0.3",
                "--network=host",
                "resources",
                "-f",
                "dockerfiles/Dockerfile",
                "--build-arg",
                "PROXY_HOST=http://127.0.0.1:7890",
            ]
        );
    }

    #[test]
    fn test_build_args_without_proxy() {
        // Arrange
        let workspace = TempDir::new().unwrap();
        let interface = interface_for(&workspace);

        // Act
        let args = interface.build_args(None);

        // Assert
        assert!(!args.iter().any(|arg| arg == "--build-arg"));
    }

    #[test]
    fn test_exec_args() {
        // Arrange
        let workspace = TempDir::new().unwrap();
        let interface = interface_for(&workspace);

        // Act
        let args = interface.exec_args(":0");

        // Assert
        assert_eq!(
            args,
            vec![
                "exec",
                "--interactive",
                "--tty",
                "--env=DISPLAY=:0",
                "onboard_env",
                "bash",
            ]
        );
    }

    #[test]
    fn test_base_mounts_targets() {
        // Arrange
        let workspace = TempDir::new().unwrap();
        let interface = interface_for(&workspace);

        // Act
        let mounts = interface.base_mounts();

        // Assert
        let targets: Vec<String> = mounts
            .iter()
            .map(|mount| mount.target.display().to_string())
            .collect();
        assert_eq!(
            targets,
            vec![
                "/root/ws/workspace",
                "/tmp/.X11-unix",
                "/root/.Xauthority",
                "/root/.ros/log",
                "/root/ws/px4_setup.bash",
            ]
        );
        // Only the setup script is read-only
        assert!(mounts.last().unwrap().read_only);
        assert!(mounts[..4].iter().all(|mount| !mount.read_only));
    }

    #[test]
    fn test_workspace_path_passthrough() {
        // Arrange
        let workspace = TempDir::new().unwrap();
        let interface = interface_for(&workspace);

        // Act
        let mounts = interface.base_mounts();

        // Assert: the workspace source is the resolved argument, unmodified
        assert_eq!(
            mounts[0].source,
            workspace.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_image_name_respects_acr_flag() {
        // Arrange
        let workspace = TempDir::new().unwrap();
        let interface = ContainerInterface::with_hostname(
            ContainerConfig::default(),
            workspace.path().to_str().unwrap(),
            &[],
            true,
            "drone-host".to_string(),
        );

        // Act & Assert
        assert!(interface.image_name().starts_with("crpi-"));
    }

    #[test]
    fn test_select_proxy_http_precedence() {
        // Act & Assert
        assert_eq!(
            select_proxy(Some("http://a:1"), Some("http://b:2")),
            Some("http://a:1".to_string())
        );
        assert_eq!(
            select_proxy(None, Some("http://b:2")),
            Some("http://b:2".to_string())
        );
        assert_eq!(select_proxy(Some(""), Some("")), None);
        assert_eq!(select_proxy(None, None), None);
    }
}
