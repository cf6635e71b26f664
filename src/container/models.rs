// file: src/container/models.rs
// version: 0.3.0
// guid: e483b6d1-07f9-4c28-a5b0-39d6e1c82f57

//! Custom drone model mounting
//!
//! A custom model directory holds the Gazebo model as a subdirectory plus a
//! PX4 airframe startup file. Model subdirectories mount read-only into the
//! PX4 Gazebo model tree, airframe files into the SITL airframe tree, and the
//! airframe manifest (`CMakeLists.txt`) is regenerated so PX4 picks the new
//! airframes up.

use crate::{config, container::mounts::MountSpec, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Classified contents of a custom model directory
#[derive(Debug, Default)]
pub struct ModelScan {
    /// Gazebo model directories
    pub model_dirs: Vec<PathBuf>,
    /// PX4 airframe startup files
    pub airframe_files: Vec<PathBuf>,
}

/// Classify the entries of a custom model directory.
///
/// Subdirectories are Gazebo models; plain files are airframe files except
/// for `.yaml` metadata, which is ignored.
pub fn scan_model_dir(path: &Path) -> Result<ModelScan> {
    let mut scan = ModelScan::default();

    let entries = std::fs::read_dir(path).map_err(|e| {
        crate::error::OnboardError::ValidationError(format!(
            "Failed to read custom model directory {}: {}",
            path.display(),
            e
        ))
    })?;

    for entry in entries {
        let entry = entry?;
        let entry_path = entry.path();
        if entry_path.is_dir() {
            scan.model_dirs.push(entry_path);
        } else if entry_path.extension().map_or(true, |ext| ext != "yaml") {
            scan.airframe_files.push(entry_path);
        }
    }

    if scan.model_dirs.is_empty() {
        return Err(crate::error::OnboardError::ValidationError(format!(
            "No Gazebo model directory found in {}. Please check the model directory.",
            path.display()
        )));
    }
    if scan.airframe_files.is_empty() {
        return Err(crate::error::OnboardError::ValidationError(format!(
            "No airframe file found in {}. Please check the model airframe file.",
            path.display()
        )));
    }

    Ok(scan)
}

/// Splice airframe entries into the stock airframe manifest.
///
/// Each entry is inserted as a tab-indented line before the second-to-last
/// line, which lands it inside the trailing `px4_add_romfs_files(...)` block.
pub fn splice_airframe_entries(stock: &str, airframe_names: &[String]) -> String {
    let mut lines: Vec<String> = stock.lines().map(str::to_string).collect();
    for name in airframe_names {
        let at = lines.len().saturating_sub(2);
        lines.insert(at, format!("\t{}", name));
    }
    let mut result = lines.join("\n");
    result.push('\n');
    result
}

/// Mounts derived from the user's custom model directories
pub struct ModelMounts {
    pub mounts: Vec<MountSpec>,
}

/// Build the mount table for the given custom model paths.
///
/// Writes the regenerated airframe manifest next to the stock one in
/// `runtime_resources_dir` and mounts it over the container's copy exactly
/// once, regardless of how many model paths were given.
pub async fn prepare_model_mounts(
    runtime_resources_dir: &Path,
    model_paths: &[PathBuf],
) -> Result<ModelMounts> {
    let mut mounts = Vec::new();
    let mut airframe_names = Vec::new();

    let px4_path = Path::new(config::PX4_PATH);
    let models_target = px4_path.join(config::GAZEBO_MODELS_SUBDIR);
    let airframes_target = px4_path.join(config::AIRFRAMES_SUBDIR);

    for model_path in model_paths {
        let scan = scan_model_dir(model_path)?;

        for model_dir in &scan.model_dirs {
            let name = file_name(model_dir)?;
            let target = models_target.join(&name);
            info!(
                "Mounting custom drone model directory: {} to {}",
                model_dir.display(),
                target.display()
            );
            mounts.push(MountSpec::bind_readonly(model_dir, target));
        }

        for airframe_file in &scan.airframe_files {
            let name = file_name(airframe_file)?;
            let target = airframes_target.join(&name);
            info!(
                "Mounting custom drone airframe file: {} to {}",
                airframe_file.display(),
                target.display()
            );
            mounts.push(MountSpec::bind_readonly(airframe_file, target));
            airframe_names.push(name);
        }
    }

    if !airframe_names.is_empty() {
        let stock_path = runtime_resources_dir.join("model_CMakeLists.txt");
        let stock = tokio::fs::read_to_string(&stock_path).await.map_err(|e| {
            crate::error::OnboardError::ConfigError(format!(
                "Failed to read airframe manifest {}: {}",
                stock_path.display(),
                e
            ))
        })?;

        let spliced = splice_airframe_entries(&stock, &airframe_names);
        let mount_path = runtime_resources_dir.join("model_CMakeLists_mount.txt");
        tokio::fs::write(&mount_path, spliced).await?;

        mounts.push(MountSpec::bind_readonly(
            &mount_path,
            airframes_target.join("CMakeLists.txt"),
        ));
    }

    Ok(ModelMounts { mounts })
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            crate::error::OnboardError::ValidationError(format!(
                "Invalid model path: {}",
                path.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_model_dir(root: &Path) -> PathBuf {
        let model_path = root.join("my_drone");
        std::fs::create_dir_all(model_path.join("iris_depth")).unwrap();
        std::fs::write(model_path.join("4071_gazebo-classic_iris_depth"), b"#!/bin/sh\n").unwrap();
        std::fs::write(model_path.join("params.yaml"), b"mass: 1.5\n").unwrap();
        model_path
    }

    #[test]
    fn test_scan_classifies_entries() {
        // Arrange
        let temp_dir = TempDir::new().unwrap();
        let model_path = make_model_dir(temp_dir.path());

        // Act
        let scan = scan_model_dir(&model_path).unwrap();

        // Assert
        assert_eq!(scan.model_dirs.len(), 1);
        assert_eq!(scan.airframe_files.len(), 1);
        assert!(scan.model_dirs[0].ends_with("iris_depth"));
        assert!(scan.airframe_files[0].ends_with("4071_gazebo-classic_iris_depth"));
    }

    #[test]
    fn test_scan_requires_model_directory() {
        // Arrange
        let temp_dir = TempDir::new().unwrap();
        let model_path = temp_dir.path().join("broken");
        std::fs::create_dir_all(&model_path).unwrap();
        std::fs::write(model_path.join("4071_airframe"), b"").unwrap();

        // Act
        let result = scan_model_dir(&model_path);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_scan_requires_airframe_file() {
        // Arrange
        let temp_dir = TempDir::new().unwrap();
        let model_path = temp_dir.path().join("broken");
        std::fs::create_dir_all(model_path.join("only_model")).unwrap();
        std::fs::write(model_path.join("meta.yaml"), b"").unwrap();

        // Act
        let result = scan_model_dir(&model_path);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_scan_missing_directory() {
        // Act
        let result = scan_model_dir(Path::new("/nonexistent/model"));

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_splice_inserts_inside_romfs_block() {
        // Arrange
        let stock = "px4_add_romfs_files(\n\t4001_gz_x500\n)\n";

        // Act
        let spliced =
            splice_airframe_entries(stock, &["4071_gazebo-classic_iris_depth".to_string()]);

        // Assert
        let lines: Vec<&str> = spliced.lines().collect();
        assert_eq!(
            lines,
            vec![
                "px4_add_romfs_files(",
                "\t4071_gazebo-classic_iris_depth",
                "\t4001_gz_x500",
                ")",
            ]
        );
    }

    #[tokio::test]
    async fn test_prepare_model_mounts() {
        // Arrange
        let temp_dir = TempDir::new().unwrap();
        let model_path = make_model_dir(temp_dir.path());
        let resources_dir = temp_dir.path().join("runtime_resources");
        std::fs::create_dir_all(&resources_dir).unwrap();
        std::fs::write(
            resources_dir.join("model_CMakeLists.txt"),
            "px4_add_romfs_files(\n\t4001_gz_x500\n)\n",
        )
        .unwrap();

        // Act
        let model_mounts = prepare_model_mounts(&resources_dir, &[model_path])
            .await
            .unwrap();

        // Assert: model dir + airframe file + manifest, all read-only
        assert_eq!(model_mounts.mounts.len(), 3);
        assert!(model_mounts.mounts.iter().all(|mount| mount.read_only));
        let manifest_mount = model_mounts.mounts.last().unwrap();
        assert!(manifest_mount
            .target
            .ends_with("init.d-posix/airframes/CMakeLists.txt"));
        let written =
            std::fs::read_to_string(resources_dir.join("model_CMakeLists_mount.txt")).unwrap();
        assert!(written.contains("\t4071_gazebo-classic_iris_depth"));
    }

    #[tokio::test]
    async fn test_prepare_model_mounts_manifest_mounted_once() {
        // Arrange
        let temp_dir = TempDir::new().unwrap();
        let model_a = make_model_dir(temp_dir.path());
        let model_b = temp_dir.path().join("other_drone");
        std::fs::create_dir_all(model_b.join("x500_lidar")).unwrap();
        std::fs::write(model_b.join("4072_gazebo-classic_x500_lidar"), b"").unwrap();
        let resources_dir = temp_dir.path().join("runtime_resources");
        std::fs::create_dir_all(&resources_dir).unwrap();
        std::fs::write(
            resources_dir.join("model_CMakeLists.txt"),
            "px4_add_romfs_files(\n\t4001_gz_x500\n)\n",
        )
        .unwrap();

        // Act
        let model_mounts = prepare_model_mounts(&resources_dir, &[model_a, model_b])
            .await
            .unwrap();

        // Assert
        let manifest_mounts = model_mounts
            .mounts
            .iter()
            .filter(|mount| mount.target.ends_with("airframes/CMakeLists.txt"))
            .count();
        assert_eq!(manifest_mounts, 1);
        // Two model dirs + two airframes + one manifest
        assert_eq!(model_mounts.mounts.len(), 5);
    }
}
