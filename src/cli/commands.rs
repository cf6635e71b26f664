// file: src/cli/commands.rs
// version: 0.3.0
// guid: 8c5f20b7-d194-4a36-bf08-62e9d3a71c45

//! Command implementations for the CLI

use crate::{
    cli::args::{Cli, Commands, CommonArgs},
    config::{ConfigLoader, ContainerConfig},
    container::ContainerInterface,
    Result,
};

/// Dispatch the parsed command line to its implementation
pub async fn dispatch(cli: Cli) -> Result<()> {
    let loader = ConfigLoader::new();
    let config = loader.load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Pull { common } => pull_command(config, common).await,
        Commands::Build { common } => build_command(config, common).await,
        Commands::Start { common } => start_command(config, common).await,
        Commands::Enter { common } => enter_command(config, common).await,
        Commands::Stop { common } => stop_command(config, common).await,
        Commands::Status { common, json } => status_command(config, common, json).await,
    }
}

async fn interface(config: ContainerConfig, common: &CommonArgs) -> Result<ContainerInterface> {
    ContainerInterface::new(
        config,
        &common.dir,
        &common.custom_model_path,
        common.use_alibaba_acr,
    )
    .await
}

/// Pull the docker image from the registry
pub async fn pull_command(config: ContainerConfig, common: CommonArgs) -> Result<()> {
    interface(config, &common).await?.pull().await
}

/// Build the docker image from the Dockerfile
pub async fn build_command(config: ContainerConfig, common: CommonArgs) -> Result<()> {
    interface(config, &common).await?.build().await
}

/// Create the container in detached mode
pub async fn start_command(config: ContainerConfig, common: CommonArgs) -> Result<()> {
    interface(config, &common).await?.start().await
}

/// Begin a bash session within the running container
pub async fn enter_command(config: ContainerConfig, common: CommonArgs) -> Result<()> {
    interface(config, &common).await?.enter().await
}

/// Stop the running container
pub async fn stop_command(config: ContainerConfig, common: CommonArgs) -> Result<()> {
    interface(config, &common).await?.stop().await
}

/// Show the container state as docker reports it
pub async fn status_command(
    config: ContainerConfig,
    common: CommonArgs,
    json_output: bool,
) -> Result<()> {
    let status = interface(config, &common).await?.status().await?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("Container: {}", status.name);
        println!("Image:     {}", status.image);
        match &status.state {
            Some(state) => println!("State:     {}", state),
            None => println!("State:     not created"),
        }
    }

    Ok(())
}
