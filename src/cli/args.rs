// file: src/cli/args.rs
// version: 0.3.0
// guid: 7d41f5a9-0b83-4c62-9e57-f1a06d28b374

//! Command line argument definitions

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "onboard-env")]
#[command(
    about = "Helper for the drone onboard simulation container. Run `docker login \
             --username=zxhomo crpi-jq3nu6qbricb9zcb.cn-beijing.personal.cr.aliyuncs.com` \
             to log in to the Alibaba ACR registry."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a YAML config overriding the project defaults
    #[arg(long, global = true)]
    pub config: Option<String>,
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// The directory to be mounted in the container
    #[arg(short = 'd', long, default_value = ".")]
    pub dir: String,

    /// Whether to pull from the Alibaba ACR service instead of Docker Hub
    #[arg(short = 'a', long)]
    pub use_alibaba_acr: bool,

    /// Path to a custom drone model directory; may be given multiple times
    #[arg(short = 'c', long = "custom-model-path")]
    pub custom_model_path: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pull the docker image from the registry
    Pull {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Build the docker image from the Dockerfile
    Build {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Create the container in detached mode
    Start {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Begin a new bash process within the running container
    Enter {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Stop the docker container and remove it
    Stop {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Show the container state as docker reports it
    Status {
        #[command(flatten)]
        common: CommonArgs,

        #[arg(long)]
        json: bool,
    },
}
