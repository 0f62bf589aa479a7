use anyhow::Result;
use clap::{Parser, Subcommand};
use kbase::conf::{self, DeployConfig};
use kbase::handle::HandleClient;
use kbase::md5sum::file_md5;
use kbase::shock::ShockClient;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    version,
    about = "kbase node utilities",
    long_about = "Upload, inspect and delete shock nodes against the deployment \
                  named by KB_DEPLOYMENT_CONFIG, authenticated via KB_AUTH_TOKEN."
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a local file and print the node id, checksum and size
    Upload {
        file: PathBuf,

        /// Also persist a handle for the new node
        #[arg(long, default_value = "false")]
        handle: bool,
    },
    /// Print metadata for an existing node
    Node { id: String },
    /// Delete a node
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let cfg = DeployConfig::from_env()?;
    let token = conf::auth_token()?;
    let shock = ShockClient::new(&cfg.shock_url, &token);

    match args.command {
        Command::Upload { file, handle } => {
            let local_md5 = file_md5(&file).await?;
            let node = shock.upload(&file).await?;
            println!("node {}", node.id);
            println!("md5  {}", node.md5);
            println!("size {}", node.size);
            if node.md5 != local_md5 {
                log::warn!("remote md5 {} != local md5 {}", node.md5, local_md5);
            }
            if handle {
                let handles = HandleClient::new(&cfg.handle_url, &token);
                let hid = handles
                    .persist_handle(&node.id, "shock", shock.url())
                    .await?;
                println!("handle {}", hid);
            }
        }
        Command::Node { id } => {
            let node = shock.get_node(&id).await?;
            println!("node {}", node.id);
            println!("md5  {}", node.md5);
            println!("size {}", node.size);
        }
        Command::Delete { id } => {
            shock.delete_node(&id).await?;
        }
    }

    Ok(())
}
