use anyhow::{bail, Result};
use clap::Parser;
use scriptconf::{cli::ConfigArgs, ConfigTree};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "confdump")]
#[command(about = "Load a Lua config script and print what it produced", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Print only the value at this dotted key path
    #[arg(short, long, value_name = "KEY")]
    key: Option<String>,

    /// Print every leaf key instead of values
    #[arg(long, conflicts_with = "key")]
    keys: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut tree = ConfigTree::new();
    match cli.config.apply("confdump", &mut tree)? {
        Some(path) => tracing::info!("config: {}", path.display()),
        None => tracing::warn!("no config loaded"),
    }

    if cli.keys {
        for key in tree.keys() {
            println!("{}", key);
        }
        return Ok(());
    }

    if let Some(key) = &cli.key {
        if !tree.contains(key) {
            bail!("key not found: {}", key);
        }
        let value = tree.get(key)?;
        println!("{}", serde_json::to_string_pretty(value)?);
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(tree.root())?);
    Ok(())
}
