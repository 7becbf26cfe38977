use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;

/// poet-lint - alphabetize and tidy Homebrew resource stanzas
#[derive(Parser, Debug)]
#[command(name = "poet-lint", version = env!("POET_VERSION"), about)]
struct Cli {
    /// File containing resource stanzas, or - for standard input
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let text = if cli.file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read standard input")?;
        buf
    } else {
        std::fs::read_to_string(&cli.file)
            .with_context(|| format!("Failed to read {:?}", cli.file))?
    };

    println!("{}", poet::render::lint(&text)?);
    Ok(())
}
