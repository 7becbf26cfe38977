use anyhow::Result;
use clap::{ArgGroup, Parser};
use poet::commands::{Mode, config::Config, run};
use std::path::PathBuf;

/// poet - Homebrew resource stanzas for Python packages
///
/// Looks up a package installed in the current Python environment, walks the
/// dependencies it declares, downloads each one from the package index and
/// prints Homebrew resource stanzas with their checksums.
///
/// Examples:
///   poet requests              # Stanzas for requests and its dependencies
///   poet -f httpie             # A complete formula for httpie
///   poet -s six nose           # Stanzas for the latest six and nose only
#[derive(Parser, Debug)]
#[command(
    name = "poet",
    version = env!("POET_VERSION"),
    about,
    group(
        ArgGroup::new("target")
            .required(true)
            .args(["single", "formula", "resources", "package"])
    )
)]
struct Cli {
    /// Generate a resource stanza for one or more packages, without considering dependencies
    #[arg(long, short = 's', value_name = "PACKAGE", num_args = 1..)]
    pub single: Vec<String>,

    /// Generate a complete formula for an installed package with its dependencies as resources
    #[arg(long, short = 'f', value_name = "PACKAGE")]
    pub formula: Option<String>,

    /// Generate resource stanzas for an installed package and its dependencies (default)
    #[arg(long, short = 'r', value_name = "PACKAGE")]
    pub resources: Option<String>,

    #[arg(value_name = "PACKAGE", hide = true)]
    pub package: Option<String>,

    /// Package index to query (defaults to https://pypi.org)
    #[arg(long = "index-url", env = "POET_INDEX_URL", value_name = "URL")]
    pub index_url: Option<String>,

    /// Site directory holding installed packages; repeatable (default: ask python3)
    #[arg(
        long = "site-packages",
        env = "POET_SITE_PACKAGES",
        value_name = "DIR",
        value_delimiter = ':'
    )]
    pub site_packages: Vec<PathBuf>,

    /// Python formula the generated formula depends on (defaults to python3)
    #[arg(long, value_name = "FORMULA")]
    pub python: Option<String>,
}

impl Cli {
    fn mode(&self) -> Mode {
        if !self.single.is_empty() {
            Mode::Single(self.single.clone())
        } else if let Some(name) = &self.formula {
            Mode::Formula(name.clone())
        } else {
            // The argument group guarantees one of these is set
            Mode::Resources(
                self.resources
                    .clone()
                    .or_else(|| self.package.clone())
                    .unwrap_or_default(),
            )
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let mode = cli.mode();

    let config = Config::new(
        poet::runtime::RealRuntime,
        cli.index_url,
        cli.site_packages,
        cli.python,
    )?;
    let output = run(&mode, config).await?;
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_positional_is_resources() {
        let cli = Cli::try_parse_from(["poet", "requests"]).unwrap();
        assert_eq!(cli.mode(), Mode::Resources("requests".into()));
    }

    #[test]
    fn test_cli_resources_flag() {
        let cli = Cli::try_parse_from(["poet", "-r", "requests"]).unwrap();
        assert_eq!(cli.mode(), Mode::Resources("requests".into()));
    }

    #[test]
    fn test_cli_formula_flag() {
        let cli = Cli::try_parse_from(["poet", "--formula", "httpie"]).unwrap();
        assert_eq!(cli.mode(), Mode::Formula("httpie".into()));
    }

    #[test]
    fn test_cli_single_many() {
        let cli = Cli::try_parse_from(["poet", "-s", "nose", "six"]).unwrap();
        assert_eq!(cli.mode(), Mode::Single(vec!["nose".into(), "six".into()]));
    }

    #[test]
    fn test_cli_modes_are_exclusive() {
        assert!(Cli::try_parse_from(["poet", "-f", "a", "-r", "b"]).is_err());
        assert!(Cli::try_parse_from(["poet", "-f", "a", "b"]).is_err());
        assert!(Cli::try_parse_from(["poet", "-r", "a", "b"]).is_err());
    }

    #[test]
    fn test_cli_requires_a_target() {
        assert!(Cli::try_parse_from(["poet"]).is_err());
    }

    #[test]
    fn test_cli_site_packages_and_index() {
        let cli = Cli::try_parse_from([
            "poet",
            "requests",
            "--site-packages",
            "/a",
            "--site-packages",
            "/b",
            "--index-url",
            "http://localhost:8080",
            "--python",
            "python@3.12",
        ])
        .unwrap();
        assert_eq!(
            cli.site_packages,
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
        assert_eq!(cli.index_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(cli.python.as_deref(), Some("python@3.12"));
    }

    #[test]
    fn test_cli_site_packages_delimited() {
        let cli = Cli::try_parse_from(["poet", "requests", "--site-packages", "/a:/b"]).unwrap();
        assert_eq!(
            cli.site_packages,
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
    }
}
