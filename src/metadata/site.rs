//! Locating the site directories of the Python installation.

use anyhow::{Result, bail};
use log::{debug, warn};
use std::path::PathBuf;

use crate::runtime::Runtime;

/// Interpreter asked for its site directories unless `POET_PYTHON_EXE` says otherwise.
const DEFAULT_PYTHON_EXE: &str = "python3";

const SITE_QUERY: &str = "import site\n\
dirs = site.getsitepackages() if hasattr(site, 'getsitepackages') else []\n\
dirs.append(site.getusersitepackages())\n\
print('\\n'.join(dirs))";

/// Decide which site directories to scan.
///
/// Explicit directories are used as given. Otherwise the interpreter is
/// asked, and if that fails the user site under the home directory is
/// globbed.
#[tracing::instrument(skip(runtime))]
pub fn discover_site_dirs<R: Runtime>(runtime: &R, explicit: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if !explicit.is_empty() {
        return Ok(explicit.to_vec());
    }

    let python = runtime
        .env_var("POET_PYTHON_EXE")
        .unwrap_or_else(|_| DEFAULT_PYTHON_EXE.to_string());

    match runtime.command_output(&python, &["-c".to_string(), SITE_QUERY.to_string()]) {
        Ok(output) => {
            let dirs: Vec<PathBuf> = output
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(PathBuf::from)
                .filter(|p| runtime.is_dir(p))
                .collect();
            if !dirs.is_empty() {
                debug!("{} reports site directories {:?}", python, dirs);
                return Ok(dirs);
            }
            warn!("{} reported no existing site directories", python);
        }
        Err(e) => warn!("Could not ask {} for its site directories: {:#}", python, e),
    }

    let Some(home) = runtime.home_dir() else {
        bail!("Cannot locate installed packages; pass --site-packages");
    };
    let pattern = format!("{}/.local/lib/python3*/site-packages", home.display());
    let dirs = runtime.glob(&pattern)?;
    if dirs.is_empty() {
        bail!("Cannot locate installed packages; pass --site-packages");
    }
    Ok(dirs)
}
