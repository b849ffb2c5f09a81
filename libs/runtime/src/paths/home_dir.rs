use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// Platform base directory used when no explicit home dir is configured.
/// Windows: `%APPDATA%`, everything else: `$HOME`.
fn platform_base() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    let from_env = std::env::var_os("APPDATA").map(PathBuf::from);
    #[cfg(not(target_os = "windows"))]
    let from_env = std::env::var_os("HOME").map(PathBuf::from);

    from_env
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow!("cannot determine the user's home directory"))
}

fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return platform_base();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_base()?.join(rest));
    }
    Ok(PathBuf::from(raw))
}

/// Resolve the server home directory into an absolute path.
///
/// - `None` resolves to `<platform base>/<default_subdir>`.
/// - A leading `~` is expanded; relative paths are anchored at the current dir.
/// - With `create`, the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let path = match configured {
        Some(raw) => expand_tilde(raw.trim())?,
        None => platform_base()?.join(default_subdir),
    };

    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .context("cannot read current directory")?
            .join(path)
    };

    if create {
        ensure_dir(&path)?;
    }
    Ok(path)
}

fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("failed to create home dir {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absolute_path_is_kept_and_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("nested").join("home");
        let resolved =
            resolve_home_dir(Some(target.to_string_lossy().to_string()), ".crm", true).unwrap();
        assert_eq!(resolved, target);
        assert!(target.is_dir());
    }

    #[test]
    fn relative_path_is_anchored_at_cwd() {
        let resolved = resolve_home_dir(Some("rel/dir".into()), ".crm", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("rel/dir"));
    }
}
