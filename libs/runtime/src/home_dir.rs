use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomeDirError {
    #[error("cannot determine the user {0} directory")]
    NoHome(&'static str),

    #[error("home_dir must be absolute or start with '~', got '{0}'")]
    Relative(String),

    #[error("failed to create home_dir '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn user_home() -> Result<PathBuf, HomeDirError> {
    dirs::home_dir().ok_or(HomeDirError::NoHome("home"))
}

/// Base for the default home_dir: `%APPDATA%` on Windows, the user home elsewhere.
fn platform_base() -> Result<PathBuf, HomeDirError> {
    #[cfg(target_os = "windows")]
    {
        dirs::config_dir().ok_or(HomeDirError::NoHome("config"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        user_home()
    }
}

/// Resolve the server home directory.
///
/// `None` means the platform default `<base>/<default_subdir>`. A leading
/// `~` is expanded against the user home; any other value must be absolute.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf, HomeDirError> {
    let path = match configured {
        None => platform_base()?.join(default_subdir),
        Some(raw) => expand(&raw)?,
    };

    if create {
        std::fs::create_dir_all(&path).map_err(|source| HomeDirError::Create {
            path: path.clone(),
            source,
        })?;
    }
    Ok(path)
}

fn expand(raw: &str) -> Result<PathBuf, HomeDirError> {
    if raw == "~" {
        return user_home();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(user_home()?.join(rest));
    }
    let p = Path::new(raw);
    if p.is_absolute() {
        Ok(p.to_path_buf())
    } else {
        Err(HomeDirError::Relative(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absolute_path_is_kept_and_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("a/b");
        let resolved =
            resolve_home_dir(Some(target.to_string_lossy().to_string()), ".tracker", true)
                .unwrap();
        assert_eq!(resolved, target);
        assert!(target.is_dir());
    }

    #[test]
    fn relative_path_is_rejected() {
        let err = resolve_home_dir(Some("data/tracker".into()), ".tracker", false).unwrap_err();
        assert!(matches!(err, HomeDirError::Relative(_)));
    }

    #[cfg(unix)]
    #[test]
    fn default_resolves_without_home_variable() {
        let saved = std::env::var_os("HOME");
        std::env::remove_var("HOME");

        let resolved = resolve_home_dir(None, ".tracker", false);
        let expected = dirs::home_dir().map(|h| h.join(".tracker"));

        if let Some(home) = saved {
            std::env::set_var("HOME", home);
        }

        // dirs falls back to the password database when HOME is unset
        assert_eq!(resolved.ok(), expected);
        assert_eq!(
            expand("~/.x").ok(),
            dirs::home_dir().map(|h| h.join(".x"))
        );
    }
}
