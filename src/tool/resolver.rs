//! Generator tool resolution
//!
//! Resolution order: explicit name from configuration (which itself honors
//! the `ION_CLI` environment variable) falling back to `ion`. A name
//! containing a path separator is taken as-is; a bare name is searched on
//! `PATH`. There is no fallback tool: a missing executable is a hard error
//! that names exactly what was searched for.

use super::ToolError;
use crate::config::IslgenConfig;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A generator tool that has been located on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTool {
    /// The name the tool was requested as ("ion", or the ION_CLI value)
    pub name: String,

    /// The executable path invocations will use
    pub path: PathBuf,

    /// Whether the name came from the ION_CLI environment override
    pub from_env: bool,
}

/// Resolves the generator tool for the given runtime configuration
pub fn resolve(config: &IslgenConfig) -> Result<ResolvedTool, ToolError> {
    let name = config.tool.clone();

    let path = if name.contains(std::path::MAIN_SEPARATOR) {
        let candidate = PathBuf::from(&name);
        if is_executable(&candidate) {
            Some(candidate)
        } else {
            None
        }
    } else {
        find_on_path(&name)
    };

    match path {
        Some(path) => {
            debug!(tool = %name, path = %path.display(), "resolved generator tool");
            Ok(ResolvedTool {
                name,
                path,
                from_env: config.tool_from_env,
            })
        }
        None => Err(ToolError::NotFound { name }),
    }
}

/// Searches PATH for an executable with the given name
fn find_on_path(name: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;

    for dir in env::split_paths(&path_var) {
        let candidate = dir.join(name);
        if is_executable(&candidate) {
            return Some(candidate);
        }
        #[cfg(windows)]
        {
            let candidate = dir.join(format!("{}.exe", name));
            if is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }

    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.is_file()
        && std::fs::metadata(path)
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn config_with_tool(tool: &str, from_env: bool) -> IslgenConfig {
        IslgenConfig {
            tool: tool.to_string(),
            tool_from_env: from_env,
            fingerprint_enabled: true,
            log_level: "info".to_string(),
        }
    }

    #[cfg(unix)]
    fn write_stub_executable(dir: &Path, name: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    struct PathGuard {
        old_value: Option<std::ffi::OsString>,
    }

    impl PathGuard {
        fn prepend(dir: &Path) -> Self {
            let old_value = env::var_os("PATH");
            let mut paths: Vec<PathBuf> = vec![dir.to_path_buf()];
            if let Some(ref old) = old_value {
                paths.extend(env::split_paths(old));
            }
            env::set_var("PATH", env::join_paths(paths).unwrap());
            Self { old_value }
        }
    }

    impl Drop for PathGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var("PATH", v),
                None => env::remove_var("PATH"),
            }
        }
    }

    #[test]
    #[serial]
    #[cfg(unix)]
    fn test_resolve_bare_name_from_path() {
        let dir = TempDir::new().unwrap();
        let stub = write_stub_executable(dir.path(), "ion");
        let _path = PathGuard::prepend(dir.path());

        let resolved = resolve(&config_with_tool("ion", false)).unwrap();

        assert_eq!(resolved.path, stub);
        assert_eq!(resolved.name, "ion");
        assert!(!resolved.from_env);
    }

    #[test]
    #[serial]
    #[cfg(unix)]
    fn test_resolve_explicit_path() {
        let dir = TempDir::new().unwrap();
        let stub = write_stub_executable(dir.path(), "ion-nightly");

        let resolved = resolve(&config_with_tool(stub.to_str().unwrap(), true)).unwrap();

        assert_eq!(resolved.path, stub);
        assert!(resolved.from_env);
    }

    #[test]
    #[serial]
    fn test_resolve_missing_tool_names_executable() {
        let err = resolve(&config_with_tool("definitely-not-a-real-tool", false)).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("definitely-not-a-real-tool"));
        assert!(message.contains("ION_CLI"));
    }

    #[test]
    #[serial]
    #[cfg(unix)]
    fn test_resolve_skips_non_executable_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ion"), "not executable").unwrap();
        let _path = PathGuard::prepend(dir.path());

        // A plain file without the executable bit must not resolve
        let result = resolve(&config_with_tool("ion", false));
        if let Ok(resolved) = result {
            assert_ne!(resolved.path, dir.path().join("ion"));
        }
    }
}
