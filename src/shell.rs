/// Shell lookup and the spawn parameters handed to the terminal widget.

use crate::error::{Error, Result};
use nix::unistd::{getuid, User};
use std::ffi::OsStr;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub const SCROLLBACK_LINES: i64 = 10_000;
const FALLBACK_SHELL: &str = "/bin/sh";

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub shell: PathBuf,
    pub argv: Vec<String>,
    /// Inherited environment as `KEY=VALUE` strings.
    pub env: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub scrollback_lines: i64,
}

impl SpawnRequest {
    pub fn new(shell: PathBuf) -> Self {
        let argv = vec![shell.to_string_lossy().into_owned()];
        let env = std::env::vars_os()
            .map(|(k, v)| format!("{}={}", k.to_string_lossy(), v.to_string_lossy()))
            .collect();
        Self {
            shell,
            argv,
            env,
            working_dir: None,
            scrollback_lines: SCROLLBACK_LINES,
        }
    }

    /// Request for the current user's default shell, searched on `$PATH`.
    pub fn user_shell() -> Result<Self> {
        Self::for_shell(&default_shell())
    }

    /// Request for a named shell; bare names are searched on `$PATH`.
    pub fn for_shell(shell: &str) -> Result<Self> {
        let shell = resolve(shell, std::env::var_os("PATH").as_deref())?;
        Ok(Self::new(shell))
    }
}

/// `$SHELL`, else the passwd entry, else `/bin/sh`.
pub fn default_shell() -> String {
    let env_shell = std::env::var("SHELL").ok();
    let passwd_shell = match User::from_uid(getuid()) {
        Ok(Some(user)) => Some(user.shell.to_string_lossy().into_owned()),
        _ => None,
    };
    pick_shell(env_shell.as_deref(), passwd_shell.as_deref())
}

/// First non-blank candidate in lookup order, falling back to `/bin/sh`.
pub fn pick_shell(env_shell: Option<&str>, passwd_shell: Option<&str>) -> String {
    [env_shell, passwd_shell]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .unwrap_or(FALLBACK_SHELL)
        .to_string()
}

/// Resolve a shell name to an executable path. Names containing `/` are
/// taken as-is; bare names are searched on `path_var`.
pub fn resolve(shell: &str, path_var: Option<&OsStr>) -> Result<PathBuf> {
    let spawn_failed = |reason: &str| Error::SessionSpawnFailed {
        shell: shell.into(),
        reason: reason.into(),
    };

    if shell.is_empty() {
        return Err(spawn_failed("empty shell path"));
    }
    if shell.contains('/') {
        let path = PathBuf::from(shell);
        return if is_executable(&path) {
            Ok(path)
        } else {
            Err(spawn_failed("not an executable file"))
        };
    }
    let path_var = path_var.ok_or_else(|| spawn_failed("PATH is not set"))?;
    std::env::split_paths(path_var)
        .map(|dir| dir.join(shell))
        .find(|candidate| is_executable(candidate))
        .ok_or_else(|| spawn_failed("not found on PATH"))
}

fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fake_shell(dir: &Path, name: &str, mode: u32) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn test_resolve_absolute() {
        let dir = tempdir().unwrap();
        let sh = fake_shell(dir.path(), "mysh", 0o755);
        assert_eq!(resolve(sh.to_str().unwrap(), None).unwrap(), sh);
    }

    #[test]
    fn test_resolve_searches_path() {
        let empty = tempdir().unwrap();
        let bin = tempdir().unwrap();
        let sh = fake_shell(bin.path(), "mysh", 0o755);
        let path_var = std::env::join_paths([empty.path(), bin.path()]).unwrap();
        assert_eq!(resolve("mysh", Some(path_var.as_os_str())).unwrap(), sh);
    }

    #[test]
    fn test_resolve_rejects_non_executable() {
        let dir = tempdir().unwrap();
        let sh = fake_shell(dir.path(), "plain", 0o644);
        let err = resolve(sh.to_str().unwrap(), None).unwrap_err();
        assert!(matches!(err, Error::SessionSpawnFailed { .. }));
    }

    #[test]
    fn test_resolve_missing() {
        let dir = tempdir().unwrap();
        let path_var = dir.path().as_os_str().to_owned();
        assert!(matches!(
            resolve("no-such-shell", Some(path_var.as_os_str())),
            Err(Error::SessionSpawnFailed { .. })
        ));
        assert!(resolve("no-such-shell", None).is_err());
        assert!(resolve("", None).is_err());
    }

    #[test]
    fn test_spawn_request_defaults() {
        let req = SpawnRequest::new(PathBuf::from("/bin/bash"));
        assert_eq!(req.argv, vec!["/bin/bash".to_string()]);
        assert_eq!(req.scrollback_lines, 10_000);
        assert!(req.working_dir.is_none());
        assert!(req.env.iter().all(|kv| kv.contains('=')));
    }

    #[test]
    fn test_pick_shell_order() {
        assert_eq!(pick_shell(Some("/bin/zsh"), Some("/bin/bash")), "/bin/zsh");
        assert_eq!(pick_shell(None, Some("/bin/bash")), "/bin/bash");
        assert_eq!(pick_shell(Some("  "), Some("/bin/bash")), "/bin/bash");
        assert_eq!(pick_shell(None, Some("")), "/bin/sh");
        assert_eq!(pick_shell(Some(""), None), "/bin/sh");
        assert_eq!(pick_shell(None, None), "/bin/sh");
    }

    #[test]
    fn test_for_shell_absolute() {
        let dir = tempdir().unwrap();
        let sh = fake_shell(dir.path(), "mysh", 0o755);
        let req = SpawnRequest::for_shell(sh.to_str().unwrap()).unwrap();
        assert_eq!(req.shell, sh);
        assert_eq!(req.argv, vec![sh.display().to_string()]);
        assert!(SpawnRequest::for_shell("/definitely/not/a/shell").is_err());
    }

    #[test]
    fn test_default_shell_not_empty() {
        assert!(!default_shell().is_empty());
    }
}
