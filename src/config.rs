// Credentials file handling. The file lives in the user's home directory
// and is plain YAML:
//
//     ---
//     username: me
//     password: secret

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const CREDENTIALS_FILE: &str = ".twitter";

/// Account credentials. Built once at startup and handed to `ApiClient`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `~/.twitter`
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine the home directory")?;
        Ok(home.join(CREDENTIALS_FILE))
    }

    /// Read and parse the credentials file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials file {}", path.display()))?;
        let creds: Credentials = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse credentials file {}", path.display()))?;
        log::debug!("loaded credentials for {} from {}", creds.username, path.display());
        Ok(creds)
    }

    /// Write the credentials to `path`, replacing any existing file. On unix
    /// the file ends up readable by its owner only, including when it
    /// already existed with wider permissions.
    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Serializing credentials")?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(path)
            .with_context(|| format!("Failed to create credentials file {}", path.display()))?;
        #[cfg(unix)]
        {
            use std::fs::Permissions;
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to restrict {}", path.display()))?;
        }
        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write credentials file {}", path.display()))?;
        log::info!("saved credentials for {} to {}", self.username, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_yaml_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".twitter");
        std::fs::write(&path, "---\nusername: me\npassword: secret\n").unwrap();

        let creds = Credentials::load(&path).unwrap();
        assert_eq!(creds, Credentials::new("me", "secret"));
    }

    #[test]
    fn test_load_missing_password_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".twitter");
        std::fs::write(&path, "username: me\n").unwrap();

        assert!(Credentials::load(&path).is_err());
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope");

        let err = Credentials::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("nope"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".twitter");
        let creds = Credentials::new("alice", "hunter2");

        creds.save(&path).unwrap();
        assert_eq!(Credentials::load(&path).unwrap(), creds);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join(".twitter");
        std::fs::write(&path, "username: old\npassword: old\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        Credentials::new("alice", "hunter2").save(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_debug_redacts_password() {
        let shown = format!("{:?}", Credentials::new("alice", "hunter2"));
        assert!(shown.contains("alice"));
        assert!(!shown.contains("hunter2"));
    }
}
