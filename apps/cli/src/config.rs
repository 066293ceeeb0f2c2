use std::path::{Path, PathBuf};

use cliplet_http::ReqwestClient;
use tempfile::NamedTempFile;

const COOKIE_FILE: &str = "session.json";

/// Where the cli points and what it remembers between runs. The session
/// cookie handed out by login/signup is cached under the platform data dir
/// so separate invocations stay logged in.
#[derive(Debug, Clone)]
pub struct Config {
    base_url: String,
    data_dir: PathBuf,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct CookieCache {
    cookie: String,
}

impl Config {
    pub fn new(base_url: impl Into<String>) -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("cliplet");
        Self::with_data_dir(base_url, data_dir)
    }

    pub fn with_data_dir(base_url: impl Into<String>, data_dir: PathBuf) -> Self {
        Self {
            base_url: base_url.into(),
            data_dir,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn cookie_path(&self) -> PathBuf {
        self.data_dir.join(COOKIE_FILE)
    }

    pub fn load_cookie(&self) -> std::io::Result<Option<String>> {
        match std::fs::read_to_string(self.cookie_path()) {
            Ok(content) => {
                let cache: CookieCache = serde_json::from_str(&content)
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
                Ok(Some(cache.cookie))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn save_cookie(&self, cookie: &str) -> std::io::Result<()> {
        let content = serde_json::to_string_pretty(&CookieCache {
            cookie: cookie.to_string(),
        })
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        atomic_write(&self.cookie_path(), &content)
    }

    pub fn clear_cookie(&self) -> std::io::Result<()> {
        match std::fs::remove_file(self.cookie_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// HTTP client against the service, resuming the cached session if one
    /// exists.
    pub fn http(&self) -> ReqwestClient {
        match self.load_cookie() {
            Ok(Some(cookie)) => ReqwestClient::with_session_cookie(self.base_url.clone(), &cookie),
            Ok(None) => ReqwestClient::new(self.base_url.clone()),
            Err(e) => {
                tracing::warn!("ignoring unreadable session cache: {e}");
                ReqwestClient::new(self.base_url.clone())
            }
        }
    }
}

fn atomic_write(target: &Path, content: &str) -> std::io::Result<()> {
    let parent = target
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent dir"))?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    std::fs::write(temp.path(), content)?;
    temp.persist(target)?;
    Ok(())
}
