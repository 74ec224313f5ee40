use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Resolution tags published by the upstream MatCap collection.
pub const RESOLUTIONS: &[&str] = &["512", "1024"];

/// HTTP client parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Value sent as `User-Agent` on every request.
    pub user_agent: String,
    /// Seconds allowed for establishing a connection.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for the whole listing request.
    pub listing_timeout_secs: u64,
    /// Seconds allowed for one asset download (connect + body).
    pub item_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("matfetch/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout_secs: 15,
            listing_timeout_secs: 30,
            item_timeout_secs: 60,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }

    pub fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.listing_timeout_secs.max(1))
    }

    pub fn item_timeout(&self) -> Duration {
        Duration::from_secs(self.item_timeout_secs.max(1))
    }
}

/// Global configuration loaded from `~/.config/matfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatfetchConfig {
    /// Listing endpoint; `{tag}` is replaced with the resolution tag.
    pub listing_url: String,
    /// Only listing entries whose name ends with this (case-insensitive) are fetched.
    pub asset_extension: String,
    /// Assets land in `<target_root>/<tag>/`. Relative paths resolve against the working directory.
    pub target_root: PathBuf,
    /// Upper bound for the default worker count (when `--workers` is not given).
    pub max_default_workers: usize,
    /// How many individual failures the final report lists.
    pub failure_preview: usize,
    /// Optional HTTP tuning; if missing, built-in defaults are used.
    #[serde(default)]
    pub http: Option<HttpConfig>,
}

impl Default for MatfetchConfig {
    fn default() -> Self {
        Self {
            listing_url: "https://api.github.com/repos/nidorx/matcaps/contents/{tag}".to_string(),
            asset_extension: ".png".to_string(),
            target_root: PathBuf::from("viewer/assets/matcaps"),
            max_default_workers: 8,
            failure_preview: 10,
            http: None,
        }
    }
}

impl MatfetchConfig {
    /// HTTP settings, falling back to defaults when the section is absent.
    pub fn http(&self) -> HttpConfig {
        self.http.clone().unwrap_or_default()
    }

    /// Target directory for one resolution tag.
    pub fn target_dir(&self, tag: &str) -> PathBuf {
        self.target_root.join(tag)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("matfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MatfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MatfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MatfetchConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = MatfetchConfig::default();
        assert!(cfg.listing_url.contains("{tag}"));
        assert_eq!(cfg.asset_extension, ".png");
        assert_eq!(cfg.max_default_workers, 8);
        assert_eq!(cfg.failure_preview, 10);
        assert!(cfg.http.is_none());
        assert_eq!(
            cfg.target_dir("512"),
            PathBuf::from("viewer/assets/matcaps/512")
        );
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = MatfetchConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: MatfetchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.listing_url, cfg.listing_url);
        assert_eq!(parsed.target_root, cfg.target_root);
        assert_eq!(parsed.max_default_workers, cfg.max_default_workers);
    }

    #[test]
    fn config_toml_http_section() {
        let toml = r#"
            listing_url = "http://127.0.0.1:8080/list/{tag}"
            asset_extension = ".PNG"
            target_root = "/srv/matcaps"
            max_default_workers = 2
            failure_preview = 3

            [http]
            user_agent = "tester"
            connect_timeout_secs = 1
            listing_timeout_secs = 2
            item_timeout_secs = 0
        "#;
        let cfg: MatfetchConfig = toml::from_str(toml).unwrap();
        let http = cfg.http();
        assert_eq!(http.user_agent, "tester");
        assert_eq!(http.listing_timeout(), Duration::from_secs(2));
        // zero is clamped so curl never gets "no timeout"
        assert_eq!(http.item_timeout(), Duration::from_secs(1));
        assert_eq!(cfg.target_dir("1024"), PathBuf::from("/srv/matcaps/1024"));
    }

    #[test]
    fn missing_http_section_uses_defaults() {
        let cfg = MatfetchConfig::default();
        let http = cfg.http();
        assert!(http.user_agent.starts_with("matfetch/"));
        assert_eq!(http.item_timeout(), Duration::from_secs(60));
    }
}
