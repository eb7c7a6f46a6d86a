use crate::error::{PantryVisionError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENDPOINT_ENV: &str = "VISION_ENDPOINT";
pub const KEY_ENV: &str = "VISION_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub vision_endpoint: Option<String>,
    pub vision_key: Option<String>,
    pub api_version: String,
    pub language: String,
    pub listen_addr: String,
    pub max_upload_bytes: usize,
    pub timeout_seconds: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vision_endpoint: None,
            vision_key: None,
            api_version: "2023-10-01".into(),
            language: "en".into(),
            listen_addr: "0.0.0.0:7071".into(),
            max_upload_bytes: 20 * 1024 * 1024, // Vision API の画像サイズ上限
            timeout_seconds: 60,
            log_level: "info".into(),
        }
    }
}

/// Vision APIの接続情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionCredentials {
    pub endpoint: String,
    pub key: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// JSON文字列から読み込み（欠けた項目はデフォルト値）
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PantryVisionError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("pantry-vision").join("config.json"))
    }

    /// 接続情報を取得（環境変数を優先）
    ///
    /// どちらかが空なら起動時点でエラーにする
    pub fn vision_credentials(&self) -> Result<VisionCredentials> {
        self.credentials_with(|name| std::env::var(name).ok())
    }

    fn credentials_with<F>(&self, env: F) -> Result<VisionCredentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |name: &str, fallback: &Option<String>| {
            env(name)
                .or_else(|| fallback.clone())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        match (pick(ENDPOINT_ENV, &self.vision_endpoint), pick(KEY_ENV, &self.vision_key)) {
            (Some(endpoint), Some(key)) => Ok(VisionCredentials { endpoint, key }),
            _ => Err(PantryVisionError::MissingVisionConfig),
        }
    }

    pub fn set_endpoint(&mut self, endpoint: String) -> Result<()> {
        self.vision_endpoint = Some(endpoint);
        self.save()
    }

    pub fn set_key(&mut self, key: String) -> Result<()> {
        self.vision_key = Some(key);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_version, "2023-10-01");
        assert_eq!(config.listen_addr, "0.0.0.0:7071");
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
        assert!(config.vision_endpoint.is_none());
    }

    #[test]
    fn test_from_json_partial() {
        let config = Config::from_json(r#"{"language": "ja", "timeout_seconds": 5}"#).expect("読み込み失敗");
        assert_eq!(config.language, "ja");
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.api_version, "2023-10-01");
    }

    #[test]
    fn test_credentials_from_file() {
        let config = Config {
            vision_endpoint: Some("https://pantry.cognitiveservices.azure.com/".into()),
            vision_key: Some("file-key".into()),
            ..Default::default()
        };
        let creds = config.credentials_with(env_of(&[])).expect("接続情報があるはず");
        assert_eq!(creds.endpoint, "https://pantry.cognitiveservices.azure.com/");
        assert_eq!(creds.key, "file-key");
    }

    #[test]
    fn test_credentials_env_takes_precedence() {
        let config = Config {
            vision_endpoint: Some("https://file.example.com".into()),
            vision_key: Some("file-key".into()),
            ..Default::default()
        };
        let creds = config
            .credentials_with(env_of(&[(ENDPOINT_ENV, "https://env.example.com"), (KEY_ENV, "env-key")]))
            .expect("接続情報があるはず");
        assert_eq!(creds.endpoint, "https://env.example.com");
        assert_eq!(creds.key, "env-key");
    }

    #[test]
    fn test_credentials_missing_key() {
        let config = Config::default();
        let err = config
            .credentials_with(env_of(&[(ENDPOINT_ENV, "https://env.example.com"), (KEY_ENV, "  ")]))
            .unwrap_err();
        assert!(matches!(err, PantryVisionError::MissingVisionConfig));
    }
}
