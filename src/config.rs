use crate::ai_provider::AiProvider;
use crate::error::{ProcureError, Result};
use procure_scope_common::CostFactors;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ai_provider: AiProvider,
    /// AI CLIのパス（未設定ならPATH上のプロバイダ名）
    pub ai_command: Option<PathBuf>,
    /// 未設定ならCLIの既定モデル
    pub model: Option<String>,
    pub timeout_seconds: u64,
    /// 単体照合（matchコマンド）の閾値
    pub match_threshold: f64,
    /// 一括処理（runコマンド）の閾値
    pub workflow_threshold: f64,
    /// プロンプトに含める規定文書の最大文字数
    pub rules_char_limit: usize,
    pub cost_factors: CostFactors,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ai_provider: AiProvider::Claude,
            ai_command: None,
            model: None,
            timeout_seconds: 300,
            match_threshold: 0.5,
            workflow_threshold: 0.1,
            rules_char_limit: 2000,
            cost_factors: CostFactors::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.validate()?;
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
            .ok_or_else(|| ProcureError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("procure-scope").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("match_threshold", self.match_threshold),
            ("workflow_threshold", self.workflow_threshold),
        ] {
            check_threshold(name, value)?;
        }
        if self.timeout_seconds == 0 {
            return Err(ProcureError::Config("timeout_seconds は1以上".into()));
        }
        Ok(())
    }
}

/// 閾値が0.0〜1.0か
pub fn check_threshold(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ProcureError::Config(format!("{} は0.0〜1.0で指定: {}", name, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = Config::default();
        assert_eq!(config.match_threshold, 0.5);
        assert_eq!(config.workflow_threshold, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"ai_provider":"gemini","match_threshold":0.3}"#).unwrap();
        assert_eq!(config.ai_provider, AiProvider::Gemini);
        assert_eq!(config.match_threshold, 0.3);
        assert_eq!(config.rules_char_limit, 2000);
        assert_eq!(config.ai_command, None);
    }

    #[test]
    fn test_ai_command_from_json() {
        let config: Config = serde_json::from_str(r#"{"ai_command":"/opt/bin/claude"}"#).unwrap();
        assert_eq!(config.ai_command, Some(PathBuf::from("/opt/bin/claude")));
        assert_eq!(config.ai_provider, AiProvider::Claude);
    }

    #[test]
    fn test_invalid_threshold() {
        let config = Config {
            workflow_threshold: 1.2,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ProcureError::Config(_))));
    }
}
