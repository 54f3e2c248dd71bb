use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// スコープ文書生成に使うAI CLI
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Claude,
    Codex,
    Gemini,
}

impl AiProvider {
    pub fn command_name(&self) -> &'static str {
        match self {
            AiProvider::Claude => "claude",
            AiProvider::Codex => "codex",
            AiProvider::Gemini => "gemini",
        }
    }

    /// プロンプト・モデル指定を含むCLI引数
    pub fn args(&self, prompt: &str, model: Option<&str>) -> Vec<String> {
        let mut args: Vec<String> = match self {
            AiProvider::Claude => vec!["-p".into(), prompt.into(), "--output-format".into(), "text".into()],
            AiProvider::Codex => vec!["exec".into(), prompt.into()],
            AiProvider::Gemini => vec!["-p".into(), prompt.into()],
        };
        if let Some(model) = model {
            args.push("--model".into());
            args.push(model.into());
        }
        args
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_with_model() {
        let args = AiProvider::Claude.args("hello", Some("sonnet"));
        assert_eq!(args, vec!["-p", "hello", "--output-format", "text", "--model", "sonnet"]);
    }

    #[test]
    fn test_codex_args() {
        assert_eq!(AiProvider::Codex.args("hi", None), vec!["exec", "hi"]);
    }
}
