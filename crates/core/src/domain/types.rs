use serde::{Deserialize, Serialize};

/// リライトスタイル（閉じた集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    Professional,
    Casual,
    Formal,
    Creative,
    Funny,
    Concise,
    Detailed,
    Persuasive,
}

impl Style {
    /// 文字列からの解決。未知の値はデフォルトへフォールバックする
    /// （エラーにはしない）
    pub fn parse(s: &str) -> Self {
        match s {
            "professional" => Self::Professional,
            "casual" => Self::Casual,
            "formal" => Self::Formal,
            "creative" => Self::Creative,
            "funny" => Self::Funny,
            "concise" => Self::Concise,
            "detailed" => Self::Detailed,
            "persuasive" => Self::Persuasive,
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Casual => "casual",
            Self::Formal => "formal",
            Self::Creative => "creative",
            Self::Funny => "funny",
            Self::Concise => "concise",
            Self::Detailed => "detailed",
            Self::Persuasive => "persuasive",
        }
    }

    /// UI 表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            Self::Professional => "Professional",
            Self::Casual => "Casual",
            Self::Formal => "Formal",
            Self::Creative => "Creative",
            Self::Funny => "Funny",
            Self::Concise => "Concise",
            Self::Detailed => "Detailed",
            Self::Persuasive => "Persuasive",
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::Professional
    }
}

/// リライト要求（1 回分の入力）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteRequest {
    pub source_text: String,
    pub style: Style,
}

/// コンテキストメニュー経由のリライトトリガー。
/// スタイルは含まない（Page Agent 側で決定する）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RephraseTrigger {
    pub selected_text: String,
}
