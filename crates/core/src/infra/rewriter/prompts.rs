//! スタイル別リライトプロンプトテンプレート

use crate::domain::types::Style;

pub const SYSTEM_PROFESSIONAL: &str = "\
You rewrite text for a business audience.
Rules:
- Keep the original meaning intact
- Use clear, professional wording
- Remove slang and filler
- Return only the rewritten text, nothing else";

pub const SYSTEM_CASUAL: &str = "\
You rewrite text in a relaxed, conversational tone.
Rules:
- Keep the original meaning intact
- Use everyday wording, contractions are fine
- Return only the rewritten text, nothing else";

pub const SYSTEM_FORMAL: &str = "\
You rewrite text in a formal register.
Rules:
- Keep the original meaning intact
- Use precise, impersonal wording; no contractions
- Return only the rewritten text, nothing else";

pub const SYSTEM_CREATIVE: &str = "\
You rewrite text with vivid, imaginative phrasing.
Rules:
- Keep the original meaning recognizable
- Fresh imagery is welcome; do not add new facts
- Return only the rewritten text, nothing else";

pub const SYSTEM_FUNNY: &str = "\
You rewrite text with a light, humorous touch.
Rules:
- Keep the original meaning intact
- Humor must stay good-natured
- Return only the rewritten text, nothing else";

pub const SYSTEM_CONCISE: &str = "\
You rewrite text to be as short as possible.
Rules:
- Keep every essential point
- Drop redundancy and filler
- Return only the rewritten text, nothing else";

pub const SYSTEM_DETAILED: &str = "\
You rewrite text with fuller explanations.
Rules:
- Keep the original meaning intact
- Expand abbreviations and spell out implications already present
- Do not invent new facts
- Return only the rewritten text, nothing else";

pub const SYSTEM_PERSUASIVE: &str = "\
You rewrite text to be more convincing.
Rules:
- Keep the original claims unchanged
- Strengthen the argument with confident wording
- Return only the rewritten text, nothing else";

/// スタイルに対応するシステムプロンプトを取得する
pub fn system_prompt_for_style(style: Style) -> &'static str {
    match style {
        Style::Professional => SYSTEM_PROFESSIONAL,
        Style::Casual => SYSTEM_CASUAL,
        Style::Formal => SYSTEM_FORMAL,
        Style::Creative => SYSTEM_CREATIVE,
        Style::Funny => SYSTEM_FUNNY,
        Style::Concise => SYSTEM_CONCISE,
        Style::Detailed => SYSTEM_DETAILED,
        Style::Persuasive => SYSTEM_PERSUASIVE,
    }
}

/// ユーザープロンプトを構築する
pub fn build_prompt(text: &str) -> String {
    format!("Rewrite the following text:\n\n{text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_style_has_a_prompt() {
        for style in [
            Style::Professional,
            Style::Casual,
            Style::Formal,
            Style::Creative,
            Style::Funny,
            Style::Concise,
            Style::Detailed,
            Style::Persuasive,
        ] {
            assert!(!system_prompt_for_style(style).is_empty());
        }
    }

    #[test]
    fn test_build_prompt_contains_text() {
        let prompt = build_prompt("hello world");
        assert!(prompt.contains("hello world"));
    }
}
