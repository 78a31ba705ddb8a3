use std::sync::Mutex;

use super::OutputTarget;
use crate::domain::error::AppError;

/// インメモリ出力先。配信されたテキストを蓄積する。
/// クリップボードの代わりに注入できるフェイク
pub struct MemoryOutput {
    delivered: Mutex<Vec<String>>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
        }
    }

    pub fn delivered(&self) -> Vec<String> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.delivered.lock().unwrap().last().cloned()
    }
}

impl Default for MemoryOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputTarget for MemoryOutput {
    fn deliver(&self, text: &str) -> Result<(), AppError> {
        self.delivered.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deliver_accumulates() {
        let output = MemoryOutput::new();
        output.deliver("one").unwrap();
        output.deliver("two").unwrap();
        assert_eq!(output.delivered(), vec!["one", "two"]);
        assert_eq!(output.last().as_deref(), Some("two"));
    }
}
