mod clipboard;
mod memory;

pub use clipboard::ClipboardOutput;
pub use memory::MemoryOutput;

use crate::domain::error::AppError;

/// 出力先 trait
pub trait OutputTarget: Send + Sync {
    fn deliver(&self, text: &str) -> Result<(), AppError>;
    fn name(&self) -> &str;
}
