pub mod document;
pub mod error;
pub mod selection;
pub mod types;
pub mod view;
