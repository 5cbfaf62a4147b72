pub mod file;
pub mod message;

pub use file::{most_recent, StoredFile};
pub use message::{chat_history_filename, ChatHistory, ChatMessage};
