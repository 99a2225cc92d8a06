pub mod key;
pub mod message;

pub use key::ConversationKey;
pub use message::ChatMessage;
