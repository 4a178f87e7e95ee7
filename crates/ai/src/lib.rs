// Re-export async_openai types for consumers
pub use async_openai::types::chat::{
  ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
  ChatCompletionRequestUserMessage,
};

mod client;

mod embed;
pub use embed::embed;

mod embed_many;
pub use embed_many::embed_many;

mod generate_object;
pub use generate_object::generate_object;
