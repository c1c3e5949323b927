mod anthropic_client;
mod gemini_client;
mod http_client;
mod http_webhook_client;
mod mock_chat_client;
mod mock_webhook_client;

pub use anthropic_client::*;
pub use gemini_client::*;
pub use http_client::*;
pub use http_webhook_client::*;
pub use mock_chat_client::*;
pub use mock_webhook_client::*;
