mod chat_client;
mod webhook_client;

pub use chat_client::*;
pub use webhook_client::*;
