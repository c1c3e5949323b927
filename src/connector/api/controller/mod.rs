pub mod ask_controller;
pub mod chat_controller;
pub mod envelope_controller;
pub mod extract_controller;

pub use ask_controller::AskController;
pub use chat_controller::{write_transcript, ChatController};
pub use envelope_controller::EnvelopeController;
pub use extract_controller::ExtractController;
