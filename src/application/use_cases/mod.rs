mod chat_turn;
mod extract_parameters;
mod forward_intent;

pub use chat_turn::*;
pub use extract_parameters::*;
pub use forward_intent::*;
