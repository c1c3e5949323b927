mod extracted_parameters;
mod transcript;
mod webhook_envelope;

pub use extracted_parameters::*;
pub use transcript::*;
pub use webhook_envelope::*;
