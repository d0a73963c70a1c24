//! Orchestration core for the Slidecraft assistant.
//!
//! Wires the session store, prompt assembler, model gateway and deck
//! renderer into a single turn loop. One inbound user message produces
//! exactly one outbound assistant message; model and rendering failures are
//! reported inside that message rather than as errors.

mod assistant;
mod error;
mod gateway;
mod prompt;
mod sessions;

pub use assistant::Assistant;
pub use error::CoreError;
pub use gateway::{ModelGateway, OpenAiCompletion};
pub use prompt::assemble_messages;
pub use sessions::SessionStore;
