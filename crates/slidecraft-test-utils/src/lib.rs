//! Shared mocks and fixtures for Slidecraft tests.

mod completion;
mod fixtures;

pub use completion::{FailingCompletion, FixedCompletion, RecordingCompletion};
pub use fixtures::{
    deck_shape_texts, write_minimal_docx, write_minimal_pdf, write_minimal_template,
};
