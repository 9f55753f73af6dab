//! Work Breakdown Structure budget lines.

pub mod code;
pub mod error;
pub mod status;
pub mod types;

pub use code::{CODE_SEPARATOR, WbsCode, code_is_within, compare_codes};
pub use error::WbsError;
pub use status::{DraftWorkflow, StatusChange, WbsStatus};
pub use types::{NewWbsLine, SeedLine, WbsNode};
