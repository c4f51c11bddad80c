mod diagnostics;
pub mod models;

pub use diagnostics::Diagnostic;
pub use models::*;
