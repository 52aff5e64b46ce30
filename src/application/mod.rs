// Application layer - use cases the presentation layer calls into.
// Raw user input comes in, typed results and AppError go out.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
