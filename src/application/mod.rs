// Application layer - use cases and orchestration over the domain model.
// The interactive shell talks only to LedgerService.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
