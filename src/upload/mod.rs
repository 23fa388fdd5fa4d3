mod endpoint;
mod types;

pub use endpoint::{HttpEndpoint, ProcessingEndpoint};
pub use types::{ContactCard, ContactRequest, ParsedFields, ProcessingResult, StagedFile};
