pub mod call;
pub mod credential;
pub mod summary;

pub use call::CallRecord;
pub use credential::Credential;
pub use summary::{ModelUsage, Summary};
