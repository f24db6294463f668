//! CLI commands implementation

pub mod browse;
pub mod case_studies;
pub mod curate;
pub mod import;
pub mod init;
pub mod status;

pub use browse::*;
pub use case_studies::*;
pub use curate::*;
pub use import::*;
pub use init::*;
pub use status::*;
