//! Player-record persistence.
//!
//! [`TargetRepository`] is the storage contract; [`FileTargetRepository`]
//! backs real deployments and [`InMemoryTargetRepository`] backs tests.
mod error;
mod file;
mod memory;
mod record;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileTargetRepository;
pub use memory::InMemoryTargetRepository;
pub use record::PlayerRecord;
pub use traits::TargetRepository;
