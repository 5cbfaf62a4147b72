pub mod archive;
pub mod encoding;
pub mod error;
pub mod iagon;
pub mod traits;

pub use archive::{ChatArchive, ChatArchiveBuilder, LoadStrategy};
pub use encoding::PayloadEncoding;
pub use error::{Result, StorageError};
pub use iagon::{IagonClient, IagonClientBuilder};
pub use traits::{FileRef, StorageGateway};
