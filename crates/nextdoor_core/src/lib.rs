pub mod domain;
pub mod ports;
pub mod schema;
pub mod snapshot;
pub mod token;

pub use domain::{TherapySnapshot, DEFAULT_X_LABELS};
pub use ports::{PortError, PortResult, SnapshotRepository};
pub use schema::SnapshotDocument;
pub use snapshot::SnapshotService;
pub use token::{TokenCheck, TokenError, TokenSigner};
