pub mod snapshot_file;

pub use snapshot_file::FileSnapshotRepository;
