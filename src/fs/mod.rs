pub mod backup;
pub mod layout;
pub mod private;

pub use backup::{backup_file, backup_path, BackupOutcome, BACKUP_SUFFIX};
pub use layout::{PathResolver, WorkspaceLayout};
