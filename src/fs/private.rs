//! Owner-only file and directory creation.

use std::fs::{self, DirBuilder, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};

/// Mode for checkpoint directories.
pub const DIR_MODE: u32 = 0o700;

/// Mode for checkpoint files.
pub const FILE_MODE: u32 = 0o600;

/// Create `dir` and any missing parents with owner-only permissions.
pub fn create_private_dir_all(dir: &Path) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIR_MODE);
    builder.create(dir)
}

/// Write `bytes` to `path`, creating or truncating it with owner-only permissions.
pub fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(FILE_MODE);

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Read a whole file, all or nothing.
pub fn read_whole(path: &Path) -> io::Result<Vec<u8>> {
    fs::read(path)
}
