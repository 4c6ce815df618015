use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::checkpoint::SchemaValidator;
use crate::config::{Settings, SETTINGS_FILE};
use crate::encoding::ExtensionResolver;
use crate::fs::private::create_private_dir_all;
use crate::fs::WorkspaceLayout;
use crate::store::CheckpointStore;

/// Marker directory created by `Workspace::initialize`.
pub const STATE_DIR: &str = ".waypoint";

/// A project directory holding environment checkpoints.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    settings: Settings,
}

impl Workspace {
    /// Open the workspace at `root`, loading its settings.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let settings = Settings::load(&root)?;
        Ok(Self { root, settings })
    }

    /// Find the workspace containing `start` by walking up the directory tree.
    ///
    /// A directory is a workspace root if it holds `waypoint.toml` or a
    /// `.waypoint` directory.
    pub fn discover(start: &Path) -> Result<Self> {
        match Self::find_root(start) {
            Some(root) => Self::open(root),
            None => bail!(
                "Could not find a waypoint workspace in {} or its parents. Run 'waypoint init' first.",
                start.display()
            ),
        }
    }

    /// Like [`Workspace::discover`], but uses `start` itself when no workspace
    /// marker exists above it. Errors opening a found workspace are returned.
    pub fn discover_or_start(start: &Path) -> Result<Self> {
        match Self::find_root(start) {
            Some(root) => Self::open(root),
            None => Self::open(start),
        }
    }

    /// Discover the workspace from the current directory, falling back to the
    /// current directory itself when none exists yet.
    pub fn discover_or_current() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        Self::discover_or_start(&cwd)
    }

    fn find_root(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(SETTINGS_FILE).is_file() || dir.join(STATE_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Create the owner-only state directory if it does not exist yet.
    pub fn initialize(&self) -> Result<()> {
        let dir = self.root.join(STATE_DIR);
        if !dir.exists() {
            create_private_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Absolute checkpoint directory.
    pub fn checkpoint_dir(&self) -> PathBuf {
        self.root.join(&self.settings.checkpoints.dir)
    }

    /// Checkpoint store configured from this workspace's settings.
    pub fn store(&self) -> CheckpointStore {
        CheckpointStore::new(
            WorkspaceLayout::new(self.checkpoint_dir()),
            ExtensionResolver::new(self.settings.checkpoints.format),
            SchemaValidator,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_walks_up_to_settings_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(SETTINGS_FILE), "").unwrap();
        let nested = temp.path().join("services").join("api");
        fs::create_dir_all(&nested).unwrap();

        let workspace = Workspace::discover(&nested).unwrap();
        assert_eq!(workspace.root(), temp.path());
    }

    #[test]
    fn test_discover_finds_state_dir() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(STATE_DIR)).unwrap();

        let workspace = Workspace::discover(temp.path()).unwrap();
        assert_eq!(
            workspace.checkpoint_dir(),
            temp.path().join(".waypoint").join("env")
        );
    }

    #[test]
    fn test_discover_or_start_falls_back_without_marker() {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::discover_or_start(temp.path()).unwrap();
        assert_eq!(workspace.root(), temp.path());
    }

    #[test]
    fn test_discover_or_start_reports_broken_parent_settings() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(SETTINGS_FILE),
            "[checkpoints]\nbogus = true\n",
        )
        .unwrap();
        let nested = temp.path().join("services");
        fs::create_dir(&nested).unwrap();

        assert!(Workspace::discover_or_start(&nested).is_err());
        assert!(!nested.join(STATE_DIR).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_initialize_creates_private_state_dir() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let workspace = Workspace::open(temp.path()).unwrap();
        workspace.initialize().unwrap();

        let mode = fs::metadata(temp.path().join(STATE_DIR))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[test]
    fn test_checkpoint_dir_follows_settings() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(SETTINGS_FILE),
            "[checkpoints]\ndir = \"deploy/state\"\n",
        )
        .unwrap();

        let workspace = Workspace::open(temp.path()).unwrap();
        assert_eq!(workspace.checkpoint_dir(), temp.path().join("deploy/state"));
    }
}
