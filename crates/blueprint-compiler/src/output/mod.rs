//! Writing a rendered project to disk.
//!
//! The whole tree is first written into a staging directory created inside
//! the output directory, then renamed to `<output_dir>/<project_name>` in one
//! step. A failed run drops the staging directory, so the destination either
//! holds a complete project or is left untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::codegen::FileOp;
use crate::config::GeneratorConfig;
use crate::diagnostic::GeneratorError;

/// Filesystem operations the writer needs.
pub trait FileSystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Writes a file, marking it executable when asked.
    fn write(&self, path: &Path, contents: &str, executable: bool) -> io::Result<()>;

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write(&self, path: &Path, contents: &str, executable: bool) -> io::Result<()> {
        fs::write(path, contents)?;
        if executable {
            set_executable(path)?;
        }
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::copy(from, to).map(|_| ())
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// What a successful write produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub project_dir: PathBuf,
    pub files_written: usize,
    pub directories: usize,
    pub credentials_copied: bool,
}

/// Writes `ops` as `<output_dir>/<project_name>` through a staging directory.
pub fn write_project(
    fs: &dyn FileSystem,
    project_name: &str,
    ops: &[FileOp],
    settings: &GeneratorConfig,
) -> Result<WriteSummary, GeneratorError> {
    let destination = settings.output_dir.join(project_name);
    if destination.exists() && !settings.overwrite {
        return Err(GeneratorError::OutputExists { path: destination });
    }

    fs.create_dir_all(&settings.output_dir)
        .map_err(|e| GeneratorError::io(&settings.output_dir, e.to_string()))?;

    // Same parent as the destination, so the final rename never crosses devices
    let staging = tempfile::Builder::new()
        .prefix(&format!(".{project_name}-staging-"))
        .tempdir_in(&settings.output_dir)
        .map_err(|e| GeneratorError::io(&settings.output_dir, e.to_string()))?;
    let root = staging.path().join(project_name);
    debug!(staging = %root.display(), "writing into staging directory");

    let mut summary = WriteSummary {
        project_dir: destination.clone(),
        files_written: 0,
        directories: 0,
        credentials_copied: false,
    };

    for op in ops {
        let target = root.join(op.path());
        match op {
            FileOp::CreateDir { .. } => {
                fs.create_dir_all(&target)
                    .map_err(|e| GeneratorError::io(&target, e.to_string()))?;
                summary.directories += 1;
            }
            FileOp::Write {
                contents, executable, ..
            } => {
                ensure_parent(fs, &target)?;
                fs.write(&target, contents, *executable)
                    .map_err(|e| GeneratorError::io(&target, e.to_string()))?;
                summary.files_written += 1;
            }
            FileOp::CopyOptional { source, .. } => {
                ensure_parent(fs, &target)?;
                match fs.copy(source, &target) {
                    Ok(()) => summary.credentials_copied = true,
                    Err(e) => warn!(
                        source = %source.display(),
                        error = %e,
                        "credentials file not copied; add it to the project before running it"
                    ),
                }
            }
        }
        debug!(path = %op.path().display(), "staged");
    }

    publish(&root, &destination, staging.path())?;
    info!(
        project = %destination.display(),
        files = summary.files_written,
        "project written"
    );
    Ok(summary)
}

fn ensure_parent(fs: &dyn FileSystem, path: &Path) -> Result<(), GeneratorError> {
    match path.parent() {
        Some(parent) => fs
            .create_dir_all(parent)
            .map_err(|e| GeneratorError::io(parent, e.to_string())),
        None => Ok(()),
    }
}

/// Moves the staged tree to its destination.
///
/// An existing destination is first moved into `scratch`, which the caller
/// removes. If the new tree cannot be moved in, the old one is put back.
fn publish(staged: &Path, destination: &Path, scratch: &Path) -> Result<(), GeneratorError> {
    let previous = scratch.join(".previous");
    let replaced = destination.exists();
    if replaced {
        fs::rename(destination, &previous).map_err(|e| GeneratorError::io(destination, e.to_string()))?;
        debug!(path = %destination.display(), "moved existing project aside");
    }

    if let Err(e) = fs::rename(staged, destination) {
        if replaced {
            if let Err(restore) = fs::rename(&previous, destination) {
                warn!(error = %restore, "could not restore the previous project");
            }
        }
        return Err(GeneratorError::io(destination, e.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn ops() -> Vec<FileOp> {
        vec![
            FileOp::CreateDir { path: PathBuf::new() },
            FileOp::CreateDir {
                path: "cmd/api".into(),
            },
            FileOp::Write {
                path: "cmd/api/main.go".into(),
                contents: "package main\n".to_string(),
                executable: false,
            },
            FileOp::Write {
                path: "setup.sh".into(),
                contents: "#!/bin/sh\n".to_string(),
                executable: true,
            },
        ]
    }

    fn settings(dir: &Path) -> GeneratorConfig {
        GeneratorConfig {
            output_dir: dir.to_path_buf(),
            credentials_file: dir.join("missing.json"),
            overwrite: false,
        }
    }

    /// Fails on the nth write.
    struct FailingFileSystem {
        remaining: Cell<usize>,
    }

    impl FileSystem for FailingFileSystem {
        fn create_dir_all(&self, path: &Path) -> io::Result<()> {
            OsFileSystem.create_dir_all(path)
        }

        fn write(&self, path: &Path, contents: &str, executable: bool) -> io::Result<()> {
            if self.remaining.get() == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.remaining.set(self.remaining.get() - 1);
            OsFileSystem.write(path, contents, executable)
        }

        fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
            OsFileSystem.copy(from, to)
        }
    }

    fn entries(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_write_project() {
        let dir = tempfile::tempdir().unwrap();
        let summary = write_project(&OsFileSystem, "shop", &ops(), &settings(dir.path())).unwrap();

        assert_eq!(summary.project_dir, dir.path().join("shop"));
        assert_eq!(summary.files_written, 2);
        assert_eq!(summary.directories, 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("shop/cmd/api/main.go")).unwrap(),
            "package main\n"
        );
        // staging directory is gone
        assert_eq!(entries(dir.path()), vec!["shop"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_scripts_are_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        write_project(&OsFileSystem, "shop", &ops(), &settings(dir.path())).unwrap();

        let mode = fs::metadata(dir.path().join("shop/setup.sh")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_failed_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let failing = FailingFileSystem {
            remaining: Cell::new(1),
        };

        let err = write_project(&failing, "shop", &ops(), &settings(dir.path())).unwrap_err();
        assert!(matches!(err, GeneratorError::IoError { .. }));
        assert!(entries(dir.path()).is_empty());
    }

    #[test]
    fn test_existing_destination_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("shop")).unwrap();

        let err = write_project(&OsFileSystem, "shop", &ops(), &settings(dir.path())).unwrap_err();
        assert!(matches!(err, GeneratorError::OutputExists { .. }));
    }

    #[test]
    fn test_overwrite_replaces_existing_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("shop")).unwrap();
        fs::write(dir.path().join("shop/stale.txt"), "old").unwrap();

        let settings = GeneratorConfig {
            overwrite: true,
            ..settings(dir.path())
        };
        write_project(&OsFileSystem, "shop", &ops(), &settings).unwrap();

        assert!(!dir.path().join("shop/stale.txt").exists());
        assert!(dir.path().join("shop/setup.sh").exists());
        assert_eq!(entries(dir.path()), vec!["shop"]);
    }

    #[test]
    fn test_missing_credentials_only_warn() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let mut ops = ops();
        ops.push(FileOp::CopyOptional {
            source: settings.credentials_file.clone(),
            path: "firebaseCredentials.json".into(),
        });

        let summary = write_project(&OsFileSystem, "shop", &ops, &settings).unwrap();
        assert!(!summary.credentials_copied);
        assert!(!dir.path().join("shop/firebaseCredentials.json").exists());
    }

    #[test]
    fn test_credentials_copied_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("sa.json");
        fs::write(&source, "{}").unwrap();
        let settings = GeneratorConfig {
            credentials_file: source.clone(),
            ..settings(dir.path())
        };
        let ops = vec![FileOp::CopyOptional {
            source,
            path: "firebaseCredentials.json".into(),
        }];

        let summary = write_project(&OsFileSystem, "shop", &ops, &settings).unwrap();
        assert!(summary.credentials_copied);
        assert_eq!(
            fs::read_to_string(dir.path().join("shop/firebaseCredentials.json")).unwrap(),
            "{}"
        );
    }
}
