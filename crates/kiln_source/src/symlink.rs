//! Symlink-following resolution from an aliased path to its real path.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::PathResolutionError;

/// Maximum number of links followed before giving up.
const MAX_LINK_HOPS: usize = 40;

/// One step of the walk from root to leaf.
enum Step {
    Anchor(OsString),
    Parent,
    Name(OsString),
}

fn steps(path: &Path) -> VecDeque<Step> {
    path.components()
        .filter_map(|c| match c {
            Component::Prefix(_) | Component::RootDir => Some(Step::Anchor(c.as_os_str().into())),
            Component::CurDir => None,
            Component::ParentDir => Some(Step::Parent),
            Component::Normal(name) => Some(Step::Name(name.into())),
        })
        .collect()
}

/// Walks `path` from the root to the leaf, replacing every accumulated prefix
/// that is a symbolic link by its target, and returns the fully de-aliased
/// absolute path.
///
/// Relative link targets are resolved against the directory holding the link.
/// Fails with [`PathResolutionError::Missing`] as soon as a component does not
/// exist.
pub fn follow(path: &Path) -> Result<PathBuf, PathResolutionError> {
    let mut pending = steps(path);
    let mut resolved = PathBuf::new();
    let mut hops = 0;

    while let Some(step) = pending.pop_front() {
        match step {
            Step::Anchor(anchor) => resolved.push(anchor),
            Step::Parent => {
                resolved.pop();
            }
            Step::Name(name) => {
                let candidate = resolved.join(&name);
                let meta = std::fs::symlink_metadata(&candidate).map_err(|e| inspect_error(&candidate, e))?;

                if !meta.file_type().is_symlink() {
                    resolved = candidate;
                    continue;
                }

                hops += 1;
                if hops > MAX_LINK_HOPS {
                    return Err(PathResolutionError::TooManyLinks { path: candidate });
                }

                let target = std::fs::read_link(&candidate).map_err(|e| inspect_error(&candidate, e))?;
                let target = if target.is_absolute() {
                    target
                } else {
                    resolved.join(target)
                };

                let mut restarted = steps(&target);
                restarted.extend(pending);
                pending = restarted;
                resolved = PathBuf::new();
            }
        }
    }

    Ok(resolved)
}

fn inspect_error(path: &Path, source: io::Error) -> PathResolutionError {
    if source.kind() == io::ErrorKind::NotFound {
        PathResolutionError::Missing {
            path: path.to_path_buf(),
        }
    } else {
        PathResolutionError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
