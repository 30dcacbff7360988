use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Result;

use crate::errors::InputError;

/// Resolve a user-supplied subpath against a workspace root, guaranteeing the
/// result stays inside the root.
///
/// The check is lexical: `.` components are dropped and each `..` must have a
/// previously accepted component to pop. Absolute paths and paths that climb
/// out of the root are rejected.
pub fn resolve_safe_child_path(base: &Path, child: &str) -> Result<PathBuf> {
    let child_path = Path::new(child);
    let mut resolved = PathBuf::new();

    for component in child_path.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => resolved.push(part),
            Component::ParentDir => {
                if !resolved.pop() {
                    return Err(InputError::PathOutsideWorkspace {
                        path: child_path.to_path_buf(),
                    }
                    .into());
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(InputError::PathOutsideWorkspace {
                    path: child_path.to_path_buf(),
                }
                .into());
            }
        }
    }

    Ok(base.join(resolved))
}
