//! ToolContext - sandbox root and limits shared by every tool call

use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::ToolError;

/// Default cap on characters returned by `read_file`
pub const DEFAULT_READ_LIMIT_CHARS: usize = 10_000;

/// Default wall-clock timeout for `run_script`
pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_secs(30);

/// The single directory beneath which all tool side effects must occur
///
/// Constructed once, canonicalized, and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxRoot(PathBuf);

impl SandboxRoot {
    /// Canonicalize `path` and check it is an existing directory
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ToolError> {
        let path = path.as_ref();
        debug!(?path, "SandboxRoot::new: called");
        let canonical = path.canonicalize()?;

        if !canonical.is_dir() {
            debug!(?canonical, "SandboxRoot::new: not a directory");
            return Err(ToolError::NotADirectory {
                path: path.to_path_buf(),
            });
        }

        Ok(Self(canonical))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Per-run limits applied by the sandboxed operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxLimits {
    /// Maximum characters `read_file` returns before truncating
    pub read_limit_chars: usize,

    /// Wall-clock limit for a script run
    pub script_timeout: Duration,

    /// Interpreter used to run scripts
    pub interpreter: String,

    /// Required script extension, without the dot
    pub script_extension: String,
}

impl Default for SandboxLimits {
    fn default() -> Self {
        Self {
            read_limit_chars: DEFAULT_READ_LIMIT_CHARS,
            script_timeout: DEFAULT_SCRIPT_TIMEOUT,
            interpreter: "python3".to_string(),
            script_extension: "py".to_string(),
        }
    }
}

/// Execution context for tools - scoped to a single sandbox root
///
/// The dispatcher hands the same context to every operation. Paths coming
/// from the model are always resolved through [`ToolContext::resolve`], so
/// a tool can never be pointed at a caller-chosen working directory.
#[derive(Debug, Clone)]
pub struct ToolContext {
    root: SandboxRoot,
    limits: SandboxLimits,
}

impl ToolContext {
    /// Create a context with default limits
    pub fn new(root: SandboxRoot) -> Self {
        debug!(root = ?root.path(), "ToolContext::new: called");
        Self::with_limits(root, SandboxLimits::default())
    }

    /// Create a context with explicit limits
    pub fn with_limits(root: SandboxRoot, limits: SandboxLimits) -> Self {
        debug!(root = ?root.path(), ?limits, "ToolContext::with_limits: called");
        Self { root, limits }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn limits(&self) -> &SandboxLimits {
        &self.limits
    }

    /// Resolve a model-supplied path and enforce containment
    ///
    /// The lexical check runs first so `..` escapes and foreign absolute
    /// paths are rejected without touching the filesystem. The surviving
    /// path is then walked one component at a time and every symlink on it
    /// is followed and re-checked, including links whose target does not
    /// exist yet.
    pub fn resolve(&self, requested: &Path) -> Result<PathBuf, ToolError> {
        debug!(?requested, "ToolContext::resolve: called");
        let root = self.root.path();
        let normalized = normalize_lexically(&root.join(requested));

        if !normalized.starts_with(root) {
            debug!(?normalized, "ToolContext::resolve: lexical sandbox violation");
            return Err(ToolError::OutOfBounds {
                path: requested.to_path_buf(),
            });
        }

        let resolved = follow_links(root, &normalized).map_err(|e| match e {
            LinkError::Escapes(target) => {
                debug!(?target, "ToolContext::resolve: symlink escapes sandbox");
                ToolError::OutOfBounds {
                    path: requested.to_path_buf(),
                }
            }
            LinkError::Io(source) => ToolError::Io(source),
        })?;

        debug!(?resolved, "ToolContext::resolve: path is within sandbox");
        Ok(resolved)
    }
}

/// Collapse `.` and `..` without consulting the filesystem
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}

/// Symlinks followed before a path is rejected as a loop
const MAX_SYMLINK_HOPS: usize = 40;

enum LinkError {
    Escapes(PathBuf),
    Io(io::Error),
}

/// Walk `path` below `root`, following every symlink on the way
///
/// Each link target is taken relative to the link's parent, normalized and
/// checked against the root whether or not the target exists. Components
/// that do not exist are appended as they are.
fn follow_links(root: &Path, path: &Path) -> Result<PathBuf, LinkError> {
    let mut pending: VecDeque<OsString> = components_below(root, path);
    let mut resolved = root.to_path_buf();
    let mut hops = 0;

    while let Some(part) = pending.pop_front() {
        let candidate = resolved.join(&part);
        let is_link = fs::symlink_metadata(&candidate)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false);
        if !is_link {
            resolved = candidate;
            continue;
        }

        hops += 1;
        if hops > MAX_SYMLINK_HOPS {
            return Err(LinkError::Io(io::Error::other("too many levels of symbolic links")));
        }

        let target = fs::read_link(&candidate).map_err(LinkError::Io)?;
        let target = normalize_lexically(&resolved.join(target));
        if !target.starts_with(root) {
            return Err(LinkError::Escapes(target));
        }

        // Restart from the root so links inside the target are followed too
        let mut next = components_below(root, &target);
        next.extend(pending);
        pending = next;
        resolved = root.to_path_buf();
    }

    Ok(resolved)
}

fn components_below(root: &Path, path: &Path) -> VecDeque<OsString> {
    path.strip_prefix(root)
        .map(|rest| rest.components().map(|c| c.as_os_str().to_os_string()).collect())
        .unwrap_or_default()
}
