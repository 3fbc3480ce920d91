//! Logging context handed to the engine by its caller.

use log::Level;

/// Log target used when the caller does not pick one.
pub const DEFAULT_SCOPE: &str = "patch";

/// PatchContext carries the logging scope and verbosity of one engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchContext {
    scope: String,
    verbose: bool,
}

impl Default for PatchContext {
    fn default() -> Self {
        PatchContext::new(DEFAULT_SCOPE)
    }
}

impl PatchContext {
    /// Creates a context that logs under `scope`.
    pub fn new(scope: impl Into<String>) -> Self {
        PatchContext {
            scope: scope.into(),
            verbose: false,
        }
    }

    /// Logs every applied patch at info instead of debug level.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Returns the log target.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Returns the level used for per-patch messages.
    pub fn patch_level(&self) -> Level {
        if self.verbose {
            Level::Info
        } else {
            Level::Debug
        }
    }
}
