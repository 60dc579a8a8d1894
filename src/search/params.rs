//! Search parameters and engine configuration
//!
//! Both are plain builders: start from `Default` (or `new`) and chain setters.

/// Default fixed search depth in plies
pub const DEFAULT_DEPTH: u8 = 6;

/// Default number of worker threads
pub const DEFAULT_THREADS: usize = 8;

/// Plies a forcing line may run past the nominal depth
pub const DEFAULT_MAX_EXTENSION: i32 = 8;

/// Parameters of a single worker search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Nominal depth in plies (root move included)
    pub depth: u8,

    /// Cache subtree values by Zobrist hash within one root-move search
    pub use_memo: bool,

    /// Extra plies allowed past depth 0 while the line stays forcing
    /// (captures and check evasions)
    pub max_extension: i32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            use_memo: true,
            max_extension: DEFAULT_MAX_EXTENSION,
        }
    }
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set nominal depth in plies
    pub fn depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    /// Enable or disable the per-search memo
    pub fn use_memo(mut self, enable: bool) -> Self {
        self.use_memo = enable;
        self
    }

    /// Set the extension budget (0 disables extensions)
    pub fn max_extension(mut self, plies: i32) -> Self {
        self.max_extension = plies.max(0);
        self
    }
}

/// Configuration of the threaded engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub threads: usize,

    /// Search every root move at depth 1, 2, ... up to the target depth
    /// instead of only at the target depth
    pub iterative: bool,

    pub search: SearchParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            iterative: false,
            search: SearchParams::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker count (at least one worker is always started)
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Set the target depth in plies
    pub fn depth(mut self, depth: u8) -> Self {
        self.search.depth = depth;
        self
    }

    pub fn iterative(mut self, enable: bool) -> Self {
        self.iterative = enable;
        self
    }

    pub fn search_params(mut self, params: SearchParams) -> Self {
        self.search = params;
        self
    }
}
