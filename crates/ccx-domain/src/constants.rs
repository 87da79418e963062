//! Domain layer constants
//!
//! Process-wide defaults and fixed values shared by the application and
//! provider layers. Values that operators may override live in
//! `IndexerConfig`; everything here is the source of those defaults.

// ============================================================================
// INDEXING DEFAULTS
// ============================================================================

/// Default number of chunks per embedding batch
pub const DEFAULT_EMBEDDING_BATCH_SIZE: usize = 100;

/// Default maximum chunk size in characters
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 2500;

/// Default trailing overlap between size-based chunks, in characters
pub const DEFAULT_CHUNK_OVERLAP: usize = 300;

/// Structural chunks shorter than this may be coalesced with their next sibling
pub const DEFAULT_MIN_CHUNK_SIZE: usize = 100;

/// Hard cap on the total number of chunks indexed in a single run
pub const DEFAULT_CHUNK_LIMIT: usize = 450_000;

/// Client-side truncation target for embedding inputs, in characters
pub const DEFAULT_EMBEDDING_MAX_INPUT_CHARS: usize = 8192;

// ============================================================================
// COLLECTION NAMING
// ============================================================================

/// Collection name prefix for plain (dense-only) collections
pub const COLLECTION_PREFIX_PLAIN: &str = "code_chunks_";

/// Collection name prefix for hybrid (dense + lexical) collections
pub const COLLECTION_PREFIX_HYBRID: &str = "hybrid_code_chunks_";

/// Hex digits of the codebase path digest kept in the collection name
pub const COLLECTION_NAME_HASH_LEN: usize = 8;

/// Hex digits of the content digest kept in opaque chunk ids
pub const CHUNK_ID_HASH_LEN: usize = 16;

// ============================================================================
// RETRIEVAL FUSION
// ============================================================================

/// Default `k` for reciprocal rank fusion inside the store contract
pub const RRF_DEFAULT_K: f64 = 60.0;

/// `k` used by the orchestrator when fusing dense and sparse search legs
pub const SEARCH_RRF_K: f64 = 100.0;

/// Rank assigned to a document absent from a fusion leg
pub const RRF_ABSENT_RANK: usize = 60_000;

/// BM25 term-frequency saturation parameter
pub const BM25_K1: f32 = 1.2;

/// BM25 document-length normalization parameter
pub const BM25_B: f32 = 0.75;

/// Tokens at or below this length are dropped by the lexical scorer
pub const BM25_TOKEN_MIN_LENGTH: usize = 1;

// ============================================================================
// OPERATOR-VISIBLE MESSAGES
// ============================================================================

/// Marker message surfaced verbatim when the store refuses to create another
/// collection. Operator front-ends match on this exact string.
pub const COLLECTION_LIMIT_MESSAGE: &str =
    "[Error]: Collection limit reached. Clear an existing index before indexing another codebase.";

// ============================================================================
// PROGRESS PHASES
// ============================================================================

/// Progress phase reported while the collection is created or recreated
pub const PHASE_PREPARING_COLLECTION: &str = "Preparing collection";

/// Progress phase reported while the file walker runs
pub const PHASE_SCANNING_FILES: &str = "Scanning files";

/// Progress phase reported when indexing has finished
pub const PHASE_INDEXING_COMPLETE: &str = "Indexing complete";

// ============================================================================
// PERSISTED STATE LAYOUT
// ============================================================================

/// Directory under the user home that holds per-codebase snapshots
pub const MERKLE_STATE_DIR: &str = ".context/merkle";

/// Optional user-global ignore file under the user home
pub const GLOBAL_IGNORE_FILE: &str = ".context/.contextignore";

/// Prefix of the merkle root node payload
pub const MERKLE_ROOT_PREFIX: &str = "root:";

// ============================================================================
// FILE SELECTION
// ============================================================================

/// Extensions indexed by default; extendable through `custom_extensions`
pub const DEFAULT_INDEXABLE_EXTENSIONS: &[&str] = &[
    ".ts", ".tsx", ".js", ".jsx", ".py", ".java", ".cpp", ".c", ".h", ".hpp", ".cs", ".go", ".rs",
    ".php", ".rb", ".swift", ".kt", ".scala", ".m", ".mm", ".md", ".markdown", ".ipynb",
];

/// Built-in ignore patterns applied before repo, global and custom rules
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    // Version control
    ".git/**",
    ".svn/**",
    ".hg/**",
    // Build output
    "node_modules/**",
    "dist/**",
    "build/**",
    "out/**",
    "target/**",
    "coverage/**",
    ".nyc_output/**",
    // Caches
    ".cache/**",
    "__pycache__/**",
    ".pytest_cache/**",
    // IDE state
    ".vscode/**",
    ".idea/**",
    // Logs and scratch space
    "logs/**",
    "tmp/**",
    "temp/**",
    "*.log",
    // Environment files
    ".env",
    ".env.*",
    "*.local",
    // Minified and bundled artifacts
    "*.min.js",
    "*.min.css",
    "*.bundle.js",
    "*.chunk.js",
    "*.vendor.js",
    "*.map",
];
