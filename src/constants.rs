//! Global Constants
//!
//! Centralized constants for traversal policy and tuning.
//! Configurable values use these as their defaults.

/// Filesystem walk constants
pub mod walk {
    /// Decoded text larger than this is truncated (5 MiB)
    pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

    /// Rules file that is always inspected, even when dotfiles are excluded
    pub const GITIGNORE_FILE: &str = ".gitignore";

    /// Version-control metadata directory, always ignored
    pub const VCS_DIR: &str = ".git";

    /// Extensions whose content is never read (binary or non-text formats)
    pub const OMIT_CONTENT_EXTENSIONS: &[&str] = &[
        // Images
        ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".ico", ".tif", ".tiff",
        // Audio
        ".mp3", ".wav", ".ogg", ".aac", ".flac", ".m4a", ".opus",
        // Video
        ".mp4", ".mov", ".avi", ".wmv", ".mkv", ".flv", ".webm", ".mpeg", ".mpg",
        // Documents
        ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".odt", ".ods", ".odp",
        // Executables and objects
        ".exe", ".msi", ".bin", ".dll", ".so", ".o", ".a", ".lib", ".class", ".pyc", ".wasm",
        // Archives
        ".zip", ".rar", ".tar", ".gz", ".7z", ".bz2", ".xz", ".iso", ".img",
        // Fonts
        ".ttf", ".otf", ".woff", ".woff2", ".eot",
        // Databases and bundles
        ".db", ".sqlite", ".mdb", ".jar", ".war", ".swc", ".swf",
        // 3D assets
        ".obj", ".fbx", ".stl", ".blend", ".glb", ".gltf",
        // Generated noise
        ".lock", ".log",
    ];
}

/// Web crawl constants
pub mod crawl {
    /// Default maximum link depth from the seed
    pub const DEFAULT_MAX_DEPTH: u32 = 1;

    /// Per-request timeout (seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 15;

    /// Pause between consecutive fetches (milliseconds)
    pub const POLITENESS_DELAY_MS: u64 = 50;

    /// Identifying user agent sent with every request
    pub const USER_AGENT: &str = concat!(
        "crawldigest/",
        env!("CARGO_PKG_VERSION"),
        " (+https://github.com/crawldigest/crawldigest)"
    );

    /// Link schemes that never point at crawlable content
    pub const NON_CONTENT_SCHEMES: &[&str] = &["mailto", "tel", "javascript"];

    /// Elements removed before content extraction
    pub const NOISE_SELECTOR: &str = "script, style, noscript, link[rel=\"stylesheet\"], header, footer, nav, aside, form, iframe, button, input, img, video, audio";

    /// Content regions tried in order, most specific first
    pub const CONTENT_REGIONS: &[&str] = &["main", "article", "body"];
}

/// Repository materialization constants
pub mod repo {
    /// Scratch directory name prefix
    pub const SCRATCH_PREFIX: &str = "crawldigest-repo-";

    /// Shallow clone depth
    pub const CLONE_DEPTH: u32 = 1;

    /// Timeout for the clone process (seconds)
    pub const CLONE_TIMEOUT_SECS: u64 = 600;

    /// Retries for scratch directory removal
    pub const CLEANUP_RETRIES: usize = 3;

    /// Delay between removal attempts (milliseconds)
    pub const CLEANUP_RETRY_DELAY_MS: u64 = 100;
}

/// Output constants
pub mod output {
    /// Default output file name
    pub const DEFAULT_OUTPUT_FILE: &str = "output.md";
}
