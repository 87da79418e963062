//! Language identification from file extensions

/// Map a file extension (with or without leading dot) to a language tag.
///
/// Unknown extensions map to `"text"`, which routes the file to the
/// size-based splitter.
pub fn language_from_extension(extension: &str) -> &'static str {
    match extension.trim_start_matches('.') {
        "ts" | "tsx" => "typescript",
        "js" | "jsx" => "javascript",
        "py" => "python",
        "java" => "java",
        "cpp" | "hpp" => "cpp",
        "c" | "h" => "c",
        "cs" => "csharp",
        "go" => "go",
        "rs" => "rust",
        "php" => "php",
        "rb" => "ruby",
        "swift" => "swift",
        "kt" => "kotlin",
        "scala" => "scala",
        "m" | "mm" => "objective-c",
        "ipynb" => "jupyter",
        _ => "text",
    }
}

/// Extract the extension of a relative path, including the leading dot.
///
/// Returns an empty string for paths without an extension.
pub fn extension_of(relative_path: &str) -> String {
    std::path::Path::new(relative_path)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
