//! Text file detection.
//!
//! Decides from the path alone whether a file should be treated as text.
//! There is no content sniffing here; a binary file wearing a text
//! extension is caught later when UTF-8 decoding fails.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Extensions accepted as text, lowercase.
static TEXT_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "txt", "js", "ts", "jsx", "tsx", "css", "html", "htm", "py", "rb", "java", "c",
        "cpp", "h", "hpp", "cs", "php", "sql", "md", "json", "xml", "yaml", "yml", "sh",
        "bat", "ini", "log", "svg", "gitignore", "env", "dockerfile", "conf", "config",
        "gradle", "properties", "toml", "rst",
    ]
    .into_iter()
    .collect()
});

/// Final path segment. Accepts both separator styles since raw OS paths
/// pass through here before normalization.
pub(crate) fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Extension after the last `.` of the final path segment, or `""` when
/// the segment has no dot. A leading dot counts, so `.env` has the
/// extension `env`.
pub fn extension_of(path: &str) -> &str {
    match basename(path).rsplit_once('.') {
        Some((_, ext)) => ext,
        None => "",
    }
}

/// Whether a path names a file this tool treats as text.
///
/// Matches the extension against the allow-list, then falls back to a
/// few extensionless conventions: `Dockerfile`, `gitignore` and dotfile
/// rc names like `.bashrc` or `.npmrc`.
pub fn is_likely_text_file(path: &str) -> bool {
    let ext = extension_of(path).to_ascii_lowercase();
    if TEXT_EXTENSIONS.contains(ext.as_str()) {
        return true;
    }
    let name = basename(path).to_ascii_lowercase();
    name == "dockerfile" || name == "gitignore" || (name.starts_with('.') && name.ends_with("rc"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("src/main.js"), "js");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("Makefile"), "");
        assert_eq!(extension_of(".env"), "env");
        assert_eq!(extension_of("dir.v2/readme"), "");
        assert_eq!(extension_of(r"win\path\notes.TXT"), "TXT");
    }

    #[test]
    fn test_common_text_extensions() {
        assert!(is_likely_text_file("notes.txt"));
        assert!(is_likely_text_file("src/app.TSX"));
        assert!(is_likely_text_file("config/settings.YAML"));
        assert!(is_likely_text_file("schema.sql"));
        assert!(is_likely_text_file("Cargo.toml"));
    }

    #[test]
    fn test_binary_rejected() {
        assert!(!is_likely_text_file("logo.png"));
        assert!(!is_likely_text_file("bundle.zip"));
        assert!(!is_likely_text_file("app.exe"));
        assert!(!is_likely_text_file("music.mp3"));
    }

    #[test]
    fn test_extensionless_conventions() {
        assert!(is_likely_text_file("Dockerfile"));
        assert!(is_likely_text_file("docker/dockerfile"));
        assert!(is_likely_text_file(".gitignore"));
        assert!(is_likely_text_file("sub/.gitignore"));
        assert!(is_likely_text_file(".env"));
        assert!(is_likely_text_file(".bashrc"));
        assert!(is_likely_text_file("home/.npmrc"));
        assert!(!is_likely_text_file("Makefile"));
        assert!(!is_likely_text_file("LICENSE"));
    }

    #[test]
    fn test_rc_rule_needs_leading_dot() {
        assert!(!is_likely_text_file("xinitrc"));
        assert!(is_likely_text_file(".xinitrc"));
        assert!(is_likely_text_file(".VIMRC"));
    }
}
