//! Shared string utilities.

/// Whether `c` may appear in an identifier.
pub fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Replace every character that cannot appear in an identifier with `_`
/// (e.g., "go-http.v2" -> "go_http_v2")
pub fn sanitize_identifier(s: &str) -> String {
    s.chars()
        .map(|c| if is_ident_char(c) { c } else { '_' })
        .collect()
}

/// Check whether `needle` occurs in `haystack` with no identifier
/// character directly after it (e.g., "pkg.Api" matches in "pkg.Api "
/// but not in "pkg.Apis")
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(at, _)| {
        let before_ok = haystack[..at]
            .chars()
            .next_back()
            .is_none_or(|c| !is_ident_char(c));
        let after_ok = haystack[at + needle.len()..]
            .chars()
            .next()
            .is_none_or(|c| !is_ident_char(c));
        before_ok && after_ok
    })
}

/// Package name assumed for an import path when the package itself is not
/// available: the last element, skipping a `/vN` major-version suffix,
/// without a `go-` prefix, cut at the first non-identifier character
/// (e.g., "github.com/fastbill/go-httperrors/v2" -> "httperrors",
/// "gopkg.in/yaml.v3" -> "yaml")
pub fn import_path_name(path: &str) -> String {
    let mut segments = path.rsplit('/');
    let mut base = segments.next().unwrap_or(path);
    if is_major_version(base) {
        if let Some(parent) = segments.next() {
            base = parent;
        }
    }
    let base = base.strip_prefix("go-").unwrap_or(base);
    base.chars().take_while(|&c| is_ident_char(c)).collect()
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// File name for a mock struct (e.g., "TestMock" -> "testmock.go")
pub fn mock_file_name(struct_name: &str) -> String {
    format!("{}.go", struct_name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("model"), "model");
        assert_eq!(sanitize_identifier("go-http.v2"), "go_http_v2");
        assert_eq!(sanitize_identifier("github.com"), "github_com");
        assert_eq!(sanitize_identifier(""), "");
    }

    #[test]
    fn test_contains_word() {
        assert!(contains_word("of the example.Exampler interface", "example.Exampler"));
        assert!(contains_word("example.Exampler#FunctionA", "example.Exampler"));
        assert!(!contains_word("example.ExamplerV2 interface", "example.Exampler"));
        assert!(!contains_word("myexample.Exampler", "example.Exampler"));
        assert!(!contains_word("anything", ""));
    }

    #[test]
    fn test_import_path_name() {
        assert_eq!(import_path_name("context"), "context");
        assert_eq!(import_path_name("net/http"), "http");
        assert_eq!(import_path_name("github.com/fastbill/go-httperrors/v2"), "httperrors");
        assert_eq!(import_path_name("gopkg.in/yaml.v3"), "yaml");
        assert_eq!(import_path_name("v2"), "v2");
        assert_eq!(import_path_name("example.com/go-lib"), "lib");
    }

    #[test]
    fn test_mock_file_name() {
        assert_eq!(mock_file_name("TestMock"), "testmock.go");
        assert_eq!(mock_file_name("Gateway"), "gateway.go");
    }
}
