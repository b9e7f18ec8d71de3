//! Checks that keep SECURITY.md in step with the contracts it describes.

use regex::Regex;

/// Returns the markdown section titled `section_name`, header included, up to
/// the next header of the same or a higher level.
pub fn extract_section(content: &str, section_name: &str) -> String {
    let mut section_content = String::new();
    let mut section_level = None;

    for line in content.lines() {
        if line.starts_with('#') {
            let current_level = line.chars().take_while(|&c| c == '#').count();
            let header_text = line.trim_start_matches('#').trim();

            match section_level {
                None if header_text == section_name => section_level = Some(current_level),
                Some(level) if current_level <= level => break,
                _ => {}
            }
        }

        if section_level.is_some() {
            section_content.push_str(line);
            section_content.push('\n');
        }
    }

    section_content
}

pub fn section_exists(content: &str, section_name: &str) -> bool {
    content
        .lines()
        .filter(|line| line.starts_with('#'))
        .any(|line| line.trim_start_matches('#').trim() == section_name)
}

/// Case-insensitive check that every keyword occurs somewhere in `content`.
pub fn contains_all_keywords(content: &str, keywords: &[&str]) -> bool {
    let lowercase_content = content.to_lowercase();
    keywords
        .iter()
        .all(|keyword| lowercase_content.contains(&keyword.to_lowercase()))
}

pub fn extract_urls(content: &str) -> Vec<String> {
    let url_pattern = Regex::new(r"https?://[^\s\)]+").unwrap();
    url_pattern
        .find_iter(content)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Rows of a markdown table of the form `| 3 | `Name` | ... |`.
pub fn documented_error_codes(content: &str) -> Vec<(u32, String)> {
    let row = Regex::new(r"(?m)^\|\s*(\d+)\s*\|\s*`(\w+)`\s*\|").unwrap();
    row.captures_iter(content)
        .map(|caps| (caps[1].parse().unwrap(), caps[2].to_string()))
        .collect()
}

/// Variants of a `#[repr(u32)]` error enum, as `Name = code,` lines.
pub fn declared_error_codes(source: &str) -> Vec<(u32, String)> {
    let variant = Regex::new(r"(?m)^\s*(\w+)\s*=\s*(\d+),").unwrap();
    variant
        .captures_iter(source)
        .map(|caps| (caps[2].parse().unwrap(), caps[1].to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_section() {
        let content = "# Title\n## Section 1\nContent 1\n### Sub\nNested\n## Section 2\nContent 2";
        let section = extract_section(content, "Section 1");
        assert!(section.contains("Section 1"));
        assert!(section.contains("Content 1"));
        assert!(section.contains("Nested"));
        assert!(!section.contains("Section 2"));
    }

    #[test]
    fn test_contains_all_keywords() {
        let content = "Cancellation racing with withdrawal only forecloses future accrual";
        assert!(contains_all_keywords(content, &["cancellation", "WITHDRAWAL"]));
        assert!(!contains_all_keywords(content, &["cancellation", "missing"]));
    }

    #[test]
    fn test_extract_urls() {
        let content = "See https://example.com and (http://test.org) for more info";
        let urls = extract_urls(content);
        assert_eq!(urls, vec!["https://example.com", "http://test.org"]);
    }

    #[test]
    fn test_section_exists() {
        let content = "# Title\n## Section 1\nContent\n### Subsection\nMore content";
        assert!(section_exists(content, "Title"));
        assert!(section_exists(content, "Subsection"));
        assert!(!section_exists(content, "Missing Section"));
    }

    #[test]
    fn test_error_code_parsing() {
        let table = "| Code | Name |\n|---|---|\n| 1 | `InvalidProof` | bad |\n| 12 | `InvalidConfig` | x |";
        assert_eq!(
            documented_error_codes(table),
            vec![(1, "InvalidProof".to_string()), (12, "InvalidConfig".to_string())]
        );

        let source = "pub enum Error {\n    /// doc\n    InvalidProof = 1,\n    AlreadyClaimed = 2,\n}";
        assert_eq!(
            declared_error_codes(source),
            vec![(1, "InvalidProof".to_string()), (2, "AlreadyClaimed".to_string())]
        );
    }
}
