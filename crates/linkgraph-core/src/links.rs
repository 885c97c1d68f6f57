//! Wiki-link extraction: `[[target]]`, `[[target|label]]`, `[[target#heading]]`.

use crate::types::Slug;

/// Lower-case, trim, and collapse inner whitespace runs to a single hyphen.
pub fn normalize_slug(raw: &str) -> Slug {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Normalized link targets of `body`, deduplicated in first-occurrence order.
///
/// A target ends at the first `]`; unless it is followed by a second `]`
/// there is no link.
pub fn extract_wiki_links(body: &str) -> Vec<Slug> {
    let mut out: Vec<Slug> = Vec::new();
    for line in body.lines() {
        let bytes = line.as_bytes();
        let mut i = 0usize;
        while i + 1 < bytes.len() {
            if bytes[i] == b'[' && bytes[i + 1] == b'[' {
                let start = i + 2;
                let Some(end) = (start..bytes.len()).find(|&j| bytes[j] == b']') else { break };
                if bytes.get(end + 1) != Some(&b']') {
                    i = end + 1;
                    continue;
                }
                if let Some(target) = parse_inner(&line[start..end]) {
                    if !out.contains(&target) {
                        out.push(target);
                    }
                }
                i = end + 2;
                continue;
            }
            i += 1;
        }
    }
    out
}

fn parse_inner(inner: &str) -> Option<Slug> {
    let target = inner.split('|').next()?;
    let target = target.split('#').next()?;
    let slug = normalize_slug(target);
    if slug.is_empty() { None } else { Some(slug) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_slug("  My   Great\tPost "), "my-great-post");
    }

    #[test]
    fn extracts_plain_and_labelled_links() {
        let body = "See [[B-Slug]] and [[c slug|the C post]].";
        assert_eq!(extract_wiki_links(body), vec!["b-slug", "c-slug"]);
    }

    #[test]
    fn deduplicates_preserving_first_occurrence() {
        let body = "[[b]] then [[a]]\nagain [[B]] and [[ a ]]";
        assert_eq!(extract_wiki_links(body), vec!["b", "a"]);
    }

    #[test]
    fn drops_heading_fragment_and_empty_targets() {
        let body = "[[post#intro]] [[ ]] [[|label]]";
        assert_eq!(extract_wiki_links(body), vec!["post"]);
    }

    #[test]
    fn unterminated_brackets_are_ignored() {
        assert!(extract_wiki_links("[[never closed").is_empty());
        assert!(extract_wiki_links("[single]").is_empty());
    }

    #[test]
    fn single_bracket_ends_the_target() {
        assert!(extract_wiki_links("[[x] and y]]").is_empty());
        assert_eq!(extract_wiki_links("[[x] then [[real]]"), vec!["real"]);
    }
}
