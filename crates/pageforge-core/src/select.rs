//! Page-range resolution.
//!
//! A range spec is a comma-separated list of tokens: single page numbers
//! ("5") or inclusive ranges ("2-7"), with `"all"` as a reserved literal for
//! the whole document. Resolution preserves token order and keeps duplicates;
//! callers that need unique indices deduplicate themselves.

use tracing::trace;

use crate::error::SelectError;

/// Resolve a page-range spec against a page count, leniently.
///
/// Tokens that fail to parse are dropped, as are indices outside
/// `[1, page_count]`; an inverted range ("7-2") expands to nothing. This
/// leniency is intentional: the selector never rejects user input, it just
/// selects fewer pages. An empty spec resolves to no pages, which callers
/// reject before starting a job.
///
/// ```
/// use pageforge_core::resolve_page_range;
///
/// assert_eq!(resolve_page_range("3,1-2", 5), vec![3, 1, 2]);
/// assert_eq!(resolve_page_range("all", 3), vec![1, 2, 3]);
/// ```
pub fn resolve_page_range(spec: &str, page_count: u32) -> Vec<u32> {
    if spec.trim() == "all" {
        return (1..=page_count).collect();
    }

    let mut indices = Vec::new();
    for token in spec.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        if let Some((start, end)) = token.split_once('-') {
            let (Ok(start), Ok(end)) = (start.trim().parse::<u32>(), end.trim().parse::<u32>())
            else {
                trace!("dropping malformed range token {token:?}");
                continue;
            };
            for page in start..=end {
                if (1..=page_count).contains(&page) {
                    indices.push(page);
                }
            }
        } else if let Ok(page) = token.parse::<u32>() {
            if (1..=page_count).contains(&page) {
                indices.push(page);
            }
        } else {
            trace!("dropping malformed token {token:?}");
        }
    }
    indices
}

/// Resolve a page-range spec, rejecting anything the lenient resolver would
/// silently drop.
pub fn resolve_page_range_strict(spec: &str, page_count: u32) -> Result<Vec<u32>, SelectError> {
    if spec.trim() == "all" {
        return Ok((1..=page_count).collect());
    }

    let mut indices = Vec::new();
    for token in spec.split(',') {
        let token = token.trim();

        if let Some((start, end)) = token.split_once('-') {
            let start: u32 = start
                .trim()
                .parse()
                .map_err(|_| SelectError::MalformedToken(token.to_string()))?;
            let end: u32 = end
                .trim()
                .parse()
                .map_err(|_| SelectError::MalformedToken(token.to_string()))?;
            if start > end {
                return Err(SelectError::InvertedRange { start, end });
            }
            for page in start..=end {
                check_bounds(page, page_count)?;
                indices.push(page);
            }
        } else {
            let page: u32 = token
                .parse()
                .map_err(|_| SelectError::MalformedToken(token.to_string()))?;
            check_bounds(page, page_count)?;
            indices.push(page);
        }
    }
    Ok(indices)
}

fn check_bounds(page: u32, page_count: u32) -> Result<(), SelectError> {
    if page < 1 || page > page_count {
        return Err(SelectError::OutOfBounds { page, page_count });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_preserves_token_order() {
        assert_eq!(resolve_page_range("3,1-2", 5), vec![3, 1, 2]);
    }

    #[test]
    fn test_resolve_all() {
        assert_eq!(resolve_page_range("all", 1), vec![1]);
        assert_eq!(resolve_page_range("all", 4), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_resolve_all_is_case_sensitive() {
        assert_eq!(resolve_page_range("ALL", 4), Vec::<u32>::new());
    }

    #[test]
    fn test_resolve_single_page_range() {
        assert_eq!(resolve_page_range("5-5", 10), vec![5]);
    }

    #[test]
    fn test_resolve_empty_spec() {
        assert_eq!(resolve_page_range("", 7), Vec::<u32>::new());
    }

    #[test]
    fn test_resolve_range_then_single() {
        assert_eq!(resolve_page_range("1-3,7", 10), vec![1, 2, 3, 7]);
    }

    #[test]
    fn test_resolve_keeps_duplicates() {
        assert_eq!(resolve_page_range("2,2,1-2", 5), vec![2, 2, 1, 2]);
    }

    #[test]
    fn test_resolve_drops_malformed_tokens() {
        assert_eq!(resolve_page_range("1,x,3", 5), vec![1, 3]);
        assert_eq!(resolve_page_range("a-b,2", 5), vec![2]);
    }

    #[test]
    fn test_resolve_drops_out_of_bounds() {
        assert_eq!(resolve_page_range("0,1,9", 5), vec![1]);
        assert_eq!(resolve_page_range("4-9", 5), vec![4, 5]);
    }

    #[test]
    fn test_resolve_inverted_range_is_empty() {
        assert_eq!(resolve_page_range("7-2", 10), Vec::<u32>::new());
    }

    #[test]
    fn test_strict_accepts_valid_specs() {
        assert_eq!(resolve_page_range_strict("3,1-2", 5).unwrap(), vec![3, 1, 2]);
        assert_eq!(resolve_page_range_strict("all", 3).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_strict_rejects_malformed_token() {
        assert!(matches!(
            resolve_page_range_strict("1,x", 5),
            Err(SelectError::MalformedToken(_))
        ));
        assert!(matches!(
            resolve_page_range_strict("", 5),
            Err(SelectError::MalformedToken(_))
        ));
    }

    #[test]
    fn test_strict_rejects_inverted_range() {
        assert!(matches!(
            resolve_page_range_strict("7-2", 10),
            Err(SelectError::InvertedRange { start: 7, end: 2 })
        ));
    }

    #[test]
    fn test_strict_rejects_out_of_bounds() {
        assert!(matches!(
            resolve_page_range_strict("6", 5),
            Err(SelectError::OutOfBounds {
                page: 6,
                page_count: 5
            })
        ));
    }
}
