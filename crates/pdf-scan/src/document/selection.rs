//! Parsing of page selections submitted by the edit view.
//!
//! Users count pages from 1; everything returned here is zero-based.

use crate::types::*;
use std::collections::BTreeSet;

/// Parse a `-`-joined list of 1-based page numbers (e.g. `"2-5"` selects
/// pages 2 and 5). Duplicates collapse.
pub fn parse_page_set(raw: &str, page_count: usize) -> Result<BTreeSet<usize>> {
    let mut selected = BTreeSet::new();

    for token in raw.split('-').map(str::trim).filter(|t| !t.is_empty()) {
        selected.insert(parse_page_number(token, page_count)?);
    }

    if selected.is_empty() {
        return Err(ScanError::Validation("No pages selected".to_string()));
    }
    Ok(selected)
}

/// Parse a `,`-joined permutation of 1-based page numbers.
///
/// The order must name every current page exactly once.
pub fn parse_page_order(raw: &str, page_count: usize) -> Result<Vec<usize>> {
    let tokens: Vec<&str> = raw.split(',').map(str::trim).collect();
    if tokens.len() != page_count {
        return Err(ScanError::Validation(format!(
            "New order lists {} page(s) but the document has {}",
            tokens.len(),
            page_count
        )));
    }

    let mut seen = vec![false; page_count];
    let mut order = Vec::with_capacity(page_count);
    for token in tokens {
        let index = parse_page_number(token, page_count)?;
        if std::mem::replace(&mut seen[index], true) {
            return Err(ScanError::Validation(format!(
                "Page {} appears more than once in the new order",
                index + 1
            )));
        }
        order.push(index);
    }

    Ok(order)
}

fn parse_page_number(token: &str, page_count: usize) -> Result<usize> {
    let number: usize = token
        .parse()
        .map_err(|_| ScanError::Validation(format!("Invalid page number '{}'", token)))?;

    if number == 0 || number > page_count {
        return Err(ScanError::Validation(format!(
            "Page {} does not exist (document has {} page(s))",
            number, page_count
        )));
    }
    Ok(number - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_set_dash_joined() {
        let set = parse_page_set("3-1-3", 4).unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_page_set_rejects_garbage() {
        assert!(matches!(
            parse_page_set("1-x", 3),
            Err(ScanError::Validation(_))
        ));
        assert!(matches!(parse_page_set("", 3), Err(ScanError::Validation(_))));
        assert!(matches!(parse_page_set("0", 3), Err(ScanError::Validation(_))));
        assert!(matches!(parse_page_set("4", 3), Err(ScanError::Validation(_))));
    }

    #[test]
    fn test_page_order_permutation() {
        assert_eq!(parse_page_order("2, 3,1", 3).unwrap(), vec![1, 2, 0]);
    }

    #[test]
    fn test_page_order_rejects_length_mismatch_and_duplicates() {
        assert!(parse_page_order("1,2", 3).is_err());
        assert!(parse_page_order("1,2,3,4", 3).is_err());
        assert!(parse_page_order("1,1,2", 3).is_err());
        assert!(parse_page_order("", 1).is_err());
    }
}
