// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-range selector parsing.
//
// The session layer stages selectors verbatim ("1-10", "1,3,5", "1-10,15-20")
// and the engine resolves them against a concrete document here, at
// conversion time. Selected pages keep the order (and duplicates) the caller
// wrote; pages past the end of the document are clipped.

use umbruch_core::error::{Result, UmbruchError};

/// Resolve a selector against a document with `total` pages.
///
/// Grammar: comma-separated tokens, each `N`, `N-M`, `N-` (to the last
/// page), or `-M` (from the first page). Page numbers are 1-indexed.
/// Malformed tokens, reversed ranges, and selections that match no page at
/// all are errors.
pub fn select_pages(spec: &str, total: usize) -> Result<Vec<u32>> {
    let total = total as u32;
    let mut pages = Vec::new();

    for raw in spec.split(',') {
        let token = raw.trim();
        if token.is_empty() {
            return Err(UmbruchError::PageRange(format!(
                "empty token in selector {spec:?}"
            )));
        }

        match token.split_once('-') {
            Some((lo, hi)) => {
                let lo = lo.trim();
                let hi = hi.trim();
                let start = if lo.is_empty() { 1 } else { parse_page(lo)? };
                let end = if hi.is_empty() { total } else { parse_page(hi)? };
                if end < start {
                    return Err(UmbruchError::PageRange(format!(
                        "reversed range {token:?}"
                    )));
                }
                // Pages past the document's end are clipped, not errors.
                for page in start..=end.min(total) {
                    pages.push(page);
                }
            }
            None => {
                let page = parse_page(token)?;
                if page <= total {
                    pages.push(page);
                }
            }
        }
    }

    if pages.is_empty() {
        return Err(UmbruchError::PageRange(format!(
            "{spec:?} selects no pages of a {total}-page document"
        )));
    }

    Ok(pages)
}

/// Parse a single 1-indexed page number.
fn parse_page(token: &str) -> Result<u32> {
    let page: u32 = token.parse().map_err(|_| {
        UmbruchError::PageRange(format!("invalid page number {token:?}"))
    })?;
    if page == 0 {
        return Err(UmbruchError::PageRange(
            "page numbers are 1-indexed".to_string(),
        ));
    }
    Ok(page)
}
