//! Fuzzy page search
//!
//! Resolves free text to a page id by scoring search-result titles against
//! the query tokens. The heuristic is deliberately simple: exact token hits
//! outweigh substring hits, and a flat bonus prioritizes resume-study
//! intents in either language.

use crate::service::DocumentService;
use crate::types::Page;
use bridge_core::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

lazy_static! {
    // Token boundaries: anything that is not an ASCII alphanumeric or a CJK
    // ideograph. Input is lowercased before splitting.
    static ref TOKEN_BOUNDARY: Regex = Regex::new(r"[^a-z0-9\x{4e00}-\x{9fff}]+").unwrap();
}

/// Lowercase and split into tokens, discarding empties.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_BOUNDARY
        .split(&lower)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Score a candidate title against the query text.
///
/// Per query token: +3 for an exact member of the title's token set, else +1
/// for a raw substring of the lowercased title. Flat +4 when both the query
/// and the title mention "resume" or "简历".
pub fn score_title_match(title: &str, query_text: &str) -> i32 {
    let title_lower = title.to_lowercase();
    let title_tokens: HashSet<String> = tokenize(title).into_iter().collect();

    let mut score = 0;
    for token in tokenize(query_text) {
        if title_tokens.contains(&token) {
            score += 3;
        } else if title_lower.contains(&token) {
            score += 1;
        }
    }

    // Prioritize resume-study intents.
    let query_lower = query_text.to_lowercase();
    if (query_lower.contains("resume") || query_text.contains("简历"))
        && (title_lower.contains("resume") || title.contains("简历"))
    {
        score += 4;
    }

    score
}

/// Pick the best-scoring candidate. Replacement only on a strictly greater
/// score, so the first-seen candidate wins ties; the -1 sentinel means a
/// sweep with no positive signal still keeps the first result.
fn pick_best<'a>(results: &'a [Page], query_text: &str) -> Option<&'a Page> {
    let mut best: Option<&Page> = None;
    let mut best_score = -1;
    for page in results {
        let score = score_title_match(&page.title(), query_text);
        if score > best_score {
            best_score = score;
            best = Some(page);
        }
    }
    best.or_else(|| results.first())
}

/// Resolve free text to `(page_id, matched_title)` via the search API.
pub async fn search_page_by_text(
    service: &dyn DocumentService,
    query_text: &str,
) -> Result<(String, String)> {
    let results = service.search_pages(query_text).await?;
    if results.is_empty() {
        return Err(Error::not_found(format!(
            "No Notion page found for query: {}",
            query_text
        )));
    }

    let chosen = pick_best(&results, query_text)
        .ok_or_else(|| Error::data("Empty search result set after scoring"))?;
    let chosen_id = chosen
        .id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            Error::data(format!(
                "Found result without page id for query: {}",
                query_text
            ))
        })?;

    debug!(page_id = %chosen_id, title = %chosen.title(), "Search resolved page");
    Ok((chosen_id, chosen.title()))
}
