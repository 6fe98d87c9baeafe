//! Turn links people paste into chat into the identifiers the REST APIs take.
//!
//! Both resolvers are pure and total: anything they cannot make sense of
//! yields `None`.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static PAGE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/wiki/spaces/[^/]+/pages/(\d+)").expect("valid regex"));
static BROWSE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/browse/([A-Z]+-\d+)").expect("valid regex"));
static ISSUE_KEY_EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+-\d+$").expect("valid regex"));
static ISSUE_KEY_ANYWHERE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]+-\d+").expect("valid regex"));

// Base for resolving inputs that are not absolute URLs, e.g. `host/path?q`.
const RELATIVE_BASE: &str = "https://link.invalid/";

/// Extract a Confluence page ID from a page link.
///
/// Understands:
/// - `/wiki/spaces/<SPACE>/pages/<id>/<title>`
/// - any link carrying `?pageId=<id>`, which covers
///   `/wiki/display/<SPACE>/<title>?pageId=<id>` and
///   `/wiki/pages/viewpage.action?pageId=<id>`
pub fn page_id_from_url(link: &str) -> Option<String> {
    let url = parse_lenient(link)?;

    if let Some(caps) = PAGE_PATH.captures(url.path()) {
        return Some(caps[1].to_string());
    }

    query_param(&url, "pageId")
}

/// Extract a Jira issue key from an issue link.
///
/// Tries `/browse/<KEY>`, then a well-formed `selectedIssue` query parameter
/// (board and backlog links), then the first `<KEY>-<n>` anywhere in the raw
/// input. The last step is best effort and can pick up key-shaped text that
/// is not an issue, such as `UTF-8` in a title.
pub fn issue_key_from_url(link: &str) -> Option<String> {
    if let Some(url) = parse_lenient(link) {
        if let Some(caps) = BROWSE_PATH.captures(url.path()) {
            return Some(caps[1].to_string());
        }

        let selected = query_param(&url, "selectedIssue");
        if let Some(key) = selected.filter(|key| ISSUE_KEY_EXACT.is_match(key)) {
            return Some(key);
        }
    }

    ISSUE_KEY_ANYWHERE
        .find(link)
        .map(|found| found.as_str().to_string())
}

fn parse_lenient(link: &str) -> Option<Url> {
    let link = link.trim();
    Url::parse(link)
        .or_else(|_| Url::parse(RELATIVE_BASE).and_then(|base| base.join(link)))
        .ok()
}

/// First non-blank value of a query parameter.
fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .filter(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .find(|value| !value.is_empty())
}
