//! Request augmentation for agent-originated requests

use url::Url;

/// Default query parameter marking a request as agent-originated.
pub const AGENT_PARAM: &str = "agent";

/// Default header marking a direct-fetch submission as tool-originated.
pub const TOOL_HEADER: &str = "X-MCP-Tool";

/// Set `key=value` on the URL's query, replacing any existing values for
/// `key` and keeping every other pair in place.
pub fn set_query_param(url: &mut Url, key: &str, value: &str) {
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for (k, v) in &retained {
        pairs.append_pair(k, v);
    }
    pairs.append_pair(key, value);
}

/// Mark `url` as an agent request (`<param>=true`).
pub fn mark_agent_request(url: &mut Url, param: &str) {
    set_query_param(url, param, "true");
}

/// Whether two URLs share scheme, host and port.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}
