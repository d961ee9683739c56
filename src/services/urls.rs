use std::collections::BTreeMap;

use url::form_urlencoded;

/// Insert `key` with `value` into the query string of `url` and return the
/// new URL, overwriting any previous value. Scheme, host, path and fragment
/// are preserved. Idempotent: applying the same pair twice yields the same
/// URL as once.
pub fn insert_query_var(url: &str, key: &str, value: &str) -> String {
    let (prefix, query, fragment) = split_url(url);
    let mut vars = parse_query(query);
    vars.insert(key.to_string(), vec![value.to_string()]);
    assemble(prefix, &serialize_query(&vars), fragment)
}

/// Remove `key` from a raw query string, re-encoding the survivors.
pub fn strip_query_var(query: &str, key: &str) -> String {
    let mut vars = parse_query(query);
    vars.remove(key);
    serialize_query(&vars)
}

/// First value of `key` in a raw query string, percent-decoded.
pub fn query_var(query: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Prefix rooted paths with the mount prefix; full URLs pass through as-is.
pub fn full_path(path: &str, script_name: &str) -> String {
    if path.starts_with('/') {
        format!("{script_name}{path}")
    } else {
        path.to_string()
    }
}

fn split_url(url: &str) -> (&str, &str, Option<&str>) {
    let (rest, fragment) = match url.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (url, None),
    };
    match rest.split_once('?') {
        Some((prefix, query)) => (prefix, query, fragment),
        None => (rest, "", fragment),
    }
}

fn parse_query(query: &str) -> BTreeMap<String, Vec<String>> {
    let mut vars: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        vars.entry(key.into_owned()).or_default().push(value.into_owned());
    }
    vars
}

// Sorted by key so rewritten URLs come out deterministic.
fn serialize_query(vars: &BTreeMap<String, Vec<String>>) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());
    for (key, values) in vars {
        for value in values {
            out.append_pair(key, value);
        }
    }
    out.finish()
}

fn assemble(prefix: &str, query: &str, fragment: Option<&str>) -> String {
    let mut url = prefix.to_string();
    if !query.is_empty() {
        url.push('?');
        url.push_str(query);
    }
    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
    url
}
