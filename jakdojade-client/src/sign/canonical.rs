//! Canonical query-string rendering.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters `encodeURIComponent` leaves untouched. Keys and values are
/// ordered by this encoding, not by the form encoding that is emitted.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Query parameters for a signed request.
///
/// Every key holds a list of values; a scalar parameter is a one-element
/// list. Adding a value under an existing key appends to that key's list.
/// Insertion order is kept for the wire but never affects the signature.
///
/// # Examples
///
/// ```
/// use jakdojade_client::sign::{QueryParams, canonicalize};
///
/// let params = QueryParams::new()
///     .with("query", "Plac Defilad")
///     .with("city_symbol", "WARSZAWA");
///
/// assert_eq!(canonicalize(&params), "city_symbol=WARSZAWA&query=Plac+Defilad");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, returning the updated set.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add several values under one key, returning the updated set.
    pub fn with_list<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let key = key.into();
        for value in values {
            self.insert(key.clone(), value);
        }
        self
    }

    /// Add a value under `key`, appending if the key is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Returns true if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate keys with their values, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// One `(key, value)` pair per value, in insertion order, as sent on the wire.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.iter()
            .flat_map(|(key, values)| values.iter().map(move |v| (key, v.as_str())))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Render parameters into the canonical string the server signs.
///
/// Keys and the values under each key are ordered by their
/// component-encoded bytes. Ordering uses the key as given; only the
/// rendered key is lower-cased, so `B` sorts before `a` and renders as
/// `b=..&a=..`. Pairs are form-encoded, joined with `&`, and finally
/// passed through a fixed set of escape substitutions. An empty set
/// renders as the empty string.
pub fn canonicalize(params: &QueryParams) -> String {
    // (key order, value order, key, value)
    let mut pairs: Vec<(String, String, String, &str)> = Vec::new();

    for (key, values) in params.iter() {
        let key_order = component_encode(key);
        let key = key.to_lowercase();
        for value in values {
            pairs.push((
                key_order.clone(),
                component_encode(value),
                key.clone(),
                value.as_str(),
            ));
        }
    }

    if pairs.is_empty() {
        return String::new();
    }

    pairs.sort();

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (_, _, key, value) in &pairs {
        serializer.append_pair(key, value);
    }

    substitute(&serializer.finish())
}

fn component_encode(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Post-encoding substitutions applied by the provider's web client.
fn substitute(encoded: &str) -> String {
    encoded
        .replace(':', "%3A")
        .replace("%20", "+")
        .replace(' ', "+")
        .replace('(', "%28")
        .replace(')', "%29")
        .replace('\'', "%27")
        .replace(',', "%2C")
        .replace(';', "%3B")
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// A parameter list together with a shuffled copy of itself.
    fn params_and_shuffle() -> impl Strategy<Value = (Vec<(String, String)>, Vec<(String, String)>)>
    {
        proptest::collection::vec(("[a-zA-Z_ (]{1,6}", "[ -~]{0,8}"), 0..8).prop_flat_map(|v| {
            let shuffled = Just(v.clone()).prop_shuffle();
            (Just(v), shuffled)
        })
    }

    proptest! {
        /// Insertion order never changes the canonical form
        #[test]
        fn order_independent((ordered, shuffled) in params_and_shuffle()) {
            let a: QueryParams = ordered.into_iter().collect();
            let b: QueryParams = shuffled.into_iter().collect();
            prop_assert_eq!(canonicalize(&a), canonicalize(&b));
        }

        /// Canonical output is always ASCII without raw reserved characters
        #[test]
        fn output_has_no_raw_reserved(pairs in proptest::collection::vec(("[a-z]{1,4}", "\\PC{0,6}"), 1..5)) {
            let params: QueryParams = pairs.into_iter().collect();
            let canonical = canonicalize(&params);
            prop_assert!(canonical.is_ascii());
            for c in [' ', ':', '(', ')', '\'', ',', ';'] {
                prop_assert!(!canonical.contains(c));
            }
        }
    }
}
