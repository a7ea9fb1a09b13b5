use std::collections::HashMap;

/// Authorization tokens keyed by botblock.org list identifier.
///
/// A list identifier holds at most one token; setting it again replaces the
/// previous one. The store lives only in memory and is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialStore {
    tokens: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the token for `list_id`.
    ///
    /// Neither the list identifier nor the token is validated.
    pub fn set(&mut self, list_id: impl Into<String>, token: impl Into<String>) {
        self.tokens.insert(list_id.into(), token.into());
    }

    /// Removes the token for `list_id`, returning it if one was stored.
    ///
    /// Removing an unknown list identifier is a no-op.
    pub fn remove(&mut self, list_id: &str) -> Option<String> {
        self.tokens.remove(list_id)
    }

    pub fn get(&self, list_id: &str) -> Option<&str> {
        self.tokens.get(list_id).map(String::as_str)
    }

    pub fn contains(&self, list_id: &str) -> bool {
        self.tokens.contains_key(list_id)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CredentialStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (list_id, token) in iter {
            store.set(list_id, token);
        }
        store
    }
}
