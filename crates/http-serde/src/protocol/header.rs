//! Ordered, multi-valued header storage.
//!
//! `http::HeaderMap` lowercases names and groups values by name, which loses both the
//! spelling and the relative order of the fields on the wire. A dump has to reproduce
//! those byte for byte, so headers are kept here as a plain sequence of name/value
//! pairs. Lookups and overrides match names ASCII case-insensitively.

use std::fmt;

/// A single header field, name kept in its original case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    name: String,
    value: String,
}

impl HeaderField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    #[inline]
    fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Header fields in insertion order. Duplicate names are allowed and kept apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    fields: Vec<HeaderField>,
}

impl HeaderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { fields: Vec::with_capacity(capacity) }
    }

    /// Number of fields, counting every value of a repeated name.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Appends a field, keeping any existing values of the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(HeaderField::new(name, value));
    }

    /// Replaces every value of `name` with `value`.
    ///
    /// The first existing field keeps its position (and takes the new spelling of the
    /// name), later ones are dropped. When the name is absent the field is appended.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        match self.fields.iter().position(|field| field.is(&name)) {
            Some(first) => {
                self.fields[first] = HeaderField::new(name.as_str(), value);
                let mut index = 0;
                self.fields.retain(|field| {
                    let keep = index <= first || !field.is(&name);
                    index += 1;
                    keep
                });
            }
            None => self.fields.push(HeaderField::new(name, value)),
        }
    }

    /// First value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|field| field.is(name)).map(HeaderField::value)
    }

    /// All values of `name` in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields.iter().filter(move |field| field.is(name)).map(HeaderField::value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.is(name))
    }

    /// Removes every value of `name`, returning them in insertion order.
    pub fn remove(&mut self, name: &str) -> Vec<String> {
        let mut removed = Vec::new();
        self.fields.retain(|field| {
            if field.is(name) {
                removed.push(field.value.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderField> {
        self.fields.iter()
    }
}

impl<'a> IntoIterator for &'a HeaderList {
    type Item = &'a HeaderField;
    type IntoIter = std::slice::Iter<'a, HeaderField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for HeaderList {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        Self { fields: iter.into_iter().map(|(name, value)| HeaderField::new(name, value)).collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let mut headers = HeaderList::new();
        headers.append("Content-Type", "text/plain");

        assert_eq!(headers.get("content-type"), Some("text/plain"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/plain"));
        assert!(headers.contains("Content-type"));
        assert_eq!(headers.get("Accept"), None);
    }

    #[test]
    fn duplicates_accumulate_in_order() {
        let mut headers = HeaderList::new();
        headers.append("Accept", "text/html");
        headers.append("X-Trace", "1");
        headers.append("accept", "application/json");

        assert_eq!(headers.len(), 3);
        assert_eq!(headers.get_all("ACCEPT").collect::<Vec<_>>(), vec!["text/html", "application/json"]);

        let names: Vec<_> = headers.iter().map(HeaderField::name).collect();
        assert_eq!(names, vec!["Accept", "X-Trace", "accept"]);
    }

    #[test]
    fn set_overrides_in_place() {
        let mut headers: HeaderList =
            [("A", "1"), ("content-length", "10"), ("B", "2"), ("Content-Length", "11")].into_iter().collect();

        headers.set("Content-Length", "4");

        let fields: Vec<_> = headers.iter().map(ToString::to_string).collect();
        assert_eq!(fields, vec!["A: 1", "Content-Length: 4", "B: 2"]);

        headers.set("Content-Length", "4");
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn set_appends_missing_name() {
        let mut headers = HeaderList::new();
        headers.append("Accept", "*/*");
        headers.set("Content-Length", "0");

        assert_eq!(headers.iter().last().map(ToString::to_string), Some("Content-Length: 0".to_string()));
    }

    #[test]
    fn remove_returns_all_values() {
        let mut headers: HeaderList = [("Host", "a"), ("Accept", "*/*"), ("host", "b")].into_iter().collect();

        assert_eq!(headers.remove("HOST"), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(headers.len(), 1);
        assert!(headers.remove("Host").is_empty());
    }
}
