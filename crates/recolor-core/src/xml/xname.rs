use std::fmt;

/// Expanded XML name: namespace URI plus local name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct XName {
    pub namespace: Option<String>,
    pub local_name: String,
}

impl XName {
    pub fn new(namespace: &str, local_name: &str) -> Self {
        Self {
            namespace: if namespace.is_empty() {
                None
            } else {
                Some(namespace.to_string())
            },
            local_name: local_name.to_string(),
        }
    }

    pub fn local(local_name: &str) -> Self {
        Self {
            namespace: None,
            local_name: local_name.to_string(),
        }
    }

    /// Compare against a namespace/local pair without allocating.
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name == local_name
    }

    pub fn in_namespace(&self, namespace: &str) -> bool {
        self.namespace.as_deref() == Some(namespace)
    }
}

impl fmt::Display for XName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XAttribute {
    pub name: XName,
    pub value: String,
}

impl XAttribute {
    pub fn new(name: XName, value: &str) -> Self {
        Self {
            name,
            value: value.to_string(),
        }
    }
}
