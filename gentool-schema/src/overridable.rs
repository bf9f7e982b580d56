use std::ops::Deref;

/// A resolved field value together with its provenance: whether the
/// schema author declared it or the defaulting engine generated it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Overridable<T> {
    value: T,
    explicit: bool,
}

impl<T> Overridable<T> {
    pub fn explicit(value: T) -> Self {
        Self {
            value,
            explicit: true,
        }
    }

    pub fn generated(value: T) -> Self {
        Self {
            value,
            explicit: false,
        }
    }

    /// Use the declared value if present, otherwise generate the default.
    pub fn resolve(declared: Option<T>, default: impl FnOnce() -> T) -> Self {
        match declared {
            Some(value) => Self::explicit(value),
            None => Self::generated(default()),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    pub fn is_generated(&self) -> bool {
        !self.explicit
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Overridable<U> {
        Overridable {
            value: f(self.value),
            explicit: self.explicit,
        }
    }
}

impl<T: Copy> Overridable<T> {
    pub fn get(&self) -> T {
        self.value
    }
}

impl<T> Deref for Overridable<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_records_provenance() {
        let declared = Overridable::resolve(Some(true), || false);
        assert!(declared.get());
        assert!(declared.is_explicit());

        let generated = Overridable::resolve(None, || false);
        assert!(!generated.get());
        assert!(generated.is_generated());
    }

    #[test]
    fn test_map_keeps_provenance() {
        let name = Overridable::explicit("point").map(str::len);
        assert_eq!(name.get(), 5);
        assert!(name.is_explicit());
    }

    #[test]
    fn test_deref() {
        let lines = Overridable::generated(vec!["a".to_string()]);
        assert_eq!(lines.len(), 1);
    }
}
