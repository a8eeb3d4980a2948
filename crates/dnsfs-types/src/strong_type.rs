/// Declares a newtype wrapper around a primitive integer.
///
/// The wrapper derives the usual value-type traits plus transparent serde,
/// and converts to and from the inner type with `From`. The inner value is
/// public, so `id.0` is the escape hatch when the raw number is needed.
#[macro_export]
macro_rules! strong_type {
    ($(#[$meta:meta])* $name:ident, $inner:ty) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            Default,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        #[repr(transparent)]
        pub struct $name(pub $inner);

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$inner> for $name {
            #[inline]
            fn from(raw: $inner) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for $inner {
            #[inline]
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    strong_type!(SampleId, u64);

    #[test]
    fn test_roundtrip_conversions() {
        let id: SampleId = 7u64.into();
        assert_eq!(id.0, 7);
        let raw: u64 = id.into();
        assert_eq!(raw, 7);
    }

    #[test]
    fn test_display_and_debug() {
        let id = SampleId(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(format!("{id:?}"), "SampleId(42)");
    }

    #[test]
    fn test_hash_and_ord() {
        let mut set = HashSet::new();
        set.insert(SampleId(1));
        set.insert(SampleId(1));
        set.insert(SampleId(2));
        assert_eq!(set.len(), 2);
        assert!(SampleId(1) < SampleId(2));
    }

    #[test]
    fn test_serde_transparent() {
        let id = SampleId(9);
        assert_eq!(serde_json::to_string(&id).unwrap(), "9");
        let back: SampleId = serde_json::from_str("9").unwrap();
        assert_eq!(back, id);
    }
}
