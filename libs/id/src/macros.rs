//! Macro for defining prefixed ULID identifiers.

/// Defines a newtype over ULID rendered as `{prefix}_{ulid}`.
///
/// ```ignore
/// define_id!(RunId, "run");
///
/// let run_id = RunId::new();
/// let network = format!("relaycheck-{}-network", run_id.slug());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($crate::Ulid);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// Generates a fresh ID.
            #[must_use]
            pub fn new() -> Self {
                Self($crate::Ulid::new())
            }

            /// Lowercase form, safe to embed in container and network names.
            #[must_use]
            pub fn slug(&self) -> String {
                format!("{}-{}", Self::PREFIX, self.0.to_string().to_lowercase())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}_{}", Self::PREFIX, self.0)
            }
        }
    };
}
