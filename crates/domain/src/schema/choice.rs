//! Closed vocabularies stored as strings in the campaign document.

/// An enum whose variants are stored as fixed strings.
pub trait Choice: Copy + Sized + 'static {
    /// Every variant, in the order offered to users.
    const ALL: &'static [Self];

    /// The exact string stored in the document.
    fn as_str(&self) -> &'static str;

    fn from_stored(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|choice| choice.as_str() == value)
    }

    /// `A, B, C` listing used in error messages.
    fn listing() -> String {
        Self::ALL
            .iter()
            .map(Choice::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Declares a string-backed enum with `Choice`, `Display`, `FromStr` and
/// serde impls that all agree on the stored spelling.
#[macro_export]
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $stored:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant
            ),+
        }

        impl $crate::schema::Choice for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $stored),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::schema::Choice::as_str(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::DomainError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                <Self as $crate::schema::Choice>::from_stored(s).ok_or_else(|| {
                    $crate::error::DomainError::parse(format!(
                        "Unknown {}: {}",
                        stringify!($name),
                        s
                    ))
                })
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::schema::Choice::as_str(self))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::std::result::Result<Self, D::Error> {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(::serde::de::Error::custom)
            }
        }
    };
}
