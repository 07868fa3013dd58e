//! Macro for implementing Display and FromStr for tag enums
//!
//! Secret classes travel through config files, environment variable names
//! and log fields as strings. This macro keeps the string form of each
//! variant in one place.
//!
//! # Example
//!
//! ```rust
//! use enverify_domain::impl_tag_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Lookup {
//!     ById,
//!     ByEmail,
//! }
//!
//! impl_tag_conversions!(Lookup {
//!     ById => "by_id",
//!     ByEmail => "by_email",
//! });
//!
//! assert_eq!(Lookup::ById.as_str(), "by_id");
//! assert_eq!("BY_EMAIL".parse::<Lookup>().unwrap(), Lookup::ByEmail);
//! ```

/// Implements `as_str`, Display and FromStr for fieldless enums
///
/// This macro generates:
/// - `as_str()`: the canonical lowercase tag
/// - Display trait: writes the canonical tag
/// - FromStr trait: parses case-insensitive strings to enum variants
#[macro_export]
macro_rules! impl_tag_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical string tag for this variant.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestTag {
        Primary,
        Retired,
    }

    impl_tag_conversions!(TestTag {
        Primary => "primary",
        Retired => "retired",
    });

    #[test]
    fn test_display_conversion() {
        assert_eq!(TestTag::Primary.to_string(), "primary");
        assert_eq!(TestTag::Retired.as_str(), "retired");
    }

    #[test]
    fn test_fromstr_mixed_case() {
        assert_eq!(TestTag::from_str("PrImArY").unwrap(), TestTag::Primary);
        assert_eq!(TestTag::from_str("RETIRED").unwrap(), TestTag::Retired);
    }

    #[test]
    fn test_fromstr_invalid() {
        let result = TestTag::from_str("stale");
        assert!(result.unwrap_err().contains("Invalid TestTag: stale"));
        assert!(TestTag::from_str("").is_err());
    }
}
