//! Closed category enumerations and their display attributes.
//!
//! Every category enum carries one static table mapping each variant to
//! its raw (on-disk) value, display name, icon and color. All lookups go
//! through that table instead of per-variant `match` arms.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryEntry<C: 'static> {
    pub variant: C,
    pub raw: &'static str,
    pub display_name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

pub trait Category: Copy + PartialEq + fmt::Debug + 'static {
    const TABLE: &'static [CategoryEntry<Self>];

    fn entry(&self) -> &'static CategoryEntry<Self> {
        // Every variant is listed in TABLE; `category_tables_are_complete`
        // tests guard that for each enum.
        Self::TABLE
            .iter()
            .find(|e| e.variant == *self)
            .unwrap_or(&Self::TABLE[0])
    }

    fn raw(&self) -> &'static str {
        self.entry().raw
    }

    fn display_name(&self) -> &'static str {
        self.entry().display_name
    }

    fn icon(&self) -> &'static str {
        self.entry().icon
    }

    fn color(&self) -> &'static str {
        self.entry().color
    }

    fn all() -> Vec<Self> {
        Self::TABLE.iter().map(|e| e.variant).collect()
    }

    /// Accepts either the raw value or the display name, ignoring case.
    fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::TABLE
            .iter()
            .find(|e| e.raw.eq_ignore_ascii_case(s) || e.display_name.eq_ignore_ascii_case(s))
            .map(|e| e.variant)
    }
}

/// Implements `Display` and `FromStr` for a [`Category`] through its table.
macro_rules! category_text_impls {
    ($ty:ty) => {
        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::category::Category::display_name(self))
            }
        }

        impl ::std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as $crate::category::Category>::parse(s).ok_or_else(|| {
                    let known = <$ty as $crate::category::Category>::TABLE
                        .iter()
                        .map(|e| e.raw)
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("unknown {} '{s}' (expected one of: {known})", stringify!($ty))
                })
            }
        }
    };
}

pub(crate) use category_text_impls;

/// Asserts that a category table lists every variant exactly once and that
/// the table's raw values agree with the serde representation.
#[cfg(test)]
pub(crate) fn assert_table_consistent<C>()
where
    C: Category + serde::Serialize,
{
    for entry in C::TABLE {
        let count = C::TABLE.iter().filter(|e| e.variant == entry.variant).count();
        assert_eq!(count, 1, "{:?} listed more than once", entry.variant);
        let json = serde_json::to_string(&entry.variant).unwrap();
        assert_eq!(json, format!("\"{}\"", entry.raw));
        assert_eq!(C::parse(entry.raw), Some(entry.variant));
        assert_eq!(C::parse(entry.display_name), Some(entry.variant));
    }
}
