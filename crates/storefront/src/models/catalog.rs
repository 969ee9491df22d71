//! Catalog listings.
//!
//! A [`Listing`] is a snapshot of the catalog taken at query time plus an
//! optional name filter. Filtering happens while iterating, and iterating
//! again starts over from the first product.

use std::sync::Arc;

use super::product::Product;

/// A lazily filtered, restartable view of the catalog.
#[derive(Debug, Clone)]
pub struct Listing {
    products: Arc<[Product]>,
    needle: Option<String>,
}

impl Listing {
    /// Every product in `products`.
    pub(crate) fn all(products: Arc<[Product]>) -> Self {
        Self {
            products,
            needle: None,
        }
    }

    /// Products whose name contains `term`, ignoring case.
    ///
    /// A blank term matches everything.
    pub(crate) fn matching(products: Arc<[Product]>, term: &str) -> Self {
        let term = term.trim();
        Self {
            products,
            needle: (!term.is_empty()).then(|| term.to_lowercase()),
        }
    }

    /// Start (or restart) iteration.
    #[must_use]
    pub fn iter(&self) -> ListingIter<'_> {
        ListingIter {
            inner: self.products.iter(),
            needle: self.needle.as_deref(),
        }
    }

    /// The search term in effect, lowercased.
    #[must_use]
    pub fn term(&self) -> Option<&str> {
        self.needle.as_deref()
    }

    /// Whether nothing matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<'a> IntoIterator for &'a Listing {
    type Item = &'a Product;
    type IntoIter = ListingIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`Listing`].
#[derive(Debug, Clone)]
pub struct ListingIter<'a> {
    inner: std::slice::Iter<'a, Product>,
    needle: Option<&'a str>,
}

impl<'a> Iterator for ListingIter<'a> {
    type Item = &'a Product;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = self.needle;
        self.inner
            .by_ref()
            .find(|product| needle.is_none_or(|needle| product.name_matches(needle)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::product::seed_products;

    fn snapshot() -> Arc<[Product]> {
        seed_products().into()
    }

    #[test]
    fn test_all_preserves_order_and_restarts() {
        let listing = Listing::all(snapshot());

        let first: Vec<_> = listing.iter().map(|p| p.name.as_str()).collect();
        let second: Vec<_> = listing.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(first, vec!["Laptop 1", "Phone 1"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_matching_ignores_case() {
        let listing = Listing::matching(snapshot(), "LAP");
        let names: Vec<_> = (&listing).into_iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Laptop 1"]);
        assert_eq!(listing.term(), Some("lap"));
    }

    #[test]
    fn test_blank_term_matches_everything() {
        let listing = Listing::matching(snapshot(), "   ");
        assert_eq!(listing.iter().count(), 2);
        assert!(listing.term().is_none());
    }

    #[test]
    fn test_no_match() {
        let listing = Listing::matching(snapshot(), "tablet");
        assert!(listing.is_empty());
    }

    #[test]
    fn test_description_is_not_searched() {
        let listing = Listing::matching(snapshot(), "smartphone");
        assert!(listing.is_empty());
    }
}
