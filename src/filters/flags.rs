//! Boolean product flag filters.

use super::Filter;
use crate::catalog::Product;

/// Filters on the bestseller flag.
pub struct BestsellerFilter {
    expected: bool,
}

impl BestsellerFilter {
    pub fn new(expected: bool) -> Self {
        Self { expected }
    }
}

impl Filter for BestsellerFilter {
    fn matches(&self, product: &Product) -> bool {
        product.bestseller == self.expected
    }

    fn description(&self) -> String {
        if self.expected { "Bestsellers only" } else { "Exclude bestsellers" }.to_string()
    }
}

/// Filters on whether a product is discounted.
pub struct OnSaleFilter {
    expected: bool,
}

impl OnSaleFilter {
    pub fn new(expected: bool) -> Self {
        Self { expected }
    }
}

impl Filter for OnSaleFilter {
    fn matches(&self, product: &Product) -> bool {
        product.is_on_sale() == self.expected
    }

    fn description(&self) -> String {
        if self.expected { "On sale only" } else { "Full price only" }.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_product(bestseller: bool, discount_percent: u8) -> Product {
        Product { id: "p1".to_string(), bestseller, discount_percent, ..Default::default() }
    }

    #[test]
    fn test_bestseller_filter() {
        let only = BestsellerFilter::new(true);
        assert!(only.matches(&make_product(true, 0)));
        assert!(!only.matches(&make_product(false, 0)));

        let exclude = BestsellerFilter::new(false);
        assert!(exclude.matches(&make_product(false, 0)));
        assert!(!exclude.matches(&make_product(true, 0)));
    }

    #[test]
    fn test_on_sale_filter() {
        let on_sale = OnSaleFilter::new(true);
        assert!(on_sale.matches(&make_product(false, 15)));
        assert!(!on_sale.matches(&make_product(false, 0)));

        let full_price = OnSaleFilter::new(false);
        assert!(full_price.matches(&make_product(false, 0)));
        assert!(!full_price.matches(&make_product(false, 1)));
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(BestsellerFilter::new(true).description(), "Bestsellers only");
        assert_eq!(OnSaleFilter::new(false).description(), "Full price only");
    }
}
