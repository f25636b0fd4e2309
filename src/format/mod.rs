//! Output formatting for listings and facets (table, JSON, markdown, CSV).

use crate::catalog::{CatalogFacets, Product, ProductListResponse};
use crate::config::OutputFormat;

const NAME_WIDTH: usize = 40;

/// Formats listing responses for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats one listing page.
    pub fn format_listing(&self, response: &ProductListResponse) -> String {
        match self.format {
            OutputFormat::Json => self.json(response),
            OutputFormat::Table => self.table_listing(response),
            OutputFormat::Markdown => self.markdown_listing(response),
            OutputFormat::Csv => self.csv_products(&response.items),
        }
    }

    /// Formats dataset facets.
    pub fn format_facets(&self, facets: &CatalogFacets) -> String {
        match self.format {
            OutputFormat::Json => self.json(facets),
            OutputFormat::Table => self.table_facets(facets),
            OutputFormat::Markdown => self.markdown_facets(facets),
            OutputFormat::Csv => self.csv_facets(facets),
        }
    }

    fn json<T: serde::Serialize>(&self, value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    // Table formatting

    fn table_listing(&self, response: &ProductListResponse) -> String {
        if response.items.is_empty() {
            return format!("No products found. ({} matching, offset {})", response.total, response.offset);
        }

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<10}  {:>10}  {:>5}  {:>6}  {:<12}  {}",
            "ID", "Price", "Off", "Stock", "Brand", "Name"
        ));
        lines.push(format!(
            "{:-<10}  {:->10}  {:->5}  {:->6}  {:-<12}  {:-<w$}",
            "",
            "",
            "",
            "",
            "",
            "",
            w = NAME_WIDTH
        ));

        for product in &response.items {
            let discount = if product.is_on_sale() {
                format!("{}%", product.discount_percent)
            } else {
                String::new()
            };

            lines.push(format!(
                "{:<10}  {:>10.2}  {:>5}  {:>6}  {:<12}  {}",
                product.id,
                product.price,
                discount,
                product.stock,
                product.brand,
                truncate(&product.name, NAME_WIDTH)
            ));
        }

        lines.push(String::new());
        lines.push(page_summary(response));

        lines.join("\n")
    }

    fn table_facets(&self, facets: &CatalogFacets) -> String {
        [
            format!("Products: {}", facets.total),
            format!("Colors:   {}", join_or_none(&facets.available_colors)),
            format!("Brands:   {}", join_or_none(&facets.available_brands)),
            format!("Price:    {:.2} - {:.2}", facets.price_min, facets.price_max),
        ]
        .join("\n")
    }

    // Markdown formatting

    fn markdown_listing(&self, response: &ProductListResponse) -> String {
        let mut lines = Vec::new();

        lines.push("| ID | Price | Off | Stock | Brand | Name |".to_string());
        lines.push("|----|-------|-----|-------|-------|------|".to_string());

        for product in &response.items {
            let mut name = truncate(&product.name, NAME_WIDTH);
            if product.bestseller {
                name.push_str(" ★");
            }

            lines.push(format!(
                "| {} | {:.2} | {} | {} | {} | {} |",
                product.id,
                product.price,
                if product.is_on_sale() { format!("{}%", product.discount_percent) } else { String::new() },
                product.stock,
                product.brand,
                name
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{}*", page_summary(response)));

        lines.join("\n")
    }

    fn markdown_facets(&self, facets: &CatalogFacets) -> String {
        [
            "## Catalog facets".to_string(),
            String::new(),
            format!("- **Products:** {}", facets.total),
            format!("- **Colors:** {}", join_or_none(&facets.available_colors)),
            format!("- **Brands:** {}", join_or_none(&facets.available_brands)),
            format!("- **Price:** {:.2} - {:.2}", facets.price_min, facets.price_max),
        ]
        .join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "id,name,price,discount_percent,bestseller,stock,category,brand,condition,colors,popularity_rank".to_string()
    }

    fn csv_products(&self, products: &[Product]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for product in products {
            lines.push(format!(
                "{},{},{:.2},{},{},{},{},{},{},{},{}",
                Self::csv_escape(&product.id),
                Self::csv_escape(&product.name),
                product.price,
                product.discount_percent,
                product.bestseller,
                product.stock,
                Self::csv_escape(&product.category),
                Self::csv_escape(&product.brand),
                Self::csv_escape(&product.condition),
                Self::csv_escape(&product.colors.join(";")),
                product.popularity_rank
            ));
        }

        lines.join("\n")
    }

    fn csv_facets(&self, facets: &CatalogFacets) -> String {
        let mut lines = vec!["facet,value".to_string()];
        lines.extend(facets.available_colors.iter().map(|c| format!("color,{}", Self::csv_escape(c))));
        lines.extend(facets.available_brands.iter().map(|b| format!("brand,{}", Self::csv_escape(b))));
        lines.push(format!("price_min,{:.2}", facets.price_min));
        lines.push(format!("price_max,{:.2}", facets.price_max));
        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

fn page_summary(response: &ProductListResponse) -> String {
    if response.items.is_empty() {
        return format!("0 of {} products", response.total);
    }
    let more = if response.has_more { ", more available" } else { "" };
    format!(
        "Showing {}-{} of {} products{}",
        response.offset + 1,
        response.offset + response.items.len(),
        response.total,
        more
    )
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        let head: String = value.chars().take(width - 3).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}
