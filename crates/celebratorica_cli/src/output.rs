//! Plain-text rendering of store contents.

use celebratorica_core::{Category, ImportReport, Item};

pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories\n".to_string();
    }

    let mut output = String::new();
    for category in categories {
        output.push_str(&format!(
            "{}. {} [id {}]\n",
            category.order,
            category.name,
            display_id(category.id)
        ));
    }
    output
}

pub fn format_item_list(items: &[Item]) -> String {
    if items.is_empty() {
        return "No items\n".to_string();
    }

    let mut output = String::new();
    for item in items {
        output.push_str(&format!(
            "{:>15}  #{:<5} {} (category {})\n",
            item.date,
            display_id(item.id),
            item.text,
            item.category_id
        ));
    }
    output
}

pub fn format_import_report(report: &ImportReport) -> String {
    format!(
        "Imported {} item(s); {} new categor{}, {} merged by name",
        report.imported_items,
        report.created_categories,
        if report.created_categories == 1 { "y" } else { "ies" },
        report.matched_categories
    )
}

pub fn display_id<T: std::fmt::Display>(id: Option<T>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}
