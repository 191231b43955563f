//! Text rendering for the user-facing documentation operations.
//!
//! Each operation returns the complete text shown to the user. Fetch diagnostics never end
//! up here; an unresolvable document is reported as unavailable and operators find the
//! reason in the logs.

use crate::catalog::Catalog;
use crate::contract::ContentFetcher;
use crate::markdown;
use crate::source_manager::{SourceManager, SourcedContent};

pub struct DocsService<F> {
    catalog: Catalog,
    manager: SourceManager<F>,
}

impl<F: ContentFetcher> DocsService<F> {
    pub fn new(catalog: Catalog, manager: SourceManager<F>) -> Self {
        Self { catalog, manager }
    }

    pub fn manager(&self) -> &SourceManager<F> {
        &self.manager
    }

    pub fn list_categories(&self) -> String {
        format!(
            "Available design system categories: {}",
            self.catalog.category_names().join(", ")
        )
    }

    pub fn list_components(&self, category: &str) -> String {
        let Some(found) = self.catalog.category(category) else {
            return self.unknown_category();
        };
        let items: Vec<String> = found
            .items
            .iter()
            .map(|item| format!("{}: {} - {}", item.slug, item.title, item.summary))
            .collect();
        format!("Components in {}:\n\n{}", found.name, items.join("\n\n"))
    }

    pub async fn component_details(&self, category: &str, name: &str) -> String {
        let Some(found) = self.catalog.category(category) else {
            return self.unknown_category();
        };
        let Some(item) = found.item(name) else {
            return format!(
                "Component not found in {}. Available components: {}",
                found.name,
                found.slugs().join(", ")
            );
        };

        match self.manager.resolve(item.file_path).await {
            Some(content) => render_details(item.title, item.summary, &content),
            None => format!(
                "Documentation for {} is not available right now.\n\nBasic information:\n{}\n\nDocument path: {}",
                item.title, item.summary, item.file_path
            ),
        }
    }

    pub fn search(&self, keyword: &str) -> String {
        let hits = self.catalog.search(keyword);
        if hits.is_empty() {
            return format!("No results found for keyword \"{keyword}\".");
        }
        let formatted: Vec<String> = hits
            .iter()
            .map(|hit| {
                format!(
                    "Category: {}\nComponent: {}\n{}\n{}",
                    hit.category, hit.item.slug, hit.item.title, hit.item.summary
                )
            })
            .collect();
        format!(
            "Found {} results for \"{}\":\n\n{}",
            hits.len(),
            keyword,
            formatted.join("\n\n")
        )
    }

    pub fn sources_status(&self) -> String {
        let lines: Vec<String> = self
            .manager
            .source_status()
            .iter()
            .map(|status| {
                format!(
                    "{}: {} (priority {}, auth {}, last sync {})",
                    status.name,
                    if status.enabled { "enabled" } else { "disabled" },
                    status.priority,
                    if status.auth_required {
                        "required"
                    } else {
                        "not required"
                    },
                    status.last_sync.as_deref().unwrap_or("never")
                )
            })
            .collect();
        format!(
            "Documentation sources:\n{}\nCached documents: {}",
            lines.join("\n"),
            self.manager.cached_paths()
        )
    }

    pub fn refresh(&self) -> String {
        self.manager.refresh();
        "Documentation cache cleared.".to_string()
    }

    fn unknown_category(&self) -> String {
        format!(
            "Category not found. Available categories: {}",
            self.catalog.category_names().join(", ")
        )
    }
}

fn render_details(title: &str, summary: &str, content: &SourcedContent) -> String {
    let mut out = format!("# {title}\n\n{summary}\n\n");

    out.push_str(&format!("Source: {}", content.source));
    if let Some(overridden) = content.overrides {
        out.push_str(&format!(" (overrides {overridden})"));
    }
    out.push('\n');
    if let Some(status) = content.frontmatter.get("status") {
        out.push_str(&format!("Status: {status}\n"));
    }
    out.push_str(&format!("Last updated: {}\n", content.last_updated));

    let sections = markdown::extract_sections(&content.body);
    if sections.is_empty() {
        out.push('\n');
        out.push_str(content.body.trim());
    } else {
        if !sections.design.is_empty() {
            out.push_str(&format!("\n## Design\n\n{}\n", sections.design));
        }
        if !sections.development.is_empty() {
            out.push_str(&format!("\n## Development\n\n{}\n", sections.development));
        }
    }
    out
}
