//! Static catalog of known design system entries.
//!
//! Each entry maps a category and a slug to the logical path of its document in the
//! documentation repositories (`{category}/{slug}.md`).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogItem {
    pub slug: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub file_path: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub items: &'static [CatalogItem],
}

impl Category {
    /// Case-insensitive lookup by slug.
    pub fn item(&self, slug: &str) -> Option<&'static CatalogItem> {
        let slug = slug.trim().to_lowercase();
        self.items.iter().find(|item| item.slug == slug)
    }

    pub fn slugs(&self) -> Vec<&'static str> {
        self.items.iter().map(|item| item.slug).collect()
    }
}

/// One hit from [`Catalog::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    pub category: &'static str,
    pub item: &'static CatalogItem,
}

#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    categories: &'static [Category],
}

impl Catalog {
    pub const fn new(categories: &'static [Category]) -> Self {
        Self { categories }
    }

    /// The compiled-in design system catalog.
    pub const fn builtin() -> Self {
        Self::new(BUILTIN)
    }

    pub fn categories(&self) -> &'static [Category] {
        self.categories
    }

    pub fn category_names(&self) -> Vec<&'static str> {
        self.categories.iter().map(|c| c.name).collect()
    }

    pub fn category(&self, name: &str) -> Option<&'static Category> {
        let name = name.trim().to_lowercase();
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn item(&self, category: &str, slug: &str) -> Option<&'static CatalogItem> {
        self.category(category)?.item(slug)
    }

    /// Case-insensitive substring match over titles and summaries, in catalog order.
    pub fn search(&self, keyword: &str) -> Vec<SearchHit> {
        let keyword = keyword.trim().to_lowercase();
        self.categories
            .iter()
            .flat_map(|category| {
                category.items.iter().map(move |item| SearchHit {
                    category: category.name,
                    item,
                })
            })
            .filter(|hit| {
                hit.item.title.to_lowercase().contains(&keyword)
                    || hit.item.summary.to_lowercase().contains(&keyword)
            })
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

const BUILTIN: &[Category] = &[
    Category {
        name: "components",
        items: &[
            CatalogItem {
                slug: "breadcrumbs",
                title: "Breadcrumbs (Components)",
                summary: "Breadcrumbs are a navigation aid that help users understand where they are in the application hierarchy.",
                file_path: "components/breadcrumbs.md",
            },
            CatalogItem {
                slug: "cards",
                title: "Cards (Components)",
                summary: "Cards are containers that display content and actions on a single topic.",
                file_path: "components/cards.md",
            },
            CatalogItem {
                slug: "more-less-link",
                title: "More/Less Link (Components)",
                summary: "More/Less links allow users to expand or collapse content sections.",
                file_path: "components/more-less-link.md",
            },
        ],
    },
    Category {
        name: "layouts",
        items: &[
            CatalogItem {
                slug: "columns-layout",
                title: "Columns Layout (Layouts)",
                summary: "Displays any number of columns alongside each other. On narrow screens and mobile devices, columns are stacked.",
                file_path: "layouts/columns-layout.md",
            },
            CatalogItem {
                slug: "empty-states",
                title: "Empty States (Layouts)",
                summary: "Empty states provide feedback when no data is available for display in a view.",
                file_path: "layouts/empty-states.md",
            },
            CatalogItem {
                slug: "side-by-side-layout",
                title: "Side By Side (Layouts)",
                summary: "Displays components alongside each other.",
                file_path: "layouts/side-by-side-layout.md",
            },
            CatalogItem {
                slug: "pane-layout",
                title: "Pane Layout (Layouts)",
                summary: "Displays two or three vertical panes, each with independent scrolling.",
                file_path: "layouts/pane-layout.md",
            },
        ],
    },
    Category {
        name: "patterns",
        items: &[
            CatalogItem {
                slug: "banners",
                title: "Banners (Patterns)",
                summary: "Banners provide users with important information that may affect their experience.",
                file_path: "patterns/banners.md",
            },
            CatalogItem {
                slug: "notifications",
                title: "Notifications (Patterns)",
                summary: "Notifications provide users with timely information about events or changes in the system.",
                file_path: "patterns/notifications.md",
            },
        ],
    },
];
