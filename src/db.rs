//! Registry of known papers, categories, vendors and templates.
//!
//! The registry is an explicitly constructed value: the application builds
//! one, registers entries into it and passes it by reference to whatever
//! needs lookups. Lookups are defensive rather than fallible: an empty name
//! or id logs a warning and falls back to the first registered entry, an
//! unknown one logs a warning and yields `None`. Callers treat an absent
//! result as "unknown, proceed with a safe default".

use std::cmp::Ordering;

use crate::template::{Category, Paper, Template, Vendor};

/// Pseudo paper id for user-defined page sizes. Never registered.
const OTHER_PAPER_ID: &str = "Other";

/// Natural ordering for part names: digit runs compare numerically, so
/// "C2163" sorts before "C2244-10" and "5160" before "5971".
pub fn compare_part_names(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let run_a = digit_run(a, &mut i);
            let run_b = digit_run(b, &mut j);
            match numeric_cmp(run_a, run_b) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        } else {
            match a[i].cmp(&b[j]) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                unequal => return unequal,
            }
        }
    }
    (a.len() - i).cmp(&(b.len() - j))
}

fn digit_run<'a>(s: &'a [u8], pos: &mut usize) -> &'a [u8] {
    let start = *pos;
    while *pos < s.len() && s[*pos].is_ascii_digit() {
        *pos += 1;
    }
    &s[start..*pos]
}

fn numeric_cmp(a: &[u8], b: &[u8]) -> Ordering {
    let trim = |s: &[u8]| {
        let nonzero = s.iter().position(|&c| c != b'0').unwrap_or(s.len());
        s[nonzero..].to_vec()
    };
    let (ta, tb) = (trim(a), trim(b));
    ta.len().cmp(&tb.len()).then_with(|| ta.cmp(&tb))
}

/// The media registry.
#[derive(Debug, Clone, Default)]
pub struct Db {
    papers: Vec<Paper>,
    categories: Vec<Category>,
    vendors: Vec<Vendor>,
    templates: Vec<Template>,
}

impl Db {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-seeded with the common paper sizes.
    pub fn with_standard_papers() -> Self {
        let mut db = Self::new();
        for (id, name, width, height) in [
            ("A4", "A4", 595.0, 842.0),
            ("US-Letter", "US Letter", 612.0, 792.0),
            ("US-Legal", "US Legal", 612.0, 1008.0),
            ("A5", "A5", 420.0, 595.0),
        ] {
            db.register_paper(Paper {
                id: id.to_owned(),
                name: name.to_owned(),
                width,
                height,
            });
        }
        db
    }

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn vendors(&self) -> &[Vendor] {
        &self.vendors
    }

    /// Registered templates, kept in natural part-name order.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Whether `id` is the reserved "Other" pseudo paper id.
    pub fn is_paper_id_other(id: &str) -> bool {
        id == OTHER_PAPER_ID
    }

    /// Whether `id` names a registered paper.
    pub fn is_paper_id_known(&self, id: &str) -> bool {
        self.papers.iter().any(|p| p.id == id)
    }

    // ───── Registration; duplicates warn and keep the first entry ─────

    pub fn register_paper(&mut self, paper: Paper) {
        if self.papers.iter().any(|p| p.id == paper.id) {
            tracing::warn!("Duplicate paper id \"{}\"", paper.id);
            return;
        }
        self.papers.push(paper);
    }

    pub fn register_category(&mut self, category: Category) {
        if self.categories.iter().any(|c| c.id == category.id) {
            tracing::warn!("Duplicate category id \"{}\"", category.id);
            return;
        }
        self.categories.push(category);
    }

    pub fn register_vendor(&mut self, vendor: Vendor) {
        if self.vendors.iter().any(|v| v.name == vendor.name) {
            tracing::warn!("Duplicate vendor name \"{}\"", vendor.name);
            return;
        }
        self.vendors.push(vendor);
    }

    /// Register a template, inserted at its natural-order position.
    pub fn register_template(&mut self, template: Template) {
        let name = template.name();
        if self.templates.iter().any(|t| t.name() == name) {
            tracing::warn!("Duplicate template name \"{}\"", name);
            return;
        }
        let pos = self
            .templates
            .partition_point(|t| compare_part_names(&t.name(), &name) == Ordering::Less);
        self.templates.insert(pos, template);
    }

    // ───── Lookups ─────

    pub fn lookup_paper_from_name(&self, name: &str) -> Option<&Paper> {
        if name.is_empty() {
            tracing::warn!("Empty paper name, falling back to first entry");
            return self.papers.first();
        }
        let paper = self.papers.iter().find(|p| p.name == name);
        if paper.is_none() {
            tracing::warn!("Unknown paper name \"{}\"", name);
        }
        paper
    }

    pub fn lookup_paper_from_id(&self, id: &str) -> Option<&Paper> {
        if id.is_empty() {
            tracing::warn!("Empty paper id, falling back to first entry");
            return self.papers.first();
        }
        let paper = self.papers.iter().find(|p| p.id == id);
        if paper.is_none() {
            tracing::warn!("Unknown paper id \"{}\"", id);
        }
        paper
    }

    /// Paper id for `name`, or "" when unknown.
    pub fn lookup_paper_id_from_name(&self, name: &str) -> String {
        self.lookup_paper_from_name(name)
            .map(|p| p.id.clone())
            .unwrap_or_default()
    }

    /// Paper display name for `id`, or "" when unknown. The reserved
    /// "Other" id resolves without a registry entry.
    pub fn lookup_paper_name_from_id(&self, id: &str) -> String {
        if Self::is_paper_id_other(id) {
            return OTHER_PAPER_ID.to_owned();
        }
        self.lookup_paper_from_id(id)
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }

    pub fn lookup_category_from_id(&self, id: &str) -> Option<&Category> {
        if id.is_empty() {
            tracing::warn!("Empty category id, falling back to first entry");
            return self.categories.first();
        }
        let category = self.categories.iter().find(|c| c.id == id);
        if category.is_none() {
            tracing::warn!("Unknown category id \"{}\"", id);
        }
        category
    }

    pub fn lookup_category_from_name(&self, name: &str) -> Option<&Category> {
        if name.is_empty() {
            tracing::warn!("Empty category name, falling back to first entry");
            return self.categories.first();
        }
        let category = self.categories.iter().find(|c| c.name == name);
        if category.is_none() {
            tracing::warn!("Unknown category name \"{}\"", name);
        }
        category
    }

    pub fn lookup_vendor_from_name(&self, name: &str) -> Option<&Vendor> {
        if name.is_empty() {
            tracing::warn!("Empty vendor name, falling back to first entry");
            return self.vendors.first();
        }
        let vendor = self.vendors.iter().find(|v| v.name == name);
        if vendor.is_none() {
            tracing::warn!("Unknown vendor name \"{}\"", name);
        }
        vendor
    }

    /// Look up a template by its full "Brand Part" name.
    pub fn lookup_template_from_name(&self, name: &str) -> Option<&Template> {
        if name.is_empty() {
            tracing::warn!("Empty template name, falling back to first entry");
            return self.templates.first();
        }
        let template = self.templates.iter().find(|t| t.name() == name);
        if template.is_none() {
            tracing::warn!("Unknown template name \"{}\"", name);
        }
        template
    }

    pub fn lookup_template_from_brand_part(&self, brand: &str, part: &str) -> Option<&Template> {
        if brand.is_empty() || part.is_empty() {
            tracing::warn!("Empty template brand and/or part, falling back to first entry");
            return self.templates.first();
        }
        let template = self
            .templates
            .iter()
            .find(|t| t.brand == brand && t.part == part);
        if template.is_none() {
            tracing::warn!("Unknown template brand/part \"{}\"/\"{}\"", brand, part);
        }
        template
    }

    /// Names of templates physically equivalent to `name` but differently
    /// branded. Empty when `name` is unknown.
    pub fn similar_templates(&self, name: &str) -> Vec<String> {
        let Some(template) = self.lookup_template_from_name(name) else {
            return Vec::new();
        };
        self.templates
            .iter()
            .filter(|t| t.name() != template.name() && t.is_similar_to(template))
            .map(|t| t.name())
            .collect()
    }
}
