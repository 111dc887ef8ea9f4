//! Template catalog and the per-template style table used by the exporter.

pub const DEFAULT_TEMPLATE: &str = "modern";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
}

/// Visual attributes applied uniformly to every slide exported under a
/// template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateStyle {
    /// Body text size in points.
    pub font_size: u32,
    pub color: &'static str,
    pub heading_color: &'static str,
    pub title_color: &'static str,
    pub background: &'static str,
    pub alignment: Alignment,
    pub line_spacing: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    /// Backend-side template file reference, sent verbatim with every
    /// submission.
    pub file: &'static str,
    pub style: TemplateStyle,
}

const BASE_STYLE: TemplateStyle = TemplateStyle {
    font_size: 18,
    color: "666666",
    heading_color: "333333",
    title_color: "1A73E8",
    background: "FFFFFF",
    alignment: Alignment::Left,
    line_spacing: 1.2,
};

const CATALOG: &[Template] = &[
    Template {
        id: "modern",
        name: "Modern",
        description: "Clean default look for any topic",
        category: "General",
        file: "/templates/modern/template.pptx",
        style: BASE_STYLE,
    },
    Template {
        id: "think-outside",
        name: "Think Outside the Box",
        description: "Creative Problem-Solving for Innovators",
        category: "Business",
        file: "/templates/minimal/template.pptx",
        style: TemplateStyle {
            color: "444444",
            heading_color: "222222",
            title_color: "222222",
            ..BASE_STYLE
        },
    },
    Template {
        id: "mirror-gram",
        name: "Mirror, Mirror on the Gram",
        description: "The Psychological Impact of Filters",
        category: "Business",
        file: "/templates/modern/template.pptx",
        style: TemplateStyle {
            title_color: "8E44AD",
            heading_color: "5B2C6F",
            background: "F5EEF8",
            ..BASE_STYLE
        },
    },
    Template {
        id: "digital-domination",
        name: "Digital Domination",
        description: "Rise of Social Media",
        category: "Social Media",
        file: "/templates/creative/template.pptx",
        style: TemplateStyle {
            color: "EAEAEA",
            heading_color: "FFFFFF",
            title_color: "E94560",
            background: "1A1A2E",
            alignment: Alignment::Center,
            ..BASE_STYLE
        },
    },
    Template {
        id: "corporate-modern",
        name: "Introduction To Thermodynamics",
        description: "Unveiling the Mysteries of Thermodynamics",
        category: "Education",
        file: "/templates/education/template.pptx",
        style: TemplateStyle {
            title_color: "1F618D",
            heading_color: "21618C",
            background: "FBFCFC",
            ..BASE_STYLE
        },
    },
    Template {
        id: "startup-pitch",
        name: "Intoduction to Thermodynamics",
        description: "Unveiling the Secrets of Thermodynamics",
        category: "Social Media",
        file: "/templates/education/template2.pptx",
        style: TemplateStyle {
            title_color: "117864",
            heading_color: "0E6251",
            ..BASE_STYLE
        },
    },
    Template {
        id: "marketing-pitch",
        name: "Presentation-Ai",
        description: "Creating Presentations with AI",
        category: "Marketing",
        file: "/templates/marketing/template.pptx",
        style: TemplateStyle {
            font_size: 20,
            title_color: "B03A2E",
            heading_color: "922B21",
            ..BASE_STYLE
        },
    },
    Template {
        id: "education-pitch",
        name: "Presnation made easy",
        description: "The Enigmatic Atlantic Ocean",
        category: "Marketing",
        file: "/templates/marketing/template2.pptx",
        style: TemplateStyle {
            title_color: "1A5276",
            heading_color: "154360",
            ..BASE_STYLE
        },
    },
];

pub fn catalog() -> &'static [Template] {
    CATALOG
}

pub fn find(id: &str) -> Option<&'static Template> {
    CATALOG.iter().find(|template| template.id == id)
}

/// Look up a template, falling back to the default for unknown ids.
pub fn resolve(id: &str) -> &'static Template {
    find(id).unwrap_or(&CATALOG[0])
}

pub fn style_for(id: &str) -> TemplateStyle {
    resolve(id).style
}

pub fn template_file(id: &str) -> &'static str {
    resolve(id).file
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let mut ids: Vec<_> = catalog().iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog().len());
    }

    #[test]
    fn default_template_exists() {
        assert!(find(DEFAULT_TEMPLATE).is_some());
    }

    #[test]
    fn unknown_id_falls_back_to_default() {
        assert_eq!(resolve("no-such-template").id, DEFAULT_TEMPLATE);
        assert_eq!(style_for("no-such-template").color, BASE_STYLE.color);
    }

    #[test]
    fn known_id_resolves_to_its_entry() {
        let template = resolve("digital-domination");
        assert_eq!(template.name, "Digital Domination");
        assert_eq!(template.style.background, "1A1A2E");
    }
}
