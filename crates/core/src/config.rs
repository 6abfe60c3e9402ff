//! Report configuration.
//!
//! Everything editorial about a deck lives in one value that is built
//! at startup and passed down explicitly, so differently configured
//! reports can coexist in one process.

use serde::{Deserialize, Serialize};

/// Configuration for one report style.
///
/// `Default` reproduces the weekly news report: eight fixed sections
/// ending with the two opinion sections, the sports category excluded,
/// six table rows per slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Section display order. Categories not listed never get a
    /// section of their own (their rows still count toward totals).
    pub category_order: Vec<String>,

    /// Primary-topic values renamed before grouping; maps the singular
    /// opinion labels to their plural section labels.
    pub topic_renames: Vec<(String, String)>,

    /// Categories dropped from the report entirely.
    pub excluded_categories: Vec<String>,

    /// Categories whose tables carry author and institution columns.
    pub byline_categories: Vec<String>,

    /// Maximum data rows per table slide.
    pub rows_per_page: usize,

    /// Target character width of an index leader line.
    pub index_line_width: usize,

    /// Fill dots never drop below this, however long the title.
    pub index_min_fill: usize,

    /// Printed when a section is missing from the page-number lookup.
    pub index_placeholder: char,

    pub cover_title: String,
    pub index_title: String,
    pub overview_title: String,
    pub closing_title: String,

    /// Download filename for the rendered deck.
    pub output_filename: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            category_order: vec![
                "Eventos".into(),
                "Academia".into(),
                "Mérito".into(),
                "Sustentabilidade".into(),
                "Candidaturas".into(),
                "Outros Temas".into(),
                "Artigos de opinião".into(),
                "Comentários".into(),
            ],
            topic_renames: vec![
                ("Artigo de Opinião".into(), "Artigos de opinião".into()),
                ("Comentário".into(), "Comentários".into()),
            ],
            excluded_categories: vec!["Desporto".into()],
            byline_categories: vec!["Artigos de opinião".into(), "Comentários".into()],
            rows_per_page: 6,
            index_line_width: 60,
            index_min_fill: 2,
            index_placeholder: '?',
            cover_title: "Relatório de notícias semanal".into(),
            index_title: "Índice".into(),
            overview_title: "Overview".into(),
            closing_title: "Fim do Relatório".into(),
            output_filename: "relatorio.pptx".into(),
        }
    }
}

impl ReportConfig {
    /// Section label a renamed topic maps to, if the topic is renamed.
    pub fn renamed_topic(&self, topic: &str) -> Option<&str> {
        self.topic_renames
            .iter()
            .find(|(from, _)| from == topic)
            .map(|(_, to)| to.as_str())
    }

    /// Whether a category is excluded from the report.
    pub fn is_excluded(&self, category: &str) -> bool {
        self.excluded_categories.iter().any(|c| c == category)
    }

    /// Whether a category's tables carry the byline columns.
    pub fn has_byline(&self, category: &str) -> bool {
        self.byline_categories.iter().any(|c| c == category)
    }
}
