//! Paginated, print-oriented PDF export.
//!
//! Export happens in two steps. [`layout_document`] turns the plan into
//! positioned lines split across pages; this is pure and holds every
//! formatting rule. The `pdf` feature then paints those lines with the
//! built-in Helvetica faces of `printpdf`.
//!
//! Built-in PDF fonts only cover 7-bit text, so every string is reduced to
//! ASCII before layout. Characters outside that range are dropped,
//! not replaced.

use super::{ExportArtifact, ExportFormat, Exporter};
use crate::error::Result;
use crate::metadata::{MetadataField, ProjectMetadata};
use crate::phase::Phase;
use crate::plan::PlanTask;
use serde::{Deserialize, Serialize};

/// Line printed under every task for hand-written scheduling.
pub const SCHEDULE_PLACEHOLDER: &str = "Start Date: ______   Completion Date: ______";

/// Line printed instead of the task list when nothing is selected.
pub const NO_TASKS_TEXT: &str = "No tasks selected.";

/// Page geometry and typography of the PDF document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub title_size_pt: f32,
    pub heading_size_pt: f32,
    pub body_size_pt: f32,
    /// Vertical advance of a body line.
    pub line_height_mm: f32,
    /// Maximum characters per wrapped body line.
    pub wrap_width: usize,
    /// Add dates, objective, milestones, cost/savings and next steps after
    /// the title block.
    pub include_details: bool,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 15.0,
            title_size_pt: 16.0,
            heading_size_pt: 12.0,
            body_size_pt: 11.0,
            line_height_mm: 7.0,
            wrap_width: 90,
            include_details: false,
        }
    }
}

/// Typeface role of a laid-out line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Subtitle,
    /// Phase heading, painted in the phase color.
    Heading(Phase),
    /// Bold label of a project detail.
    Label,
    Body,
    Placeholder,
    Italic,
}

/// A line of text at a fixed position on its page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub style: LineStyle,
    /// Baseline height from the bottom edge, in millimetres.
    pub y_mm: f32,
}

/// The document split into pages of positioned lines.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub title: String,
    pub pages: Vec<Vec<PlacedLine>>,
}

impl DocumentLayout {
    /// All lines in reading order.
    pub fn lines(&self) -> impl Iterator<Item = &PlacedLine> {
        self.pages.iter().flatten()
    }

    /// The text of all lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Removes every character outside code points 0-127.
pub fn strip_to_ascii(text: &str) -> String {
    text.chars().filter(char::is_ascii).collect()
}

/// Greedy word wrap to `width` characters; over-long words are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let (head, tail) = word.split_at(width);
            lines.push(head.to_string());
            word = tail;
        }
        if word.is_empty() {
            continue;
        }
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

struct PageCursor<'a> {
    settings: &'a DocumentSettings,
    pages: Vec<Vec<PlacedLine>>,
    y: f32,
}

impl<'a> PageCursor<'a> {
    fn new(settings: &'a DocumentSettings) -> Self {
        Self {
            settings,
            pages: vec![Vec::new()],
            y: settings.page_height_mm - settings.margin_mm,
        }
    }

    fn advance_for(&self, style: LineStyle) -> f32 {
        match style {
            LineStyle::Title => self.settings.line_height_mm * 1.6,
            LineStyle::Heading(_) => self.settings.line_height_mm * 1.3,
            _ => self.settings.line_height_mm,
        }
    }

    fn push(&mut self, text: impl Into<String>, style: LineStyle) {
        let advance = self.advance_for(style);
        if self.y - advance < self.settings.margin_mm && !self.current_page_is_empty() {
            self.pages.push(Vec::new());
            self.y = self.settings.page_height_mm - self.settings.margin_mm;
        }
        self.y -= advance;
        let line = PlacedLine {
            text: text.into(),
            style,
            y_mm: self.y,
        };
        if let Some(page) = self.pages.last_mut() {
            page.push(line);
        }
    }

    fn push_wrapped(&mut self, text: &str, style: LineStyle) {
        for line in wrap(text, self.settings.wrap_width) {
            self.push(line, style);
        }
    }

    fn gap(&mut self) {
        self.y -= self.settings.line_height_mm / 2.0;
    }

    fn current_page_is_empty(&self) -> bool {
        self.pages.last().is_none_or(Vec::is_empty)
    }

    fn finish(self) -> Vec<Vec<PlacedLine>> {
        self.pages
    }
}

/// Lays the plan out into pages.
///
/// Title block first, then per task a phase heading, the
/// `task - description` line and the schedule placeholder. With no tasks a
/// single italic notice replaces the list. A page break is inserted whenever
/// the next line would cross the bottom margin.
pub fn layout_document(
    tasks: &[PlanTask],
    metadata: &ProjectMetadata,
    settings: &DocumentSettings,
) -> DocumentLayout {
    let field = |f: MetadataField| strip_to_ascii(metadata.get(f));
    let mut cursor = PageCursor::new(settings);

    let project_name = field(MetadataField::ProjectName);
    let title = if project_name.trim().is_empty() {
        "Project Plan".to_string()
    } else {
        format!("Project Plan: {}", project_name.trim())
    };
    cursor.push_wrapped(&title, LineStyle::Title);
    let subtitle = format!(
        "Owner: {} | Created: {}",
        field(MetadataField::ProjectOwner).trim(),
        field(MetadataField::CreatedDate).trim()
    );
    cursor.push_wrapped(&subtitle, LineStyle::Subtitle);
    cursor.gap();

    if settings.include_details {
        cursor.push(
            format!(
                "Start Date: {}   End Date: {}",
                field(MetadataField::StartDate).trim(),
                field(MetadataField::EndDate).trim()
            ),
            LineStyle::Body,
        );
        for detail in [
            MetadataField::ProjectObjective,
            MetadataField::ProjectMilestones,
            MetadataField::ProjectCostSavings,
            MetadataField::NextSteps,
        ] {
            let value = field(detail);
            if value.trim().is_empty() {
                continue;
            }
            cursor.push(format!("{}:", detail.label()), LineStyle::Label);
            cursor.push_wrapped(&value, LineStyle::Body);
        }
        cursor.gap();
    }

    if tasks.is_empty() {
        cursor.push(NO_TASKS_TEXT, LineStyle::Italic);
    }

    for task in tasks {
        cursor.push(format!("{} Phase", task.phase), LineStyle::Heading(task.phase));
        let line = format!(
            "{} - {}",
            strip_to_ascii(&task.task_name),
            strip_to_ascii(&task.description)
        );
        cursor.push_wrapped(&line, LineStyle::Body);
        cursor.push(SCHEDULE_PLACEHOLDER, LineStyle::Placeholder);
        cursor.gap();
    }

    DocumentLayout {
        title,
        pages: cursor.finish(),
    }
}

/// PDF export of the plan.
#[derive(Debug, Clone, Default)]
pub struct DocumentExporter {
    settings: DocumentSettings,
}

impl DocumentExporter {
    pub fn new(settings: DocumentSettings) -> Self {
        Self { settings }
    }
}

impl Exporter for DocumentExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "pdf")
    }

    fn export(&self, tasks: &[PlanTask], metadata: &ProjectMetadata) -> Result<ExportArtifact> {
        let layout = layout_document(tasks, metadata, &self.settings);
        tracing::debug!(pages = layout.pages.len(), "laid out plan document");
        let bytes = render_pdf(&layout, &self.settings)?;
        Ok(ExportArtifact::new(ExportFormat::Pdf, bytes))
    }
}

#[cfg(feature = "pdf")]
fn render_pdf(layout: &DocumentLayout, settings: &DocumentSettings) -> Result<Vec<u8>> {
    paint(layout, settings).map_err(|e| crate::error::ToolboxError::ExportFailed {
        format: ExportFormat::Pdf,
        reason: e.to_string(),
    })
}

#[cfg(not(feature = "pdf"))]
fn render_pdf(_layout: &DocumentLayout, _settings: &DocumentSettings) -> Result<Vec<u8>> {
    Err(crate::error::ToolboxError::ExporterUnavailable(
        ExportFormat::Pdf,
    ))
}

#[cfg(feature = "pdf")]
fn paint(
    layout: &DocumentLayout,
    settings: &DocumentSettings,
) -> std::result::Result<Vec<u8>, printpdf::Error> {
    use printpdf::{BuiltinFont, Color, Mm, PdfDocument, Rgb};

    let width = Mm(settings.page_width_mm);
    let height = Mm(settings.page_height_mm);
    let (doc, first_page, first_layer) = PdfDocument::new(&layout.title, width, height, "Layer 1");

    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let italic = doc.add_builtin_font(BuiltinFont::HelveticaOblique)?;

    let rgb = |(r, g, b): (u8, u8, u8)| {
        Color::Rgb(Rgb::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            None,
        ))
    };

    for (index, lines) in layout.pages.iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, "Layer 1")
        };
        let canvas = doc.get_page(page).get_layer(layer);

        for line in lines {
            let (font, size, color) = match line.style {
                LineStyle::Title => (&bold, settings.title_size_pt, (30, 76, 72)),
                LineStyle::Subtitle => (&regular, settings.body_size_pt, (80, 80, 80)),
                LineStyle::Heading(phase) => (&bold, settings.heading_size_pt, phase.color()),
                LineStyle::Label => (&bold, settings.body_size_pt, (0, 0, 0)),
                LineStyle::Body => (&regular, settings.body_size_pt, (0, 0, 0)),
                LineStyle::Placeholder => (&regular, settings.body_size_pt, (90, 90, 90)),
                LineStyle::Italic => (&italic, settings.body_size_pt, (0, 0, 0)),
            };
            canvas.set_fill_color(rgb(color));
            canvas.use_text(
                line.text.as_str(),
                size,
                Mm(settings.margin_mm),
                Mm(line.y_mm),
                font,
            );
        }
    }

    doc.save_to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> ProjectMetadata {
        let mut metadata = ProjectMetadata::new();
        metadata.set(MetadataField::ProjectName, "Line 4 scrap");
        metadata.set(MetadataField::ProjectOwner, "A. Rivera");
        metadata.set(MetadataField::CreatedDate, "17-10-2026");
        metadata
    }

    #[test]
    fn test_should_strip_non_ascii() {
        assert_eq!(strip_to_ascii("café"), "caf");
        assert_eq!(strip_to_ascii("naïve – test ✓"), "nave  test ");
        assert_eq!(strip_to_ascii("tab\tkept"), "tab\tkept");
    }

    #[test]
    fn test_should_render_title_block() {
        let layout = layout_document(&[], &metadata(), &DocumentSettings::default());
        let lines: Vec<_> = layout.lines().collect();
        assert_eq!(lines[0].text, "Project Plan: Line 4 scrap");
        assert_eq!(lines[0].style, LineStyle::Title);
        assert_eq!(lines[1].text, "Owner: A. Rivera | Created: 17-10-2026");
    }

    #[test]
    fn test_should_render_placeholder_for_empty_plan() {
        let layout = layout_document(&[], &metadata(), &DocumentSettings::default());
        assert_eq!(layout.pages.len(), 1);

        let italic: Vec<_> = layout
            .lines()
            .filter(|l| l.style == LineStyle::Italic)
            .collect();
        assert_eq!(italic.len(), 1);
        assert_eq!(italic[0].text, NO_TASKS_TEXT);
        assert!(!layout.text().contains(SCHEDULE_PLACEHOLDER));
    }

    #[test]
    fn test_should_render_task_block() {
        let tasks = vec![
            PlanTask::new(Phase::Plan, "5 Whys", "Root cause analysis"),
            PlanTask::new(Phase::Do, "Kaizen", "Continuous small changes"),
        ];
        let layout = layout_document(&tasks, &metadata(), &DocumentSettings::default());
        let body: Vec<_> = layout.lines().skip(2).map(|l| l.text.as_str()).collect();
        assert_eq!(
            body,
            [
                "Plan Phase",
                "5 Whys - Root cause analysis",
                SCHEDULE_PLACEHOLDER,
                "Do Phase",
                "Kaizen - Continuous small changes",
                SCHEDULE_PLACEHOLDER,
            ]
        );
        assert!(!layout.text().contains(NO_TASKS_TEXT));
    }

    #[test]
    fn test_should_drop_non_ascii_from_rendered_text() {
        let tasks = vec![PlanTask::new(Phase::Check, "Gemba", "café visit → notes")];
        let mut metadata = metadata();
        metadata.set(MetadataField::ProjectName, "Ligne 4 – rebut");

        let layout = layout_document(&tasks, &metadata, &DocumentSettings::default());
        let text = layout.text();
        assert!(text.is_ascii());
        assert!(text.contains("Gemba - caf visit notes"));
        assert!(text.contains("Project Plan: Ligne 4 rebut"));
        assert!(!text.contains('?'));
    }

    #[test]
    fn test_should_break_pages_within_margins() {
        let settings = DocumentSettings::default();
        let tasks: Vec<_> = (0..60)
            .map(|i| PlanTask::new(Phase::Do, format!("Tool {i}"), "Description"))
            .collect();
        let layout = layout_document(&tasks, &metadata(), &settings);

        assert!(layout.pages.len() > 1);
        for page in &layout.pages {
            assert!(!page.is_empty());
            for line in page {
                assert!(line.y_mm >= settings.margin_mm);
                assert!(line.y_mm <= settings.page_height_mm - settings.margin_mm);
            }
        }
        let headings = layout
            .lines()
            .filter(|l| matches!(l.style, LineStyle::Heading(_)))
            .count();
        assert_eq!(headings, 60);
    }

    #[test]
    fn test_should_wrap_long_descriptions() {
        let settings = DocumentSettings {
            wrap_width: 20,
            ..DocumentSettings::default()
        };
        let tasks = vec![PlanTask::new(
            Phase::Act,
            "Standard Work",
            "Document the improved method and train every shift",
        )];
        let layout = layout_document(&tasks, &metadata(), &settings);
        let body: Vec<_> = layout
            .lines()
            .filter(|l| l.style == LineStyle::Body)
            .map(|l| l.text.clone())
            .collect();
        assert!(body.len() > 1);
        assert!(body.iter().all(|l| l.len() <= 20));
        assert_eq!(
            body.join(" "),
            "Standard Work - Document the improved method and train every shift"
        );
    }

    #[test]
    fn test_should_add_details_when_enabled() {
        let settings = DocumentSettings {
            include_details: true,
            ..DocumentSettings::default()
        };
        let mut metadata = metadata();
        metadata.set(MetadataField::StartDate, "01-11-2026");
        metadata.set(MetadataField::ProjectObjective, "Cut scrap by 20%");

        let text = layout_document(&[], &metadata, &settings).text();
        assert!(text.contains("Start Date: 01-11-2026   End Date: "));
        assert!(text.contains("Project Objective:\nCut scrap by 20%"));
        assert!(!text.contains("Milestones:"));
    }

    #[test]
    fn test_should_wrap_long_subtitle() {
        let settings = DocumentSettings {
            wrap_width: 30,
            ..DocumentSettings::default()
        };
        let mut metadata = metadata();
        metadata.set(
            MetadataField::ProjectOwner,
            "Continuous Improvement Steering Committee, Plant 4",
        );

        let layout = layout_document(&[], &metadata, &settings);
        let subtitle: Vec<_> = layout
            .lines()
            .filter(|l| l.style == LineStyle::Subtitle)
            .map(|l| l.text.clone())
            .collect();
        assert!(subtitle.len() > 1);
        assert!(subtitle.iter().all(|l| l.len() <= 30));
        assert_eq!(
            subtitle.join(" "),
            "Owner: Continuous Improvement Steering Committee, Plant 4 | Created: 17-10-2026"
        );
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap("abcdefgh", 3), ["abc", "def", "gh"]);
        assert_eq!(wrap("", 10), [""]);
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_should_produce_pdf_bytes() {
        let artifact = DocumentExporter::default()
            .export(&[], &metadata())
            .unwrap();
        assert_eq!(artifact.filename, "Project_Plan.pdf");
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }

    #[cfg(not(feature = "pdf"))]
    #[test]
    fn test_should_report_unavailable() {
        let result = DocumentExporter::default().export(&[], &metadata());
        assert!(matches!(
            result,
            Err(crate::error::ToolboxError::ExporterUnavailable(
                ExportFormat::Pdf
            ))
        ));
    }
}
