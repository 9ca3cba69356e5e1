//! Output formatters for ranked results

use crate::config::OutputFormat;
use crate::error::{RankerError, Result};
use crate::output::report::{RankedTable, TableRow};
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

pub trait OutputFormatter {
    fn format_table(&self, table: &RankedTable) -> Result<String>;
}

pub struct ConsoleFormatter {
    use_colors: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Table body shared by the HTML page and the email
#[derive(Template)]
#[template(source = r#"{% if rows.is_empty() %}
<p>No resumes could be ranked.</p>
{% else %}
<table class="results">
  <thead>
    <tr><th>#</th><th>Name</th><th>Score</th><th>Link</th></tr>
  </thead>
  <tbody>
  {% for row in rows %}
    <tr><td>{{ row.rank }}</td><td>{{ row.name }}</td><td>{{ row.score }}</td><td><a href="{{ row.share_link }}">Open</a></td></tr>
  {% endfor %}
  </tbody>
</table>
{% endif %}
{% if !skipped.is_empty() %}
<p>Skipped files:</p>
<ul>
  {% for (name, reason) in skipped %}
  <li>{{ name }}: {{ reason }}</li>
  {% endfor %}
</ul>
{% endif %}"#, ext = "html")]
struct HtmlFragment<'a> {
    rows: &'a [TableRow],
    skipped: Vec<(String, String)>,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Match Results</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            color: #333;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
        }
        h1 { border-bottom: 3px solid #007acc; padding-bottom: 10px; }
        table.results { border-collapse: collapse; width: 100%; }
        table.results th, table.results td { border: 1px solid #dee2e6; padding: 8px; text-align: left; }
        table.results th { background: #f1f3f5; }
        .metadata { margin-top: 30px; font-size: 0.9em; color: #6c757d; }
    </style>
    {% endif %}
</head>
<body>
    <h1>Match Results</h1>
    {{ table_html | safe }}
    <div class="metadata">
        <p>Generated {{ generated_at }} by resume-ranker v{{ version }}</p>
        <p>Folder: {{ folder_id }} | Files listed: {{ files_listed }} | Model: {{ model_name }}</p>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlPage {
    include_styles: bool,
    table_html: String,
    generated_at: String,
    version: String,
    folder_id: String,
    files_listed: usize,
    model_name: String,
}

/// HTML table of the results, used as the email body
pub fn render_html_fragment(table: &RankedTable) -> Result<String> {
    HtmlFragment {
        rows: &table.rows,
        skipped: table
            .skipped
            .iter()
            .map(|s| (s.name.clone(), s.reason.to_string()))
            .collect(),
    }
    .render()
    .map_err(|e| RankerError::OutputFormatting(e.to_string()))
}

fn truncate_graphemes(text: &str, max: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max {
        text.to_string()
    } else {
        format!("{}…", graphemes[..max.saturating_sub(1)].concat())
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn score_color(score: &str) -> Color {
        match score.parse::<f32>().unwrap_or(0.0) {
            s if s >= 0.6 => Color::Green,
            s if s >= 0.3 => Color::Yellow,
            _ => Color::Red,
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_table(&self, table: &RankedTable) -> Result<String> {
        let mut output = String::new();

        let header = "Match Results";
        if self.use_colors {
            output.push_str(&format!("\n{}\n", header.blue().bold()));
        } else {
            output.push_str(&format!("\n{}\n", header));
        }

        if table.metadata.files_listed == 0 {
            output.push_str(&self.colorize("No resume files found in the folder\n", Color::Yellow));
            return Ok(output);
        }

        let name_width = table
            .rows
            .iter()
            .map(|r| r.name.graphemes(true).count().min(40))
            .max()
            .unwrap_or(4)
            .max(4);

        output.push_str(&format!(
            "{:>3}  {:<width$}  {:>7}  {}\n",
            "#",
            "Name",
            "Score",
            "Link",
            width = name_width
        ));
        for row in &table.rows {
            let name = truncate_graphemes(&row.name, 40);
            let padding = name_width.saturating_sub(name.graphemes(true).count());
            output.push_str(&format!(
                "{:>3}  {}{}  {:>7}  {}\n",
                row.rank,
                name,
                " ".repeat(padding),
                self.colorize(&row.score, Self::score_color(&row.score)),
                row.share_link
            ));
        }

        if !table.skipped.is_empty() {
            output.push_str(&self.colorize("\nSkipped files:\n", Color::Yellow));
            for skip in &table.skipped {
                output.push_str(&format!("  - {}: {}\n", skip.name, skip.reason));
            }
        }

        output.push_str(&format!(
            "\n{} ranked of {} listed | model: {} | {}ms\n",
            table.rows.len(),
            table.metadata.files_listed,
            table.metadata.model_name,
            table.metadata.processing_time_ms
        ));
        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_table(&self, table: &RankedTable) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(table)?)
        } else {
            Ok(serde_json::to_string(table)?)
        }
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_table(&self, table: &RankedTable) -> Result<String> {
        let mut output = String::from("# Match Results\n\n");

        if table.is_empty() {
            output.push_str("_No resumes could be ranked._\n");
        } else {
            output.push_str("| # | Name | Score | Link |\n|---|------|------:|------|\n");
            for row in &table.rows {
                output.push_str(&format!(
                    "| {} | {} | `{}` | [Open]({}) |\n",
                    row.rank,
                    Self::escape_cell(&row.name),
                    row.score,
                    row.share_link
                ));
            }
        }

        if !table.skipped.is_empty() {
            output.push_str("\n## Skipped\n\n");
            for skip in &table.skipped {
                output.push_str(&format!("- **{}**: {}\n", skip.name, skip.reason));
            }
        }

        if self.include_metadata {
            output.push_str(&format!(
                "\n---\n_Generated {} by resume-ranker v{} using {}_\n",
                table.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                table.metadata.ranker_version,
                table.metadata.model_name
            ));
        }
        Ok(output)
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_table(&self, table: &RankedTable) -> Result<String> {
        HtmlPage {
            include_styles: self.include_styles,
            table_html: render_html_fragment(table)?,
            generated_at: table
                .metadata
                .generated_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            version: table.metadata.ranker_version.clone(),
            folder_id: table.metadata.folder_id.clone(),
            files_listed: table.metadata.files_listed,
            model_name: table.metadata.model_name.clone(),
        }
        .render()
        .map_err(|e| RankerError::OutputFormatting(e.to_string()))
    }
}

/// Picks the formatter for the requested output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

impl ReportGenerator {
    pub fn new(use_colors: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter::new(true),
        }
    }

    pub fn generate(&self, table: &RankedTable, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_table(table),
            OutputFormat::Json => self.json_formatter.format_table(table),
            OutputFormat::Markdown => self.markdown_formatter.format_table(table),
            OutputFormat::Html => self.html_formatter.format_table(table),
        }
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, timestamp: bool) -> String {
    let suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let ext = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };
    format!("match_results{}.{}", suffix, ext)
}
