//! Report Exporter
//!
//! Handlebars-based rendering of a stored analysis into a standalone HTML report.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use serde_json::json;

use insight_models::{AnalysisKind, AnalysisRecord};

const REPORT_TEMPLATE: &str = "report";

const REPORT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Analysis Report - {{file_name}}</title>
<style>
body{font-family:Arial,sans-serif;color:#333;line-height:1.6;margin:0;}
.header{background:linear-gradient(135deg,#667eea 0%,#764ba2 100%);color:white;padding:30px;text-align:center;}
.header h1{font-size:28px;margin:0 0 10px 0;}
.header p{font-size:14px;opacity:0.9;margin:2px 0;}
.container{padding:0 30px;}
.section{margin:30px 0;page-break-inside:avoid;}
.section h2{color:#667eea;font-size:20px;padding-bottom:10px;border-bottom:2px solid #667eea;}
.section p{white-space:pre-wrap;text-align:justify;}
.chart{margin:20px 0;text-align:center;page-break-inside:avoid;}
.chart img{max-width:100%;border:1px solid #e0e0e0;}
.chart .caption{font-size:13px;color:#666;}
.footer{text-align:center;font-size:12px;color:#999;padding:20px;border-top:1px solid #e0e0e0;}
</style>
</head>
<body>
<div class="header">
<h1>Analysis Report</h1>
<p>File: {{file_name}}</p>
<p>Size: {{file_size}} bytes</p>
<p>Generated: {{generated_at}}</p>
</div>
<div class="container">
{{#each sections}}
<div class="section">
<h2>{{title}}</h2>
{{#if items}}<ul>{{#each items}}<li>{{this}}</li>{{/each}}</ul>{{else}}<p>{{body}}</p>{{/if}}
</div>
{{/each}}
{{#if charts}}
<div class="section">
<h2>Charts</h2>
{{#each charts}}
<div class="chart">
<h3>{{title}}</h3>
{{#if image}}<img src="{{image}}" alt="{{title}}">{{/if}}
<p class="caption">{{description}}</p>
</div>
{{/each}}
</div>
{{/if}}
</div>
<div class="footer">Analysis #{{id}} uploaded {{upload_date}}</div>
</body>
</html>
"#;

pub struct ReportExporter {
    handlebars: Handlebars<'static>,
}

impl ReportExporter {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars
            .register_template_string(REPORT_TEMPLATE, REPORT_HTML)
            .context("Failed to register report template")?;
        Ok(Self { handlebars })
    }

    pub fn file_name(id: i64) -> String {
        format!("report-{}.html", id)
    }

    pub fn render(&self, record: &AnalysisRecord, generated_at: DateTime<Utc>) -> Result<String> {
        let charts: Vec<serde_json::Value> = record
            .charts
            .iter()
            .map(|chart| {
                json!({
                    "title": chart.chart_title.clone().unwrap_or_else(|| chart.chart_type.clone()),
                    "description": chart.chart_description.clone().unwrap_or_default(),
                    "image": chart.chart_image.clone().unwrap_or_default(),
                })
            })
            .collect();

        let context = json!({
            "id": record.id,
            "file_name": record.file_name,
            "file_size": thousands(record.file_size),
            "generated_at": generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            "upload_date": record.upload_date.format("%Y-%m-%d %H:%M UTC").to_string(),
            "sections": sections(record),
            "charts": charts,
        });

        self.handlebars
            .render(REPORT_TEMPLATE, &context)
            .context("Failed to render report")
    }
}

fn text_section(title: &str, body: &str) -> Option<serde_json::Value> {
    (!body.trim().is_empty()).then(|| json!({ "title": title, "body": body }))
}

fn list_section(title: &str, items: &[String]) -> Option<serde_json::Value> {
    (!items.is_empty()).then(|| json!({ "title": title, "items": items }))
}

fn sections(record: &AnalysisRecord) -> Vec<serde_json::Value> {
    match (&record.kind, &record.text_analysis) {
        (AnalysisKind::Text, Some(text)) => {
            let themes: Vec<String> = text
                .themes
                .iter()
                .map(|t| format!("{}: {}", t.theme, t.description))
                .collect();
            [
                text_section("Main Topic", &text.main_topic),
                text_section("Summary", &text.summary),
                list_section("Key Points", &text.key_points),
                list_section("Themes", &themes),
                text_section("Structure", &text.structure),
                text_section("Language", &text.language),
                text_section("Audience", &text.audience),
                text_section("Purpose", &text.purpose),
                list_section("Strengths", &text.strengths),
                list_section("Improvements", &text.improvements),
                text_section("Conclusions", &text.conclusions),
            ]
            .into_iter()
            .flatten()
            .collect()
        }
        _ => {
            let analysis = &record.analysis;
            [
                text_section("Overview", &analysis.summary),
                text_section("Trends", &analysis.trends),
                text_section("Insights", &analysis.insights),
                text_section("Recommendations", &analysis.recommendations),
                text_section("Full Analysis", &analysis.full_analysis),
            ]
            .into_iter()
            .flatten()
            .collect()
        }
    }
}

/// `1234567` -> `1,234,567`.
pub fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
