// Page rendering in the supported output formats

use crate::error::Result;
use crate::page::{self, LABELS, PageView};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tera::{Context, Tera};

const PAGE_TEMPLATE_NAME: &str = "page.html";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="de">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{ labels.title }}</title>
<style>
body { font-family: system-ui, sans-serif; margin: 0 auto; max-width: 1200px; padding: 1rem; }
.header-section { text-align: center; }
.disclaimer { color: #b45309; }
.offers-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 1rem; }
.offer-card { border: 1px solid #e5e7eb; border-radius: 8px; overflow: hidden; display: flex; flex-direction: column; }
.offer-card img { width: 100%; height: 200px; object-fit: contain; background: #fff; }
.offer-content { padding: 0.75rem; display: flex; flex-direction: column; gap: 0.5rem; flex: 1; }
.offer-content h3 { font-size: 1rem; margin: 0; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.price { font-weight: bold; font-size: 1.2rem; }
.original-price { text-decoration: line-through; color: #6b7280; margin-left: 0.5rem; }
.discount { color: #dc2626; font-weight: bold; margin-left: 0.5rem; }
.star { color: #fbbf24; }
.count { color: #6b7280; margin-left: 0.25rem; }
.offer-button { margin-top: auto; text-align: center; padding: 0.5rem; background: #2563eb; color: #fff; border-radius: 6px; text-decoration: none; }
</style>
</head>
<body>
<div class="header-section">
  <h1><a href="{{ site_url }}" target="_blank">{{ labels.title }}</a></h1>
  <div class="disclaimer"><p>{{ labels.under_construction }}</p></div>
</div>
<div class="description-section">
  <p>{{ labels.description }}</p>
  <p class="last-updated">{{ labels.last_updated }} {{ last_updated }}</p>
</div>
<div class="filter-section">
  <label for="category">{{ labels.category }} </label>
  <select id="category">
{%- for category in categories %}
    <option value="{{ category.value }}"{% if category.selected %} selected{% endif %}>{{ category.label }}</option>
{%- endfor %}
  </select>
</div>
{% if loading -%}
<p class="loading">{{ labels.loading }}</p>
{%- else -%}
<div class="offers-grid">
{%- for offer in offers %}
  <div class="offer-card" data-asin="{{ offer.asin }}">
    <img src="{{ offer.image }}" alt="{{ offer.title }}">
    <div class="offer-content">
      <h3 title="{{ offer.title }}">{{ offer.title }}</h3>
      <div class="price-section">
        <span class="price">{{ offer.price }}</span>
        <span class="original-price">{{ offer.original_price }}</span>
        <span class="discount">{{ offer.discount }}</span>
      </div>
      <div class="reviews">
        <span class="rating">{{ offer.rating }}</span>
        <span class="stars">{% for i in range(end=offer.stars_filled) %}<span class="star filled">★</span>{% endfor %}{% for i in range(end=offer.stars_empty) %}<span class="star">☆</span>{% endfor %}</span>
        <span class="count">{{ offer.review_count }}</span>
      </div>
      <a href="{{ offer.link }}" target="_blank" rel="noopener noreferrer" class="offer-button">{{ offer.link_label }}</a>
    </div>
  </div>
{%- endfor %}
</div>
{%- endif %}
</body>
</html>
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Html,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "html" => Some(ReportFormat::Html),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

pub fn generate_report(view: &PageView, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(view)),
        ReportFormat::Html => generate_html_report(view),
        ReportFormat::Json => generate_json_report(view),
        ReportFormat::Markdown => Ok(generate_markdown_report(view)),
    }
}

pub fn generate_text_report(view: &PageView) -> String {
    let rule = "━".repeat(72);
    let mut report = String::new();

    report.push_str(&rule);
    report.push('\n');
    report.push_str(&format!("{:^72}\n", page::TITLE));
    report.push_str(&format!("{:^72}\n", page::UNDER_CONSTRUCTION));
    report.push_str(&rule);
    report.push_str("\n\n");

    report.push_str(page::DESCRIPTION);
    report.push('\n');
    report.push_str(&format!("{} {}\n\n", page::LAST_UPDATED, view.last_updated));

    report.push_str(page::CATEGORY);
    report.push('\n');
    for category in &view.categories {
        let marker = if category.selected { "▸" } else { " " };
        report.push_str(&format!("  {} {} ({})\n", marker, category.label, category.value));
    }
    report.push('\n');

    if view.loading {
        report.push_str(page::LOADING);
        report.push('\n');
        return report;
    }

    report.push_str(&rule);
    report.push('\n');
    report.push_str(&format!(
        "{} ({})\n",
        view.selected_label().unwrap_or("-"),
        view.offers.len()
    ));
    report.push_str(&rule);
    report.push_str("\n\n");

    for (idx, offer) in view.offers.iter().enumerate() {
        report.push_str(&format!("[{}] {}\n", idx + 1, offer.title));
        report.push_str(&format!(
            "    {}  statt {}  {}\n",
            offer.price, offer.original_price, offer.discount
        ));
        report.push_str(&format!(
            "    {} {} {}\n",
            offer.stars, offer.rating, offer.review_count
        ));
        report.push_str(&format!("    {}: {}\n\n", offer.link_label, offer.link));
    }

    report
}

pub fn generate_html_report(view: &PageView) -> Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)?;

    let mut context = Context::from_serialize(view)?;
    context.insert("labels", &LABELS);

    Ok(tera.render(PAGE_TEMPLATE_NAME, &context)?)
}

pub fn generate_json_report(view: &PageView) -> Result<String> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "hqdeals",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json",
                "site": view.site_url
            },
            "manifest": {
                "timestamp": view.timestamp,
                "last_updated": view.last_updated,
                "directory": view.directory,
                "categories": view.categories
            },
            "selected": view.selected,
            "loading": view.loading,
            "total_offers": view.offers.len(),
            "offers": view.offers
        }
    });

    Ok(serde_json::to_string_pretty(&json_report)?)
}

pub fn generate_markdown_report(view: &PageView) -> String {
    let mut report = String::new();

    report.push_str(&format!("# [{}]({})\n\n", page::TITLE, view.site_url));
    report.push_str(&format!("> {}\n\n", page::UNDER_CONSTRUCTION));
    report.push_str(&format!("{}\n\n", page::DESCRIPTION));
    report.push_str(&format!("_{} {}_\n\n", page::LAST_UPDATED, view.last_updated));

    report.push_str(&format!("**{}** ", page::CATEGORY));
    let categories: Vec<String> = view
        .categories
        .iter()
        .map(|c| {
            if c.selected {
                format!("**{}**", c.label)
            } else {
                c.label.clone()
            }
        })
        .collect();
    report.push_str(&categories.join(" · "));
    report.push_str("\n\n");

    if view.loading {
        report.push_str(&format!("{}\n", page::LOADING));
        return report;
    }

    report.push_str("| Angebot | Preis | Statt | Rabatt | Bewertung | Link |\n");
    report.push_str("|---|---:|---:|---:|---|---|\n");
    for offer in &view.offers {
        report.push_str(&format!(
            "| {} | {} | ~~{}~~ | {} | {} {} {} | [{}]({}) |\n",
            escape_markdown_cell(&offer.title),
            offer.price,
            offer.original_price,
            offer.discount,
            offer.stars,
            offer.rating,
            offer.review_count,
            escape_markdown_cell(&offer.link_label),
            offer.link
        ));
    }

    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn escape_markdown_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
