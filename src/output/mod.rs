use serde::Serialize;

use crate::feed::card::{Card, CardKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize)]
pub struct CardRecord {
    pub ordinal: usize,
    pub kind: String,
    pub title: String,
    pub body: Vec<String>,
}

pub fn build_records(cards: &[Card]) -> Vec<CardRecord> {
    cards
        .iter()
        .map(|c| CardRecord {
            ordinal: c.ordinal,
            kind: match c.kind {
                CardKind::Placeholder => "placeholder".to_string(),
                CardKind::Note => "note".to_string(),
            },
            title: c.title.clone(),
            body: c.body.clone(),
        })
        .collect()
}

pub fn render_text(records: &[CardRecord]) -> Vec<u8> {
    let mut out = String::new();
    for r in records {
        out.push_str(&r.title);
        out.push('\n');
        for line in &r.body {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }
    out.into_bytes()
}

pub fn render_json(records: &[CardRecord]) -> Vec<u8> {
    serde_json::to_vec_pretty(records).unwrap_or_else(|_| b"[]\n".to_vec())
}
