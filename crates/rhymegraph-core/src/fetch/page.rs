//! Parsed-document view over a fetched HTML page.
//!
//! Extraction is regex-based and deliberately forgiving: the source site's
//! markup is not contractually fixed, so anything that does not match the
//! expected shape is skipped rather than treated as an error.

use regex::Regex;

/// A fetched, minimally parsed page.
pub struct Page {
    html: String,
}

/// Column positions recognized from a rhyme table's header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRoles {
    pub word: usize,
    pub score: Option<usize>,
    pub pronunciation: Option<usize>,
}

/// Outcome of matching a table's header row against the roles we understand.
/// Downstream logic only ever consumes the recognized variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableShape {
    Recognized(ColumnRoles),
    Unrecognized,
}

/// One extracted rhyme row from a detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RhymeRow {
    pub word: String,
    /// Scraped similarity score; 0 when the cell was absent or unparsable.
    pub score: i64,
    pub pronunciation: Option<String>,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            html: html.to_string(),
        }
    }

    /// Word surface forms linked from an index page.
    pub fn word_links(&self) -> Vec<String> {
        let re = match Regex::new(r#"(?is)<a[^>]*href="[^"]*/rhyme/word/[^"]*"[^>]*>(.*?)</a>"#) {
            Ok(r) => r,
            Err(_) => return Vec::new(),
        };
        re.captures_iter(&self.html)
            .filter_map(|cap| cap.get(1))
            .map(|m| strip_tags(m.as_str()))
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Whether the page advertises a next index page.
    pub fn has_next_page(&self) -> bool {
        let re = match Regex::new(r"(?is)<a[^>]*>(.*?)</a>") {
            Ok(r) => r,
            Err(_) => return false,
        };
        re.captures_iter(&self.html).any(|cap| {
            cap.get(1)
                .map(|m| strip_tags(m.as_str()).contains("Next"))
                .unwrap_or(false)
        })
    }

    /// Rhyme rows extracted from every table whose shape is recognized.
    pub fn rhyme_rows(&self) -> Vec<RhymeRow> {
        let mut rows = Vec::new();
        for table in self.tables() {
            let trs = fragments(&table, "tr");
            let Some(header_row) = trs.first() else { continue };
            let headers: Vec<String> = fragments(header_row, "th")
                .iter()
                .map(|c| strip_tags(c).to_lowercase())
                .collect();

            let TableShape::Recognized(roles) = detect_shape(&headers) else {
                continue;
            };

            for tr in trs.iter().skip(1) {
                let cells: Vec<String> =
                    fragments(tr, "td").iter().map(|c| strip_tags(c)).collect();
                if cells.is_empty() {
                    continue;
                }
                let Some(word) = cells.get(roles.word) else { continue };
                if word.is_empty() {
                    continue;
                }
                let score = roles
                    .score
                    .and_then(|i| cells.get(i))
                    .and_then(|c| c.parse::<i64>().ok())
                    .unwrap_or(0);
                let pronunciation = roles
                    .pronunciation
                    .and_then(|i| cells.get(i))
                    .filter(|c| !c.is_empty())
                    .cloned();
                rows.push(RhymeRow {
                    word: word.clone(),
                    score,
                    pronunciation,
                });
            }
        }
        rows
    }

    fn tables(&self) -> Vec<String> {
        fragments(&self.html, "table")
    }
}

/// Match header texts to column roles. A table without a word column is
/// not a rhyme table.
pub fn detect_shape(headers: &[String]) -> TableShape {
    let mut word = None;
    let mut score = None;
    let mut pronunciation = None;
    for (i, h) in headers.iter().enumerate() {
        if word.is_none() && (h.contains("word") || h.contains("rhyme")) {
            word = Some(i);
        } else if score.is_none() && h.contains("score") {
            score = Some(i);
        } else if pronunciation.is_none() && h.contains("pronunciation") {
            pronunciation = Some(i);
        }
    }
    match word {
        Some(word) => TableShape::Recognized(ColumnRoles {
            word,
            score,
            pronunciation,
        }),
        None => TableShape::Unrecognized,
    }
}

/// Inner fragments of every `<tag>...</tag>` pair, in document order.
fn fragments(html: &str, tag: &str) -> Vec<String> {
    let pattern = format!(r"(?is)<{tag}[^>]*>(.*?)</{tag}>");
    let re = match Regex::new(&pattern) {
        Ok(r) => r,
        Err(_) => return Vec::new(),
    };
    re.captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Drop nested tags and decode the handful of entities the site uses.
fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for c in fragment.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    decode_entities(out.trim())
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
