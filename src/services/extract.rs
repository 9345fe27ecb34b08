// src/services/extract.rs

//! Perk and tool extraction from job pages.
//!
//! Both extractors lean on the job page layout:
//! - a perk name sits [`PERK_CATEGORY_DEPTH`] levels below the block that holds
//!   its group label,
//! - a tool name is immediately followed by its category label.

use scraper::{ElementRef, Html, Node, Selector};

use crate::error::{AppError, ExtractError, RecordKind, Result};
use crate::models::{JobRecords, JobUrl, PerkRecord, SelectorConfig, ToolRecord};

/// Ancestor levels between a perk name and the block holding its group label.
pub const PERK_CATEGORY_DEPTH: usize = 4;

/// Outcome of extracting a single element.
pub type Extracted<T> = std::result::Result<T, ExtractError>;

/// Extracts perks and tools from a parsed job page.
pub struct RecordExtractor {
    perk: Selector,
    perk_category: Selector,
    tool: Selector,
    perk_category_depth: usize,
}

impl RecordExtractor {
    pub fn new(config: &SelectorConfig) -> Result<Self> {
        if config.perk_category_depth == 0 {
            return Err(AppError::validation(
                "selectors.perk_category_depth must be > 0",
            ));
        }
        Ok(Self {
            perk: class_selector(&config.perk_class)?,
            perk_category: class_selector(&config.perk_category_class)?,
            tool: class_selector(&config.tool_class)?,
            perk_category_depth: config.perk_category_depth,
        })
    }

    /// Parse `markup` and extract everything, keeping layout failures aside.
    pub fn extract(&self, site: &str, url: JobUrl, markup: &str) -> JobRecords {
        let document = Html::parse_document(markup);

        let mut issues = Vec::new();
        let perks = keep_records(self.extract_perks(&document), &mut issues);
        let tools = keep_records(self.extract_tools(&document), &mut issues);
        for issue in &issues {
            log::warn!("Skipped element on {}: {}", url, issue);
        }

        JobRecords {
            site: site.to_string(),
            url,
            perks,
            tools,
            issues,
        }
    }

    /// One entry per perk element, in document order.
    pub fn extract_perks(&self, document: &Html) -> Vec<Extracted<PerkRecord>> {
        document
            .select(&self.perk)
            .map(|perk| self.perk_record(perk))
            .collect()
    }

    /// One entry per tool element, in document order.
    pub fn extract_tools(&self, document: &Html) -> Vec<Extracted<ToolRecord>> {
        document.select(&self.tool).map(tool_record).collect()
    }

    fn perk_record(&self, perk: ElementRef<'_>) -> Extracted<PerkRecord> {
        let name = element_text(perk);

        let node = *perk;
        let group = node
            .ancestors()
            .nth(self.perk_category_depth - 1)
            .and_then(ElementRef::wrap)
            .ok_or_else(|| ExtractError::AncestorDepth {
                item: name.clone(),
                depth: self.perk_category_depth,
            })?;

        let category = group
            .select(&self.perk_category)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ExtractError::MissingCategory {
                kind: RecordKind::Perk,
                item: name.clone(),
            })?;

        Ok(PerkRecord { name, category })
    }
}

fn tool_record(tool: ElementRef<'_>) -> Extracted<ToolRecord> {
    let name = element_text(tool);
    let category = next_sibling_text(tool)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ExtractError::MissingCategory {
            kind: RecordKind::Tool,
            item: name.clone(),
        })?;
    Ok(ToolRecord { name, category })
}

/// Text of the first sibling after `element`, ignoring blank text and comments.
fn next_sibling_text(element: ElementRef<'_>) -> Option<String> {
    let node = *element;
    for sibling in node.next_siblings() {
        match sibling.value() {
            Node::Text(text) if text.trim().is_empty() => continue,
            Node::Text(text) => return Some(normalize_whitespace(text)),
            Node::Element(_) => return ElementRef::wrap(sibling).map(element_text),
            _ => continue,
        }
    }
    None
}

fn keep_records<T>(
    results: Vec<Extracted<T>>,
    issues: &mut Vec<ExtractError>,
) -> Vec<T> {
    results
        .into_iter()
        .filter_map(|result| result.map_err(|e| issues.push(e)).ok())
        .collect()
}

fn class_selector(class: &str) -> Result<Selector> {
    let css = format!(".{class}");
    Selector::parse(&css).map_err(|e| AppError::selector(css.as_str(), format!("{e:?}")))
}

fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERKS_PAGE: &str = r#"
        <html><body>
          <section class="benefits">
            <div class="perk-group">
              <h3 class="category-title">Health Insurance &amp; Wellness</h3>
              <ul>
                <li>
                  <div class="perk">
                    <span class="perk-title">Dental <span>Benefits</span></span>
                  </div>
                </li>
                <li>
                  <div class="perk"><span class="perk-title">Vision Benefits</span></div>
                </li>
              </ul>
            </div>
            <div class="perk-group">
              <h3 class="category-title">Vacation &amp; Time Off</h3>
              <ul>
                <li><div class="perk"><span class="perk-title">Unlimited Vacation Policy</span></div></li>
              </ul>
            </div>
          </section>
        </body></html>"#;

    const TOOLS_PAGE: &str = r#"
        <html><body>
          <div class="stack"><span class="full-stack-item">Rust</span><span class="cat">Languages</span></div>
          <div class="stack">
            <span class="full-stack-item">PostgreSQL</span>
            <!-- label -->
            <span class="cat"> Databases </span>
          </div>
          <div class="stack"><span class="full-stack-item">Orphan</span></div>
        </body></html>"#;

    fn extractor() -> RecordExtractor {
        RecordExtractor::new(&SelectorConfig::default()).unwrap()
    }

    fn perk(name: &str, category: &str) -> PerkRecord {
        PerkRecord {
            name: name.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_perks_use_group_label_four_levels_up() {
        let document = Html::parse_document(PERKS_PAGE);
        let perks: Vec<_> = extractor()
            .extract_perks(&document)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(
            perks,
            vec![
                perk("Dental Benefits", "Health Insurance & Wellness"),
                perk("Vision Benefits", "Health Insurance & Wellness"),
                perk("Unlimited Vacation Policy", "Vacation & Time Off"),
            ]
        );
    }

    #[test]
    fn test_no_perks_is_not_an_error() {
        let document = Html::parse_document("<html><body><p>Nothing here</p></body></html>");
        assert!(extractor().extract_perks(&document).is_empty());
        assert!(extractor().extract_tools(&document).is_empty());
    }

    #[test]
    fn test_perk_too_shallow() {
        let document =
            Html::parse_document(r#"<html><body><span class="perk-title">Gym</span></body></html>"#);
        let results = extractor().extract_perks(&document);
        assert_eq!(
            results,
            vec![Err(ExtractError::AncestorDepth {
                item: "Gym".to_string(),
                depth: PERK_CATEGORY_DEPTH,
            })]
        );
    }

    #[test]
    fn test_perk_ancestor_is_document() {
        // span -> div -> body -> html -> document root
        let document = Html::parse_document(
            r#"<html><body><div><span class="perk-title">Gym</span></div></body></html>"#,
        );
        let results = extractor().extract_perks(&document);
        assert_eq!(
            results,
            vec![Err(ExtractError::AncestorDepth {
                item: "Gym".to_string(),
                depth: PERK_CATEGORY_DEPTH,
            })]
        );
    }

    #[test]
    fn test_perk_without_group_label() {
        let document = Html::parse_document(
            r#"<div><div><div><div><span class="perk-title">Gym</span></div></div></div></div>"#,
        );
        let results = extractor().extract_perks(&document);
        assert_eq!(
            results,
            vec![Err(ExtractError::MissingCategory {
                kind: RecordKind::Perk,
                item: "Gym".to_string(),
            })]
        );
    }

    #[test]
    fn test_tools_use_next_sibling() {
        let document = Html::parse_document(TOOLS_PAGE);
        let results = extractor().extract_tools(&document);
        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0],
            Ok(ToolRecord {
                name: "Rust".to_string(),
                category: "Languages".to_string(),
            })
        );
        assert_eq!(
            results[1],
            Ok(ToolRecord {
                name: "PostgreSQL".to_string(),
                category: "Databases".to_string(),
            })
        );
        assert_eq!(
            results[2],
            Err(ExtractError::MissingCategory {
                kind: RecordKind::Tool,
                item: "Orphan".to_string(),
            })
        );
    }

    #[test]
    fn test_tool_followed_by_bare_text() {
        let document = Html::parse_document(
            r#"<div><span class="full-stack-item">Rust</span> Languages <span>Ignored</span></div>"#,
        );
        assert_eq!(
            extractor().extract_tools(&document),
            vec![Ok(ToolRecord {
                name: "Rust".to_string(),
                category: "Languages".to_string(),
            })]
        );
    }

    #[test]
    fn test_extract_keeps_good_records_and_collects_issues() {
        let markup = format!("{PERKS_PAGE}{TOOLS_PAGE}");
        let url = JobUrl::from_href("https://www.builtinboston.com", "/job/1", "/job/").unwrap();
        let records = extractor().extract("boston", url.clone(), &markup);

        assert_eq!(records.site, "boston");
        assert_eq!(records.url, url);
        assert_eq!(records.perks.len(), 3);
        assert_eq!(records.tools.len(), 2);
        assert_eq!(records.issues.len(), 1);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let markup = format!("{PERKS_PAGE}{TOOLS_PAGE}");
        let url = JobUrl::from_href("https://www.builtinboston.com", "/job/1", "/job/").unwrap();
        let extractor = extractor();
        let first = extractor.extract("boston", url.clone(), &markup);
        let second = extractor.extract("boston", url, &markup);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_invalid_class_is_selector_error() {
        let config = SelectorConfig {
            perk_class: "9lives".to_string(),
            ..SelectorConfig::default()
        };
        assert!(matches!(
            RecordExtractor::new(&config),
            Err(AppError::Selector { .. })
        ));
    }
}
