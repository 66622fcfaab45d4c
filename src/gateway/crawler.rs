use crate::{Citation, Crawler, CrawlerError, OcrSource};
use itertools::Itertools;
use lazy_regex::regex;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

const E: &str = "Invalid selector";
const PUBLICATION_DATE_NAME: &str = "citation_publication_date";
const VOLUME_NAME: &str = "citation_volume";
const TITLE_NAME: &str = "citation_title";

lazy_static! {
    static ref ARTICLE: Selector = Selector::parse("article").expect(E);
    static ref MORE_PAGES: Selector = Selector::parse(r#"div[id="more-pages"]"#).expect(E);
    static ref PUBLICATION_DATE: Selector =
        Selector::parse(r#"meta[name="citation_publication_date"]"#).expect(E);
    static ref VOLUME: Selector = Selector::parse(r#"meta[name="citation_volume"]"#).expect(E);
    static ref TITLE: Selector = Selector::parse(r#"meta[name="citation_title"]"#).expect(E);
    static ref OCR_LINK: Selector = Selector::parse("a#ocr-text").expect(E);
    static ref OCR_TEXT: Selector = Selector::parse("#ocr-text").expect(E);
    static ref A_HREF: Selector = Selector::parse("a[href]").expect(E);
}

/// Extractor for pages served by the UNT-style digital gateway.
#[derive(Debug, Default)]
pub struct GatewayCrawler;

fn meta_content(doc: &Html, selector: &Selector, name: &'static str) -> Result<String, CrawlerError> {
    doc.select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(ToString::to_string)
        .ok_or(CrawlerError::MissingMetadata(name))
}

fn href(el: ElementRef<'_>) -> Option<String> {
    el.value().attr("href").map(|h| h.trim().to_string())
}

impl Crawler for GatewayCrawler {
    fn extract_total(&self, doc: &Html) -> Option<u32> {
        // Result snippets may quote a count of their own.
        let text = doc
            .root_element()
            .descendants()
            .filter(|node| {
                !node
                    .ancestors()
                    .filter_map(|n| n.value().as_element())
                    .any(|el| el.name() == "article")
            })
            .filter_map(|node| node.value().as_text().map(|t| &**t))
            .join(" ");
        let caps = regex!(r"(?i)\bof\s+([\d,]+)\s+results?\b").captures(&text)?;
        caps.get(1)?.as_str().replace(',', "").parse().ok()
    }

    fn extract_articles(&self, doc: &Html) -> Vec<String> {
        doc.select(&ARTICLE)
            .enumerate()
            .filter_map(|(i, article)| {
                let link = article.select(&A_HREF).next().and_then(href);
                if link.is_none() {
                    warn!("Search result {} has no link, skipping", i + 1);
                }
                link
            })
            .collect()
    }

    fn extract_subpages(&self, doc: &Html) -> Option<Vec<String>> {
        let container = doc.select(&MORE_PAGES).next()?;
        Some(container.select(&A_HREF).filter_map(href).collect())
    }

    fn extract_citation(&self, doc: &Html) -> Result<Citation, CrawlerError> {
        Ok(Citation {
            publication_date: meta_content(doc, &PUBLICATION_DATE, PUBLICATION_DATE_NAME)?,
            volume: meta_content(doc, &VOLUME, VOLUME_NAME)?,
            title: meta_content(doc, &TITLE, TITLE_NAME)?,
        })
    }

    fn extract_ocr(&self, doc: &Html) -> Result<OcrSource, CrawlerError> {
        if let Some(link) = doc.select(&OCR_LINK).next() {
            return link
                .value()
                .attr("href")
                .map(|href| OcrSource::Link(href.to_string()))
                .ok_or(CrawlerError::MissingOcrLink);
        }

        Ok(match doc.select(&OCR_TEXT).next() {
            Some(el) => OcrSource::Inline(el.text().collect::<String>().trim().to_string()),
            None => OcrSource::Missing,
        })
    }
}
