//! Extraction of article records from a date listing page.
//!
//! A listing page groups its items into one or more sections, each holding a
//! sequence of article containers. [`ListingLayout`] names the CSS selectors
//! for those pieces so the same extraction works for any source that lists
//! news this way.

use kn_core::ArticleRecord;
use scraper::{ElementRef, Html};
use tracing::{debug, error, warn};
use super::utils;

/// Document structure rules of a listing page.
#[derive(Debug, Clone, Copy)]
pub struct ListingLayout {
    /// Section grouping article containers.
    pub group: &'static str,
    /// One article container, looked up inside a group.
    pub item: &'static str,
    /// Element carrying the title text and the `href`.
    pub link: &'static str,
    /// Element carrying the free-text time label.
    pub time: &'static str,
    /// The page's own label for the displayed date.
    pub banner: &'static str,
}

/// Extracts every well-formed article in document order.
///
/// A container without a title link, an `href` or a time label is skipped and
/// logged; its siblings are unaffected. A page without any group yields an
/// empty vector.
pub fn extract_articles(html: &str, layout: &ListingLayout, source: &str, date: &str) -> Vec<ArticleRecord> {
    let (group, item, link, time) = match (
        utils::selector(layout.group),
        utils::selector(layout.item),
        utils::selector(layout.link),
        utils::selector(layout.time),
    ) {
        (Ok(g), Ok(i), Ok(l), Ok(t)) => (g, i, l, t),
        _ => {
            error!(?layout, "listing layout has an invalid selector");
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);
    let mut articles = Vec::new();
    let mut skipped = 0usize;

    for section in document.select(&group) {
        for (index, container) in section.select(&item).enumerate() {
            match read_article(container, &link, &time) {
                Ok((title, url, published_time)) => articles.push(ArticleRecord {
                    title,
                    url,
                    published_time,
                    source: source.to_string(),
                    date: date.to_string(),
                }),
                Err(reason) => {
                    skipped += 1;
                    warn!(index, reason, "skipping malformed article container");
                }
            }
        }
    }

    debug!(count = articles.len(), skipped, "extracted listing articles");
    articles
}

fn read_article(
    container: ElementRef<'_>,
    link: &scraper::Selector,
    time: &scraper::Selector,
) -> std::result::Result<(String, String, String), &'static str> {
    let anchor = container.select(link).next().ok_or("missing title link")?;
    let title = utils::element_text(&anchor);
    if title.is_empty() {
        return Err("empty title");
    }
    let url = anchor
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .ok_or("missing href")?
        .to_string();
    let time = container
        .select(time)
        .next()
        .map(|el| utils::element_text(&el))
        .ok_or("missing time label")?;
    Ok((title, url, time))
}

/// Reads the page's self-reported date label, whitespace collapsed.
pub fn extract_date_banner(html: &str, layout: &ListingLayout) -> Option<String> {
    let selector = utils::selector(layout.banner).ok()?;
    let document = Html::parse_document(html);
    let banner = document.select(&selector).next()?;
    let label = utils::collapse_whitespace(&banner.text().collect::<String>());
    (!label.is_empty()).then_some(label)
}
