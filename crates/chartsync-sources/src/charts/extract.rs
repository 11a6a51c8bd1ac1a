use chartsync_models::RankedItem;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// Extract the ranked rows of one named section from a chart page.
///
/// The page carries several sections ("TOP 10 Movies", "TOP 10 TV Shows",
/// ...), each a heading inside a card container holding a table. Row order
/// in the table body is rank order and is never re-sorted. Structural
/// misses (missing section, card, table, or malformed rows) degrade to an
/// empty or partial result; only the fetch itself can fail a task.
pub fn extract_ranked(html: &str, section_title: &str) -> Vec<RankedItem> {
    let document = Html::parse_document(html);

    let heading = match find_section_heading(&document, section_title) {
        Some(heading) => heading,
        None => {
            warn!(section = section_title, "Section heading not found on chart page");
            return Vec::new();
        }
    };

    let card = match enclosing_card(heading) {
        Some(card) => card,
        None => {
            warn!(
                section = section_title,
                "No card container encloses the section heading"
            );
            return Vec::new();
        }
    };

    let tbody_sel = Selector::parse("tbody").unwrap();
    let tbody = match card.select(&tbody_sel).next() {
        Some(tbody) => tbody,
        None => {
            warn!(section = section_title, "Card has no table body");
            return Vec::new();
        }
    };

    let tr_sel = Selector::parse("tr").unwrap();
    let mut items = Vec::new();
    for row in tbody.select(&tr_sel) {
        match extract_row(row) {
            Some(item) => items.push(item),
            None => warn!(section = section_title, "Skipping malformed chart row"),
        }
    }

    debug!(
        section = section_title,
        rows = items.len(),
        "Extracted chart section"
    );
    items
}

/// First heading (h2/h3/h4, document order) whose text matches the section
/// title, exactly or case-insensitively.
fn find_section_heading<'a>(document: &'a Html, section_title: &str) -> Option<ElementRef<'a>> {
    let heading_sel = Selector::parse("h2, h3, h4").unwrap();
    document.select(&heading_sel).find(|heading| {
        let text = element_text(*heading);
        text == section_title || text.eq_ignore_ascii_case(section_title)
    })
}

/// Walk ancestors up to the nearest `div.card`, stopping at `body`.
fn enclosing_card(heading: ElementRef<'_>) -> Option<ElementRef<'_>> {
    for node in heading.ancestors() {
        let element = match ElementRef::wrap(node) {
            Some(element) => element,
            None => continue,
        };
        if element.value().name() == "body" {
            break;
        }
        if element.value().name() == "div" && element.value().classes().any(|c| c == "card") {
            return Some(element);
        }
    }
    None
}

fn extract_row(row: ElementRef<'_>) -> Option<RankedItem> {
    let td_sel = Selector::parse("td").unwrap();
    let cells: Vec<ElementRef<'_>> = row.select(&td_sel).collect();

    // Prefer the narrow rank column, fall back to the first cell.
    let rank_cell = cells
        .iter()
        .find(|cell| {
            cell.value().classes().any(|c| c == "table-td")
                && cell.value().classes().any(|c| c == "w-12")
        })
        .or_else(|| cells.first())?;

    let rank_text = element_text(*rank_cell);
    let rank: u32 = rank_text.trim_end_matches('.').parse().ok()?;

    let a_sel = Selector::parse("a").unwrap();
    let link = row.select(&a_sel).next()?;
    let title = element_text(link);
    let href = link.value().attr("href")?;

    let slug = slug_from_href(href)?;

    Some(RankedItem { rank, title, slug })
}

/// The slug is the second-to-last `/`-separated segment of the link target
/// (chart links end with a trailing slash).
fn slug_from_href(href: &str) -> Option<String> {
    let segments: Vec<&str> = href.split('/').collect();
    if segments.len() < 2 {
        return None;
    }
    let slug = segments[segments.len() - 2];
    if slug.is_empty() {
        return None;
    }
    Some(slug.to_string())
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
