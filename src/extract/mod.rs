pub mod source;

pub use source::{FilePageSource, HttpPageSource, PageSource, StaticPageSource};

use crate::config::SourceConfig;
use crate::error::{EtlError, Result};
use crate::types::{ExtractedTable, RawBank};
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, info, instrument};

/// Fetch the configured page and scrape the bank table from it.
#[instrument(skip_all, fields(url = %config.url))]
pub fn extract(source: &dyn PageSource, config: &SourceConfig) -> Result<ExtractedTable> {
    let html = source.fetch(&config.url)?;
    let table = parse_banks_table(&html)?;
    info!("Extracted {} banks", table.len());
    Ok(table)
}

/// Scrape the first `<tbody>` of a page.
///
/// Rows without `<td>` cells (header rows) are skipped. For the others the bank
/// name is the third child node of the second cell (flag icon, spacer, link) and
/// the USD market cap is the text of the third cell with newlines removed.
pub fn parse_banks_table(html: &str) -> Result<ExtractedTable> {
    let document = Html::parse_document(html);
    let tbody_selector = selector("tbody")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    let tbody = document
        .select(&tbody_selector)
        .next()
        .ok_or_else(|| EtlError::Structure("page has no <tbody> element".to_string()))?;

    let mut rows = Vec::new();
    for row in tbody.select(&row_selector) {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.is_empty() {
            continue;
        }
        // Data-row index, the same numbering transform errors use
        let row_number = rows.len();

        let name = bank_name(&cells, row_number)?;
        let usd = cells
            .get(2)
            .ok_or_else(|| missing(row_number, "third <td> (market cap)"))?
            .text()
            .collect::<String>()
            .replace('\n', "");

        debug!(row = row_number, name = %name, usd = %usd, "Parsed row");
        rows.push(RawBank {
            name,
            mc_usd_billion: usd,
        });
    }

    Ok(ExtractedTable { rows })
}

fn bank_name(cells: &[ElementRef], row_number: usize) -> Result<String> {
    let cell = cells
        .get(1)
        .ok_or_else(|| missing(row_number, "second <td> (bank name)"))?;
    let node = cell
        .children()
        .nth(2)
        .ok_or_else(|| missing(row_number, "name node inside second <td>"))?;

    let text = match node.value() {
        Node::Text(text) => text.text.to_string(),
        Node::Element(_) => ElementRef::wrap(node)
            .map(|element| element.text().collect::<String>())
            .unwrap_or_default(),
        _ => String::new(),
    };

    let name = text.trim();
    if name.is_empty() {
        return Err(missing(row_number, "bank name text"));
    }
    Ok(name.to_string())
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| EtlError::Structure(format!("invalid selector '{}': {:?}", css, e)))
}

fn missing(row_number: usize, what: &str) -> EtlError {
    EtlError::Structure(format!("row {} is missing the {}", row_number, what))
}
