//! Flat-file price list loaders.
//!
//! Each list has its own layout; all of them end up as [`CatalogEntry`] rows.
//! Files may use `;` or `,` and may carry title lines above the header.

use super::entry::{CatalogEntry, CatalogSource, Prices};
use super::lookup::Catalog;
use crate::error::CatalogError;
use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const EGGER_FILE: &str = "CENNIK EGGER - Arkusz1.csv";
pub const WOODECO_FILE: &str = "Cennik płyt Woodeco - Sheet1.csv";
pub const BLUM_FILE: &str = "Cennik blum.csv";

const WOODECO_HEADER_SCAN: usize = 10;
const BLUM_HEADER_SCAN: usize = 20;
const UNNAMED_ENTRY: &str = "Element katalogowy (brak nazwy)";

/// Parses a list price such as `"1 252 zł"` or `"11,48"`.
///
/// Placeholders (`XXX`, `PALETOWE`, `NA ZAPYTANIE`, `-`), blanks and zero
/// mean the price is unavailable.
#[must_use]
pub fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let upper = trimmed.to_uppercase();
    if upper.is_empty() || matches!(upper.as_str(), "XXX" | "PALETOWE" | "NA ZAPYTANIE" | "-") {
        return None;
    }

    let numeric: String = upper
        .replace("ZŁ", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .replacen(',', ".", 1);

    let end = numeric
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && *c == '-')))
        .map_or(numeric.len(), |(i, _)| i);
    let value: f64 = numeric[..end].parse().ok()?;
    (value != 0.0 && value.is_finite()).then_some(value)
}

/// `;` when it outnumbers `,` in the first lines, else `,`.
#[must_use]
pub fn sniff_delimiter(data: &[u8]) -> u8 {
    let sample = data.split(|b| *b == b'\n').take(20);
    let (mut semicolons, mut commas) = (0usize, 0usize);
    for line in sample {
        semicolons += line.iter().filter(|b| **b == b';').count();
        commas += line.iter().filter(|b| **b == b',').count();
    }
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// Reads all rows as trimmed strings; invalid UTF-8 is replaced, not rejected.
pub fn read_rows<R: Read>(mut reader: R) -> Result<Vec<Vec<String>>, CatalogError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data).map_err(csv::Error::from)?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(sniff_delimiter(&data))
        .from_reader(data.as_slice());

    let mut rows = Vec::new();
    for record in csv_reader.byte_records() {
        let record = record?;
        let row: Vec<String> = record
            .iter()
            .map(|field| String::from_utf8_lossy(field).trim().to_string())
            .collect();
        if row.iter().any(|f| !f.is_empty()) {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn column(row: &[String], index: usize) -> &str {
    row.get(index).map_or("", String::as_str)
}

/// Index of the first row among the first `scan` whose text has any keyword.
fn find_header(rows: &[Vec<String>], scan: usize, keywords: &[&str]) -> Option<usize> {
    rows.iter().take(scan).position(|row| {
        let line = row.join(" ").to_lowercase();
        keywords.iter().any(|k| line.contains(k))
    })
}

/// Board codes: one or two capital letters then 3-5 digits, e.g. `W980`, `H3170`.
#[must_use]
pub fn is_board_code(code: &str) -> bool {
    let letters = code.chars().take_while(char::is_ascii_uppercase).count();
    let digits = code.len() - letters;
    (1..=2).contains(&letters)
        && (3..=5).contains(&digits)
        && code[letters..].chars().all(|c| c.is_ascii_digit())
}

/// EGGER layout: code, structure, decor name, 18mm, fireproof, laminate.
pub fn load_egger<R: Read>(reader: R) -> Result<Vec<CatalogEntry>, CatalogError> {
    let entries: Vec<_> = read_rows(reader)?
        .iter()
        .filter(|row| row.len() >= 4 && is_board_code(column(row, 0)))
        .map(|row| {
            CatalogEntry::board(
                column(row, 0),
                column(row, 2),
                column(row, 1),
                CatalogSource::Egger,
                Prices {
                    plate_18mm: parse_price(column(row, 3)),
                    fireproof: parse_price(column(row, 4)),
                    laminate: parse_price(column(row, 5)),
                    unit: None,
                },
            )
        })
        .collect();

    tracing::debug!(count = entries.len(), "loaded EGGER entries");
    Ok(entries)
}

/// Woodeco layout: number, decor code, decor name, structure, 18mm price.
pub fn load_woodeco<R: Read>(reader: R) -> Result<Vec<CatalogEntry>, CatalogError> {
    let rows = read_rows(reader)?;
    let start = find_header(&rows, WOODECO_HEADER_SCAN, &["dekoru", "nazwa", "numer"])
        .map_or(1, |i| i + 1);

    let mut entries = Vec::new();
    for row in rows.iter().skip(start).filter(|row| row.len() >= 4) {
        let (number, code, name) = (column(row, 0), column(row, 1), column(row, 2));
        let code_lower = code.to_lowercase();

        if code.chars().count() < 2 || code_lower.contains("kod") || code_lower.contains("dekoru") {
            continue;
        }
        if number.to_lowercase().contains("legenda") || name.to_lowercase().contains("legenda") {
            continue;
        }

        entries.push(CatalogEntry::board(
            code,
            name,
            column(row, 3),
            CatalogSource::Woodeco,
            Prices {
                plate_18mm: parse_price(column(row, 4)),
                ..Prices::default()
            },
        ));
    }

    tracing::debug!(count = entries.len(), "loaded Woodeco entries");
    Ok(entries)
}

/// Blum layout: group, symbol, article number, price, min order, EAN, description.
pub fn load_blum<R: Read>(reader: R) -> Result<Vec<CatalogEntry>, CatalogError> {
    let rows = read_rows(reader)?;
    let start = find_header(&rows, BLUM_HEADER_SCAN, &["symbol", "cena", "grupa"])
        .map_or(1, |i| i + 1);

    let mut entries = Vec::new();
    for row in rows.iter().skip(start).filter(|row| row.len() >= 4) {
        let (group, symbol, article) = (column(row, 0), column(row, 1), column(row, 2));
        let article_lower = article.to_lowercase();

        if article.chars().count() < 3 || article_lower.contains("nr") || article_lower.contains("art") {
            continue;
        }
        if group.is_empty() && symbol.is_empty() {
            continue;
        }

        entries.push(
            CatalogEntry::hardware(article, symbol, group, parse_price(column(row, 3)))
                .with_description(column(row, 6)),
        );
    }

    tracing::debug!(count = entries.len(), "loaded Blum entries");
    Ok(entries)
}

/// Board code or a long numeric article number found in a free-form line.
fn sku_in_line(line: &str) -> Option<&str> {
    let tokens = || {
        line.split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
    };
    tokens()
        .find(|t| is_board_code(t))
        .or_else(|| tokens().find(|t| t.len() >= 7 && t.chars().all(|c| c.is_ascii_digit())))
}

/// Technical catalogs: no prices, just a code and the longest descriptive column.
pub fn load_technical<R: Read>(reader: R) -> Result<Vec<CatalogEntry>, CatalogError> {
    let mut entries = Vec::new();

    for row in read_rows(reader)? {
        let line = row.join(" ");
        let Some(sku) = sku_in_line(&line) else {
            continue;
        };

        let name = row
            .iter()
            .filter(|col| col.as_str() != sku && col.chars().count() >= 3)
            .filter(|col| !matches!(col.to_uppercase().as_str(), "KOLOR" | "MATERIAŁ" | "NR ART."))
            .filter(|col| col.parse::<f64>().is_err())
            .max_by_key(|col| col.chars().count())
            .map_or(UNNAMED_ENTRY, String::as_str);

        entries.push(CatalogEntry::board(
            sku,
            name,
            "",
            CatalogSource::Technical,
            Prices::default(),
        ));
    }

    Ok(entries)
}

type Loader = fn(fs::File) -> Result<Vec<CatalogEntry>, CatalogError>;

fn load_file(path: &Path, loader: Loader) -> Result<Vec<CatalogEntry>, CatalogError> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "price list not found, skipping");
        return Ok(Vec::new());
    }
    let file = fs::File::open(path).map_err(|source| CatalogError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    loader(file)
}

fn technical_files(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let listing = fs::read_dir(dir).map_err(|source| CatalogError::FileRead {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = listing
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            let name = path.file_name().map(|n| n.to_string_lossy().to_string());
            name.is_some_and(|n| {
                (n.contains("Table 1") || n.contains("Katalog"))
                    && n.ends_with(".csv")
                    && !n.to_uppercase().contains("CENNIK")
            })
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Loads every known price list from `dir`. The first list to define a SKU wins.
pub fn load_directory<P: AsRef<Path>>(dir: P) -> Result<Catalog, CatalogError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(CatalogError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut sources: Vec<(PathBuf, Loader)> = vec![
        (dir.join(EGGER_FILE), load_egger::<fs::File> as Loader),
        (dir.join(WOODECO_FILE), load_woodeco::<fs::File>),
        (dir.join(BLUM_FILE), load_blum::<fs::File>),
    ];
    for path in technical_files(dir)? {
        sources.push((path, load_technical::<fs::File>));
    }

    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for (path, loader) in sources {
        for entry in load_file(&path, loader)? {
            if seen.insert(entry.sku.to_uppercase()) {
                entries.push(entry);
            }
        }
    }

    let catalog = Catalog::new(entries);
    tracing::info!(
        entries = catalog.len(),
        egger = catalog.count_by_source(CatalogSource::Egger),
        woodeco = catalog.count_by_source(CatalogSource::Woodeco),
        blum = catalog.count_by_source(CatalogSource::Blum),
        "catalog loaded"
    );
    Ok(catalog)
}
