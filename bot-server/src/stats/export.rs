//! CSV export
//!
//! The full record table is exported as UTF-8 CSV (with a BOM so desktop
//! spreadsheet apps detect the encoding). Fields containing separators,
//! quotes or line breaks are quoted per RFC 4180.

/// Render a raw table as CSV bytes.
pub fn csv_bytes(rows: &[Vec<String>]) -> Vec<u8> {
    let mut out = String::new();
    out.push('\u{feff}');
    for row in rows {
        let line: Vec<String> = row.iter().map(|cell| escape(cell)).collect();
        out.push_str(&line.join(","));
        out.push_str("\r\n");
    }
    out.into_bytes()
}

fn escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
