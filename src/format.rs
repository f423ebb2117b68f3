//! Display Formatting
//!
//! Formatting rules for table cells, chart labels and the pagination caption.

use crate::locale::Locale;
use crate::model::RecordDate;

/// Notes longer than this many characters are truncated in the table
pub const NOTES_PREVIEW_CHARS: usize = 30;

/// Date cell: `YYYY-MM-DD`, or the stored text of a non-ISO date
pub fn format_date(date: &RecordDate) -> String {
    date.to_string()
}

/// Currency cell: symbol plus a fixed two-decimal amount (`R$ 12.50`)
pub fn format_currency_fixed(symbol: &str, value: f64) -> String {
    format!("{} {:.2}", symbol, value)
}

/// Odometer cell: whole units
pub fn format_odometer(value: f64) -> String {
    format!("{:.0}", value)
}

/// Plain numeric cell, shortest representation (`30.5`, `12`)
pub fn format_plain(value: f64) -> String {
    value.to_string()
}

/// Notes cell: first 30 characters, with `...` appended when longer
pub fn truncate_notes(notes: &str) -> String {
    let mut preview: String = notes.chars().take(NOTES_PREVIEW_CHARS).collect();
    if notes.chars().count() > NOTES_PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

/// Currency with locale grouping and exactly two decimals (`R$ 1.234,56`)
pub fn format_currency(locale: Locale, value: Option<f64>) -> String {
    format!(
        "{} {}",
        locale.messages().currency_symbol,
        locale.format_number(value.unwrap_or(0.0), 2, 2)
    )
}

/// Number with locale grouping and at most two decimals
pub fn format_decimal(locale: Locale, value: Option<f64>) -> String {
    locale.format_number(value.unwrap_or(0.0), 0, 2)
}

/// `YYYY-MM` month key to `MM/YYYY`; anything else passes through unchanged
pub fn month_label(key: &str) -> String {
    match key.split_once('-') {
        Some((year, month))
            if year.len() == 4
                && month.len() == 2
                && year.chars().all(|c| c.is_ascii_digit())
                && month.chars().all(|c| c.is_ascii_digit()) =>
        {
            format!("{}/{}", month, year)
        }
        _ => key.to_string(),
    }
}

/// First and last row number shown on `page`, as `(page-1)*size+1` and
/// `min(page*size, total)`. No clamping beyond that.
pub fn page_bounds(page: u32, page_size: u32, total: u64) -> (u64, u64) {
    let page = page as u64;
    let size = page_size as u64;
    let from = page.saturating_sub(1) * size + 1;
    let to = (page * size).min(total);
    (from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_cell_formats() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 9).unwrap();
        assert_eq!(format_date(&date.into()), "2024-07-09");
        assert_eq!(format_date(&RecordDate::Raw("09/07/2024".into())), "09/07/2024");
        assert_eq!(format_currency_fixed("R$", 12.5), "R$ 12.50");
        assert_eq!(format_currency_fixed("R$", 0.0), "R$ 0.00");
        assert_eq!(format_odometer(15234.4), "15234");
        assert_eq!(format_plain(30.5), "30.5");
        assert_eq!(format_plain(12.0), "12");
    }

    #[test]
    fn test_truncate_notes() {
        assert_eq!(truncate_notes("curta"), "curta");
        let exact = "a".repeat(30);
        assert_eq!(truncate_notes(&exact), exact);
        let long = "Carregador rápido no shopping center norte";
        assert_eq!(truncate_notes(long), "Carregador rápido no shopping ...");
        assert_eq!(truncate_notes(long).chars().count(), 33);
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let accented = "ã".repeat(31);
        assert_eq!(truncate_notes(&accented), format!("{}...", "ã".repeat(30)));
    }

    #[test]
    fn test_chart_formats() {
        assert_eq!(format_currency(Locale::PtBr, Some(1234.5)), "R$ 1.234,50");
        assert_eq!(format_currency(Locale::PtBr, None), "R$ 0,00");
        assert_eq!(format_decimal(Locale::PtBr, Some(15.456)), "15,46");
        assert_eq!(format_decimal(Locale::EnUs, Some(2500.0)), "2,500");
    }

    #[test]
    fn test_month_label() {
        let labels: Vec<String> = ["2024-01", "2024-02"].iter().map(|m| month_label(m)).collect();
        assert_eq!(labels, vec!["01/2024", "02/2024"]);
        assert_eq!(month_label("2024"), "2024");
        assert_eq!(month_label("jan-24"), "jan-24");
    }

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(2, 20, 45), (21, 40));
        assert_eq!(page_bounds(3, 20, 45), (41, 45));
        assert_eq!(page_bounds(1, 20, 0), (1, 0));
        assert_eq!(page_bounds(4, 20, 45), (61, 45));
    }
}
