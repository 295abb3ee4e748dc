//! Plain-text rendering of cost breakdowns.

use domain_pricing::Decimal;
use rust_decimal::RoundingStrategy;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};

use crate::models::CostLineItem;

const HEADERS: [&str; 5] = ["resource", "type", "qty", "unit cost", "monthly cost"];

/// `$` followed by the amount rounded to cents with comma-grouped thousands (`$1,234.56`)
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Like [`format_amount`], rendering an absent amount as an empty string
pub fn format_optional_amount(amount: Option<Decimal>) -> String {
    amount.map(format_amount).unwrap_or_default()
}

fn group_thousands(whole: &str) -> String {
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Aligned table of line items, money columns right aligned.
/// A `note` column is added when any row carries one.
pub fn render_table(items: &[CostLineItem]) -> String {
    let with_notes = items.iter().any(|item| item.note.is_some());

    let mut builder = Builder::default();
    let mut header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    if with_notes {
        header.push("note".to_string());
    }
    builder.push_record(header);

    for item in items {
        let mut row = vec![
            item.resource_kind.clone(),
            item.shape.clone().unwrap_or_default(),
            item.quantity.map(|q| q.to_string()).unwrap_or_default(),
            format_optional_amount(item.unit_monthly_cost),
            format_amount(item.total_monthly_cost),
        ];
        if with_notes {
            row.push(item.note.clone().unwrap_or_default());
        }
        builder.push_record(row);
    }

    let mut table = builder.build();
    table
        .with(Style::blank())
        .modify(Columns::new(2..5), Alignment::right());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_cloud_resources::ResourceKind;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec("276.48")), "$276.48");
        assert_eq!(format_amount(dec("50")), "$50.00");
        assert_eq!(format_amount(dec("1234.5")), "$1,234.50");
        assert_eq!(format_amount(dec("1234567.891")), "$1,234,567.89");
        assert_eq!(format_amount(dec("0.005")), "$0.01");
        assert_eq!(format_amount(Decimal::ZERO), "$0.00");
        assert_eq!(format_amount(dec("-12.5")), "-$12.50");
        assert_eq!(format_amount(dec("100000")), "$100,000.00");
    }

    #[test]
    fn test_absent_amount_is_empty() {
        assert_eq!(format_optional_amount(None), "");
        assert_eq!(format_optional_amount(Some(dec("69.12"))), "$69.12");
    }

    #[test]
    fn test_render_table() {
        let mut items = vec![CostLineItem::priced(
            ResourceKind::AwsInstance,
            Some("m5.large".to_string()),
            2,
            dec("69.12"),
        )];
        items.push(CostLineItem::grand_total(&items));

        let rendered = render_table(&items);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("resource") && lines[0].contains("monthly cost"));
        assert!(!lines[0].contains("note"));
        assert!(lines[1].contains("aws:ec2/instance:Instance"));
        assert!(lines[1].contains("m5.large"));
        assert!(lines[1].contains("$69.12"));
        assert!(lines[1].contains("$138.24"));
        assert!(lines[2].contains("TOTAL"));
        assert!(lines[2].trim_end().ends_with("$138.24"));
    }

    #[test]
    fn test_render_table_with_notes() {
        let items = vec![
            CostLineItem::unpriced(ResourceKind::AwsInstance, Some("unknown.type".to_string()), 1, "No price found"),
            CostLineItem::grand_total(std::iter::empty()),
        ];

        let rendered = render_table(&items);
        assert!(rendered.lines().next().unwrap().contains("note"));
        assert!(rendered.contains("No price found"));
    }
}
