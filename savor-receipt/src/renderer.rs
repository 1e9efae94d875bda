//! Customer receipt renderer
//!
//! Renders [`OrderData`] into the plain text the relay sends to the
//! restaurant printer.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::prelude::*;
use shared::models::{OrderData, OrderItem};
use tracing::{instrument, warn};

use crate::builder::ReceiptBuilder;
use crate::encoding::{gbk_width, truncate_gbk};

/// 58mm paper
pub const DEFAULT_WIDTH: usize = 32;
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Hong_Kong;
pub const DEFAULT_TITLE: &str = "HK SAVOR SPOON RESTAURANT";
pub const DEFAULT_SUBTITLE: &str = "香港美味勺子餐廳";

const DECIMAL_PLACES: u32 = 2;
const NOT_AVAILABLE: &str = "N/A";
const DEFAULT_PAYMENT: &str = "Cash";
const ITEM_BULLET: &str = "- ";

/// Customer receipt renderer
#[derive(Debug, Clone)]
pub struct ReceiptRenderer {
    width: usize,
    timezone: Tz,
    title: String,
    subtitle: Option<String>,
    footer: Vec<String>,
}

impl ReceiptRenderer {
    pub fn new(width: usize, timezone: Tz) -> Self {
        Self {
            width,
            timezone,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// `None` drops the second header line
    pub fn with_subtitle(mut self, subtitle: Option<String>) -> Self {
        self.subtitle = subtitle;
        self
    }

    pub fn with_footer(mut self, lines: Vec<String>) -> Self {
        self.footer = lines;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Render a receipt stamped with the current time
    pub fn render(&self, order: &OrderData) -> String {
        self.render_at(order, Utc::now())
    }

    /// Render a receipt stamped with `now`
    #[instrument(skip(self, order), fields(order_id = ?order.order_id, items = order.items.len()))]
    pub fn render_at(&self, order: &OrderData, now: DateTime<Utc>) -> String {
        let mut b = ReceiptBuilder::new(self.width);

        self.render_header(&mut b, order, now);

        b.write_line("Items:");
        for item in &order.items {
            self.render_item(&mut b, item);
        }

        self.render_totals(&mut b, order);
        self.render_footer(&mut b, order);

        b.finalize()
    }

    fn render_header(&self, b: &mut ReceiptBuilder, order: &OrderData, now: DateTime<Utc>) {
        b.eq_sep();
        b.text_center(&self.title);
        if let Some(subtitle) = &self.subtitle {
            b.text_center(subtitle);
        }
        b.eq_sep();

        let local = now.with_timezone(&self.timezone);
        b.write_line(&format!("Date: {}", local.format("%d/%m/%Y")));
        b.write_line(&format!("Time: {}", local.format("%H:%M:%S")));
        b.write_line(&format!(
            "Order #: {}",
            non_empty(order.order_id.as_deref()).unwrap_or(NOT_AVAILABLE)
        ));
        b.write_line(&format!(
            "Table: {}",
            non_empty(order.table.as_deref()).unwrap_or(NOT_AVAILABLE)
        ));
        b.blank_line();
    }

    /// Long names are cut so the amount stays on the same line
    fn render_item(&self, b: &mut ReceiptBuilder, item: &OrderItem) {
        let quantity = item.quantity();
        let suffix = if quantity > 1 {
            format!(" x{quantity}")
        } else {
            String::new()
        };
        let money = format_money(line_total(item));

        let name_width = self
            .width
            .saturating_sub(gbk_width(ITEM_BULLET) + gbk_width(&suffix) + gbk_width(&money) + 1);
        let name = truncate_gbk(&item.name, name_width);
        b.line_lr(&format!("{ITEM_BULLET}{name}{suffix}"), &money);
    }

    fn render_totals(&self, b: &mut ReceiptBuilder, order: &OrderData) {
        b.dash_sep();
        b.line_lr("Subtotal:", &format_money(to_decimal(order.subtotal())));

        let tax = round_money(to_decimal(order.tax()));
        if tax > Decimal::ZERO {
            b.line_lr("Tax:", &format_money(tax));
        }

        b.line_lr("Total:", &format_money(to_decimal(order.total())));
        b.blank_line();
    }

    fn render_footer(&self, b: &mut ReceiptBuilder, order: &OrderData) {
        b.write_line(&format!(
            "Payment: {}",
            non_empty(order.payment_method.as_deref()).unwrap_or(DEFAULT_PAYMENT)
        ));
        b.blank_line();
        for line in &self.footer {
            b.text_center(line);
        }
        b.eq_sep();
    }
}

impl Default for ReceiptRenderer {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            timezone: DEFAULT_TIMEZONE,
            title: DEFAULT_TITLE.to_string(),
            subtitle: Some(DEFAULT_SUBTITLE.to_string()),
            footer: vec![
                "Thank you for dining with us!".to_string(),
                "謝謝光臨！".to_string(),
            ],
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Convert f64 to Decimal
///
/// Non-finite input becomes zero. So does anything outside `Decimal`'s
/// range, with a warning since the printed amount is then wrong.
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        if value.is_finite() {
            warn!(value, "Amount out of range, printed as zero");
        }
        Decimal::ZERO
    })
}

/// Round to cents, half away from zero
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Quantity times unit price, rounded to cents
///
/// A product outside `Decimal`'s range is zero, like [`to_decimal`].
pub fn line_total(item: &OrderItem) -> Decimal {
    let price = to_decimal(item.unit_price());
    match price.checked_mul(Decimal::from(item.quantity())) {
        Some(total) => round_money(total),
        None => {
            warn!(item = %item.name, quantity = item.quantity(), "Line total out of range, printed as zero");
            Decimal::ZERO
        }
    }
}

/// `$` and exactly two decimals
pub fn format_money(value: Decimal) -> String {
    let mut rounded = round_money(value);
    rounded.rescale(DECIMAL_PLACES);
    format!("${rounded}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        // 2025-03-04 09:05:06 in Hong Kong
        Utc.with_ymd_and_hms(2025, 3, 4, 1, 5, 6).unwrap()
    }

    fn sample_order() -> OrderData {
        OrderData {
            order_id: Some("A-17".into()),
            table: Some("5".into()),
            items: vec![
                OrderItem::new("Har Gow", 38.0, 2),
                OrderItem::new("Milk Tea", 22.5, 1),
            ],
            subtotal: Some(98.5),
            tax: Some(9.85),
            total: Some(108.35),
            payment_method: Some("Octopus".into()),
        }
    }

    #[test]
    fn test_render_full_receipt() {
        let text = ReceiptRenderer::default().render_at(&sample_order(), fixed_now());
        let expected = "\
================================
   HK SAVOR SPOON RESTAURANT
        香港美味勺子餐廳
================================
Date: 04/03/2025
Time: 09:05:06
Order #: A-17
Table: 5

Items:
- Har Gow x2              $76.00
- Milk Tea                $22.50
--------------------------------
Subtotal:                 $98.50
Tax:                       $9.85
Total:                   $108.35

Payment: Octopus

 Thank you for dining with us!
           謝謝光臨！
================================
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_every_line_fits_width() {
        let text = ReceiptRenderer::default().render_at(&sample_order(), fixed_now());
        for line in text.lines() {
            assert!(crate::gbk_width(line) <= DEFAULT_WIDTH, "too wide: {line:?}");
        }
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let order = OrderData {
            items: vec![OrderItem {
                name: "Tea".into(),
                price: None,
                quantity: None,
            }],
            ..OrderData::default()
        };
        let text = ReceiptRenderer::default().render_at(&order, fixed_now());

        assert!(text.contains("Order #: N/A\n"));
        assert!(text.contains("Table: N/A\n"));
        assert!(text.contains("Payment: Cash\n"));
        // Quantity 1 has no suffix, missing price is zero
        assert!(text.contains("- Tea"));
        assert!(!text.contains(" x1"));
        assert!(text.contains("$0.00\n"));
    }

    #[test]
    fn test_tax_line_only_when_positive() {
        let mut order = sample_order();
        order.tax = Some(0.0);
        let text = ReceiptRenderer::default().render_at(&order, fixed_now());
        assert!(!text.contains("Tax:"));

        order.tax = None;
        let text = ReceiptRenderer::default().render_at(&order, fixed_now());
        assert!(!text.contains("Tax:"));
    }

    #[test]
    fn test_empty_items_still_renders_totals() {
        let order = OrderData {
            total: Some(0.0),
            ..OrderData::default()
        };
        let text = ReceiptRenderer::default().render_at(&order, fixed_now());
        assert!(text.contains("Items:\n--------------------------------\n"));
        assert!(text.contains("Subtotal:"));
        assert!(text.contains("Total:"));
    }

    #[test]
    fn test_non_finite_money_renders_zero() {
        let order = OrderData {
            subtotal: Some(f64::NAN),
            total: Some(f64::INFINITY),
            items: vec![OrderItem::new("Bun", f64::NAN, 3)],
            ..OrderData::default()
        };
        let text = ReceiptRenderer::default().render_at(&order, fixed_now());
        assert!(!text.contains("NaN"));
        assert!(!text.to_lowercase().contains("inf"));
        assert!(text.contains("- Bun x3"));
    }

    #[test]
    fn test_line_total_overflow_renders_zero() {
        let order = OrderData {
            items: vec![OrderItem::new("Banquet", 5e28, 2)],
            ..OrderData::default()
        };
        let text = ReceiptRenderer::default().render_at(&order, fixed_now());
        assert!(text.contains("- Banquet x2               $0.00\n"));
        assert_eq!(line_total(&order.items[0]), Decimal::ZERO);
    }

    #[test]
    fn test_out_of_range_amounts_render_zero() {
        let order = OrderData {
            items: vec![OrderItem::new("Feast", 1e30, 1)],
            subtotal: Some(1e30),
            total: Some(-1e30),
            ..OrderData::default()
        };
        let text = ReceiptRenderer::default().render_at(&order, fixed_now());
        assert!(text.contains("- Feast                    $0.00\n"));
        assert!(text.contains("Subtotal:                  $0.00\n"));
        assert!(text.contains("Total:                     $0.00\n"));
        assert_eq!(to_decimal(1e30), Decimal::ZERO);
    }

    #[test]
    fn test_long_item_name_is_cut_to_width() {
        let order = OrderData {
            items: vec![
                OrderItem::new("Braised Abalone with Seasonal Greens", 388.0, 2),
                OrderItem::new("避風塘炒蟹配特製蒜蓉醬汁", 268.0, 1),
            ],
            ..OrderData::default()
        };
        let text = ReceiptRenderer::default().render_at(&order, fixed_now());

        assert!(text.contains("- Braised Abalone wit x2 $776.00\n"));
        assert!(text.contains("- 避風塘炒蟹配特製蒜蓉醬 $268.00\n"));
        for line in text.lines() {
            assert!(crate::gbk_width(line) <= DEFAULT_WIDTH, "too wide: {line:?}");
        }
    }

    #[test]
    fn test_zero_quantity_prints_unit_price() {
        let order: OrderData = serde_json::from_str(
            r#"{"items": [{"name": "Tea", "price": 10, "quantity": 0}, {"name": "Bun", "price": "6.5", "quantity": "2"}]}"#,
        )
        .unwrap();
        let text = ReceiptRenderer::default().render_at(&order, fixed_now());
        assert!(text.contains("- Tea                     $10.00\n"));
        assert!(text.contains("- Bun x2                  $13.00\n"));
    }

    #[test]
    fn test_line_total_rounds_half_away_from_zero() {
        let item = OrderItem::new("Sauce", 0.125, 1);
        assert_eq!(format_money(line_total(&item)), "$0.13");

        let item = OrderItem::new("Dumpling", 12.5, 3);
        assert_eq!(format_money(line_total(&item)), "$37.50");
    }

    #[test]
    fn test_format_money_two_decimals() {
        assert_eq!(format_money(to_decimal(5.0)), "$5.00");
        assert_eq!(format_money(to_decimal(1234.5)), "$1234.50");
    }

    #[test]
    fn test_custom_header_and_timezone() {
        let renderer = ReceiptRenderer::new(32, chrono_tz::UTC)
            .with_title("TST BRANCH")
            .with_subtitle(None)
            .with_footer(vec!["See you soon".into()]);
        let text = renderer.render_at(&sample_order(), fixed_now());

        assert!(text.contains("           TST BRANCH\n================================\n"));
        assert!(!text.contains("香港美味勺子餐廳"));
        assert!(text.contains("Time: 01:05:06\n"));
        assert!(text.contains("See you soon"));
    }

    #[test]
    fn test_camel_case_order_json() {
        let order: OrderData = serde_json::from_str(
            r#"{"orderId": 1042, "table": "8", "items": [{"name": "Egg Tart", "price": 9.0, "quantity": 4}],
                "subtotal": 36, "tax": 0, "total": 36, "paymentMethod": "Card"}"#,
        )
        .unwrap();
        let text = ReceiptRenderer::default().render_at(&order, fixed_now());
        assert!(text.contains("Order #: 1042\n"));
        assert!(text.contains("- Egg Tart x4             $36.00\n"));
        assert!(text.contains("Payment: Card\n"));
    }
}
