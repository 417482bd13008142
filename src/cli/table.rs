//! Plain-text tables for connection nodes.

use colored::Colorize as _;
use larder::api::models::{
    Cents, Coupon, CouponRedemption, Customer, DeliveryRule, DiscountKind, Invoice, Location,
    Order, Plan, PlanSubscriber, Product, Subscription,
};

/// A node that renders as one table row.
pub trait Tabular {
    const HEADERS: &'static [&'static str];

    fn row(&self) -> Vec<String>;
}

/// `1299` renders as `12.99`, `-50` as `-0.50`.
pub fn money(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_owned()
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}

/// Left-aligned columns separated by two spaces, header first.
pub fn render<T: Tabular>(rows: &[T]) -> String {
    let cells: Vec<Vec<String>> = rows.iter().map(Tabular::row).collect();

    let mut widths: Vec<usize> = T::HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = line(T::HEADERS.iter().copied(), &widths).bold().to_string();
    out.push('\n');
    for row in &cells {
        out.push_str(&line(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out
}

fn line<'a>(fields: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = fields
        .zip(widths)
        .map(|(field, &width)| format!("{field:<width$}"))
        .collect();
    padded.join("  ").trim_end().to_owned()
}

impl Tabular for Customer {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "EMAIL", "STATUS", "CREDIT"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.full_name(),
            self.email.clone(),
            self.status.to_string(),
            money(self.credit_balance_cents),
        ]
    }
}

impl Tabular for Order {
    const HEADERS: &'static [&'static str] =
        &["ID", "NUMBER", "CUSTOMER", "STATUS", "TOTAL", "FULFILLMENT"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.number.clone(),
            self.customer_name.clone(),
            self.status.to_string(),
            money(self.total_cents),
            or_dash(self.fulfillment_date.as_deref()),
        ]
    }
}

impl Tabular for Subscription {
    const HEADERS: &'static [&'static str] = &["ID", "CUSTOMER", "PLAN", "STATUS", "NEXT DELIVERY"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.customer_name.clone(),
            self.plan_name.clone(),
            self.status.to_string(),
            or_dash(self.next_delivery_date.as_deref()),
        ]
    }
}

impl Tabular for Invoice {
    const HEADERS: &'static [&'static str] = &["ID", "AMOUNT", "STATUS", "ISSUED"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            money(self.amount_cents),
            self.status.to_string(),
            self.issued_at.clone(),
        ]
    }
}

impl Tabular for Coupon {
    const HEADERS: &'static [&'static str] =
        &["ID", "CODE", "DISCOUNT", "REDEEMED", "EXPIRES", "ARCHIVED"];

    fn row(&self) -> Vec<String> {
        let discount = match self.discount_kind {
            DiscountKind::Percentage => format!("{}%", self.amount),
            DiscountKind::FixedAmount => money(self.amount),
        };
        let redeemed = match self.redemption_limit {
            Some(limit) => format!("{}/{limit}", self.redemptions),
            None => self.redemptions.to_string(),
        };
        vec![
            self.id.clone(),
            self.code.clone(),
            discount,
            redeemed,
            or_dash(self.expires_at.as_deref()),
            yes_no(self.archived),
        ]
    }
}

impl Tabular for CouponRedemption {
    const HEADERS: &'static [&'static str] = &["ORDER", "CUSTOMER", "DISCOUNT", "PLACED"];

    fn row(&self) -> Vec<String> {
        vec![
            self.order_number.clone(),
            self.customer_name.clone(),
            money(self.discount_cents),
            self.placed_at.clone(),
        ]
    }
}

impl Tabular for Plan {
    const HEADERS: &'static [&'static str] =
        &["ID", "NAME", "PRICE", "INTERVAL", "MEALS", "ARCHIVED"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            money(self.price_cents),
            self.interval.to_string(),
            self.meals_per_delivery.to_string(),
            yes_no(self.archived),
        ]
    }
}

impl Tabular for PlanSubscriber {
    const HEADERS: &'static [&'static str] = &["SUBSCRIPTION", "CUSTOMER", "EMAIL", "STARTED"];

    fn row(&self) -> Vec<String> {
        vec![
            self.subscription_id.clone(),
            self.customer_name.clone(),
            self.email.clone(),
            self.started_at.clone(),
        ]
    }
}

impl Tabular for Product {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "PRICE", "TAGS", "ARCHIVED"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            money(self.price_cents),
            self.tags.join(","),
            yes_no(self.archived),
        ]
    }
}

impl Tabular for DeliveryRule {
    const HEADERS: &'static [&'static str] = &["ID", "WEEKDAY", "CUTOFF", "FEE", "POSTAL CODES"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.weekday.to_string(),
            format!("{}h", self.cutoff_hours),
            money(self.fee_cents),
            self.postal_codes.join(","),
        ]
    }
}

impl Tabular for Location {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "ADDRESS", "PICKUP", "DELIVERY"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.address.clone(),
            yes_no(self.pickup_enabled),
            yes_no(self.delivery_enabled),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair(&'static str, &'static str);

    impl Tabular for Pair {
        const HEADERS: &'static [&'static str] = &["KEY", "VALUE"];

        fn row(&self) -> Vec<String> {
            vec![self.0.to_owned(), self.1.to_owned()]
        }
    }

    #[test]
    fn money_keeps_two_decimals() {
        assert_eq!(money(1299), "12.99");
        assert_eq!(money(5), "0.05");
        assert_eq!(money(-50), "-0.50");
        assert_eq!(money(0), "0.00");
    }

    #[test]
    fn columns_align_to_widest_cell() {
        colored::control::set_override(false);
        let out = render(&[Pair("a", "1"), Pair("longer", "22")]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, ["KEY     VALUE", "a       1", "longer  22"]);
    }

    #[test]
    fn empty_page_still_prints_headers() {
        colored::control::set_override(false);
        assert_eq!(render::<Pair>(&[]), "KEY  VALUE\n");
    }
}
