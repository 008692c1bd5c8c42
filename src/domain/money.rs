/// Money is represented as integer cents to avoid floating-point precision issues.
/// For AUD, 1 unit = 100 cents, so $50.00 = 5000 cents.
pub type Cents = i64;

/// Currency every Up account is denominated in.
pub const CURRENCY_CODE: &str = "AUD";

/// Format cents as a fixed-point two-decimal string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Format cents for the printed report.
/// Example: 123456 -> "AUD $1234.56"
pub fn format_money(cents: Cents) -> String {
    format!("{} ${}", CURRENCY_CODE, format_cents(cents))
}
