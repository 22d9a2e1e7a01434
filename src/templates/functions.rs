//! Helpers shared by every template: integer arithmetic, ranges and pt-BR formatting.

use chrono::{NaiveDate, NaiveDateTime};
use chrono::format::{Item, StrftimeItems};
use minijinja::value::Value;
use minijinja::{Environment, Error, ErrorKind};

pub const DEFAULT_DATE_PATTERN: &str = "%d/%m/%Y";

pub fn register(env: &mut Environment<'static>) {
    env.add_function("add", add);
    env.add_function("sub", sub);
    env.add_function("mul", mul);
    env.add_function("div", div);
    env.add_function("seq", seq);
    env.add_function("format_date", format_date);
    env.add_function("format_currency", format_currency);
    env.add_function("format_area", format_area);
    env.add_function("format_phone", format_phone);
    env.add_function("format_tax_id", format_tax_id);
    env.add_function("truncate_text", truncate_text);
    env.add_function("to_json", to_json);

    env.add_filter("format_date", format_date);
    env.add_filter("format_currency", format_currency);
    env.add_filter("format_area", format_area);
    env.add_filter("format_phone", format_phone);
    env.add_filter("format_tax_id", format_tax_id);
    env.add_filter("truncate_text", truncate_text);
    env.add_filter("to_json", to_json);
}

fn overflow(op: &str) -> Error {
    Error::new(ErrorKind::InvalidOperation, format!("integer overflow in {op}"))
}

pub fn add(a: i64, b: i64) -> Result<i64, Error> {
    a.checked_add(b).ok_or_else(|| overflow("add"))
}

pub fn sub(a: i64, b: i64) -> Result<i64, Error> {
    a.checked_sub(b).ok_or_else(|| overflow("sub"))
}

pub fn mul(a: i64, b: i64) -> Result<i64, Error> {
    a.checked_mul(b).ok_or_else(|| overflow("mul"))
}

pub fn div(a: i64, b: i64) -> Result<i64, Error> {
    if b == 0 {
        return Err(Error::new(ErrorKind::InvalidOperation, "division by zero"));
    }
    a.checked_div(b).ok_or_else(|| overflow("div"))
}

/// Longest range `seq` will build.
pub const MAX_SEQ_LEN: i64 = 10_000;

/// Inclusive `start..=end`; empty when `start > end`.
pub fn seq(start: i64, end: i64) -> Result<Vec<i64>, Error> {
    if start > end {
        return Ok(Vec::new());
    }
    let len = i128::from(end) - i128::from(start) + 1;
    if len > i128::from(MAX_SEQ_LEN) {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("seq range of {len} items exceeds {MAX_SEQ_LEN}"),
        ));
    }
    Ok((start..=end).collect())
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Format a date/time string with a strftime pattern (default `%d/%m/%Y`).
/// Empty input renders empty; unrecognised input is returned as is.
pub fn format_date(value: Value, pattern: Option<String>) -> Result<String, Error> {
    if value.is_undefined() || value.is_none() {
        return Ok(String::new());
    }
    let raw = match value.as_str() {
        Some(s) => s.trim().to_string(),
        None => value.to_string(),
    };
    if raw.is_empty() {
        return Ok(String::new());
    }
    let pattern = pattern.unwrap_or_else(|| DEFAULT_DATE_PATTERN.to_string());
    if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("invalid date pattern {pattern:?}"),
        ));
    }
    Ok(match parse_datetime(&raw) {
        Some(dt) => dt.format_with_items(StrftimeItems::new(&pattern)).to_string(),
        None => raw,
    })
}

/// `1234567.891` -> `1.234.567,89`: dot thousands, comma decimals.
pub fn format_decimal_br(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(fixed.len() + digits.len() / 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(char::from(*d));
    }

    // no minus sign for values that round to zero
    let is_zero = fixed.bytes().all(|b| b == b'0' || b == b'.');
    let mut out = String::new();
    if value.is_sign_negative() && !is_zero {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}

/// `R$ 1.234,56`; missing values render empty.
pub fn format_currency(value: Option<f64>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let formatted = format_decimal_br(value, 2);
    match formatted.strip_prefix('-') {
        Some(abs) => format!("-R$ {abs}"),
        None => format!("R$ {formatted}"),
    }
}

/// `1.234,56 ha`; missing values render empty.
pub fn format_area(value: Option<f64>) -> String {
    value
        .map(|v| format!("{} ha", format_decimal_br(v, 2)))
        .unwrap_or_default()
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// 11 digits -> `(11) 98765-4321`, 10 digits -> `(11) 8765-4321`, anything else unchanged.
pub fn format_phone(value: &str) -> String {
    if !all_digits(value) {
        return value.to_string();
    }
    match value.len() {
        11 => format!("({}) {}-{}", &value[..2], &value[2..7], &value[7..]),
        10 => format!("({}) {}-{}", &value[..2], &value[2..6], &value[6..]),
        _ => value.to_string(),
    }
}

/// 11 digits as CPF `###.###.###-##`, 14 digits as CNPJ `##.###.###/####-##`.
pub fn format_tax_id(value: &str) -> String {
    if !all_digits(value) {
        return value.to_string();
    }
    match value.len() {
        11 => format!(
            "{}.{}.{}-{}",
            &value[..3],
            &value[3..6],
            &value[6..9],
            &value[9..]
        ),
        14 => format!(
            "{}.{}.{}/{}-{}",
            &value[..2],
            &value[2..5],
            &value[5..8],
            &value[8..12],
            &value[12..]
        ),
        _ => value.to_string(),
    }
}

pub fn truncate_text(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let cut: String = value.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

/// JSON for embedding in HTML, including inside `<script>`.
pub fn to_json(value: Value) -> Result<Value, Error> {
    let json = serde_json::to_string(&value).map_err(|e| {
        Error::new(ErrorKind::InvalidOperation, "cannot serialize to JSON").with_source(e)
    })?;
    let escaped = json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
        .replace('\'', "\\u0027");
    Ok(Value::from_safe_string(escaped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_formats_only_known_lengths() {
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
        assert_eq!(format_phone("1187654321"), "(11) 8765-4321");
        assert_eq!(format_phone("987654321"), "987654321");
        assert_eq!(format_phone("119876543210"), "119876543210");
        assert_eq!(format_phone("(11) 98765-4321"), "(11) 98765-4321");
        assert_eq!(format_phone(""), "");
    }

    #[test]
    fn tax_id_formats_cpf_and_cnpj() {
        assert_eq!(format_tax_id("12345678901"), "123.456.789-01");
        assert_eq!(format_tax_id("12345678000195"), "12.345.678/0001-95");
        assert_eq!(format_tax_id("1234567890"), "1234567890");
        assert_eq!(format_tax_id("123456780001"), "123456780001");
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(div(7, 2).expect("div"), 3);
        let err = div(1, 0).expect_err("zero divisor");
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        assert!(div(i64::MIN, -1).is_err());
    }

    #[test]
    fn arithmetic_helpers() {
        assert_eq!(add(2, 3).expect("add"), 5);
        assert_eq!(sub(2, 3).expect("sub"), -1);
        assert_eq!(mul(4, 3).expect("mul"), 12);
        assert!(add(i64::MAX, 1).is_err());
    }

    #[test]
    fn seq_is_inclusive() {
        assert_eq!(seq(1, 3).expect("seq"), vec![1, 2, 3]);
        assert_eq!(seq(4, 4).expect("seq"), vec![4]);
        assert!(seq(5, 1).expect("seq").is_empty());
        assert_eq!(seq(1, MAX_SEQ_LEN).expect("seq").len(), 10_000);
    }

    #[test]
    fn seq_refuses_huge_ranges() {
        let err = seq(0, 10_000_000_000).expect_err("too long");
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        assert!(seq(i64::MIN, i64::MAX).is_err());
    }

    #[test]
    fn currency_and_area_render_the_value() {
        assert_eq!(format_currency(Some(1234.5)), "R$ 1.234,50");
        assert_eq!(format_currency(Some(0.0)), "R$ 0,00");
        assert_eq!(format_currency(Some(-1234567.891)), "-R$ 1.234.567,89");
        assert_eq!(format_currency(Some(-0.001)), "R$ 0,00");
        assert_eq!(format_currency(None), "");
        assert_eq!(format_area(Some(12.5)), "12,50 ha");
        assert_eq!(format_area(Some(1500.0)), "1.500,00 ha");
        assert_eq!(format_area(None), "");
    }

    #[test]
    fn dates_format_with_pattern() {
        let v = Value::from("2026-03-05T14:30:00");
        assert_eq!(format_date(v.clone(), None).expect("fmt"), "05/03/2026");
        assert_eq!(
            format_date(v, Some("%Y/%m/%d %H:%M".into())).expect("fmt"),
            "2026/03/05 14:30"
        );
        assert_eq!(
            format_date(Value::from("2026-03-05 08:00:00"), None).expect("fmt"),
            "05/03/2026"
        );
        assert_eq!(format_date(Value::from("2026-03-05"), None).expect("fmt"), "05/03/2026");
        assert_eq!(format_date(Value::from(""), None).expect("fmt"), "");
        assert_eq!(format_date(Value::from(()), None).expect("fmt"), "");
        assert_eq!(format_date(Value::from("ontem"), None).expect("fmt"), "ontem");
        assert!(format_date(Value::from("2026-03-05"), Some("%Q".into())).is_err());
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_text("curto", 10), "curto");
        assert_eq!(truncate_text("São Sebastião do Paraíso", 8), "São Seba...");
        assert_eq!(truncate_text("abc def", 4), "abc...");
    }

    #[test]
    fn json_is_safe_inside_script_tags() {
        let v = Value::from_serialize(serde_json::json!({"nome": "</script>&'"}));
        let out = to_json(v).expect("json");
        assert!(out.is_safe());
        let s = out.as_str().expect("string");
        assert!(!s.contains('<'));
        assert!(!s.contains('&'));
        assert!(s.contains("\\u003c/script\\u003e"));
    }
}
