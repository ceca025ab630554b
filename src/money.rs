// 💵 Money - Currency formatting and numeric input coercion
//
// Amounts arrive as floats, integers or text (CSV cells, form fields).
// IntoAmount turns any of them into a finite f64 or hands back the
// rejected input so the caller can build an InvalidArgument from it.

// ============================================================================
// FORMATTING
// ============================================================================

/// Format as currency: `$` prefix, thousands separators, two decimals
///
/// Example: 1234.5 → "$1,234.50", -5.0 → "$-5.00"
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("${}", value);
    }

    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("${}{}.{}", sign, grouped, cents)
}

/// Plain number as it appears in notification text
///
/// Shortest round-trip form that always keeps a decimal point: 40.0, 10100.0, 0.1.
/// Values from 1e16 up or below 1e-4 switch to exponent form with a signed,
/// two-digit-minimum exponent: 1e+16, 1.5e-05.
pub fn format_plain(value: f64) -> String {
    let repr = format!("{:?}", value);

    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}

// ============================================================================
// INPUT COERCION
// ============================================================================

/// A value that can be read as a monetary amount
///
/// `Err` carries the rejected input rendered as text.
pub trait IntoAmount {
    fn into_amount(self) -> Result<f64, String>;
}

fn finite(value: f64) -> Result<f64, String> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(value.to_string())
    }
}

impl IntoAmount for f64 {
    fn into_amount(self) -> Result<f64, String> {
        finite(self)
    }
}

impl IntoAmount for f32 {
    fn into_amount(self) -> Result<f64, String> {
        finite(f64::from(self))
    }
}

impl IntoAmount for i32 {
    fn into_amount(self) -> Result<f64, String> {
        Ok(f64::from(self))
    }
}

impl IntoAmount for u32 {
    fn into_amount(self) -> Result<f64, String> {
        Ok(f64::from(self))
    }
}

impl IntoAmount for i64 {
    fn into_amount(self) -> Result<f64, String> {
        Ok(self as f64)
    }
}

impl IntoAmount for u64 {
    fn into_amount(self) -> Result<f64, String> {
        Ok(self as f64)
    }
}

impl IntoAmount for &str {
    fn into_amount(self) -> Result<f64, String> {
        match self.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(self.to_string()),
        }
    }
}

impl IntoAmount for String {
    fn into_amount(self) -> Result<f64, String> {
        self.as_str().into_amount()
    }
}

impl IntoAmount for &String {
    fn into_amount(self) -> Result<f64, String> {
        self.as_str().into_amount()
    }
}

// ============================================================================
// TESTS
// ============================================================================
