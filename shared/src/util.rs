/// Current UTC time as an RFC 3339 / ISO-8601 string with millisecond precision
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Treat `None` and non-finite values as zero
///
/// Order payloads come from browsers and tills; a stray `NaN` must never
/// reach a printed total.
#[inline]
pub fn finite_or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
