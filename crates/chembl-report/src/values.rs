use polars::prelude::AnyValue;

/// Render a cell for CSV output. Nulls become empty cells.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_float(f64::from(v)),
        AnyValue::Float64(v) => format_float(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => if b { "True" } else { "False" }.to_string(),
        other => other.to_string(),
    }
}

/// Shortest decimal form that reads back to the same value.
pub fn format_float(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    v.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_keep_integral_digits() {
        assert_eq!(format_float(100.0), "100");
        assert_eq!(format_float(2.5), "2.5");
        assert_eq!(format_float(-0.0), "0");
    }

    #[test]
    fn cells() {
        assert_eq!(any_to_string(AnyValue::Null), "");
        assert_eq!(any_to_string(AnyValue::Boolean(true)), "True");
        assert_eq!(any_to_string(AnyValue::UInt64(3)), "3");
        assert_eq!(any_to_string(AnyValue::String("S1")), "S1");
    }
}
