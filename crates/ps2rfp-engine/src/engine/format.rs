/// Format a number the way a cell shows it without a number format.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NUM!".to_string()
    } else if n.is_infinite() {
        "#DIV/0!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::format_number;

    #[test]
    fn test_integers_have_no_decimals() {
        assert_eq!(format_number(2444.0), "2444");
        assert_eq!(format_number(-3.0), "-3");
    }

    #[test]
    fn test_fractions_keep_precision() {
        assert_eq!(format_number(12.125), "12.125");
    }
}
