use crate::utils::error::{Result, ScoutError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> ScoutError {
    ScoutError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_base_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.trim().is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

pub fn validate_output_dir(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

pub fn validate_at_least(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

/// 門檻必須是有限且非負的比值
pub fn validate_threshold(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(
            field_name,
            value,
            "Threshold must be a finite, non-negative number",
        ));
    }
    Ok(())
}

pub fn validate_css_selector(field_name: &str, selector: &str) -> Result<()> {
    scraper::Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| invalid(field_name, selector, format!("Invalid CSS selector: {}", e)))
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ScoutError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("base_url", "https://www.letpub.com.cn/index.php").is_ok());
        assert!(validate_base_url("base_url", "http://127.0.0.1:8080").is_ok());
        assert!(validate_base_url("base_url", "").is_err());
        assert!(validate_base_url("base_url", "not a url").is_err());
        assert!(validate_base_url("base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_threshold() {
        assert!(validate_threshold("threshold", 10.0).is_ok());
        assert!(validate_threshold("threshold", 0.0).is_ok());
        assert!(validate_threshold("threshold", -1.0).is_err());
        assert!(validate_threshold("threshold", f64::NAN).is_err());
        assert!(validate_threshold("threshold", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_css_selector() {
        assert!(validate_css_selector("table_selector", ".table_yjfx").is_ok());
        assert!(validate_css_selector("table_selector", "table[").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let key: Option<String> = None;
        let err = validate_required_field("source.api_key", &key).unwrap_err();
        assert!(matches!(err, ScoutError::MissingConfigError { .. }));

        let key = Some("abc".to_string());
        assert_eq!(validate_required_field("source.api_key", &key).unwrap(), "abc");
    }

    #[test]
    fn test_validate_range_and_minimum() {
        assert!(validate_at_least("max_pages", 1, 1).is_ok());
        assert!(validate_at_least("max_pages", 0, 1).is_err());
        assert!(validate_range("citation_year", 2023, 1900, 2100).is_ok());
        assert!(validate_range("citation_year", 1800, 1900, 2100).is_err());
    }
}
