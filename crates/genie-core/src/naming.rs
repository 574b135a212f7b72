//! Name normalization and validation

use crate::error::GenieError;

fn segments(input: &str) -> impl Iterator<Item = &str> {
    input
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|segment| !segment.is_empty())
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// PascalCase a free-form name: split on `-`, `_` and whitespace, capitalize each segment.
///
/// Used for both the generated identifier and the file name.
pub fn format_component_name(input: &str) -> String {
    segments(input).map(capitalize).collect()
}

/// camelCase variant of [`format_component_name`]
pub fn format_camel_name(input: &str) -> String {
    let pascal = format_component_name(input);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Hook identifier: `use` + PascalCase, without doubling an existing `use` prefix
pub fn format_hook_name(input: &str) -> String {
    let pascal = format_component_name(input);
    match pascal.strip_prefix("Use") {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_uppercase()) => format!("use{rest}"),
        _ => format!("use{pascal}"),
    }
}

/// Words of a PascalCase identifier separated by spaces (`OrderHistory` -> `Order History`)
pub fn title_case(pascal: &str) -> String {
    let mut out = String::with_capacity(pascal.len() + 4);
    let mut prev: Option<char> = None;
    for c in pascal.chars() {
        if c.is_ascii_uppercase() && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit()) {
            out.push(' ');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// Validate a project name (used as directory name and package name)
pub fn validate_project_name(name: &str) -> Result<(), GenieError> {
    let invalid = |reason| GenieError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.trim().is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name.len() > 214 {
        return Err(invalid("name must be at most 214 characters"));
    }
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(invalid("name must start with a letter"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid("use only letters, digits, '-' and '_'"));
    }
    Ok(())
}

/// Validate a generator name after normalization and return the PascalCase form
pub fn validate_identifier(name: &str) -> Result<String, GenieError> {
    let formatted = format_component_name(name);
    if formatted.is_empty() {
        return Err(GenieError::InvalidName {
            name: name.to_string(),
            reason: "name cannot be empty",
        });
    }
    if !formatted.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(GenieError::InvalidName {
            name: name.to_string(),
            reason: "name must start with a letter",
        });
    }
    if !formatted.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(GenieError::InvalidName {
            name: name.to_string(),
            reason: "use only letters, digits, '-', '_' and spaces",
        });
    }
    Ok(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_component_name_separators() {
        for input in [
            "my-awesome_component",
            "My Awesome Component",
            "my_awesome-component",
        ] {
            assert_eq!(format_component_name(input), "MyAwesomeComponent");
        }
    }

    #[test]
    fn test_format_component_name_keeps_inner_case() {
        assert_eq!(format_component_name("userProfile"), "UserProfile");
        assert_eq!(format_component_name("  profile  "), "Profile");
        assert_eq!(format_component_name("--"), "");
    }

    #[test]
    fn test_camel_and_hook_names() {
        assert_eq!(format_camel_name("user-profile"), "userProfile");
        assert_eq!(format_hook_name("auth"), "useAuth");
        assert_eq!(format_hook_name("use-auth"), "useAuth");
        assert_eq!(format_hook_name("user"), "useUser");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("OrderHistory"), "Order History");
        assert_eq!(title_case("Profile"), "Profile");
        assert_eq!(title_case("APIKeys"), "APIKeys");
    }

    #[test]
    fn test_validate_project_name() {
        assert!(validate_project_name("demo").is_ok());
        assert!(validate_project_name("my-app_2").is_ok());
        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("2fast").is_err());
        assert!(validate_project_name("my app").is_err());
    }

    #[test]
    fn test_validate_identifier() {
        assert_eq!(validate_identifier("order item").unwrap(), "OrderItem");
        assert!(validate_identifier("9lives").is_err());
        assert!(validate_identifier("bad.name").is_err());
        assert!(validate_identifier("   ").is_err());
    }
}
