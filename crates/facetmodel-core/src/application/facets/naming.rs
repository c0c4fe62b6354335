//! Member-name conventions shared by the standard factories.

/// `firstName` -> `FirstName`.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `FirstName` -> `firstName`.
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Member id of an accessor: `getFirstName` -> `firstName`.
///
/// `None` if `method_name` does not start with `prefix` followed by an
/// upper-case letter.
pub fn member_id_after_prefix(method_name: &str, prefix: &str) -> Option<String> {
    let rest = method_name.strip_prefix(prefix)?;
    rest.chars()
        .next()
        .filter(|c| c.is_uppercase())
        .map(|_| decapitalize(rest))
}

/// Display name from a camel-case identifier: `firstName` -> `First Name`,
/// `URLPrefix` -> `URL Prefix`.
pub fn natural_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().filter(|c| *c != '_').collect();
    let mut out = String::with_capacity(chars.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push(' ');
            }
        }
        if i == 0 {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessor_prefixes() {
        assert_eq!(member_id_after_prefix("getFirstName", "get").as_deref(), Some("firstName"));
        assert_eq!(member_id_after_prefix("isActive", "is").as_deref(), Some("active"));
        assert_eq!(member_id_after_prefix("getaway", "get"), None);
        assert_eq!(member_id_after_prefix("get", "get"), None);
    }

    #[test]
    fn natural_names() {
        assert_eq!(natural_name("firstName"), "First Name");
        assert_eq!(natural_name("Customer"), "Customer");
        assert_eq!(natural_name("URLPrefix"), "URL Prefix");
        assert_eq!(natural_name("placeOrder"), "Place Order");
    }

    #[test]
    fn capitalization_round_trip() {
        assert_eq!(capitalize("name"), "Name");
        assert_eq!(decapitalize("Name"), "name");
        assert_eq!(capitalize(""), "");
    }
}
