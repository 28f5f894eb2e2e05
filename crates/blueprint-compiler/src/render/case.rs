//! Name-shaping helpers shared by templates and the planner.
//!
//! Generated identifiers are derived from these functions only, so a model
//! name resolves to the same type name, package and path everywhere.

/// Uppercases the first character and leaves the rest untouched. Only ASCII
/// letters change case, so the character count never changes.
pub fn title(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => std::iter::once(first.to_ascii_uppercase()).chain(chars).collect(),
    }
}

/// Lowercases the ASCII letters of the whole string, matching how the
/// planner folds paths.
pub fn lower(s: &str) -> String {
    s.to_ascii_lowercase()
}

/// Converts a snake_case name to PascalCase.
pub fn pascal(s: &str) -> String {
    s.split('_').map(title).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title() {
        assert_eq!(title("orderItems"), "OrderItems");
        assert_eq!(title("invoice"), "Invoice");
        assert_eq!(title("order_items"), "Order_items");
        assert_eq!(title(""), "");
    }

    #[test]
    fn test_non_ascii_first_character_is_kept() {
        assert_eq!(title("ßtraße"), "ßtraße");
        assert_eq!(title("éclair"), "éclair");
        assert_eq!(pascal("ß_total"), "ßTotal");
        assert_eq!(lower("ÀB"), "Àb");
    }

    #[test]
    fn test_lower() {
        assert_eq!(lower("OrderItems"), "orderitems");
        assert_eq!(lower("users"), "users");
    }

    #[test]
    fn test_pascal() {
        assert_eq!(pascal("created_at"), "CreatedAt");
        assert_eq!(pascal("id"), "Id");
        assert_eq!(pascal("roleId"), "RoleId");
        assert_eq!(pascal("__double__under"), "DoubleUnder");
        assert_eq!(pascal(""), "");
    }
}
