//! Accessor method naming conventions.

/// The role an accessor name claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Prefix {
    Get,
    Is,
    Set,
}

/// Splits an accessor name into its prefix and property name.
///
/// Both `getFirstName` and `get_first_name` styles are accepted. Camel
/// case names are decapitalized the JavaBeans way: a name starting with
/// two capitals is kept as is, so `getURL` maps to `URL`.
pub(crate) fn split_accessor(method: &str) -> Option<(Prefix, String)> {
    const PREFIXES: [(&str, Prefix); 3] = [("get", Prefix::Get), ("set", Prefix::Set), ("is", Prefix::Is)];

    for (text, prefix) in PREFIXES {
        let Some(rest) = method.strip_prefix(text) else {
            continue;
        };
        if let Some(name) = rest.strip_prefix('_') {
            return (!name.is_empty()).then(|| (prefix, name.to_owned()));
        }
        if rest.starts_with(char::is_uppercase) {
            return Some((prefix, decapitalize(rest)));
        }
    }
    None
}

fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if chars.next().is_some_and(char::is_uppercase) {
        return name.to_owned();
    }
    first.to_lowercase().chain(name[first.len_utf8()..].chars()).collect()
}

#[cfg(test)]
mod tests {
    use super::{Prefix, split_accessor};

    #[test]
    fn camel_case_names() {
        assert_eq!(split_accessor("getName"), Some((Prefix::Get, "name".to_owned())));
        assert_eq!(split_accessor("setFirstName"), Some((Prefix::Set, "firstName".to_owned())));
        assert_eq!(split_accessor("isActive"), Some((Prefix::Is, "active".to_owned())));
        assert_eq!(split_accessor("getURL"), Some((Prefix::Get, "URL".to_owned())));
        assert_eq!(split_accessor("getX"), Some((Prefix::Get, "x".to_owned())));
    }

    #[test]
    fn snake_case_names() {
        assert_eq!(split_accessor("get_name"), Some((Prefix::Get, "name".to_owned())));
        assert_eq!(split_accessor("set_zip_code"), Some((Prefix::Set, "zip_code".to_owned())));
        assert_eq!(split_accessor("is_admin"), Some((Prefix::Is, "admin".to_owned())));
    }

    #[test]
    fn non_accessor_names() {
        assert_eq!(split_accessor("get"), None);
        assert_eq!(split_accessor("get_"), None);
        assert_eq!(split_accessor("getter"), None);
        assert_eq!(split_accessor("island"), None);
        assert_eq!(split_accessor("compute"), None);
    }
}
