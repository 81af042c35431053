//! Lexical extraction of the GraphQL operation name.

/// Extract the operation name from a query document.
///
/// This is a lexical scan, not a parser: the name is the text between the
/// first whitespace and the first `{`, cut at an opening `(`. Shorthand
/// queries and anything that does not yield a valid GraphQL name produce an
/// empty string.
///
/// ```
/// use polaris_client::graphql::operation_name;
///
/// assert_eq!(operation_name("query Foo { foo }"), "Foo");
/// assert_eq!(operation_name("{ foo }"), "");
/// ```
pub fn operation_name(query: &str) -> String {
    let query = query.trim_start();
    let Some(space) = query.find(char::is_whitespace) else {
        return String::new();
    };
    let Some(brace) = query.find('{') else {
        return String::new();
    };
    if brace < space {
        return String::new();
    }

    let head = &query[space..brace];
    let name = head.split('(').next().unwrap_or_default().trim();
    if is_name(name) {
        name.to_string()
    } else {
        String::new()
    }
}

fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
