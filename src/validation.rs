use regex::Regex;
use std::sync::OnceLock;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

/// Permissive email check: exactly one `@`, a dot somewhere after it, and no
/// whitespace. Not RFC validation.
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email.trim())
}

/// Escape the characters that matter when a host drops user text into HTML
pub fn sanitize_input(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.trim().chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("alice@x.com"));
        assert!(is_valid_email("  first.last@mail.example.org  "));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("a@b"), "missing dot");
        assert!(!is_valid_email("ab.co"), "missing @");
        assert!(!is_valid_email("a@b@c.co"), "multiple @");
        assert!(!is_valid_email("a b@c.co"), "inner whitespace");
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_sanitize_input() {
        assert_eq!(
            sanitize_input(" <script>alert('x')</script> "),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
        );
        assert_eq!(sanitize_input(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(sanitize_input("plain & simple"), "plain & simple");
    }
}
