//! Token substitution against a contact record
//!
//! Templates use case-insensitive double-brace tokens. Every token is
//! consumed: a token whose field is missing (or that names no field at
//! all) is replaced with the empty string, never left literal in outgoing
//! content.

use cadence_types::Contact;

/// Substitute `{{token}}` placeholders in `template` with contact fields.
///
/// Recognized tokens: `first_name`, `last_name`, `email`, `company`,
/// `title`, and `name` (first + last, trimmed). Matching is
/// case-insensitive and tolerates whitespace inside the braces.
pub fn personalize(template: &str, contact: &Contact) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        match after_open.find("}}") {
            Some(close) => {
                let token = after_open[..close].trim().to_ascii_lowercase();
                out.push_str(&field_value(&token, contact));
                rest = &after_open[close + 2..];
            }
            None => {
                // Unterminated braces: keep the tail verbatim.
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

fn field_value(token: &str, contact: &Contact) -> String {
    let field = match token {
        "first_name" => contact.first_name.as_deref(),
        "last_name" => contact.last_name.as_deref(),
        "email" => contact.email.as_deref(),
        "company" => contact.company.as_deref(),
        "title" => contact.title.as_deref(),
        "name" => return contact.full_name(),
        _ => None,
    };
    field.unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> Contact {
        Contact::new("c1")
            .with_name("Ana", "Souza")
            .with_email("ana@example.com")
            .with_company("Acme")
            .with_title("CTO")
    }

    #[test]
    fn test_basic_substitution() {
        assert_eq!(personalize("Hi {{first_name}}", &ana()), "Hi Ana");
        assert_eq!(
            personalize("{{first_name}} {{last_name}} <{{email}}>", &ana()),
            "Ana Souza <ana@example.com>"
        );
    }

    #[test]
    fn test_missing_field_becomes_empty() {
        let bare = Contact::new("c2");
        assert_eq!(personalize("Hi {{first_name}}", &bare), "Hi ");
        assert_eq!(personalize("Hi {{first_name}}!", &bare), "Hi !");
    }

    #[test]
    fn test_unknown_token_never_left_literal() {
        assert_eq!(personalize("x {{nonsense}} y", &ana()), "x  y");
    }

    #[test]
    fn test_case_insensitive_and_padded_tokens() {
        assert_eq!(personalize("Hi {{First_Name}}", &ana()), "Hi Ana");
        assert_eq!(personalize("Hi {{ FIRST_NAME }}", &ana()), "Hi Ana");
    }

    #[test]
    fn test_name_composes_first_and_last() {
        assert_eq!(personalize("Dear {{name}}", &ana()), "Dear Ana Souza");

        let first_only = Contact::new("c3").with_name("Ana", "");
        assert_eq!(personalize("Dear {{name}}", &first_only), "Dear Ana");

        let empty = Contact::new("c4");
        assert_eq!(personalize("Dear {{name}}", &empty), "Dear ");
    }

    #[test]
    fn test_unterminated_braces_kept_verbatim() {
        assert_eq!(personalize("Hi {{first_name", &ana()), "Hi {{first_name");
    }

    #[test]
    fn test_no_tokens_is_identity() {
        assert_eq!(personalize("plain text", &ana()), "plain text");
        assert_eq!(personalize("", &ana()), "");
    }

    #[test]
    fn test_adjacent_tokens() {
        assert_eq!(
            personalize("{{first_name}}{{last_name}}", &ana()),
            "AnaSouza"
        );
    }
}
