//! `wa.me` deep-link construction.

/// Build a WhatsApp click-to-chat link for a canonical number.
///
/// The number part is its digits, re-prefixed with `+` when the
/// canonical form carried one; the message rides in `text` URL-encoded.
pub fn wa_me_link(number: &str, message: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    let target = if number.starts_with('+') {
        format!("+{digits}")
    } else {
        digits
    };
    format!("https://wa.me/{target}?text={}", urlencoding::encode(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plus_number_keeps_plus() {
        let link = wa_me_link("+5511987654321", "Hello");
        assert_eq!(link, "https://wa.me/+5511987654321?text=Hello");
    }

    #[test]
    fn test_bare_number_stays_bare() {
        let link = wa_me_link("5511987654321", "Hello");
        assert_eq!(link, "https://wa.me/5511987654321?text=Hello");
    }

    #[test]
    fn test_message_is_url_encoded() {
        let link = wa_me_link("+5511987654321", "Olá, tudo bem?");
        assert!(link.starts_with("https://wa.me/+5511987654321?text="));
        assert!(link.contains("%20"));
        assert!(!link.contains(' '));
        assert!(!link.contains('?') || link.matches('?').count() == 1);
    }
}
