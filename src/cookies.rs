/// Looks `name` up in a `document.cookie` style string.
///
/// Pairs are split on `;` and trimmed; the value after `name=` is
/// percent-decoded. When the name repeats, the last pair wins.
pub fn get_cookie(cookies: &str, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    let mut found = None;
    for pair in cookies.split(';') {
        let trimmed = pair.trim();
        if let Some(raw) = trimmed.strip_prefix(&prefix) {
            let value = match urlencoding::decode(raw) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => raw.to_string(),
            };
            found = Some(value);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_trimmed_and_decoded_value() {
        let cookies = "sessionid=abc; csrftoken=Tk%2B9%3D ;theme=dark";
        assert_eq!(get_cookie(cookies, "csrftoken").as_deref(), Some("Tk+9="));
    }

    #[test]
    fn requires_exact_name() {
        let cookies = "xcsrftoken=nope; csrftoken_old=nope";
        assert_eq!(get_cookie(cookies, "csrftoken"), None);
    }

    #[test]
    fn missing_or_empty_jar_yields_none() {
        assert_eq!(get_cookie("", "csrftoken"), None);
        assert_eq!(get_cookie("theme=dark", "csrftoken"), None);
    }

    #[test]
    fn last_duplicate_wins() {
        let cookies = "csrftoken=first; csrftoken=second";
        assert_eq!(get_cookie(cookies, "csrftoken").as_deref(), Some("second"));
    }

    #[test]
    fn empty_value_is_still_a_token() {
        assert_eq!(get_cookie("csrftoken=", "csrftoken").as_deref(), Some(""));
    }
}
