//! Query-string helpers for the page location.

use url::Url;

/// Value of query parameter `name` in `href`, if present.
#[must_use]
pub fn query_param(href: &str, name: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// `href` with query parameter `name` set to `value`.
///
/// An existing parameter is replaced in place and any duplicates dropped;
/// otherwise the parameter is appended. Path and fragment are preserved.
///
/// # Errors
///
/// Returns [`url::ParseError`] when `href` is not an absolute URL.
pub fn with_query_param(href: &str, name: &str, value: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(href)?;
    let mut replaced = false;
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, existing) in url.query_pairs() {
        if key == name {
            if !replaced {
                pairs.push((name.to_string(), value.to_string()));
                replaced = true;
            }
        } else {
            pairs.push((key.into_owned(), existing.into_owned()));
        }
    }
    if !replaced {
        pairs.push((name.to_string(), value.to_string()));
    }

    url.query_pairs_mut().clear().extend_pairs(&pairs);
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_query_parameter() {
        let href = "https://pageminer.test/?ref=nav&lang=ja";
        assert_eq!(query_param(href, "lang").as_deref(), Some("ja"));
        assert_eq!(query_param(href, "theme"), None);
        assert_eq!(query_param("not a url", "lang"), None);
    }

    #[test]
    fn replaces_parameter_in_place() {
        let next = with_query_param(
            "https://pageminer.test/page?lang=en&ref=a#top",
            "lang",
            "zh-CN",
        )
        .expect("absolute url");
        assert_eq!(next, "https://pageminer.test/page?lang=zh-CN&ref=a#top");
    }

    #[test]
    fn appends_missing_parameter_and_drops_duplicates() {
        let appended =
            with_query_param("https://pageminer.test/", "lang", "ko").expect("absolute url");
        assert_eq!(appended, "https://pageminer.test/?lang=ko");

        let deduped = with_query_param("https://pageminer.test/?lang=en&lang=fr", "lang", "de")
            .expect("absolute url");
        assert_eq!(deduped, "https://pageminer.test/?lang=de");
    }

    #[test]
    fn rejects_relative_locations() {
        assert!(with_query_param("/index.html", "lang", "en").is_err());
    }
}
