//! Media attachment resolution - which `featured_image` value to persist.

/// Pick the `featured_image` value from an already-stored upload reference,
/// an explicit URL from the request body, and the previously stored value.
///
/// Priority: stored upload, then non-empty explicit URL, then the previous
/// value. Create passes `previous = None`, so the ordering is identical for
/// both write paths. An update supplying neither a file nor a URL keeps the
/// existing image untouched.
pub fn resolve_featured_image(
    stored_upload: Option<String>,
    explicit_url: Option<&str>,
    previous: Option<String>,
) -> Option<String> {
    if let Some(reference) = stored_upload {
        return Some(reference);
    }
    if let Some(url) = explicit_url {
        if !url.trim().is_empty() {
            return Some(url.to_string());
        }
    }
    previous
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_upload_wins_over_explicit_url() {
        let image = resolve_featured_image(
            Some("/uploads/a.png".to_string()),
            Some("https://cdn.example.com/b.png"),
            None,
        );
        assert_eq!(image.as_deref(), Some("/uploads/a.png"));
    }

    #[test]
    fn explicit_url_used_verbatim() {
        let image =
            resolve_featured_image(None, Some("https://cdn.example.com/b.png"), None);
        assert_eq!(image.as_deref(), Some("https://cdn.example.com/b.png"));
    }

    #[test]
    fn blank_url_falls_through_to_previous() {
        let image = resolve_featured_image(None, Some("  "), Some("/uploads/x.png".to_string()));
        assert_eq!(image.as_deref(), Some("/uploads/x.png"));
    }

    #[test]
    fn previous_value_retained_when_nothing_supplied() {
        let image = resolve_featured_image(None, None, Some("/uploads/x.png".to_string()));
        assert_eq!(image.as_deref(), Some("/uploads/x.png"));
    }

    #[test]
    fn absent_everywhere_stays_absent() {
        assert_eq!(resolve_featured_image(None, None, None), None);
    }
}
