//! Slug generation - URL-safe identifiers derived from post titles.

use std::future::Future;

use crate::error::RepoError;

/// Normalize a title into a slug base: lower-case, trim, collapse every run
/// of characters outside `[a-z0-9]` into a single hyphen, strip hyphens at
/// the ends.
pub fn slugify(title: &str) -> String {
    let mut base = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for ch in title.trim().to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !base.is_empty() {
                base.push('-');
            }
            pending_hyphen = false;
            base.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    base
}

/// Derive a slug for `title` that is not currently in use.
///
/// Probes `base`, then `base-1`, `base-2`, ... until `exists` reports the
/// candidate as free. Terminates because the collection is finite. A title
/// normalizing to nothing (all punctuation) degenerates to a bare numeric
/// suffix, which is permitted.
///
/// A failing existence check aborts the derivation; no slug is produced.
pub async fn derive_unique_slug<F, Fut>(title: &str, mut exists: F) -> Result<String, RepoError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, RepoError>>,
{
    let base = slugify(title);

    // An empty base (all-punctuation title) goes straight to numeric probing
    // so the slug is never empty.
    if !base.is_empty() && !exists(base.clone()).await? {
        return Ok(base);
    }

    let mut count = 1u64;
    loop {
        let candidate = if base.is_empty() {
            count.to_string()
        } else {
            format!("{base}-{count}")
        };
        if !exists(candidate.clone()).await? {
            return Ok(candidate);
        }
        count += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    async fn never_exists(_: String) -> Result<bool, RepoError> {
        Ok(false)
    }

    #[test]
    fn slugify_strips_punctuation() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust   Basics  "), "rust-basics");
        assert_eq!(slugify("100% Pure"), "100-pure");
    }

    #[test]
    fn slugify_is_idempotent() {
        for title in ["Hello, World!", "My--First--Post", "??", "a b c", ""] {
            let once = slugify(title);
            assert_eq!(slugify(&once), once);
        }
    }

    #[tokio::test]
    async fn derives_base_when_free() {
        let slug = derive_unique_slug("Hello, World!", never_exists).await.unwrap();
        assert_eq!(slug, "hello-world");
    }

    #[tokio::test]
    async fn probes_increasing_suffixes_on_collision() {
        let taken: HashSet<&str> = ["hello-world", "hello-world-1"].into();
        let slug = derive_unique_slug("Hello World", |s| {
            let hit = taken.contains(s.as_str());
            async move { Ok(hit) }
        })
        .await
        .unwrap();
        assert_eq!(slug, "hello-world-2");
    }

    #[tokio::test]
    async fn degenerate_title_yields_numeric_suffix() {
        // All-punctuation titles normalize to an empty base; the first free
        // numeric suffix becomes the whole slug.
        let taken: HashSet<&str> = ["1"].into();
        let slug = derive_unique_slug("?!?!", |s| {
            let hit = taken.contains(s.as_str());
            async move { Ok(hit) }
        })
        .await
        .unwrap();
        assert_eq!(slug, "2");
    }

    #[tokio::test]
    async fn storage_failure_produces_no_slug() {
        let result = derive_unique_slug("Hello", |_| async {
            Err(RepoError::Connection("db down".to_string()))
        })
        .await;
        assert!(matches!(result, Err(RepoError::Connection(_))));
    }
}
