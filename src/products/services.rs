/// Derive a URL-safe slug from a product name: lowercase, runs of
/// non-alphanumeric characters collapsed to a single `-`, leading and
/// trailing separators dropped. Deterministic and idempotent; a stored slug
/// is never re-derived.
pub fn derive_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(derive_slug("Rock Phosphate"), "rock-phosphate");
        assert_eq!(derive_slug("NPK 20-20-20"), "npk-20-20-20");
    }

    #[test]
    fn collapses_runs_and_trims_edges() {
        assert_eq!(derive_slug("  Sulphur -- Granular!  "), "sulphur-granular");
        assert_eq!(derive_slug("___"), "");
        assert_eq!(derive_slug("a"), "a");
    }

    #[test]
    fn non_ascii_counts_as_separator() {
        assert_eq!(derive_slug("Café Brand"), "caf-brand");
    }

    #[test]
    fn derivation_is_idempotent() {
        for name in ["Rock Phosphate", "NPK 20-20-20", "  weird   input! "] {
            let once = derive_slug(name);
            assert_eq!(derive_slug(&once), once);
        }
    }
}
