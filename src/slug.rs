use rand::Rng;

const SUFFIX_LEN: usize = 5;
const BASE36: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Derive a URL-safe slug from a display name: lower-case, collapse runs of
/// non-alphanumeric characters into single hyphens, trim hyphens, then append
/// a 5-character random base-36 suffix.
///
/// Uniqueness is probabilistic. There is no retry on a conflicting insert;
/// at expected listing volume a collision is negligible and surfaces as a
/// unique-violation from the store.
pub fn generate_slug(name: &str) -> String {
    let base = slugify(name);
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    if base.is_empty() {
        suffix
    } else {
        format!("{}-{}", base, suffix)
    }
}

fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch);
        } else if matches!(ch, '\'' | '\u{2019}' | '`') {
            // In-word punctuation vanishes: "Joe's" becomes "joes",
            // not "joe-s".
        } else {
            pending_hyphen = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_slug_alphabet(slug: &str) {
        assert!(
            slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
            "unexpected character in slug: {slug}"
        );
        assert!(!slug.starts_with('-'));
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn derives_base_from_name() {
        let slug = generate_slug("Joe's Pizza");
        assert!(slug.starts_with("joes-pizza-"), "got {slug}");
        let suffix = slug.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 5);
        assert_slug_alphabet(&slug);
    }

    #[test]
    fn collapses_runs_of_separators() {
        let slug = generate_slug("  A --- B!!! C  ");
        assert!(slug.starts_with("a-b-c-"), "got {slug}");
        assert_slug_alphabet(&slug);
    }

    #[test]
    fn apostrophes_vanish_instead_of_hyphenating() {
        let slug = generate_slug("O'Brien’s Deli");
        assert!(slug.starts_with("obriens-deli-"), "got {slug}");
        assert_slug_alphabet(&slug);
    }

    #[test]
    fn name_with_no_alphanumerics_still_yields_a_slug() {
        let slug = generate_slug("!!!***");
        assert_eq!(slug.len(), 5);
        assert_slug_alphabet(&slug);
    }

    #[test]
    fn suffixes_differ_between_calls() {
        // Not a uniqueness guarantee, just a sanity check on the generator.
        let a = generate_slug("Bandra Electricians");
        let b = generate_slug("Bandra Electricians");
        assert_ne!(a, b);
    }
}
