use uuid::Uuid;

/// Build a URL-safe slug from a listing title. Romanian diacritics are
/// transliterated; everything else non-alphanumeric collapses to a single
/// hyphen.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true; // suppress a leading hyphen

    for ch in title.chars() {
        let mapped = match ch {
            'ă' | 'â' | 'Ă' | 'Â' => Some('a'),
            'î' | 'Î' => Some('i'),
            'ș' | 'Ș' | 'ş' | 'Ş' => Some('s'),
            'ț' | 'Ț' | 'ţ' | 'Ţ' => Some('t'),
            c if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
            _ => None,
        };

        match mapped {
            Some(c) => {
                slug.push(c);
                last_was_hyphen = false;
            }
            None if !last_was_hyphen => {
                slug.push('-');
                last_was_hyphen = true;
            }
            None => {}
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Slug plus a short random suffix so two listings with the same title get
/// distinct slugs without a retry loop.
pub fn unique_slug(title: &str) -> String {
    let base = slugify(title);
    let suffix = &Uuid::new_v4().simple().to_string()[..8];
    if base.is_empty() {
        format!("anunt-{}", suffix)
    } else {
        format!("{}-{}", base, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_title() {
        assert_eq!(slugify("Golf 4 din 2004"), "golf-4-din-2004");
    }

    #[test]
    fn romanian_diacritics_transliterated() {
        assert_eq!(slugify("Mașină de spălat"), "masina-de-spalat");
    }

    #[test]
    fn punctuation_collapses() {
        assert_eq!(slugify("iPhone 13 -- ca nou!!!"), "iphone-13-ca-nou");
    }

    #[test]
    fn leading_and_trailing_junk_trimmed() {
        assert_eq!(slugify("  ...Vand bicicleta...  "), "vand-bicicleta");
    }

    #[test]
    fn unique_slugs_differ_for_same_title() {
        let a = unique_slug("Vand garsoniera");
        let b = unique_slug("Vand garsoniera");
        assert_ne!(a, b);
        assert!(a.starts_with("vand-garsoniera-"));
    }

    #[test]
    fn empty_title_still_produces_slug() {
        let slug = unique_slug("!!!");
        assert!(slug.starts_with("anunt-"));
    }
}
