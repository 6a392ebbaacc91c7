use deunicode::deunicode_char;

/// Field whose translations are normalized into URL slugs
pub const SLUG_FIELD: &str = "slug";

const SEPARATOR: char = '-';

/// Normalize text into a lowercase ASCII slug joined by `-`.
///
/// Every character is transliterated to ASCII first, so diacritics fold to
/// their base letters and Cyrillic or Greek titles stay readable. `@` becomes
/// `at`, apostrophes join words, and every other run of non-alphanumerics
/// collapses into a single `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    let push = |c: char, slug: &mut String, pending: &mut bool| {
        if *pending && !slug.is_empty() {
            slug.push(SEPARATOR);
        }
        *pending = false;
        slug.push(c.to_ascii_lowercase());
    };

    for c in text.chars() {
        if c == '@' {
            pending_separator = true;
            for a in "at".chars() {
                push(a, &mut slug, &mut pending_separator);
            }
            pending_separator = true;
            continue;
        }
        if c == '\'' || c == '\u{2019}' {
            continue;
        }

        match deunicode_char(c) {
            Some(ascii) => {
                for a in ascii.chars() {
                    if a.is_ascii_alphanumeric() {
                        push(a, &mut slug, &mut pending_separator);
                    } else if a != '\'' {
                        pending_separator = true;
                    }
                }
            }
            None => pending_separator = true,
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_punctuation_and_case() {
        assert_eq!(slugify("Ma Belle Page!"), "ma-belle-page");
        assert_eq!(slugify("  Hello,   World  "), "hello-world");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
        assert_eq!(slugify("snake_case__name"), "snake-case-name");
    }

    #[test]
    fn test_slugify_folds_diacritics() {
        assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
        assert_eq!(slugify("Straße über Äpfel"), "strasse-uber-apfel");
        assert_eq!(slugify("Łódź"), "lodz");
    }

    #[test]
    fn test_slugify_special_symbols() {
        assert_eq!(slugify("mail@example"), "mail-at-example");
        assert_eq!(slugify("l'été"), "lete");
        assert_eq!(slugify("--Top 10--"), "top-10");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_transliterates_non_latin() {
        assert_eq!(slugify("Привет Мир"), "privet-mir");

        for title in ["Моя Красивая Страница", "Ωραία Σελίδα", "日本語 ページ"] {
            let slug = slugify(title);
            assert!(!slug.is_empty(), "empty slug for {}", title);
            assert!(
                slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "non-ASCII slug {} for {}", slug, title
            );
            assert!(!slug.starts_with('-') && !slug.ends_with('-'));
            assert!(!slug.contains("--"));
        }
        assert!(slugify("Моя Красивая Страница").contains('-'));
    }
}
