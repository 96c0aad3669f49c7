use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Tokens must be strictly longer than this many characters.
pub const MIN_TOKEN_CHARS: usize = 2;

static NON_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z\s]").expect("non-letter pattern should be valid"));

/// Normalize a single raw ingredient string into a canonical token.
///
/// Lowercases, strips everything that is not `a-z` or whitespace, trims, then
/// drops one trailing `s`. Returns `None` when the result is too short to be
/// a useful key ("a", "to", "ok").
///
/// The singularization is naive: "tomatoes" becomes "tomatoe" and "grass"
/// becomes "gras".
pub fn normalize_ingredient(raw: &str) -> Option<String> {
    let lowered = raw.to_lowercase();
    let cleaned = NON_LETTER.replace_all(&lowered, "");
    let trimmed = cleaned.trim();
    let token = trimmed.strip_suffix('s').unwrap_or(trimmed);

    if token.chars().count() > MIN_TOKEN_CHARS {
        Some(token.to_string())
    } else {
        None
    }
}

/// Build the normalized ingredient set for one recipe.
///
/// Malformed entries never fail; they simply contribute nothing.
pub fn normalize_ingredients<I, S>(ingredients: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ingredients
        .into_iter()
        .filter_map(|raw| normalize_ingredient(raw.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_strip() {
        assert_eq!(normalize_ingredient("Salt"), Some("salt".to_string()));
        assert_eq!(
            normalize_ingredient("  Extra-Virgin Olive Oil (1 tbsp.) "),
            Some("extravirgin olive oil  tbsp".to_string())
        );
        assert_eq!(
            normalize_ingredient("2 cups Flour"),
            Some("cups flour".to_string())
        );
    }

    #[test]
    fn test_trailing_s_dropped_once() {
        assert_eq!(normalize_ingredient("Eggs"), Some("egg".to_string()));
        assert_eq!(normalize_ingredient("tomatoes"), Some("tomatoe".to_string()));
        assert_eq!(normalize_ingredient("grass"), Some("gras".to_string()));
        assert_eq!(normalize_ingredient("bus"), None);
    }

    #[test]
    fn test_length_boundary() {
        assert_eq!(normalize_ingredient("a"), None);
        assert_eq!(normalize_ingredient("ok"), None);
        assert_eq!(normalize_ingredient("oil"), Some("oil".to_string()));
        assert_eq!(normalize_ingredient("oils"), Some("oil".to_string()));
    }

    #[test]
    fn test_digits_and_punctuation_only() {
        let tokens = normalize_ingredients(["123", "1/2", "(!)", "", "   ", "3.5%"]);
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_non_ascii_letters_removed() {
        assert_eq!(normalize_ingredient("Crème Fraîche"), Some("crme frache".to_string()));
    }

    #[test]
    fn test_duplicates_collapse() {
        let tokens = normalize_ingredients(["Eggs", "egg", "EGGS!", "salt"]);
        assert_eq!(tokens.len(), 2);
        assert!(tokens.contains("egg"));
        assert!(tokens.contains("salt"));
    }

    #[test]
    fn test_tokens_are_lowercase_letters_and_spaces() {
        let tokens = normalize_ingredients([
            "1 (14 ounce) can Diced Tomatoes",
            "Kosher salt & pepper",
            "½ tsp. cumin",
        ]);
        for token in &tokens {
            assert!(token.chars().count() > MIN_TOKEN_CHARS);
            assert!(token
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_whitespace()));
        }
    }

    #[test]
    fn test_normalization_is_stable_without_trailing_s() {
        let once = normalize_ingredients(["Eggs", "Olive Oil", "brown sugar", "2 Lemons"]);
        let twice = normalize_ingredients(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_double_s_is_not_a_fixed_point() {
        let once = normalize_ingredients(["grass"]);
        let twice = normalize_ingredients(&once);
        assert!(once.contains("gras"));
        assert!(twice.contains("gra"));
        assert_ne!(once, twice);
    }
}
