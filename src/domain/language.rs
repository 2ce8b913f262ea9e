//! Locale to language name resolution

/// Language used when a locale is unknown
pub const FALLBACK_LANGUAGE: &str = "English";

/// Known primary language subtags and their English names
const LANGUAGES: &[(&str, &str)] = &[
    ("zh", "Chinese"),
    ("en", "English"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("th", "Thai"),
    ("vi", "Vietnamese"),
    ("id", "Indonesian"),
    ("ms", "Malay"),
    ("tr", "Turkish"),
    ("pl", "Polish"),
    ("nl", "Dutch"),
    ("sv", "Swedish"),
    ("da", "Danish"),
    ("no", "Norwegian"),
    ("nb", "Norwegian"),
    ("nn", "Norwegian"),
    ("fi", "Finnish"),
    ("he", "Hebrew"),
    ("iw", "Hebrew"),
    ("uk", "Ukrainian"),
    ("el", "Greek"),
    ("cs", "Czech"),
    ("hu", "Hungarian"),
    ("ro", "Romanian"),
];

/// Localized "could not describe the image" messages
const FALLBACK_MESSAGES: &[(&str, &str)] = &[
    ("en", "Sorry, I couldn't describe this image. Please try again."),
    ("zh", "抱歉，无法识别这张图片，请重试。"),
    ("ja", "申し訳ありません。画像を説明できませんでした。もう一度お試しください。"),
    ("ko", "죄송합니다. 이미지를 설명할 수 없습니다. 다시 시도해 주세요."),
    ("es", "Lo siento, no pude describir esta imagen. Inténtalo de nuevo."),
    ("fr", "Désolé, je n'ai pas pu décrire cette image. Veuillez réessayer."),
    ("de", "Entschuldigung, das Bild konnte nicht beschrieben werden. Bitte erneut versuchen."),
];

/// Extract the lowercased primary subtag: "zh_CN.UTF-8" -> "zh"
fn primary_subtag(locale: &str) -> String {
    locale
        .trim()
        .split(['-', '_', '.', '@'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

fn lookup(table: &'static [(&'static str, &'static str)], locale: &str) -> Option<&'static str> {
    let code = primary_subtag(locale);
    table
        .iter()
        .find(|(prefix, _)| *prefix == code)
        .map(|(_, value)| *value)
}

/// Resolve a device locale code to the language name used in the prompt.
///
/// Unknown or empty codes resolve to [`FALLBACK_LANGUAGE`].
pub fn resolve(locale: &str) -> &'static str {
    lookup(LANGUAGES, locale).unwrap_or(FALLBACK_LANGUAGE)
}

/// Whether the locale maps to a known language
pub fn is_known(locale: &str) -> bool {
    lookup(LANGUAGES, locale).is_some()
}

/// The single user-facing failure message for a locale
pub fn fallback_message(locale: &str) -> &'static str {
    lookup(FALLBACK_MESSAGES, locale).unwrap_or(FALLBACK_MESSAGES[0].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_known_code_to_non_empty_name() {
        for (code, name) in LANGUAGES {
            assert_eq!(resolve(code), *name);
            assert!(!resolve(code).is_empty());
        }
    }

    #[test]
    fn unknown_code_falls_back_to_english() {
        assert_eq!(resolve("xx"), "English");
        assert_eq!(resolve("klingon"), "English");
        assert_eq!(resolve(""), "English");
        assert_eq!(resolve("   "), "English");
    }

    #[test]
    fn region_and_encoding_are_ignored() {
        assert_eq!(resolve("zh-Hans"), "Chinese");
        assert_eq!(resolve("zh_CN.UTF-8"), "Chinese");
        assert_eq!(resolve("pt-BR"), "Portuguese");
        assert_eq!(resolve("de_DE@euro"), "German");
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(resolve("JA"), "Japanese");
        assert_eq!(resolve("Fr-CA"), "French");
    }

    #[test]
    fn legacy_and_variant_codes() {
        assert_eq!(resolve("iw"), "Hebrew");
        assert_eq!(resolve("nb-NO"), "Norwegian");
    }

    #[test]
    fn is_known_matches_table() {
        assert!(is_known("ko-KR"));
        assert!(!is_known("tlh"));
    }

    #[test]
    fn fallback_message_localized() {
        assert!(fallback_message("zh-CN").contains("抱歉"));
        assert!(fallback_message("en_US").contains("Sorry"));
    }

    #[test]
    fn fallback_message_defaults_to_english() {
        assert_eq!(fallback_message("fi"), fallback_message("en"));
    }
}
