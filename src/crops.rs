//! Display helpers for crop labels.

/// Emoji shown for labels missing from [`CROP_EMOJI`].
pub const FALLBACK_EMOJI: &str = "🫘";

/// Known crop labels and their display emoji.
pub const CROP_EMOJI: [(&str, &str); 20] = [
    ("apple", "🍎"),
    ("banana", "🍌"),
    ("chickpea", "🧆"),
    ("coconut", "🥥"),
    ("coffee", "🍵"),
    ("cotton", "☁️"),
    ("grapes", "🍇"),
    ("jute", "🧵"),
    ("kidneybeans", "🫘"),
    ("lentil", "🥘"),
    ("maize", "🌽"),
    ("mango", "🥭"),
    ("mungbean", "🫛"),
    ("muskmelon", "🍈"),
    ("orange", "🍊"),
    ("papaya", "🏉"),
    ("pigeonpeas", "🫛"),
    ("pomegranate", "🌰🔴"),
    ("rice", "🌾"),
    ("watermelon", "🍉"),
];

pub fn crop_emoji(crop: &str) -> &'static str {
    CROP_EMOJI
        .iter()
        .find(|(name, _)| *name == crop)
        .map(|(_, emoji)| *emoji)
        .unwrap_or(FALLBACK_EMOJI)
}

/// Title-case a label: each run of letters starts upper-case, the rest lower-case.
pub fn display_name(crop: &str) -> String {
    let mut out = String::with_capacity(crop.len());
    let mut at_word_start = true;
    for ch in crop.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// `"<Name> <emoji>"`, as shown in result headings.
pub fn decorated_name(crop: &str) -> String {
    format!("{} {}", display_name(crop), crop_emoji(crop))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_crops() {
        assert_eq!(crop_emoji("rice"), "🌾");
        assert_eq!(crop_emoji("pomegranate"), "🌰🔴");
        assert_eq!(crop_emoji("quinoa"), FALLBACK_EMOJI);
        assert_eq!(crop_emoji("Rice"), FALLBACK_EMOJI);
    }

    #[test]
    fn title_cases_words() {
        assert_eq!(display_name("kidneybeans"), "Kidneybeans");
        assert_eq!(display_name("sweet potato"), "Sweet Potato");
        assert_eq!(display_name("MUNG-bean"), "Mung-Bean");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn decorated_name_joins_emoji() {
        assert_eq!(decorated_name("maize"), "Maize 🌽");
    }
}
