//! Text normalization for catalog and client search.

/// Normalize a name or search term: lowercase, strip Spanish diacritics and
/// collapse runs of whitespace.
///
/// Names are stored normalized alongside the original so that a `LIKE`
/// lookup matches regardless of accents or casing.
pub fn normalize(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        let ch = match ch {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        };

        if ch.is_whitespace() {
            pending_space = !normalized.is_empty();
        } else {
            if pending_space {
                normalized.push(' ');
                pending_space = false;
            }
            normalized.push(ch);
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_accents() {
        assert_eq!(normalize("Tirante Saligna"), "tirante saligna");
        assert_eq!(normalize("CAÑO PVC"), "cano pvc");
        assert_eq!(normalize("Ñandubay cepillado"), "nandubay cepillado");
        assert_eq!(normalize("Mampostería"), "mamposteria");
    }

    #[test]
    fn collapses_and_trims_whitespace() {
        assert_eq!(normalize("  machimbre   de\tpino  "), "machimbre de pino");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }
}
