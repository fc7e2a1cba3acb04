//! Filename and image URL helpers

/// Turn a subject name into a filesystem-safe stem
///
/// Whitespace becomes `-`, anything outside `[A-Za-z0-9-]` is dropped, and
/// runs of `-` collapse to one.
///
/// Examples:
/// - "Kamisato Ayato" -> "Kamisato-Ayato"
/// - "Kamisato Aya'to" -> "Kamisato-Ayato"
pub fn filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());

    for ch in name.chars() {
        let ch = if ch.is_whitespace() { '-' } else { ch };

        if ch == '-' {
            if !out.ends_with('-') {
                out.push('-');
            }
        } else if ch.is_ascii_alphanumeric() {
            out.push(ch);
        }
    }

    out
}

/// Replace the width segment of a scaled wiki image URL
///
/// `.../scale-to-width-down/74?cb=20221207034209` rescaled to 100 becomes
/// `.../scale-to-width-down/100?cb=20221207034209`.
pub fn rescale_image_url(scaled_url: &str, new_size: u32) -> String {
    let (path, query) = match scaled_url.rfind('?') {
        Some(i) => scaled_url.split_at(i),
        None => (scaled_url, ""),
    };

    let base = path.rfind('/').map(|i| &path[..i]).unwrap_or(path);
    format!("{base}/{new_size}{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename() {
        assert_eq!(filename("Kamisato Ayato"), "Kamisato-Ayato");
        assert_eq!(filename("Kamisato-------Ayato"), "Kamisato-Ayato");
        assert_eq!(filename("Kamisato  Ayato"), "Kamisato-Ayato");
        assert_eq!(filename("Kamisato Aya'to"), "Kamisato-Ayato");
        assert_eq!(filename("Kamisato01236Aya'to"), "Kamisato01236Ayato");
    }

    #[test]
    fn test_filename_specialization() {
        assert_eq!(filename("Traveler (Anemo)"), "Traveler-Anemo");
        assert_eq!(filename("Topaz & Numby"), "Topaz-Numby");
    }

    #[test]
    fn test_rescale_image_url() {
        let url = "https://static.wikia.nocookie.net/gensin-impact/images/a/a3/Icon.png/revision/latest/scale-to-width-down/74?cb=20221207034209";
        assert_eq!(
            rescale_image_url(url, 100),
            "https://static.wikia.nocookie.net/gensin-impact/images/a/a3/Icon.png/revision/latest/scale-to-width-down/100?cb=20221207034209"
        );
    }

    #[test]
    fn test_rescale_image_url_without_query() {
        assert_eq!(
            rescale_image_url("https://example.org/scale-to-width-down/74", 256),
            "https://example.org/scale-to-width-down/256"
        );
    }
}
