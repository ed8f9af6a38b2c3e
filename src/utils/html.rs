/// Clean comment HTML with the ammonia whitelist.
///
/// Safe formatting tags (like <b>, <p>) are preserved; <script>, <iframe>
/// and event-handler attributes are stripped along with their content.
/// Comments are rendered into server-side views, so this runs before the
/// content ever reaches the store.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

/// Sanitizes and trims user content. `None` if nothing is left to show.
pub fn clean_content(input: &str) -> Option<String> {
    let cleaned = clean_html(input.trim());
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_tags_are_removed_with_their_body() {
        assert_eq!(clean_html("hi<script>alert(1)</script>"), "hi");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(clean_content("  nice post  ").as_deref(), Some("nice post"));
    }

    #[test]
    fn content_that_is_only_markup_is_empty() {
        assert_eq!(clean_content("<script>x</script>"), None);
        assert_eq!(clean_content("   "), None);
    }
}
