//! Prompt construction for tagging requests.

use crate::types::AnalysisRequest;

/// Build the tagging prompt for a post.
///
/// Deterministic: the same request always produces the same text. The URL is
/// assumed non-empty; callers filter out posts without one.
pub fn build_prompt(request: &AnalysisRequest) -> String {
    let caption = request
        .caption
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or("(no caption)");

    format!(
        "You are tagging a saved social media post so it can be organized later.\n\n\
         Post URL: {url}\n\
         Caption: {caption}\n\n\
         Return ONLY a JSON object, with no markdown and no explanation, in this exact shape:\n\
         {{\"tags\": [\"...\"], \"suggestedCollection\": \"...\", \"mood\": \"...\", \"confidence\": 0.0}}\n\n\
         Rules:\n\
         - \"tags\": 4 to 6 lowercase, hyphenated tags (e.g. \"home-cooking\"). Cover the \
         content type, aesthetic, subject, and use case.\n\
         - \"suggestedCollection\": a short collection name this post belongs in.\n\
         - \"mood\": one word describing the overall mood.\n\
         - \"confidence\": a number between 0 and 1.",
        url = request.url,
        caption = caption,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_url_and_caption() {
        let request = AnalysisRequest::new(
            "https://instagram.com/p/abc",
            Some("Sunday pasta night".to_string()),
        );
        let prompt = build_prompt(&request);
        assert!(prompt.contains("https://instagram.com/p/abc"));
        assert!(prompt.contains("Caption: Sunday pasta night"));
    }

    #[test]
    fn test_prompt_without_caption() {
        let request = AnalysisRequest::new("https://instagram.com/p/abc", None);
        let prompt = build_prompt(&request);
        assert!(prompt.contains("Caption: (no caption)"));
    }

    #[test]
    fn test_blank_caption_treated_as_missing() {
        let request = AnalysisRequest::new("https://x.com/1", Some("   ".to_string()));
        assert!(build_prompt(&request).contains("(no caption)"));
    }

    #[test]
    fn test_prompt_asks_for_json_fields() {
        let prompt = build_prompt(&AnalysisRequest::new("https://x.com/1", None));
        assert!(prompt.contains("ONLY a JSON object"));
        for field in ["\"tags\"", "\"suggestedCollection\"", "\"mood\"", "\"confidence\""] {
            assert!(prompt.contains(field), "missing {field}");
        }
        assert!(prompt.contains("4 to 6"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let request = AnalysisRequest::new("https://x.com/1", Some("hi".to_string()));
        assert_eq!(build_prompt(&request), build_prompt(&request));
    }
}
