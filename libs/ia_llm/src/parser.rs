use serde::{Deserialize, Serialize};

use crate::{LlmError, Result};

pub const RAW_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPost {
    pub content: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

pub fn truncate_preview(raw: &str) -> String {
    raw.chars().take(RAW_PREVIEW_CHARS).collect()
}

/// Parses the post array a model was asked to return, ignoring any prose
/// around it. Blank posts are dropped and hashtags are de-duplicated in order.
pub fn parse_posts(raw: &str) -> Result<Vec<SocialPost>> {
    let parse_error = |reason: String| LlmError::Parse {
        reason,
        raw_preview: truncate_preview(raw),
    };

    let span = extract_json_array(raw)
        .ok_or_else(|| parse_error("no JSON array found in model output".to_string()))?;

    let posts: Vec<SocialPost> = serde_json::from_str(span)
        .map_err(|e| parse_error(format!("invalid post array: {}", e)))?;

    let posts: Vec<SocialPost> = posts
        .into_iter()
        .filter(|post| !post.content.trim().is_empty())
        .map(|post| SocialPost {
            content: post.content.trim().to_string(),
            hashtags: dedup_hashtags(post.hashtags),
        })
        .collect();

    if posts.is_empty() {
        return Err(parse_error("model returned no posts".to_string()));
    }

    Ok(posts)
}

fn dedup_hashtags(hashtags: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(hashtags.len());
    for tag in hashtags {
        let tag = tag.trim();
        if !tag.is_empty() && !unique.iter().any(|seen| seen == tag) {
            unique.push(tag.to_string());
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerates_prose_around_the_array() {
        let raw = "Here you go:\n[{\"content\":\"hi\",\"hashtags\":[\"#a\"]}]\nEnjoy!";

        let posts = parse_posts(raw).unwrap();

        assert_eq!(
            posts,
            vec![SocialPost {
                content: "hi".to_string(),
                hashtags: vec!["#a".to_string()],
            }]
        );
    }

    #[test]
    fn span_is_greedy_across_nested_arrays() {
        let raw = r##"```json
[
  {"content": "uno", "hashtags": ["#x", "#y"]},
  {"content": "dos", "hashtags": []}
]
```"##;

        let posts = parse_posts(raw).unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].hashtags, vec!["#x", "#y"]);
        assert_eq!(posts[1].content, "dos");
    }

    #[test]
    fn missing_hashtags_default_to_empty_and_duplicates_collapse() {
        let raw = r##"[{"content":"a"},{"content":"b","hashtags":["#v","#v"," #w "]}]"##;

        let posts = parse_posts(raw).unwrap();

        assert!(posts[0].hashtags.is_empty());
        assert_eq!(posts[1].hashtags, vec!["#v", "#w"]);
    }

    #[test]
    fn absent_array_is_a_parse_error_with_preview() {
        let raw = "Lo siento, no puedo generar eso.";

        let error = parse_posts(raw).unwrap_err();

        assert!(matches!(error, LlmError::Parse { .. }));
        assert_eq!(error.raw_preview(), Some(raw));
    }

    #[test]
    fn partial_json_is_a_parse_error() {
        let raw = r##"[{"content":"hola","hashtags":["#a"]}, {"content": "sin cerrar"]"##;

        assert!(matches!(parse_posts(raw), Err(LlmError::Parse { .. })));
    }

    #[test]
    fn reversed_brackets_are_not_an_array() {
        assert_eq!(extract_json_array("] nada ["), None);
        assert!(parse_posts("] nada [").is_err());
    }

    #[test]
    fn empty_or_blank_posts_are_rejected() {
        assert!(parse_posts("[]").is_err());
        assert!(parse_posts(r#"[{"content":"   ","hashtags":[]}]"#).is_err());
    }

    #[test]
    fn preview_is_bounded_by_characters() {
        let raw = "ñ".repeat(500);

        let error = parse_posts(&raw).unwrap_err();

        assert_eq!(error.raw_preview().unwrap().chars().count(), RAW_PREVIEW_CHARS);
    }
}
