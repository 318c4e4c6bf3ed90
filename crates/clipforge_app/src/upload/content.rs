//! Post content mapping across platforms.
//!
//! Platforms take one caption field with wildly different limits; the
//! shared title/description/tags are combined and truncated with a fixed
//! priority: title first, then tags as hashtags, then description.

/// Shared post content for all upload targets.
#[derive(Debug, Clone, Default)]
pub struct PostContent {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

impl PostContent {
    /// Create post content.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tags,
        }
    }

    /// Render tags as a hashtag line.
    pub fn hashtags(&self) -> String {
        self.tags
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| format!("#{}", t.trim().trim_start_matches('#').replace(' ', "")))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Combined caption within a platform's character limit.
    ///
    /// Priority: title > tags > description. The title is always kept
    /// (hard-truncated if it alone exceeds the limit); hashtags are added
    /// when they fit; the description fills remaining space, truncated
    /// with an ellipsis when meaningful space remains.
    pub fn caption_for(&self, max_chars: usize) -> String {
        let title = self.title.trim();
        if title.chars().count() >= max_chars {
            return title.chars().take(max_chars).collect();
        }

        let hashtags = self.hashtags();
        let title_tags = if hashtags.is_empty() {
            title.to_string()
        } else {
            format!("{}\n\n{}", title, hashtags)
        };
        if title_tags.chars().count() > max_chars {
            return title.to_string();
        }

        let description = self.description.trim();
        if description.is_empty() {
            return title_tags;
        }

        let full = if hashtags.is_empty() {
            format!("{}\n\n{}", title, description)
        } else {
            format!("{}\n\n{}\n\n{}", title, description, hashtags)
        };
        if full.chars().count() <= max_chars {
            return full;
        }

        // Truncate the description to fit, keeping title and tags whole.
        let available = max_chars.saturating_sub(title_tags.chars().count() + 4);
        if available > 10 {
            let truncated: String = description.chars().take(available - 3).collect();
            if hashtags.is_empty() {
                format!("{}\n\n{}...", title, truncated.trim_end())
            } else {
                format!("{}\n\n{}...\n\n{}", title, truncated.trim_end(), hashtags)
            }
        } else {
            title_tags
        }
    }
}
