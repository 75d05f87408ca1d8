//! Markdown-ish prompt assembly

/// Accumulates prompt text piece by piece
///
/// ```
/// use crew_prompt::PromptBuilder;
///
/// let prompt = PromptBuilder::new()
///     .section("Task")
///     .text("Summarize the news.")
///     .when(true, "\nUse bullet points.")
///     .build_trimmed();
/// assert!(prompt.starts_with("## Task"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    buf: String,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, content: impl AsRef<str>) -> Self {
        self.buf.push_str(content.as_ref());
        self
    }

    pub fn newline(mut self) -> Self {
        self.buf.push('\n');
        self
    }

    /// `## title` on a line of its own, preceded by a blank line
    pub fn section(self, title: &str) -> Self {
        self.text(format!("\n## {title}\n"))
    }

    /// Append `content` only when `condition` holds
    pub fn when(self, condition: bool, content: impl AsRef<str>) -> Self {
        if condition { self.text(content) } else { self }
    }

    /// One `- item` line per item
    pub fn bullets<I>(self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        items
            .into_iter()
            .fold(self, |b, item| b.text(format!("- {}\n", item.as_ref())))
    }

    /// `1. item`, `2. item`, ...
    pub fn numbered_list<I>(self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        items
            .into_iter()
            .zip(1..)
            .fold(self, |b, (item, n)| b.text(format!("{n}. {}\n", item.as_ref())))
    }

    pub fn build(self) -> String {
        self.buf
    }

    pub fn build_trimmed(self) -> String {
        self.buf.trim().to_string()
    }
}
