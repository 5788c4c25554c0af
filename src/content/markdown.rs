//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::config::HighlightConfig;
use crate::helpers::escape_html;

/// Theme used when the configured one is not bundled with syntect
const FALLBACK_THEME: &str = "InspiredGitHub";

/// Markdown renderer with syntax highlighting.
///
/// Holds only read-only syntax and theme data, so a single instance can be
/// shared across renders and threads.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Theme,
    copy_button: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(&HighlightConfig::default())
    }

    /// Create with highlight settings
    pub fn with_options(config: &HighlightConfig) -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = match theme_set.themes.remove(&config.theme) {
            Some(theme) => theme,
            None => {
                tracing::warn!(
                    "Unknown highlight theme '{}', using {}",
                    config.theme,
                    FALLBACK_THEME
                );
                theme_set
                    .themes
                    .remove(FALLBACK_THEME)
                    .unwrap_or_default()
            }
        };

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            copy_button: config.copy_button,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(String, String)> = None;
        let mut heading: Option<Vec<Event>> = None;
        let mut anchors = AnchorSet::default();

        for event in parser {
            if let Some((lang, code)) = code_block.as_mut() {
                match event {
                    Event::Text(text) => code.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        let highlighted = self.highlight_code(code, lang);
                        events.push(Event::Html(CowStr::from(highlighted)));
                        code_block = None;
                    }
                    _ => {}
                }
                continue;
            }

            if let Some(buffer) = heading.as_mut() {
                if matches!(event, Event::End(TagEnd::Heading(_))) {
                    buffer.push(event);
                    if let Some(buffer) = heading.take() {
                        events.extend(anchors.assign(buffer));
                    }
                } else {
                    buffer.push(event);
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref info))) => {
                    match language_tag(info) {
                        Some(lang) => code_block = Some((lang.to_string(), String::new())),
                        None => events.push(event),
                    }
                }
                Event::Start(Tag::Heading { .. }) => heading = Some(vec![event]),
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Highlight a fenced code block tagged with a language
    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let code = code.strip_suffix('\n').unwrap_or(code);
        let syntax = self.find_syntax(lang);

        let body = self.highlight_lines(code, syntax).unwrap_or_else(|| {
            tracing::warn!("Failed to highlight {} block, rendering plain", lang);
            escape_html(code)
        });

        let lang = escape_html(lang);
        let mut header = format!(r#"<b>{}</b>"#, lang);
        if self.copy_button {
            header.push_str(&format!(
                r#"<button class="copy-button" type="button" data-code="{}">Copy</button>"#,
                escape_html(code)
            ));
        }

        format!(
            r#"<div class="code-snippet"><div class="code-snippet-header">{}</div><pre class="highlight"{}><code class="language-{}">{}</code></pre></div>"#,
            header,
            self.background_style(),
            lang,
            body
        )
    }

    fn find_syntax(&self, lang: &str) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    fn highlight_lines(&self, code: &str, syntax: &SyntaxReference) -> Option<String> {
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut out = String::with_capacity(code.len() * 2);

        for line in LinesWithEndings::from(code) {
            let ranges = highlighter.highlight_line(line, &self.syntax_set).ok()?;
            let html = styled_line_to_highlighted_html(&ranges[..], IncludeBackground::No).ok()?;
            out.push_str(&html);
        }

        Some(out)
    }

    fn background_style(&self) -> String {
        match self.theme.settings.background {
            Some(c) => format!(
                r#" style="background-color:#{:02x}{:02x}{:02x};""#,
                c.r, c.g, c.b
            ),
            None => String::new(),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// First word of a fence info string, if any
fn language_tag(info: &str) -> Option<&str> {
    info.split_whitespace().next().filter(|lang| !lang.is_empty())
}

/// Heading anchors issued during one render
#[derive(Default)]
struct AnchorSet {
    seen: HashMap<String, usize>,
}

impl AnchorSet {
    /// Give a buffered heading an `id` unless the author set one
    fn assign<'a>(&mut self, mut buffer: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let text: String = buffer
            .iter()
            .filter_map(|e| match e {
                Event::Text(t) | Event::Code(t) => Some(&**t),
                _ => None,
            })
            .collect();

        if let Some(Event::Start(Tag::Heading { id, .. })) = buffer.first_mut() {
            if id.is_none() {
                *id = Some(CowStr::from(self.unique(&text)));
            }
        }
        buffer
    }

    fn unique(&mut self, text: &str) -> String {
        let mut base = slug::slugify(text);
        if base.is_empty() {
            base = "section".to_string();
        }
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{}-{}", base, *count - 1)
        }
    }
}
