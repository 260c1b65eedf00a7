//! Conversion of model markdown into sanitized display markup.
//!
//! The model's output is untrusted. Raw HTML in the markdown is rendered as
//! literal text, and the resulting markup goes through an allow-list sanitizer
//! before it leaves this module.

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;

/// Sanitized markup for one generated recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRecipe {
    /// Sanitized HTML fragment.
    pub html: String,
    /// Text of the first heading, if the model produced one.
    pub title: Option<String>,
}

impl RenderedRecipe {
    pub fn into_html(self) -> String {
        self.html
    }
}

/// Render markdown into sanitized HTML.
///
/// Never fails: markdown that does not parse as structure comes out as
/// paragraphs of literal text.
pub fn format_recipe(markdown: &str) -> RenderedRecipe {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut title: Option<String> = None;
    let mut in_first_heading = false;

    let events = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut events_out = Vec::new();
    for event in events {
        match &event {
            Event::Start(Tag::Heading { .. }) if title.is_none() => {
                in_first_heading = true;
                title = Some(String::new());
            }
            Event::End(TagEnd::Heading(_)) => in_first_heading = false,
            Event::Text(text) | Event::Code(text) if in_first_heading => {
                if let Some(t) = title.as_mut() {
                    t.push_str(text);
                }
            }
            _ => {}
        }
        events_out.push(event);
    }

    let mut unsafe_html = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut unsafe_html, events_out.into_iter());

    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    RenderedRecipe {
        html: sanitize(&unsafe_html),
        title,
    }
}

fn sanitize(html: &str) -> String {
    ammonia::Builder::default()
        .add_tag_attributes("ol", &["start"])
        .clean(html)
        .to_string()
}
