use crate::head::{HeadFragment, HtmlAttributes, RenderBodyHost};

/// HTML-escape a string for text content and attribute values
///
/// Escapes: & < > " '
pub fn html_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Per-page values for the document `<head>`
#[derive(Debug, Clone)]
pub struct PageHead {
    pub title: String,
    pub description: Option<String>,
}

/// Document shell for one page. Collects what the render-body hook sets,
/// then wraps a rendered body.
#[derive(Debug, Default)]
pub struct Document {
    attributes: HtmlAttributes,
    head: Vec<HeadFragment>,
}

impl RenderBodyHost for Document {
    fn set_html_attributes(&mut self, attributes: HtmlAttributes) {
        self.attributes.merge(attributes);
    }

    fn set_head_components(&mut self, components: Vec<HeadFragment>) {
        for component in &components {
            if self.head.iter().any(|existing| existing.key == component.key) {
                tracing::warn!(key = %component.key, "duplicate head fragment key");
            }
        }
        self.head.extend(components);
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attributes(&self) -> &HtmlAttributes {
        &self.attributes
    }

    pub fn head_components(&self) -> &[HeadFragment] {
        &self.head
    }

    /// Assemble the final HTML.
    ///
    /// `live_reload` appends the preview server's SSE reload script.
    pub fn render(&self, page: &PageHead, body: &str, live_reload: bool) -> String {
        let description = page
            .description
            .as_deref()
            .map(|d| {
                format!(
                    "\n    <meta name=\"description\" content=\"{}\">",
                    html_escape(d)
                )
            })
            .unwrap_or_default();

        let head_components: String = self
            .head
            .iter()
            .map(|fragment| format!("\n    {}", fragment.to_html()))
            .collect();

        let reload_script = if live_reload { LIVE_RELOAD_SCRIPT } else { "" };

        format!(
            r#"<!DOCTYPE html>
<html{}>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>{}{}
</head>
<body>
    <div id="___folio">{}</div>{}
</body>
</html>
"#,
            self.attributes.to_html(),
            html_escape(&page.title),
            description,
            head_components,
            body,
            reload_script,
        )
    }
}

const LIVE_RELOAD_SCRIPT: &str = r#"
    <script>
        // Hot reload via Server-Sent Events
        const eventSource = new EventSource('/_reload');
        eventSource.onmessage = () => {
            console.log('Reloading...');
            location.reload();
        };
        eventSource.onerror = () => {
            console.log('Preview server disconnected');
            eventSource.close();
        };
    </script>"#;
