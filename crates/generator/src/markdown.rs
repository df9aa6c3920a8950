use pulldown_cmark::{Options, Parser, html};

/// Render a post body to HTML.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(source, options);
    let mut output = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}
