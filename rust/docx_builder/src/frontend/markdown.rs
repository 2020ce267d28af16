use pulldown_cmark::{html, Options, Parser};

/// Render Markdown to HTML with GFM tables, ready for [`super::html::parse_html`].
pub fn markdown_to_html(md: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(md, opts);
    let mut out = String::with_capacity(md.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_tables_and_nested_lists() {
        let out = markdown_to_html("| a | b |\n|---|---|\n| 1 | 2 |\n\n- x\n  1. y\n");
        assert!(out.contains("<th>a</th>"));
        assert!(out.contains("<td>2</td>"));
        assert!(out.contains("<ul>"));
        assert!(out.contains("<ol>"));
    }
}
