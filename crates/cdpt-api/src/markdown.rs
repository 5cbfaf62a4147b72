use pulldown_cmark::{html, Options, Parser};

/// Render markdown to HTML.
///
/// CommonMark plus the GitHub extensions chat output relies on (tables,
/// strikethrough, task lists). Raw HTML in the input is passed through.
pub fn render(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_paragraph() {
        let html = render("# Title\n\nBody");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<p>Body</p>"));
    }

    #[test]
    fn test_lists_emphasis_links() {
        let html = render("- *one*\n- **two**\n\n[site](https://example.com)");
        assert!(html.contains("<ul>"));
        assert!(html.contains("<em>one</em>"));
        assert!(html.contains("<strong>two</strong>"));
        assert!(html.contains(r#"<a href="https://example.com">site</a>"#));
    }

    #[test]
    fn test_fenced_code_block() {
        let html = render("```rust\nfn main() {}\n```");
        assert!(html.contains(r#"<pre><code class="language-rust">fn main() {}"#));
    }

    #[test]
    fn test_gfm_extensions() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_deterministic() {
        let input = "## Repeat\n\n> quoted `code`";
        assert_eq!(render(input), render(input));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
    }
}
