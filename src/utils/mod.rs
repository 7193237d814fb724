//! Small HTML helpers shared by the module views.

/// Escape text for use inside HTML element content and quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Wrap a page body in the shared site layout.
pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Booklist</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 720px; margin: 40px auto; padding: 0 20px; }}
        nav a {{ margin-right: 12px; }}
        .muted {{ color: #666; }}
        li {{ margin: 4px 0; }}
    </style>
</head>
<body>
    <nav><a href="/">Home</a></nav>
    <h1>{title}</h1>
{body}
</body>
</html>"#,
        title = escape_html(title),
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn layout_escapes_title_but_not_body() {
        let page = layout("Q&A", "<p>body</p>");
        assert!(page.contains("<title>Q&amp;A - Booklist</title>"));
        assert!(page.contains("<p>body</p>"));
    }
}
