//! Server-rendered HTML for the single ReverseAI page.

use reverseai_core::{Category, Reply};

/// Message shown when Decode is pressed with an empty text area.
pub(crate) const EMPTY_POST_MESSAGE: &str =
    "Please paste a LinkedIn post to analyze its unhinged energy!";

/// What to show under the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome<'a> {
    /// Fresh page or cleared result.
    Idle,
    /// Input was rejected before dispatch.
    Invalid(&'a str),
    /// Dispatcher output: model text or a failure string.
    Result(&'a Reply),
}

/// Everything needed to render the page.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PageView<'a> {
    pub(crate) category: Category,
    pub(crate) text: &'a str,
    pub(crate) outcome: Outcome<'a>,
}

impl Default for PageView<'_> {
    fn default() -> Self {
        Self {
            category: Category::default(),
            text: "",
            outcome: Outcome::Idle,
        }
    }
}

const STYLE: &str = r#"
body { margin: 0; background-color: #000000; color: #f1f3f5; font-family: -apple-system, "Segoe UI", Roboto, sans-serif; }
.container { max-width: 1100px; margin: 0 auto; padding: 24px; }
.main-header { text-align: center; padding: 20px; background: linear-gradient(135deg, #4158D0, #C850C0); color: white; border-radius: 10px; margin-bottom: 30px; }
.columns { display: flex; gap: 24px; flex-wrap: wrap; }
.col-main { flex: 3; min-width: 300px; }
.col-side { flex: 1; min-width: 200px; }
label { display: block; font-weight: 600; margin: 12px 0 6px; }
select, textarea { width: 100%; box-sizing: border-box; padding: 10px; border-radius: 6px; border: 1px solid #444; background: #111; color: #f1f3f5; font-size: 1em; }
textarea { height: 200px; resize: vertical; }
.info-card { background: linear-gradient(135deg, #4158D0, #C850C0); padding: 20px; border-radius: 10px; box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1); margin: 20px 0; }
.cta-button { background: #4158D0; color: white; padding: 10px 20px; border: none; border-radius: 5px; margin: 16px 0; font-size: 1em; cursor: pointer; }
.secondary-button { background: transparent; color: #f1f3f5; padding: 8px 16px; border: 1px solid #666; border-radius: 5px; cursor: pointer; }
.validation { background: #5c1a1a; border-left: 5px solid #ff4b4b; padding: 12px 16px; border-radius: 6px; }
.busy { color: #C850C0; font-style: italic; margin: 8px 0; }
.result-box { background: linear-gradient(135deg, #4158D0, #C850C0); padding: 20px; border-radius: 10px; margin-top: 20px; margin-bottom: 20px; border-left: 5px solid #4158D0; box-shadow: 0 2px 4px rgba(0, 0, 0, 0.05); white-space: pre-wrap; }
.result-box.error { background: #5c1a1a; border-left-color: #ff4b4b; }
.footer { text-align: center; color: #666; padding: 20px; margin-top: 20px; }
.credit { color: gray; font-size: 0.8em; }
"#;

const SCRIPT: &str = r#"
document.getElementById('decode-form').addEventListener('submit', function (e) {
  if (e.submitter && e.submitter.value === 'decode') {
    document.getElementById('busy').hidden = false;
  }
});
"#;

/// Escape text for insertion into HTML element content or attribute values.
pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn category_options(selected: Category) -> String {
    Category::ALL
        .iter()
        .map(|c| {
            let label = escape_html(c.label());
            let sel = if *c == selected { " selected" } else { "" };
            format!(r#"<option value="{label}"{sel}>{label}</option>"#)
        })
        .collect::<Vec<_>>()
        .join("\n            ")
}

fn outcome_section(outcome: Outcome<'_>) -> String {
    match outcome {
        Outcome::Idle => String::new(),
        Outcome::Invalid(message) => format!(
            r#"<div class="validation" role="alert">{}</div>"#,
            escape_html(message)
        ),
        Outcome::Result(reply) => {
            let class = if reply.is_failure() {
                "result-box error"
            } else {
                "result-box"
            };
            format!(
                r#"<section id="result">
      <hr>
      <h2>Prompt Behind the Post</h2>
      <div class="{class}">{body}</div>
      <button type="submit" form="decode-form" name="action" value="clear" class="secondary-button">Clear Result</button>
    </section>"#,
                class = class,
                body = escape_html(reply.text()),
            )
        }
    }
}

/// Render the full page.
pub(crate) fn render_page(view: &PageView<'_>) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>ReverseAI - Decode LinkedIn's Wildest Posts</title>
  <link rel="icon" href="data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%22.9em%22 font-size=%2290%22>🔄</text></svg>">
  <style>{style}</style>
</head>
<body>
  <div class="container">
    <div class="main-header"><h1>🔄 ReverseAI</h1><p>Decode Those Unhinged LinkedIn Posts</p></div>
    <div class="columns">
      <div class="col-main">
        <form id="decode-form" method="post" action="/decode">
          <label for="category">LinkedIn Post Category</label>
          <select id="category" name="category" title="Select the type of LinkedIn content you're analyzing">
            {options}
          </select>
          <label for="text">Paste the unhinged LinkedIn post</label>
          <textarea id="text" name="text" placeholder="Paste that wild LinkedIn post here...">
{text}</textarea>
          <button type="submit" name="action" value="decode" class="cta-button">🔄 Decode</button>
          <div id="busy" class="busy" hidden>Analyzing unhinged energy...</div>
        </form>
      </div>
      <div class="col-side">
        <div class="info-card">
          <h3>About</h3>
          <p>Ever scrolled LinkedIn and wondered "who writes this stuff?"</p>
          <p>Now you can find out exactly what prompt would create those unhinged LinkedIn posts flooding your feed.</p>
        </div>
      </div>
    </div>
    {outcome}
    <p class="credit">Made with ❤️ by <a href="https://github.com/Shaheer04" target="_blank">Shaheer Jamal</a></p>
    <div class="footer">ReverseAI | Decoding LinkedIn's Most Unhinged Content Since ChatGPT</div>
  </div>
  <script>{script}</script>
</body>
</html>
"#,
        style = STYLE,
        options = category_options(view.category),
        text = escape_html(view.text),
        outcome = outcome_section(view.outcome),
        script = SCRIPT,
    )
}
