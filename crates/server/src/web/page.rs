//! HTML rendering for the single-page UI.

use crate::recommender::Recommendation;

pub const FALLBACK_MESSAGE: &str = "No recommendations found. Try another movie.";

const STYLE: &str = "body{font-family:sans-serif;max-width:1100px;margin:2rem auto;padding:0 1rem}\
select{min-width:24rem;padding:.3rem}button{padding:.35rem 1rem;margin-left:.5rem}\
.results{display:flex;gap:1rem;margin-top:1.5rem}.card{flex:1;min-width:0}\
.card h3{font-size:1rem;min-height:2.5em}.card img{width:100%}";

/// What the page shows below the selector
pub enum Outcome<'a> {
    /// Nothing requested yet
    Idle,
    Results(&'a [Recommendation]),
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Render the full page: heading, title selector, and results if any.
pub fn render<'t>(
    titles: impl Iterator<Item = &'t str>,
    selected: Option<&str>,
    outcome: Outcome<'_>,
) -> String {
    let mut html = String::from("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    html.push_str("<title>Movie Recommender</title><style>");
    html.push_str(STYLE);
    html.push_str("</style></head><body><h1>🎬 Movie Recommender System</h1>");

    html.push_str("<form action=\"/recommend\" method=\"get\">");
    html.push_str("<label for=\"title\">Select a movie</label><br>");
    html.push_str("<select id=\"title\" name=\"title\">");
    let mut marked = false;
    for title in titles {
        let escaped = escape_html(title);
        // Duplicate titles: only the first copy is marked selected
        if !marked && selected == Some(title) {
            marked = true;
            html.push_str(&format!("<option value=\"{escaped}\" selected>{escaped}</option>"));
        } else {
            html.push_str(&format!("<option value=\"{escaped}\">{escaped}</option>"));
        }
    }
    html.push_str("</select><button type=\"submit\">Recommend</button></form>");

    match outcome {
        Outcome::Idle => {}
        Outcome::Results([]) => {
            html.push_str(&format!("<p class=\"fallback\">{}</p>", FALLBACK_MESSAGE));
        }
        Outcome::Results(recommendations) => {
            html.push_str("<div class=\"results\">");
            for rec in recommendations {
                let title = escape_html(&rec.title);
                html.push_str(&format!("<div class=\"card\"><h3>{title}</h3>"));
                if !rec.poster_url.is_empty() {
                    html.push_str(&format!(
                        "<img src=\"{}\" alt=\"{title}\">",
                        escape_html(&rec.poster_url)
                    ));
                }
                html.push_str("</div>");
            }
            html.push_str("</div>");
        }
    }

    html.push_str("</body></html>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(title: &str, poster_url: &str) -> Recommendation {
        Recommendation {
            row: 0,
            movie_id: "1".to_string(),
            title: title.to_string(),
            score: 0.3,
            poster_url: poster_url.to_string(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("Tom & Jerry <\"Live\">"),
            "Tom &amp; Jerry &lt;&quot;Live&quot;&gt;"
        );
    }

    #[test]
    fn test_idle_page_has_selector() {
        let html = render(["Inception", "Heat"].into_iter(), None, Outcome::Idle);
        assert!(html.contains("<option value=\"Inception\">Inception</option>"));
        assert!(html.contains("Recommend</button>"));
        assert!(!html.contains(FALLBACK_MESSAGE));
    }

    #[test]
    fn test_selected_title_is_marked() {
        let html = render(["Heat", "Heat"].into_iter(), Some("Heat"), Outcome::Idle);
        assert_eq!(html.matches(" selected>").count(), 1);
    }

    #[test]
    fn test_empty_results_show_fallback() {
        let html = render(std::iter::empty(), Some("x"), Outcome::Results(&[]));
        assert!(html.contains(FALLBACK_MESSAGE));
    }

    #[test]
    fn test_image_only_when_poster_known() {
        let recs = [rec("With Poster", "https://img/p.jpg"), rec("Without", "")];
        let html = render(std::iter::empty(), None, Outcome::Results(&recs));
        assert_eq!(html.matches("<div class=\"card\">").count(), 2);
        assert_eq!(html.matches("<img ").count(), 1);
        assert!(html.contains("<h3>Without</h3>"));
    }
}
