use std::f64::consts::PI;

use honestreviews_common::{AnalysisReport, Category, Citation, SearchHistory, WordCloudEntry};

/// What the search form shows: the last input and any error from it.
#[derive(Default)]
pub struct SearchForm {
    pub product: String,
    pub category: Option<String>,
    pub error: Option<String>,
}

/// Render the search page with recent searches underneath.
pub fn render_search(history: &SearchHistory, form: &SearchForm) -> String {
    let banner = form
        .error
        .as_deref()
        .map(|e| format!(r#"<div class="error-banner">{}</div>"#, html_escape(e)))
        .unwrap_or_default();

    let content = format!(
        r#"<section class="hero">
<h2>Does Reddit actually recommend it?</h2>
<p class="muted">We read the threads so you don't have to.</p>
{form}
{banner}
</section>
{recent}"#,
        form = render_form(&form.product, form.category.as_deref()),
        recent = render_history(history),
    );

    build_page("Search", &content)
}

/// Render a finished analysis.
pub fn render_report(report: &AnalysisReport, history: &SearchHistory) -> String {
    let verdict = &report.analysis;
    let category = report
        .category
        .map(|c| format!(r#"<span class="badge">{}</span>"#, html_escape(c.label())))
        .unwrap_or_default();

    let content = format!(
        r#"{form}
<section class="result">
<div class="result-head">
    {gauge}
    <div>
        <h2>{product} {category}</h2>
        <p class="verdict-label">{label}</p>
        <p class="conclusion">{conclusion}</p>
    </div>
</div>
<div class="columns">
    <div class="card"><h3>Pros</h3>{pros}</div>
    <div class="card"><h3>Cons</h3>{cons}</div>
</div>
<h3>What people talk about</h3>
{cloud}
<h3>Sources</h3>
<div class="sources">{sources}</div>
</section>
{recent}"#,
        form = render_form(&report.product, report.category.map(|c| c.label())),
        gauge = render_gauge(verdict.sentiment_score),
        product = html_escape(&report.product),
        label = verdict_label(verdict.sentiment_score),
        conclusion = html_escape(&verdict.conclusion),
        pros = render_list(&verdict.pros),
        cons = render_list(&verdict.cons),
        cloud = render_word_cloud(&verdict.word_cloud),
        sources = render_sources(&report.sources),
        recent = render_history(history),
    );

    build_page(&report.product, &content)
}

fn render_form(product: &str, selected: Option<&str>) -> String {
    let mut options = String::from(r#"<option value="">Any category</option>"#);
    for category in Category::ALL {
        let label = category.label();
        let is_selected = selected.is_some_and(|s| s.eq_ignore_ascii_case(label));
        options.push_str(&format!(
            r#"<option value="{v}"{sel}>{v}</option>"#,
            v = html_escape(label),
            sel = if is_selected { " selected" } else { "" },
        ));
    }

    format!(
        r#"<form class="search" method="get" action="/analyze">
<input type="text" name="product" placeholder="e.g. Sony WH-1000XM5" value="{product}" required>
<select name="category">{options}</select>
<button type="submit">Analyze</button>
</form>"#,
        product = html_escape(product),
    )
}

fn render_history(history: &SearchHistory) -> String {
    if history.is_empty() {
        return String::new();
    }
    let mut links = String::new();
    for item in history.items() {
        let mut href = format!("/analyze?product={}", encode(&item.product));
        if let Some(category) = item.category {
            href.push_str(&format!("&category={}", encode(category.label())));
        }
        links.push_str(&format!(
            r#"<a class="chip" href="{}">{}</a>"#,
            html_escape(&href),
            html_escape(&item.product),
        ));
    }
    format!(r#"<section class="recent"><h4>Recent searches</h4>{links}</section>"#)
}

/// Circular gauge, filled clockwise from the top in proportion to the score.
fn render_gauge(score: u8) -> String {
    let radius = 70.0;
    let circumference = 2.0 * PI * radius;
    let offset = circumference - (f64::from(score) / 100.0) * circumference;
    let color = match score {
        71..=100 => "#1c1c1c",
        41..=70 => "#86868b",
        _ => "#555555",
    };

    format!(
        r#"<div class="gauge">
<svg width="176" height="176" viewBox="0 0 176 176" style="transform:rotate(-90deg)">
<circle cx="88" cy="88" r="{radius}" stroke="rgba(0,0,0,0.05)" stroke-width="8" fill="transparent"/>
<circle cx="88" cy="88" r="{radius}" stroke="{color}" stroke-width="8" fill="transparent" stroke-linecap="round" stroke-dasharray="{circumference:.2}" stroke-dashoffset="{offset:.2}"/>
</svg>
<div class="gauge-value"><span>{score}</span><small>Truth Index</small></div>
</div>"#
    )
}

fn verdict_label(score: u8) -> &'static str {
    match score {
        90..=100 => "Must buy",
        70..=89 => "Recommended, with minor caveats",
        50..=69 => "Mixed, depends on your needs",
        30..=49 => "Proceed with caution",
        _ => "Avoid",
    }
}

fn render_list(items: &[String]) -> String {
    let lis: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", html_escape(item)))
        .collect();
    format!("<ul>{lis}</ul>")
}

fn render_word_cloud(words: &[WordCloudEntry]) -> String {
    if words.is_empty() {
        return r#"<p class="muted">No recurring patterns found yet.</p>"#.to_string();
    }
    let spans: String = words
        .iter()
        .take(20)
        .map(|w| {
            let size = (f64::from(w.value) / 2.0).clamp(14.0, 48.0);
            let opacity = (f64::from(w.value) / 100.0).max(0.4);
            format!(
                r#"<span style="font-size:{size:.0}px;opacity:{opacity:.2}">{}</span>"#,
                html_escape(&w.text)
            )
        })
        .collect();
    format!(r#"<div class="cloud">{spans}</div>"#)
}

fn render_sources(sources: &[Citation]) -> String {
    sources
        .iter()
        .map(|s| {
            format!(
                r#"<a class="source-card" href="{url}" target="_blank" rel="noopener noreferrer">
<span class="sub">r/{sub}</span>
<span class="title">{title}</span>
<span class="score">&#9650; {score}</span>
</a>"#,
                url = html_escape(&s.url),
                sub = html_escape(&s.subreddit),
                title = html_escape(&s.title),
                score = s.score,
            )
        })
        .collect()
}

fn build_page(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | HonestReviews</title>
<style>
*{{margin:0;padding:0;box-sizing:border-box;}}
body{{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;color:#1c1c1c;background:#f5f5f7;}}
.header{{background:#1c1c1c;color:#fff;padding:12px 24px;}}
.header a{{color:#fff;text-decoration:none;font-size:18px;font-weight:700;}}
.container{{max-width:960px;margin:0 auto;padding:24px;}}
.hero{{text-align:center;padding:40px 0 24px;}}
.hero h2{{font-size:32px;margin-bottom:8px;}}
.muted{{color:#86868b;font-size:14px;}}
.search{{display:flex;gap:8px;justify-content:center;margin:24px 0;flex-wrap:wrap;}}
.search input{{flex:1;min-width:240px;padding:10px 14px;border:1px solid #d2d2d7;border-radius:8px;font-size:15px;}}
.search select{{padding:10px;border:1px solid #d2d2d7;border-radius:8px;background:#fff;}}
.search button{{padding:10px 20px;background:#1c1c1c;color:#fff;border:none;border-radius:8px;font-weight:600;cursor:pointer;}}
.error-banner{{background:#fff1f0;border:1px solid #ffccc7;color:#a8071a;padding:10px 14px;border-radius:8px;font-size:14px;max-width:640px;margin:0 auto;}}
.recent{{margin-top:24px;text-align:center;}}
.recent h4{{font-size:12px;text-transform:uppercase;letter-spacing:.1em;color:#86868b;margin-bottom:8px;}}
.chip{{display:inline-block;padding:4px 12px;margin:4px;border-radius:16px;background:#fff;border:1px solid #d2d2d7;color:#1c1c1c;text-decoration:none;font-size:13px;}}
.result-head{{display:flex;gap:24px;align-items:center;margin-bottom:24px;flex-wrap:wrap;}}
.gauge{{position:relative;width:176px;height:176px;}}
.gauge-value{{position:absolute;inset:0;display:flex;flex-direction:column;align-items:center;justify-content:center;}}
.gauge-value span{{font-size:44px;font-weight:900;}}
.gauge-value small{{font-size:10px;text-transform:uppercase;letter-spacing:.2em;color:#86868b;}}
.badge{{display:inline-block;padding:2px 8px;border-radius:12px;font-size:11px;font-weight:600;background:#e8e8ed;vertical-align:middle;}}
.verdict-label{{font-weight:700;margin:6px 0;}}
.conclusion{{color:#333;max-width:560px;}}
.columns{{display:grid;grid-template-columns:1fr 1fr;gap:16px;margin-bottom:24px;}}
.card{{background:#fff;border:1px solid #e0e0e0;border-radius:12px;padding:16px;}}
.card ul{{padding-left:18px;font-size:14px;}}
.card li{{margin-bottom:6px;}}
h3{{font-size:16px;margin:16px 0 8px;}}
.cloud{{background:#fff;border:1px solid #e0e0e0;border-radius:12px;padding:24px;display:flex;flex-wrap:wrap;gap:16px;justify-content:center;align-items:center;}}
.sources{{display:grid;grid-template-columns:repeat(auto-fill,minmax(260px,1fr));gap:12px;}}
.source-card{{display:flex;flex-direction:column;gap:4px;background:#fff;border:1px solid #e0e0e0;border-radius:12px;padding:12px;color:#1c1c1c;text-decoration:none;}}
.source-card:hover{{border-color:#86868b;}}
.source-card .sub{{font-size:12px;font-weight:600;color:#86868b;}}
.source-card .score{{font-size:12px;color:#86868b;}}
</style>
</head>
<body>
<div class="header"><a href="/">HonestReviews</a></div>
<div class="container">
{content}
</div>
</body>
</html>"#,
        title = html_escape(title),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use honestreviews_common::{Verdict, WordCloudEntry};

    fn report() -> AnalysisReport {
        AnalysisReport {
            product: "<script>alert(1)</script>".to_string(),
            category: Some(Category::Outdoors),
            analysis: Verdict {
                conclusion: "Solid tent for the money.".to_string(),
                pros: vec!["Light".to_string()],
                cons: vec!["Fly leaks".to_string()],
                sentiment_score: 64,
                word_cloud: vec![WordCloudEntry {
                    text: "weight".to_string(),
                    value: 80,
                }],
            },
            sources: vec![Citation {
                title: "Tent thoughts".to_string(),
                url: "https://reddit.com/r/Ultralight/comments/x/".to_string(),
                subreddit: "Ultralight".to_string(),
                score: 57,
            }],
        }
    }

    #[test]
    fn report_escapes_user_text() {
        let html = render_report(&report(), &SearchHistory::new());
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Mixed, depends on your needs"));
        assert!(html.contains("r/Ultralight"));
    }

    #[test]
    fn gauge_offset_tracks_score() {
        let full = render_gauge(100);
        assert!(full.contains(r#"stroke-dashoffset="0.00""#));
        let empty = render_gauge(0);
        assert!(empty.contains(r#"stroke-dashoffset="439.82""#));
    }

    #[test]
    fn verdict_bands() {
        assert_eq!(verdict_label(95), "Must buy");
        assert_eq!(verdict_label(70), "Recommended, with minor caveats");
        assert_eq!(verdict_label(29), "Avoid");
    }

    #[test]
    fn word_cloud_sizes_are_clamped() {
        let words = vec![
            WordCloudEntry { text: "tiny".into(), value: 1 },
            WordCloudEntry { text: "huge".into(), value: 100 },
        ];
        let html = render_word_cloud(&words);
        assert!(html.contains("font-size:14px;opacity:0.40"));
        assert!(html.contains("font-size:48px;opacity:1.00"));
    }

    #[test]
    fn history_links_are_encoded() {
        let mut history = SearchHistory::new();
        history.record("AirPods Pro 2", Some(Category::Technology));
        let html = render_history(&history);
        assert!(html.contains("/analyze?product=AirPods+Pro+2&amp;category=Technology+%26+Electronics"));
    }

    #[test]
    fn selected_category_is_preserved() {
        let html = render_form("Kindle", Some("technology & electronics"));
        assert!(html.contains(r#"<option value="Technology &amp; Electronics" selected>"#));
    }
}
