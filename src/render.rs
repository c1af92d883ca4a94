//! Static HTML generation from the site document.
//!
//! A pure function from [`SiteDocument`] to a complete HTML page, built with
//! [maud](https://maud.lambda.xyz/) so interpolated card titles and
//! descriptions are escaped automatically. The published page and the
//! preview differ only in which image tree they link into: `images` for the
//! published set, `tmp` for staging.

use crate::site::{Card, SiteDocument, Social};
use maud::{DOCTYPE, Markup, html};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Image root for the published page.
pub const PUBLISHED_ROOT: &str = "images";
/// Image root for previews.
pub const STAGING_ROOT: &str = "tmp";

/// URL escaping for image file names. Unreserved marks stay literal,
/// everything else (spaces included) is percent-encoded.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn encode(name: &str) -> String {
    utf8_percent_encode(name, COMPONENT).to_string()
}

/// Render the full page for `doc`, linking images under `image_root`.
pub fn render_site(doc: &SiteDocument, image_root: &str) -> String {
    page(doc, image_root).into_string()
}

fn page(doc: &SiteDocument, image_root: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                title { (doc.site_title) }
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1, user-scalable=no";
                link rel="stylesheet" href="assets/css/main.css";
                noscript {
                    link rel="stylesheet" href="assets/css/noscript.css";
                }
            }
            body class="is-preload" {
                div id="wrapper" {
                    header id="header" {
                        h1 {
                            a href="index.html" { strong { (doc.site_title) } }
                        }
                        nav {
                            ul {
                                li {
                                    a href="#footer" class="icon solid fa-info-circle" { "About" }
                                }
                            }
                        }
                    }
                    div id="main" {
                        @for card in &doc.cards {
                            (card_tile(card, image_root))
                        }
                    }
                    (footer_panel(doc))
                }
                script src="assets/js/jquery.min.js" {}
                script src="assets/js/jquery.poptrox.min.js" {}
                script src="assets/js/browser.min.js" {}
                script src="assets/js/breakpoints.min.js" {}
                script src="assets/js/util.js" {}
                script src="assets/js/main.js" {}
            }
        }
    }
}

fn card_tile(card: &Card, image_root: &str) -> Markup {
    html! {
        article class="thumb" {
            a href={ (image_root) "/fulls/" (encode(&card.image_name)) } class="image" {
                img src={ (image_root) "/thumbs/" (encode(&card.thumbnail_name)) } alt="";
            }
            h2 { (card.title) }
            p { (card.description) }
        }
    }
}

fn footer_panel(doc: &SiteDocument) -> Markup {
    html! {
        footer id="footer" class="panel" {
            div class="inner split" {
                div {
                    section {
                        h2 { (doc.about_title) }
                        p { (doc.about_text) }
                    }
                    section {
                        h2 { "Follow me on ..." }
                        ul class="icons" {
                            @for social in &doc.socials {
                                (social_icon(social))
                            }
                        }
                    }
                    p class="copyright" {
                        "Design: "
                        a href="http://html5up.net" { "HTML5 UP" }
                        "."
                    }
                }
            }
        }
    }
}

fn social_icon(social: &Social) -> Markup {
    html! {
        @if let Some(link) = &social.link {
            li {
                a href=(link) class={ "icon brands fa-" (social.name) } {
                    span class="label" { (capitalize(&social.name)) }
                }
            }
        }
    }
}

/// `github` → `Github`. Only the first letter changes.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc() -> SiteDocument {
        serde_json::from_str(
            r#"{
                "siteTitle": "Light & Shadow",
                "aboutTitle": "About me",
                "aboutText": "Photos from the road.",
                "cards": [
                    {
                        "imageName": "dawn over water.jpg",
                        "thumbnailName": "dawn thumb.jpg",
                        "title": "Dawn",
                        "description": "First light on the bay"
                    }
                ],
                "socials": [
                    {"name": "github", "link": "https://github.com/someone"},
                    {"name": "flickr", "link": null}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn cards_link_into_the_image_root() {
        let html = render_site(&sample_doc(), PUBLISHED_ROOT);
        assert!(html.contains("images/fulls/dawn%20over%20water.jpg"));
        assert!(html.contains("images/thumbs/dawn%20thumb.jpg"));
        assert!(html.contains("<h2>Dawn</h2>"));
        assert!(html.contains("First light on the bay"));
    }

    #[test]
    fn preview_uses_the_staging_root() {
        let html = render_site(&sample_doc(), STAGING_ROOT);
        assert!(html.contains("tmp/fulls/dawn%20over%20water.jpg"));
        assert!(!html.contains("images/fulls/"));
    }

    #[test]
    fn social_names_are_capitalized() {
        let html = render_site(&sample_doc(), PUBLISHED_ROOT);
        assert!(html.contains(r#"class="icon brands fa-github""#));
        assert!(html.contains(r#"<span class="label">Github</span>"#));
    }

    #[test]
    fn socials_without_a_link_are_skipped() {
        let html = render_site(&sample_doc(), PUBLISHED_ROOT);
        assert!(!html.contains("fa-flickr"));
    }

    #[test]
    fn titles_are_escaped() {
        let mut doc = sample_doc();
        doc.cards[0].title = "<script>alert(1)</script>".into();
        let html = render_site(&doc, PUBLISHED_ROOT);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn escape_set_matches_encode_uri_component() {
        assert_eq!(encode("a b.jpg"), "a%20b.jpg");
        assert_eq!(encode("snow_day-1.avif"), "snow_day-1.avif");
        assert_eq!(encode("50%.png"), "50%25.png");
    }
}
