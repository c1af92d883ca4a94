//! The site-configuration document.
//!
//! The editor frontend posts this JSON wholesale on every save; it is never
//! merged. Field names stay camelCase on the wire. The persisted file keeps
//! the raw posted bytes, so fields the renderer does not know about survive
//! a round-trip — these types only describe what rendering needs.

use serde::{Deserialize, Serialize};

/// Root document driving HTML generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDocument {
    pub site_title: String,
    pub about_title: String,
    pub about_text: String,
    pub cards: Vec<Card>,
    pub socials: Vec<Social>,
}

/// One portfolio tile: a full-resolution image and its thumbnail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// File name under `<root>/fulls/`, exactly as uploaded.
    pub image_name: String,
    /// File name under `<root>/thumbs/`.
    pub thumbnail_name: String,
    pub title: String,
    pub description: String,
}

/// Footer social-media entry. `name` doubles as the Font Awesome brand slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Social {
    pub name: String,
    /// Entries with a `null` link stay in the document but are not rendered.
    pub link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_document() {
        let doc: SiteDocument = serde_json::from_str(
            r#"{
                "siteTitle": "Portfolio",
                "aboutTitle": "About",
                "aboutText": "Hi.",
                "cards": [{
                    "imageName": "dawn.jpg",
                    "thumbnailName": "dawn-thumb.jpg",
                    "title": "Dawn",
                    "description": "First light"
                }],
                "socials": [
                    {"name": "github", "link": "https://github.com/someone"},
                    {"name": "flickr", "link": null}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(doc.site_title, "Portfolio");
        assert_eq!(doc.cards[0].image_name, "dawn.jpg");
        assert_eq!(doc.socials[1].link, None);
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let doc: SiteDocument = serde_json::from_str(
            r##"{
                "siteTitle": "t", "aboutTitle": "a", "aboutText": "x",
                "cards": [], "socials": [], "themeColor": "#fff"
            }"##,
        )
        .unwrap();
        assert!(doc.cards.is_empty());
    }
}
