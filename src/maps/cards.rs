//! Map card view model and slideshow image list.
//!
//! Image URLs end up inside `style="background-image: url('...')"`. The
//! template layer HTML-escapes them; this module additionally rejects
//! non-http(s) schemes and percent-encodes the characters that would end a
//! CSS `url('...')` string, since HTML unescaping happens before CSS parsing.

use serde::Serialize;
use url::Url;

use crate::maps::catalog::MapDescriptor;

/// Dark rectangle shown when no map in the listing has an image.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml,<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"1620\" height=\"1024\"><rect fill=\"%231b2a41\" width=\"100%\" height=\"100%\"/></svg>";

pub const NO_DESCRIPTION: &str = "No description available";

const PLAY_BASE_URL: &str = "https://play.workadventu.re/_";
const INSTANCE_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const INSTANCE_ID_LEN: usize = 11;

/// One rendered map card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapCard {
    pub map_image_url: String,
    pub map_name: String,
    pub map_description: String,
    pub path: String,
    pub filename: String,
    pub last_modified_formatted: String,
    pub size: String,
    pub play_url: Option<String>,
}

/// Cards plus the images cycled by the background slideshow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDeck {
    pub background_images: Vec<String>,
    pub cards: Vec<MapCard>,
}

impl CardDeck {
    /// Fill every card's play link for maps served from `host` under `base_path`.
    pub fn with_play_urls(mut self, host: &str, base_path: &str) -> Self {
        for card in &mut self.cards {
            card.play_url = Some(play_url(host, base_path, &card.path));
        }
        self
    }
}

/// Normalize a listing image reference for use as a CSS background.
///
/// Absolute http(s) URLs are kept, bare paths become root-relative, other
/// schemes (`javascript:`, `data:`, ...) and blanks are dropped.
pub fn image_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let normalized = match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => raw.to_string(),
        Ok(_) => return None,
        // Leading slashes collapsed so the result cannot become protocol-relative.
        Err(_) => format!("/{}", raw.trim_start_matches(['/', '\\'])),
    };
    Some(css_url_safe(&normalized))
}

/// Percent-encode characters that terminate or escape a CSS url string.
pub fn css_url_safe(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '\'' => out.push_str("%27"),
            '"' => out.push_str("%22"),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            '\\' => out.push_str("%5C"),
            c if c.is_whitespace() || c.is_control() => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{b:02X}"));
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// Build the card deck from a listing.
///
/// Cards without their own image borrow the first map image, else the
/// placeholder. `fallback_images` feeds the slideshow only when no map has
/// an image.
pub fn build_cards(maps: &[MapDescriptor], fallback_images: &[String]) -> CardDeck {
    let map_images: Vec<String> = maps.iter().filter_map(map_image_url).collect();

    let default_image = map_images
        .first()
        .cloned()
        .unwrap_or_else(|| css_url_safe(PLACEHOLDER_IMAGE));

    let cards = maps
        .iter()
        .map(|m| MapCard {
            map_image_url: map_image_url(m).unwrap_or_else(|| default_image.clone()),
            map_name: m.map_name.clone().unwrap_or_default(),
            map_description: m
                .map_description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            path: m.path.clone(),
            filename: m.filename.clone().unwrap_or_default(),
            last_modified_formatted: m.last_modified_formatted.clone().unwrap_or_default(),
            size: m.size.as_ref().map(display_size).unwrap_or_default(),
            play_url: None,
        })
        .collect();

    let background_images = if map_images.is_empty() {
        fallback_images.iter().filter_map(|i| image_url(i)).collect()
    } else {
        map_images
    };

    CardDeck {
        background_images,
        cards,
    }
}

/// Whether the slideshow has to come from the image listing: no map in the
/// listing carries a usable image.
pub fn needs_fallback_images(maps: &[MapDescriptor]) -> bool {
    !maps.iter().any(|m| map_image_url(m).is_some())
}

fn map_image_url(map: &MapDescriptor) -> Option<String> {
    map.map_image.as_deref().and_then(image_url)
}

fn display_size(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Link that opens `map_path` in a fresh WorkAdventure test instance.
pub fn play_url(host: &str, base_path: &str, map_path: &str) -> String {
    let base = base_path.strip_suffix("index.html").unwrap_or(base_path);
    format!("{PLAY_BASE_URL}/{}/{host}{base}{map_path}", instance_id())
}

fn instance_id() -> String {
    (0..INSTANCE_ID_LEN)
        .map(|_| INSTANCE_ALPHABET[fastrand::usize(..INSTANCE_ALPHABET.len())] as char)
        .collect()
}
