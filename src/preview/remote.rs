//! Steam Workshop page scraping for preview images

use crate::constants::{HTTP_TIMEOUT, HTTP_USER_AGENT, WORKSHOP_PAGE_URL};
use image::DynamicImage;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.workshopItemTitle").unwrap());
static PREVIEW_IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img.workshopItemPreviewImageEnlargeable").unwrap());
static ENLARGE_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ShowEnlargedImagePreview\(\s*'(?P<url>.+)'\s*\);").unwrap()
});

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("workshop item not found")]
    ItemNotFound,
    #[error("unexpected workshop page layout: {0}")]
    MalformedPage(&'static str),
    #[error("couldn't connect: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Http(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("couldn't decode preview image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Where pages and images come from. The app uses [`HttpPageSource`].
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct HttpPageSource {
    client: reqwest::Client,
}

impl HttpPageSource {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(HTTP_USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;
        Ok(Self { client })
    }
}

fn request_error(e: reqwest::Error) -> FetchError {
    if e.is_connect() {
        FetchError::Connect(e.to_string())
    } else {
        FetchError::Http(e.to_string())
    }
}

impl PageSource for HttpPageSource {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await.map_err(request_error)?;
        response.text().await.map_err(request_error)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await.map_err(request_error)?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }
        let bytes = response.bytes().await.map_err(request_error)?;
        Ok(bytes.to_vec())
    }
}

/// Page URL for a workshop item
pub fn item_page_url(id: &str) -> Result<String, FetchError> {
    reqwest::Url::parse_with_params(WORKSHOP_PAGE_URL, &[("id", id)])
        .map(String::from)
        .map_err(|_| FetchError::ItemNotFound)
}

/// A workshop item looked up by id. The preview image is only downloaded on request.
#[derive(Debug, Clone)]
pub struct WorkshopItem {
    pub id: String,
    pub title: String,
    preview_url: Result<String, &'static str>,
}

impl WorkshopItem {
    /// Fetch and parse the item page. An unreachable page counts as a missing item.
    pub async fn fetch<S: PageSource>(source: &S, id: &str) -> Result<Self, FetchError> {
        let url = item_page_url(id)?;
        let html = match source.get_text(&url).await {
            Ok(html) => html,
            Err(FetchError::Connect(reason)) => {
                debug!(id, %reason, "Workshop page unreachable");
                return Err(FetchError::ItemNotFound);
            }
            Err(e) => return Err(e),
        };
        Self::parse(id, &html)
    }

    /// Items without a title block don't exist (or the page layout changed).
    pub fn parse(id: &str, html: &str) -> Result<Self, FetchError> {
        let document = Html::parse_document(html);
        let title = document
            .select(&TITLE)
            .next()
            .ok_or(FetchError::ItemNotFound)?
            .text()
            .collect::<String>()
            .trim()
            .to_string();

        Ok(Self {
            id: id.to_string(),
            title,
            preview_url: extract_preview_url(&document),
        })
    }

    pub fn preview_url(&self) -> Result<&str, FetchError> {
        self.preview_url
            .as_deref()
            .map_err(|reason| FetchError::MalformedPage(*reason))
    }

    /// Download and decode the enlarged preview image
    pub async fn fetch_image<S: PageSource>(&self, source: &S) -> Result<DynamicImage, FetchError> {
        let url = self.preview_url()?;
        debug!(id = %self.id, %url, "Fetching workshop preview");
        let bytes = source.get_bytes(url).await?;
        Ok(image::load_from_memory(&bytes)?)
    }
}

/// The enlargeable preview sits inside a link whose onclick is
/// `ShowEnlargedImagePreview( '<url>' );`
fn extract_preview_url(document: &Html) -> Result<String, &'static str> {
    let img = document
        .select(&PREVIEW_IMG)
        .next()
        .ok_or("no enlargeable preview image")?;
    let parent = img
        .parent()
        .and_then(ElementRef::wrap)
        .ok_or("preview image has no parent element")?;
    let onclick = parent
        .value()
        .attr("onclick")
        .ok_or("preview image parent has no onclick")?;
    let caps = ENLARGE_CALL
        .captures(onclick)
        .ok_or("onclick is not a ShowEnlargedImagePreview call")?;
    Ok(caps["url"].to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned pages keyed by URL. Unknown URLs fail like a dropped connection.
    #[derive(Default)]
    pub(crate) struct FakeSteam {
        pub pages: HashMap<String, String>,
        pub files: HashMap<String, Vec<u8>>,
        pub requests: Mutex<Vec<String>>,
    }

    impl FakeSteam {
        pub fn with_item(mut self, id: &str, image_url: &str, image: Vec<u8>) -> Self {
            self.pages.insert(item_page_url(id).unwrap(), item_page(id, image_url));
            self.files.insert(image_url.to_string(), image);
            self
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl PageSource for FakeSteam {
        async fn get_text(&self, url: &str) -> Result<String, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Connect("offline".into()))
        }

        async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.files.get(url).cloned().ok_or(FetchError::Status(404))
        }
    }

    pub(crate) fn item_page(title: &str, image_url: &str) -> String {
        format!(
            r#"<html><body>
            <div class="workshopItemTitle">{title}</div>
            <div class="workshopItemPreviewImageMain">
              <a onclick="ShowEnlargedImagePreview( '{image_url}' );">
                <img id="previewImageMain" class="workshopItemPreviewImageEnlargeable" src="thumb.jpg">
              </a>
            </div>
            </body></html>"#
        )
    }

    pub(crate) fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([200, 40, 40, 255]));
        let mut buf = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn page_url_encodes_the_id() {
        assert_eq!(
            item_page_url("123456").unwrap(),
            "https://steamcommunity.com/sharedfiles/filedetails/?id=123456"
        );
        assert!(item_page_url("a b&c").unwrap().ends_with("?id=a+b%26c"));
    }

    #[test]
    fn parses_title_and_preview_url() {
        let html = item_page("  Dribble Challenge  ", "https://images.example/ugc/1/");
        let item = WorkshopItem::parse("1", &html).unwrap();
        assert_eq!(item.title, "Dribble Challenge");
        assert_eq!(item.preview_url().unwrap(), "https://images.example/ugc/1/");
    }

    #[test]
    fn missing_title_means_not_found() {
        let html = r#"<html><body><div class="error_ctn">There was a problem</div></body></html>"#;
        assert!(matches!(
            WorkshopItem::parse("1", html),
            Err(FetchError::ItemNotFound)
        ));
    }

    #[test]
    fn title_without_preview_is_malformed_only_when_image_is_needed() {
        let html = r#"<div class="workshopItemTitle">Map</div><a href="x"><img class="other"></a>"#;
        let item = WorkshopItem::parse("1", html).unwrap();
        assert_eq!(item.title, "Map");
        assert!(matches!(item.preview_url(), Err(FetchError::MalformedPage(_))));
    }

    #[test]
    fn onclick_must_be_the_enlarge_call() {
        let html = r#"<div class="workshopItemTitle">Map</div>
            <a onclick="SomethingElse('https://x/');"><img class="workshopItemPreviewImageEnlargeable"></a>"#;
        let item = WorkshopItem::parse("1", html).unwrap();
        assert!(matches!(item.preview_url(), Err(FetchError::MalformedPage(_))));
    }

    #[tokio::test]
    async fn unreachable_page_is_item_not_found() {
        let steam = FakeSteam::default();
        let result = WorkshopItem::fetch(&steam, "404").await;
        assert!(matches!(result, Err(FetchError::ItemNotFound)));
        assert_eq!(steam.request_count(), 1);
    }

    #[tokio::test]
    async fn fetches_and_decodes_preview() {
        let steam = FakeSteam::default().with_item("77", "https://img/77", png_bytes(640, 360));
        let item = WorkshopItem::fetch(&steam, "77").await.unwrap();
        let img = item.fetch_image(&steam).await.unwrap();
        assert_eq!((img.width(), img.height()), (640, 360));
        assert_eq!(steam.request_count(), 2);
    }

    #[tokio::test]
    async fn undecodable_image_is_a_decode_error() {
        let steam = FakeSteam::default().with_item("5", "https://img/5", b"not an image".to_vec());
        let item = WorkshopItem::fetch(&steam, "5").await.unwrap();
        assert!(matches!(item.fetch_image(&steam).await, Err(FetchError::Decode(_))));
    }
}
