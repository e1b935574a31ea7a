//! Remote images for word documents
//!
//! A paragraph consisting of `{{remoteImage <url>}}` survives expansion
//! verbatim (no custom placeholder claims the keyword). After generation the
//! paragraph is emptied and every trusted image URL it named is fetched and
//! embedded in its place.

use super::fetch::{build_client, download_to_memory};
use super::PostProcessor;
use crate::document::media::{embed_image, image_content_type};
use crate::document::word::{BodyElement, Paragraph, Run, WordDocument, WordParts};
use crate::document::DocumentKind;
use crate::error::{DocweaveError, Result};
use crate::placeholder::PlaceholderResolver;
use crate::template::engine::tokenize::{active_tokens, TokenKind};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::blocking::Client;
use std::time::Duration;
use url::Url;

pub const REMOTE_IMAGE_KEYWORD: &str = "remoteImage";

lazy_static! {
    static ref URL_PATTERN: Regex = Regex::new(
        r"(https?|ftp|file)://[-a-zA-Z0-9+&@#/%?=~_|!:,.;]*[-a-zA-Z0-9+&@#/%=~_|]"
    )
    .expect("URL pattern compiles");
}

pub struct RemoteImagePostProcessor {
    trusted_domains: Vec<String>,
    client: Client,
    max_bytes: u64,
    max_width: Option<u32>,
}

impl RemoteImagePostProcessor {
    /// Processor for documents of `kind`
    ///
    /// Only word documents carry remote image paragraphs; any other kind is
    /// [`DocweaveError::UnsupportedKind`].
    pub fn for_kind(
        kind: &DocumentKind,
        trusted_domains: Vec<String>,
        timeout: Duration,
        max_bytes: u64,
    ) -> Result<Self> {
        match kind {
            DocumentKind::Word => Ok(Self {
                trusted_domains,
                client: build_client(timeout)?,
                max_bytes,
                max_width: None,
            }),
            other => Err(DocweaveError::UnsupportedKind(format!(
                "remote images in {}",
                other
            ))),
        }
    }

    pub fn with_max_width(mut self, max_width: Option<u32>) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn trusted_domains(&self) -> &[String] {
        &self.trusted_domains
    }

    fn is_trusted(&self, url: &str) -> bool {
        self.trusted_domains.iter().any(|d| url.starts_with(d.as_str()))
    }

    fn fill(&self, paragraph: &mut Paragraph, parts: &mut WordParts, urls: &[String]) {
        paragraph.clear_runs();

        for url in urls {
            if !self.is_trusted(url) {
                tracing::warn!("Skipping remote image from untrusted location {}", url);
                continue;
            }
            let Some(content_type) = image_content_type(url) else {
                tracing::warn!("Skipping remote resource {}: not an image", url);
                continue;
            };

            match self.embed(parts, url) {
                Ok(run) => {
                    tracing::debug!("Embedded {} ({})", url, content_type);
                    paragraph.runs.push(run);
                }
                Err(e) => tracing::warn!("Remote image {} not embedded: {}", url, e),
            }
        }
    }

    fn embed(&self, parts: &mut WordParts, url: &str) -> Result<Run> {
        let parsed = Url::parse(url).map_err(|e| DocweaveError::FetchFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let bytes = download_to_memory(&self.client, &parsed, self.max_bytes)?;
        let file_name = parsed
            .path_segments()
            .and_then(|segments| segments.last())
            .filter(|name| !name.is_empty())
            .unwrap_or("image")
            .to_string();
        embed_image(parts, &file_name, bytes, self.max_width)
    }
}

impl PostProcessor<WordDocument> for RemoteImagePostProcessor {
    fn name(&self) -> &str {
        REMOTE_IMAGE_KEYWORD
    }

    fn document_generation_finished(
        &self,
        document: &mut WordDocument,
        _resolver: &dyn PlaceholderResolver,
    ) -> Result<()> {
        let WordDocument { body, parts } = document;
        let mut found = 0;
        visit_paragraphs(body, &mut |paragraph| {
            if let Some(urls) = remote_image_urls(&paragraph.text()) {
                found += 1;
                self.fill(paragraph, parts, &urls);
            }
        });
        tracing::info!("Processed {} remote image paragraphs", found);
        Ok(())
    }
}

/// URLs of a paragraph that is exactly one `{{remoteImage ...}}` command
fn remote_image_urls(text: &str) -> Option<Vec<String>> {
    let mut tokens = active_tokens(text);
    let (Some(token), None) = (tokens.next(), tokens.next()) else {
        return None;
    };
    if token.backslash_count > 0 || text.trim() != &text[token.start..token.end()] {
        return None;
    }
    match token.kind {
        TokenKind::Command { keyword, args } if keyword == REMOTE_IMAGE_KEYWORD => Some(
            URL_PATTERN
                .find_iter(&args)
                .map(|m| m.as_str().to_string())
                .collect(),
        ),
        _ => None,
    }
}

fn visit_paragraphs(body: &mut [BodyElement], visit: &mut dyn FnMut(&mut Paragraph)) {
    for element in body {
        match element {
            BodyElement::Paragraph(p) => visit(p),
            BodyElement::Table(t) => {
                for cell in t.rows.iter_mut().flat_map(|r| r.cells.iter_mut()) {
                    visit_paragraphs(&mut cell.body, visit);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::word::{Table, TableRow};
    use crate::placeholder::StaticResolver;
    use image::{ImageBuffer, ImageFormat, Rgb};
    use mockito::Server;
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn processor(trusted: &str) -> RemoteImagePostProcessor {
        RemoteImagePostProcessor::for_kind(
            &DocumentKind::Word,
            vec![trusted.to_string()],
            Duration::from_secs(5),
            1024 * 1024,
        )
        .unwrap()
    }

    #[test]
    fn test_only_word_documents_are_supported() {
        let result = RemoteImagePostProcessor::for_kind(
            &DocumentKind::Sheet,
            Vec::new(),
            Duration::from_secs(1),
            1,
        );
        assert!(matches!(result, Err(DocweaveError::UnsupportedKind(_))));
    }

    #[test]
    fn test_command_paragraph_detection() {
        assert_eq!(
            remote_image_urls("{{remoteImage https://x.org/a.png}}"),
            Some(vec!["https://x.org/a.png".to_string()])
        );
        assert_eq!(
            remote_image_urls("  {{remoteImage https://x.org/a.png, file:///tmp/b.jpg}} "),
            Some(vec![
                "https://x.org/a.png".to_string(),
                "file:///tmp/b.jpg".to_string()
            ])
        );
        assert_eq!(remote_image_urls("see {{remoteImage https://x.org/a.png}}"), None);
        assert_eq!(remote_image_urls("\\{{remoteImage https://x.org/a.png}}"), None);
        assert_eq!(remote_image_urls("{{image https://x.org/a.png}}"), None);
    }

    #[test]
    fn test_embeds_trusted_image() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/img/logo.png")
            .with_status(200)
            .with_body(png(40, 20))
            .create();
        let url = format!("{}/img/logo.png", server.url());

        let mut doc = WordDocument::new(vec![
            Paragraph::new("Logo:").into(),
            Paragraph::new(&format!("{{{{remoteImage {}}}}}", url)).into(),
        ]);
        processor(&server.url())
            .document_generation_finished(&mut doc, &StaticResolver::new())
            .unwrap();

        mock.assert();
        let paragraph = doc.body[1].as_paragraph().unwrap();
        assert!(paragraph.has_pictures());
        assert_eq!(paragraph.text(), "");
        assert_eq!(doc.parts.media.len(), 1);
        assert_eq!(doc.parts.media[0].file_name, "logo.png");
        assert_eq!(doc.body[0].text(), "Logo:");
    }

    #[test]
    fn test_untrusted_and_non_image_urls_are_dropped() {
        let mut server = Server::new();
        let mock = server.mock("GET", "/notes.txt").expect(0).create();
        let text = format!(
            "{{{{remoteImage https://elsewhere.org/a.png {}/notes.txt}}}}",
            server.url()
        );

        let mut doc = WordDocument::new(vec![Paragraph::new(&text).into()]);
        processor(&server.url())
            .document_generation_finished(&mut doc, &StaticResolver::new())
            .unwrap();

        mock.assert();
        let paragraph = doc.body[0].as_paragraph().unwrap();
        assert!(paragraph.runs.is_empty());
        assert!(doc.parts.media.is_empty());
    }

    #[test]
    fn test_fetch_failure_is_not_an_error() {
        let mut server = Server::new();
        let _mock = server.mock("GET", "/gone.png").with_status(500).create();
        let text = format!("{{{{remoteImage {}/gone.png}}}}", server.url());

        let mut doc = WordDocument::new(vec![Table {
            style: None,
            rows: vec![TableRow::of_texts(&[&text])],
        }
        .into()]);
        let result = processor(&server.url())
            .document_generation_finished(&mut doc, &StaticResolver::new());

        assert!(result.is_ok());
        assert_eq!(doc.text(), "");
        assert!(doc.parts.media.is_empty());
    }
}
