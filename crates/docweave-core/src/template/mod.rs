//! Templates and generation requests
//!
//! A [`Template`] couples a byte source with its declared [`DocumentKind`],
//! the generation locale and the post-processing hooks. Starting a
//! generation hands back a [`GenerationHandle`] immediately; the work runs
//! on a thread of its own.

pub mod engine;

use crate::config::DocweaveConfig;
use crate::document::{Document, DocumentKind, StreamingSheetWriter, Workbook, WordDocument};
use crate::document::{BodyElement, Sheet};
use crate::error::{DocweaveError, Result};
use crate::generation::{write_artifact, GenerationHandle};
use crate::locale::Locale;
use crate::placeholder::PlaceholderResolver;
use crate::post::{PostProcessing, PostProcessor};
use engine::tokenize::{TokenKind, TokenStream};
use engine::{SheetEngine, WordEngine};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

/// Where template bytes come from
pub trait TemplateSource: Send + Sync {
    fn open(&self) -> Result<Vec<u8>>;

    /// Human readable origin for log lines
    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemplateSource for FileSource {
    fn open(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path).map_err(|e| DocweaveError::TemplateIo {
            path: Some(self.path.clone()),
            reason: e.to_string(),
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Template held in memory
#[derive(Debug, Clone)]
pub struct BytesSource {
    name: String,
    bytes: Arc<[u8]>,
}

impl BytesSource {
    pub fn new(name: &str, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.to_string(),
            bytes: bytes.into(),
        }
    }
}

impl TemplateSource for BytesSource {
    fn open(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.to_vec())
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

/// A token found by [`Template::inspect`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub kind: TokenKind,
    /// `paragraph 3`, `table 1 row 2 cell 1 paragraph 1` or `Sheet!B4`
    pub location: String,
}

impl TokenInfo {
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            TokenKind::Placeholder { .. } => "placeholder",
            TokenKind::Command { .. } => "command",
            TokenKind::BlockEnd { .. } => "block-end",
        }
    }

    /// Placeholder path, or keyword and arguments of a command
    pub fn subject(&self) -> String {
        match &self.kind {
            TokenKind::Placeholder { path } | TokenKind::BlockEnd { path } => path.clone(),
            TokenKind::Command { keyword, args } => format!("{} {}", keyword, args),
        }
    }
}

#[derive(Clone)]
pub struct Template {
    source: Arc<dyn TemplateSource>,
    kind: DocumentKind,
    locale: Locale,
    output_dir: Option<PathBuf>,
    window_size: usize,
    word_hooks: PostProcessing<WordDocument>,
    sheet_hooks: PostProcessing<Workbook>,
}

impl Template {
    pub fn new<S: TemplateSource + 'static>(source: S, kind: DocumentKind) -> Self {
        Self {
            source: Arc::new(source),
            kind,
            locale: Locale::default(),
            output_dir: None,
            window_size: crate::config::consts::DEFAULT_WINDOW_SIZE,
            word_hooks: PostProcessing::new(),
            sheet_hooks: PostProcessing::new(),
        }
    }

    /// Template file whose kind follows from its name (`*.docx.json`, `*.xlsx.json`)
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(FileSource::new(path), DocumentKind::from_file_name(&name))
    }

    /// In-memory template declared by mime type
    pub fn from_bytes(name: &str, bytes: impl Into<Arc<[u8]>>, mime: &str) -> Self {
        Self::new(BytesSource::new(name, bytes), DocumentKind::from_mime(mime))
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size.max(1);
        self
    }

    /// Apply locale, output dir, window size and remote image trust from a config
    pub fn with_config(mut self, config: &DocweaveConfig) -> Result<Self> {
        self.locale = config.locale()?;
        self.window_size = config.sheet.window_size.max(1);
        if let Some(dir) = &config.generation.output_dir {
            self.output_dir = Some(dir.clone());
        }
        if self.kind == DocumentKind::Word && !config.remote_images.trusted_domains.is_empty() {
            let processor = config.remote_images.processor(&self.kind)?;
            self.word_hooks.add(Arc::new(processor));
        }
        Ok(self)
    }

    pub fn add_word_hook(&mut self, hook: Arc<dyn PostProcessor<WordDocument>>) -> &mut Self {
        self.word_hooks.add(hook);
        self
    }

    pub fn add_sheet_hook(&mut self, hook: Arc<dyn PostProcessor<Workbook>>) -> &mut Self {
        self.sheet_hooks.add(hook);
        self
    }

    pub fn kind(&self) -> &DocumentKind {
        &self.kind
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// Read and parse the template document
    pub fn load(&self) -> Result<Document> {
        if let DocumentKind::Other(kind) = &self.kind {
            return Err(DocweaveError::UnsupportedKind(kind.clone()));
        }
        let bytes = self.source.open()?;
        Document::from_slice(&self.kind, &bytes).map_err(|e| match e {
            DocweaveError::Generic(reason) => DocweaveError::TemplateInvalid(format!(
                "{}: {}",
                self.source.describe(),
                reason
            )),
            other => other,
        })
    }

    /// Every token of the template in document order
    pub fn inspect(&self) -> Result<Vec<TokenInfo>> {
        let mut found = Vec::new();
        match self.load()? {
            Document::Word(doc) => inspect_body(&doc.body, "", &mut found),
            Document::Sheet(workbook) => {
                for sheet in &workbook.sheets {
                    inspect_sheet(sheet, &mut found);
                }
            }
        }
        Ok(found)
    }

    /// Start generating against `resolver`
    ///
    /// A template of unsupported kind yields an already failed handle.
    pub fn start_generation(&self, resolver: Arc<dyn PlaceholderResolver>) -> GenerationHandle {
        if let DocumentKind::Other(kind) = &self.kind {
            return GenerationHandle::failed_with(&DocweaveError::UnsupportedKind(kind.clone()));
        }

        tracing::info!(
            "Starting generation of {} ({}, {})",
            self.describe(),
            self.kind,
            self.locale
        );
        let handle = GenerationHandle::running();
        let observer = handle.clone();
        let template = self.clone();

        let spawned = thread::Builder::new()
            .name("docweave-generation".to_string())
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| template.generate(resolver.as_ref())));
                match outcome {
                    Ok(Ok((artifact, document))) => observer.complete(artifact, document),
                    Ok(Err(e)) => observer.fail(&e),
                    Err(_) => observer.fail(&DocweaveError::GenerationFailed(
                        "generation thread panicked".to_string(),
                    )),
                }
            });
        if let Err(e) = spawned {
            handle.fail(&DocweaveError::IoError(e));
        }
        handle
    }

    fn generate(&self, resolver: &dyn PlaceholderResolver) -> Result<(PathBuf, Document)> {
        let template = self.load()?;
        let document = self.expand(&template, resolver)?;
        let artifact = write_artifact(&document, self.output_dir.as_deref())?;
        Ok((artifact, document))
    }

    /// Expand a loaded template and run the post-processing hooks
    pub fn expand(&self, template: &Document, resolver: &dyn PlaceholderResolver) -> Result<Document> {
        match template {
            Document::Word(doc) => {
                let mut out = WordEngine::new(doc, self.locale.clone()).expand(resolver)?;
                self.word_hooks.run(&mut out, resolver);
                Ok(Document::Word(out))
            }
            Document::Sheet(workbook) => {
                let writer = StreamingSheetWriter::new(workbook.styles.clone(), self.window_size);
                let mut out =
                    SheetEngine::new(workbook, self.locale.clone(), writer).expand(resolver)?;
                self.sheet_hooks.run(&mut out, resolver);
                Ok(Document::Sheet(out))
            }
        }
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("source", &self.source.describe())
            .field("kind", &self.kind)
            .field("locale", &self.locale)
            .field("word_hooks", &self.word_hooks)
            .field("sheet_hooks", &self.sheet_hooks)
            .finish()
    }
}

fn push_tokens(text: &str, location: &str, found: &mut Vec<TokenInfo>) {
    found.extend(TokenStream::new(text).filter(|t| !t.is_escaped()).map(|t| TokenInfo {
        kind: t.kind,
        location: location.to_string(),
    }));
}

fn inspect_body(body: &[BodyElement], prefix: &str, found: &mut Vec<TokenInfo>) {
    let (mut paragraphs, mut tables) = (0, 0);
    for element in body {
        match element {
            BodyElement::Paragraph(p) => {
                paragraphs += 1;
                push_tokens(&p.text(), &format!("{}paragraph {}", prefix, paragraphs), found);
            }
            BodyElement::Table(t) => {
                tables += 1;
                for (r, row) in t.rows.iter().enumerate() {
                    for (c, cell) in row.cells.iter().enumerate() {
                        let nested = format!("{}table {} row {} cell {} ", prefix, tables, r + 1, c + 1);
                        inspect_body(&cell.body, &nested, found);
                    }
                }
            }
        }
    }
}

fn inspect_sheet(sheet: &Sheet, found: &mut Vec<TokenInfo>) {
    for row in &sheet.rows {
        for cell in &row.cells {
            if let Some(text) = cell.value.as_text() {
                let location = format!("{}!{}{}", sheet.name, column_name(cell.column), row.index + 1);
                push_tokens(text, &location, found);
            }
        }
    }
}

/// Spreadsheet column letters: 0 is `A`, 26 is `AA`
fn column_name(column: u16) -> String {
    let mut n = u32::from(column) + 1;
    let mut name = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        name.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}
