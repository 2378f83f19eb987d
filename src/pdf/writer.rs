use std::collections::HashMap;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use tempfile::NamedTempFile;

use super::PdfError;
use super::embed::JpegImage;
use crate::layout::{Geometry, PagePlan, PlacementPlan};

const PDF_VERSION: &str = "1.5";
const PRODUCER: &str = concat!("proxysheet ", env!("CARGO_PKG_VERSION"));

/// What ended up in a written document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub pages: usize,
    pub placements: usize,
    pub embedded_images: usize,
}

/// Renders a [`PlacementPlan`] into a PDF file.
#[derive(Debug, Clone, Copy)]
pub struct PdfWriter {
    geometry: Geometry,
}

/// Image XObjects already added to the document, keyed by source path.
#[derive(Default)]
struct ImageCache {
    entries: HashMap<PathBuf, (String, ObjectId)>,
}

impl ImageCache {
    fn get_or_embed(
        &mut self,
        doc: &mut Document,
        path: &Path,
    ) -> Result<(String, ObjectId), PdfError> {
        if let Some(entry) = self.entries.get(path) {
            return Ok(entry.clone());
        }
        let image = JpegImage::load(path)?;
        tracing::debug!(
            path = %path.display(),
            width = image.width,
            height = image.height,
            "embedding image"
        );
        let id = doc.add_object(image.into_stream());
        let entry = (format!("Im{}", self.entries.len() + 1), id);
        self.entries.insert(path.to_path_buf(), entry.clone());
        Ok(entry)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl PdfWriter {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }

    /// Build the document in memory, then replace `output` in one step. A
    /// failure at any point leaves no partial file behind.
    pub fn write(&self, plan: &PlacementPlan, output: &Path) -> Result<WriteSummary, PdfError> {
        let mut doc = self.build(plan)?;
        let summary = WriteSummary {
            pages: plan.page_count(),
            placements: plan.image_count(),
            embedded_images: count_images(&doc),
        };

        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| PdfError::Io { path, source }
        };

        let mut staged = NamedTempFile::new_in(dir).map_err(io_err(dir))?;
        {
            let mut writer = BufWriter::new(staged.as_file_mut());
            doc.save_to(&mut writer)
                .map_err(std::io::Error::other)
                .map_err(io_err(output))?;
            writer.flush().map_err(io_err(output))?;
        }
        staged
            .persist(output)
            .map_err(|err| PdfError::Io {
                path: output.to_path_buf(),
                source: err.error,
            })?;

        tracing::info!(
            path = %output.display(),
            pages = summary.pages,
            images = summary.placements,
            "wrote proxy sheet"
        );
        Ok(summary)
    }

    /// Assemble the document without touching the filesystem beyond reading images.
    pub fn build(&self, plan: &PlacementPlan) -> Result<Document, PdfError> {
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();
        let mut images = ImageCache::default();
        let mut kids: Vec<Object> = Vec::with_capacity(plan.page_count());

        for page in &plan.pages {
            let page_id = self.add_page(&mut doc, pages_id, page, &mut images)?;
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => self.media_box(),
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
            "CreationDate" => Object::string_literal(
                Utc::now().format("D:%Y%m%d%H%M%SZ").to_string()
            ),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        tracing::debug!(
            pages = plan.page_count(),
            images = images.len(),
            "document assembled"
        );
        Ok(doc)
    }

    fn add_page(
        &self,
        doc: &mut Document,
        pages_id: ObjectId,
        page: &PagePlan,
        images: &mut ImageCache,
    ) -> Result<ObjectId, PdfError> {
        let mut operations = Vec::with_capacity(page.cells.len() * 4);
        let mut xobjects = Dictionary::new();

        for cell in &page.cells {
            let (name, id) = images.get_or_embed(doc, cell.image.path())?;
            operations.push(Operation::new("q", vec![]));
            operations.push(Operation::new(
                "cm",
                vec![
                    self.geometry.cell_width.into(),
                    0.0f32.into(),
                    0.0f32.into(),
                    self.geometry.cell_height.into(),
                    cell.x.into(),
                    cell.y.into(),
                ],
            ));
            operations.push(Operation::new("Do", vec![Object::Name(name.clone().into_bytes())]));
            operations.push(Operation::new("Q", vec![]));
            xobjects.set(name, id);
        }

        let content = Content { operations };
        let content_id = doc.add_object(lopdf::Stream::new(Dictionary::new(), content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => xobjects,
            },
        });
        Ok(page_id)
    }

    fn media_box(&self) -> Vec<Object> {
        vec![
            0.into(),
            0.into(),
            self.geometry.page_width.into(),
            self.geometry.page_height.into(),
        ]
    }
}

fn count_images(doc: &Document) -> usize {
    doc.objects
        .values()
        .filter(|object| match object {
            Object::Stream(stream) => {
                matches!(stream.dict.get(b"Subtype"), Ok(Object::Name(name)) if name == b"Image")
            }
            _ => false,
        })
        .count()
}
