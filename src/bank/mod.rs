//! Labeled templates and the store that holds them.
//!
//! A template pairs a reference bounding box with the color histogram of its
//! reference image. The store is filled once, then shared read-only by the
//! matcher; it is `Sync`, so concurrent queries need no locking.

use crate::histogram::{ColorHistogram, HistogramConfig, HistogramExtractor};
use crate::image::{BoundingBox, RgbImage};
use crate::util::{HistMatchError, HistMatchResult};

/// Which pixels of a reference image feed its template signature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TemplateScope {
    /// Every pixel of the reference image.
    #[default]
    FullImage,
    /// Only the pixels inside the labeled box (clipped to the image).
    BoxRegion,
}

/// Immutable (signature, bounding box) pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    bbox: BoundingBox,
    signature: ColorHistogram,
}

impl Template {
    /// Pairs a box with a precomputed signature.
    pub fn new(bbox: BoundingBox, signature: ColorHistogram) -> Self {
        Self { bbox, signature }
    }

    /// Builds a template from a reference image and its labeled box.
    pub fn from_reference(
        extractor: &HistogramExtractor,
        img: &RgbImage,
        bbox: BoundingBox,
        scope: TemplateScope,
    ) -> Self {
        let signature = match scope {
            TemplateScope::FullImage => extractor.extract(img),
            TemplateScope::BoxRegion => extractor.extract_region(img, &bbox),
        };
        Self { bbox, signature }
    }

    /// Labeled object location in the reference image.
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Reference signature.
    pub fn signature(&self) -> &ColorHistogram {
        &self.signature
    }
}

/// Ordered template collection sharing one histogram config.
#[derive(Clone, Debug)]
pub struct TemplateStore {
    extractor: HistogramExtractor,
    templates: Vec<Template>,
}

impl TemplateStore {
    /// Creates an empty store for `cfg`.
    pub fn new(cfg: HistogramConfig) -> HistMatchResult<Self> {
        Ok(Self {
            extractor: HistogramExtractor::new(cfg)?,
            templates: Vec::new(),
        })
    }

    /// Creates a store and pushes every template in order.
    pub fn from_templates<I>(cfg: HistogramConfig, templates: I) -> HistMatchResult<Self>
    where
        I: IntoIterator<Item = Template>,
    {
        let mut store = Self::new(cfg)?;
        for template in templates {
            store.push(template)?;
        }
        Ok(store)
    }

    /// Appends a template; its signature must use the store's bin count.
    pub fn push(&mut self, template: Template) -> HistMatchResult<usize> {
        let cfg = self.extractor.config();
        let sig = template.signature();
        if sig.bins_per_channel() != cfg.bins_per_channel || sig.len() != cfg.signature_len() {
            return Err(HistMatchError::SignatureMismatch {
                expected: cfg.signature_len(),
                got: sig.len(),
            });
        }
        self.templates.push(template);
        Ok(self.templates.len() - 1)
    }

    /// Extracts a signature from `img` and appends it with `bbox`.
    ///
    /// Returns the new template's index.
    pub fn add_reference(
        &mut self,
        img: &RgbImage,
        bbox: BoundingBox,
        scope: TemplateScope,
    ) -> HistMatchResult<usize> {
        let template = Template::from_reference(&self.extractor, img, bbox, scope);
        self.push(template)
    }

    /// Histogram config shared by all templates.
    pub fn config(&self) -> &HistogramConfig {
        self.extractor.config()
    }

    /// Extractor matching the store's config; use it for query images.
    pub fn extractor(&self) -> &HistogramExtractor {
        &self.extractor
    }

    /// Templates in insertion order.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Returns the template at `index`.
    pub fn get(&self, index: usize) -> Option<&Template> {
        self.templates.get(index)
    }

    /// Iterates templates in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Template> {
        self.templates.iter()
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True when no template has been added.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Template, TemplateScope, TemplateStore};
    use crate::histogram::{ColorHistogram, HistogramConfig};
    use crate::image::{BoundingBox, Pixel, RgbImage};
    use crate::util::HistMatchError;

    #[test]
    fn push_rejects_foreign_bin_count() {
        let mut store = TemplateStore::new(HistogramConfig::default()).unwrap();
        let coarse = HistogramConfig::new(4).unwrap();
        let template = Template::new(
            BoundingBox::new(0, 0, 1, 1).unwrap(),
            ColorHistogram::zeros(&coarse),
        );
        assert_eq!(
            store.push(template).unwrap_err(),
            HistMatchError::SignatureMismatch {
                expected: 512,
                got: 64
            }
        );
        assert!(store.is_empty());
    }

    #[test]
    fn add_reference_returns_sequential_indices() {
        let img = RgbImage::filled(4, 4, Pixel::GREEN).unwrap();
        let bbox = BoundingBox::new(1, 1, 2, 2).unwrap();
        let mut store = TemplateStore::new(HistogramConfig::default()).unwrap();
        assert_eq!(
            store
                .add_reference(&img, bbox, TemplateScope::FullImage)
                .unwrap(),
            0
        );
        assert_eq!(
            store
                .add_reference(&img, bbox, TemplateScope::BoxRegion)
                .unwrap(),
            1
        );
        assert_eq!(store.get(0).unwrap().signature().total(), 16);
        assert_eq!(store.get(1).unwrap().signature().total(), 4);
        assert_eq!(store.iter().count(), 2);
    }
}
