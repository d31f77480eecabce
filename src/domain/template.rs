//! Templates and the named rectangular fields they contain.
//!
//! A [`Template`] is the ordered set of [`Field`]s describing one document
//! layout. It is authored externally (the crate owns no persistence
//! format), loaded once per batch run, and consumed read-only.

use serde::{Deserialize, Serialize};

use crate::core::errors::{OcrError, OcrResult};

/// A rectangle in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRect {
    /// Left edge, in pixels from the image's left border.
    pub x: u32,
    /// Top edge, in pixels from the image's top border.
    pub y: u32,
    /// Width in pixels. Must be positive.
    pub w: u32,
    /// Height in pixels. Must be positive.
    pub h: u32,
}

impl FieldRect {
    /// Checks that the rectangle has positive dimensions and lies entirely
    /// within an image of the given size.
    ///
    /// Sums are computed in 64 bits so oversized rectangles cannot wrap.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the rectangle is valid for the image.
    /// * `Err(message)` - Describing the first violated bound.
    pub fn check_within(&self, image_width: u32, image_height: u32) -> Result<(), String> {
        if self.w == 0 || self.h == 0 {
            return Err(format!("dimensions must be positive, got {}x{}", self.w, self.h));
        }
        if u64::from(self.x) + u64::from(self.w) > u64::from(image_width) {
            return Err(format!(
                "x + w = {} exceeds image width {}",
                u64::from(self.x) + u64::from(self.w),
                image_width
            ));
        }
        if u64::from(self.y) + u64::from(self.h) > u64::from(image_height) {
            return Err(format!(
                "y + h = {} exceeds image height {}",
                u64::from(self.y) + u64::from(self.h),
                image_height
            ));
        }
        Ok(())
    }
}

/// A named rectangular region of interest within a fixed image layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// The field name, unique within its template.
    pub name: String,
    /// The field rectangle. Flattened so the JSON shape stays
    /// `{"name": ..., "x": ..., "y": ..., "w": ..., "h": ...}`.
    #[serde(flatten)]
    pub rect: FieldRect,
}

/// An ordered collection of fields sharing one coordinate space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// The fields, in authoring order. Order is preserved but fields do
    /// not interact during extraction.
    pub fields: Vec<Field>,
}

impl Template {
    /// Creates a template from a list of fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Parses a template from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns `OcrError::Config` if the document does not parse or the
    /// parsed template fails [`Template::validate`].
    pub fn from_json(json: &str) -> OcrResult<Self> {
        let template: Template = serde_json::from_str(json)
            .map_err(|e| OcrError::config(format!("template parse failed: {e}")))?;
        template.validate()?;
        Ok(template)
    }

    /// Validates the template independent of any source image: field
    /// names must be non-empty and unique, dimensions positive.
    ///
    /// Bounds against a concrete image are checked per field at
    /// extraction time so one bad field never rejects the template.
    pub fn validate(&self) -> OcrResult<()> {
        let mut seen = std::collections::BTreeSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(OcrError::config("field names must be non-empty"));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(OcrError::config(format!(
                    "duplicate field name '{}'",
                    field.name
                )));
            }
            if field.rect.w == 0 || field.rect.h == 0 {
                return Err(OcrError::config(format!(
                    "field '{}' has non-positive dimensions {}x{}",
                    field.name, field.rect.w, field.rect.h
                )));
            }
        }
        Ok(())
    }

    /// The number of fields in the template.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the template has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, x: u32, y: u32, w: u32, h: u32) -> Field {
        Field {
            name: name.to_string(),
            rect: FieldRect { x, y, w, h },
        }
    }

    #[test]
    fn test_rect_within_bounds() {
        let rect = FieldRect { x: 10, y: 5, w: 20, h: 10 };
        assert!(rect.check_within(30, 15).is_ok());
        assert!(rect.check_within(30, 14).is_err());
    }

    #[test]
    fn test_rect_exceeding_width_names_the_bound() {
        let rect = FieldRect { x: 10, y: 0, w: 20, h: 5 };
        let err = rect.check_within(25, 10).unwrap_err();
        assert!(err.contains("x + w = 30"));
        assert!(err.contains("25"));
    }

    #[test]
    fn test_rect_zero_dimension_rejected() {
        let rect = FieldRect { x: 0, y: 0, w: 0, h: 5 };
        assert!(rect.check_within(100, 100).is_err());
    }

    #[test]
    fn test_rect_near_u32_max_does_not_wrap() {
        let rect = FieldRect { x: u32::MAX, y: 0, w: 2, h: 2 };
        assert!(rect.check_within(100, 100).is_err());
    }

    #[test]
    fn test_template_json_round_trip() {
        let json = r#"{
            "fields": [
                {"name": "invoice_no", "x": 10, "y": 20, "w": 120, "h": 30},
                {"name": "total", "x": 10, "y": 60, "w": 80, "h": 30}
            ]
        }"#;
        let template = Template::from_json(json).unwrap();
        assert_eq!(template.len(), 2);
        assert_eq!(template.fields[0].name, "invoice_no");
        assert_eq!(template.fields[1].rect, FieldRect { x: 10, y: 60, w: 80, h: 30 });
    }

    #[test]
    fn test_duplicate_field_names_rejected() {
        let template = Template::new(vec![
            field("a", 0, 0, 10, 10),
            field("a", 20, 0, 10, 10),
        ]);
        assert!(matches!(template.validate(), Err(OcrError::Config { .. })));
    }

    #[test]
    fn test_zero_sized_field_rejected() {
        let template = Template::new(vec![field("a", 0, 0, 10, 0)]);
        assert!(template.validate().is_err());
    }

    #[test]
    fn test_empty_template_is_valid() {
        let template = Template::new(vec![]);
        assert!(template.validate().is_ok());
        assert!(template.is_empty());
    }
}
