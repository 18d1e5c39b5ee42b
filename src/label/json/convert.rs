//! Conversion from JSON schema types to a [`Label`].

use std::path::Path;

use crate::error::LabelError;
use crate::label::Label;
use crate::layout::{
    Barcode, ImageField, LineField, QrCode, RectField, Table, TextBlock, TextField,
};
use crate::printer::PrinterConfig;
use crate::render::morphology::dilate;
use crate::render::{self, ConvertOptions, ImageRef, PixelSource};

use super::schema::*;

fn invalid(field: &str, message: impl std::fmt::Display) -> LabelError {
    LabelError::InvalidLabel(format!("{}: {}", field, message))
}

impl JsonLabel {
    /// Build a label, resolving relative font and image paths against
    /// `base_dir`.
    pub fn to_label(
        &self,
        base_dir: &Path,
        decoder: &impl PixelSource,
    ) -> Result<Label, LabelError> {
        if self.dpi == 0 {
            return Err(invalid("dpi", "must be positive"));
        }
        if self.setup.width <= 0.0 || self.setup.height <= 0.0 {
            return Err(invalid(
                "setup",
                format!(
                    "label size must be positive, got {} x {}",
                    self.setup.width, self.setup.height
                ),
            ));
        }

        let mut label = Label::with_setup(self.setup, PrinterConfig::with_dpi(self.dpi));

        for font in &self.fonts {
            let path = base_dir.join(&font.path);
            log::debug!("loading font {} from {}", font.family, path.display());
            let data = std::fs::read(&path)?;
            label.register_font(font.family.clone(), data, font.weight, font.style)?;
        }

        for (index, field) in self.fields.iter().enumerate() {
            match field {
                JsonField::Text(text) => {
                    label.add(text.to_field().map_err(|e| with_index(index, e))?);
                }
                JsonField::Table(table) => {
                    label.add(table.to_field());
                }
                JsonField::Line(line) => {
                    label.add(line.to_field());
                }
                JsonField::Image(image) => {
                    label.add(
                        image
                            .to_field(base_dir, decoder)
                            .map_err(|e| with_index(index, e))?,
                    );
                }
                JsonField::Rect(rect) => {
                    label.add(RectField::new(rect.x, rect.y, rect.width, rect.height));
                }
                JsonField::Block(block) => {
                    label.add(block.to_field());
                }
                JsonField::Barcode(barcode) => {
                    label.add(barcode.to_field());
                }
                JsonField::QrCode(qr) => {
                    label.add(qr.to_field().map_err(|e| with_index(index, e))?);
                }
            }
        }

        log::debug!(
            "loaded label {} x {} {:?} with {} fields",
            self.setup.width,
            self.setup.height,
            self.setup.unit,
            label.len()
        );
        Ok(label)
    }
}

fn with_index(index: usize, err: LabelError) -> LabelError {
    match err {
        LabelError::InvalidLabel(msg) => LabelError::InvalidLabel(format!("field {}: {}", index, msg)),
        LabelError::Decode(msg) => LabelError::Decode(format!("field {}: {}", index, msg)),
        LabelError::InvalidCommand(msg) => {
            LabelError::InvalidCommand(format!("field {}: {}", index, msg))
        }
        other => other,
    }
}

impl JsonText {
    fn to_field(&self) -> Result<TextField, LabelError> {
        let field = TextField::new(self.content.clone(), self.x, self.y, self.formatted)
            .with_font(self.font.clone());
        match (self.width, self.height) {
            (Some(width), height) => Ok(field.multi_line(width, height)),
            (None, Some(_)) => Err(invalid("text", "height requires width")),
            (None, None) => Ok(field),
        }
    }
}

impl JsonTable {
    fn to_field(&self) -> Table {
        Table::new(self.x, self.y, self.rows.clone(), self.options.clone())
    }
}

impl JsonLine {
    fn to_field(&self) -> LineField {
        LineField::new(self.start, self.end).with_thickness(self.thickness)
    }
}

impl JsonBlock {
    fn to_field(&self) -> TextBlock {
        TextBlock::new(self.content.clone(), self.x, self.y, self.width, self.height)
            .with_font(self.font.clone())
            .with_rotation(self.rotation)
            .with_spacing(self.spacing)
            .with_alignment(self.alignment)
    }
}

impl JsonBarcode {
    fn to_field(&self) -> Barcode {
        let barcode = Barcode::new(
            self.content.clone(),
            self.x,
            self.y,
            self.symbology.clone(),
            self.height,
        )
        .with_rotation(self.rotation)
        .with_bar_widths(self.narrow, self.wide);
        match self.readable {
            Some(alignment) => barcode.with_readable(alignment),
            None => barcode,
        }
    }
}

impl JsonQrCode {
    fn to_field(&self) -> Result<QrCode, LabelError> {
        let qr = QrCode::new(self.content.clone(), self.x, self.y, self.cell_width)
            .with_error_level(self.error_level)
            .with_mode(self.mode)
            .with_rotation(self.rotation)
            .with_model(self.model);
        match self.mask {
            Some(mask) => qr.with_mask(mask),
            None => Ok(qr),
        }
    }
}

impl JsonImage {
    fn to_field(&self, base_dir: &Path, decoder: &impl PixelSource) -> Result<ImageField, LabelError> {
        let options = ConvertOptions {
            width: self.width,
            height: self.height,
            threshold: self.threshold,
            bit_order: self.bit_order,
        };
        let source = ImageRef::Path(base_dir.join(&self.path));
        let bitmap = render::load_bitmap(decoder, &source, &options)?;
        let bitmap = dilate(&bitmap, self.dilation);
        Ok(ImageField::new(self.x, self.y, bitmap).with_mode(self.mode))
    }
}
