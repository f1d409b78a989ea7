use std::{borrow::Cow, fmt, path::Path, str::FromStr, sync::Arc};

use anyhow::Context;

use crate::foundation::error::{TableauError, TableauResult};

/// Raw font file (TTF/OTF) shared between drawables and surfaces.
#[derive(Clone, PartialEq, Eq)]
pub struct Font {
    bytes: Arc<Vec<u8>>,
}

impl Font {
    /// Wrap font file bytes. The face is parsed when text is laid out.
    pub fn from_bytes(bytes: Vec<u8>) -> TableauResult<Self> {
        if bytes.is_empty() {
            return Err(TableauError::invalid_parameter("font bytes must be non-empty"));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
        })
    }

    /// Read a font file from disk.
    pub fn open(path: impl AsRef<Path>) -> TableauResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    /// Font file bytes.
    pub fn bytes(&self) -> &Arc<Vec<u8>> {
        &self.bytes
    }

    /// Identity of the shared byte buffer; clones of one font report the same key.
    pub fn key(&self) -> usize {
        Arc::as_ptr(&self.bytes) as usize
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// Weight/slant requested for a text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    /// Regular upright text.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
    /// Italic slant.
    Italic,
}

impl FromStr for TextStyle {
    type Err = TableauError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "normal" => Ok(Self::Normal),
            "bold" => Ok(Self::Bold),
            "italic" => Ok(Self::Italic),
            other => Err(TableauError::invalid_parameter(format!(
                "unknown text style '{other}' (expected normal, bold or italic)"
            ))),
        }
    }
}

/// Builds `parley` layouts from raw font bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    registered: Option<(Font, String)>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: None,
        }
    }

    /// Family name of `font`, registering it on first use.
    fn family(&mut self, font: &Font) -> TableauResult<String> {
        if let Some((known, family)) = &self.registered
            && known == font
        {
            return Ok(family.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            TableauError::invalid_parameter("no font family found in font bytes")
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| TableauError::invalid_parameter("font family has no name"))?
            .to_string();
        self.registered = Some((font.clone(), family.clone()));
        Ok(family)
    }

    /// Shape a single paragraph of plain text.
    pub(crate) fn layout(
        &mut self,
        text: &str,
        font: &Font,
        size_px: f32,
        style: TextStyle,
    ) -> TableauResult<parley::Layout<()>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TableauError::invalid_parameter(format!(
                "font size must be finite and > 0, got {size_px}"
            )));
        }
        let family = self.family(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        match style {
            TextStyle::Normal => {}
            TextStyle::Bold => builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            )),
            TextStyle::Italic => builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            )),
        }

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
