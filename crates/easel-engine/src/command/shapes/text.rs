use crate::command::{BatchData, MaterialKey, RenderCommand, Shape, ZIndex};
use crate::coords::{Rect, Vec2};

/// Estimated glyph advance, in ems. The batching core never shapes text; this is
/// only used for culling bounds and placeholder glyph quads.
const ADVANCE_EM: f32 = 0.6;
const DEFAULT_LINE_HEIGHT: f32 = 1.2;

/// Text run payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    /// Top-left of the text block in logical pixels.
    pub origin: Vec2,
    /// Font size in logical pixels.
    pub size: f32,
    /// Wrapping width in logical pixels. `None` = no wrapping.
    pub max_width: Option<f32>,
    /// Line height as a multiple of `size`.
    pub line_height: f32,
}

impl TextCmd {
    pub fn new(text: impl Into<String>, origin: Vec2, size: f32) -> Self {
        Self {
            text: text.into(),
            origin,
            size,
            max_width: None,
            line_height: DEFAULT_LINE_HEIGHT,
        }
    }

    pub fn with_max_width(mut self, max_width: f32) -> Self {
        self.max_width = Some(max_width);
        self
    }

    #[inline]
    fn advance(&self) -> f32 {
        self.size.abs() * ADVANCE_EM
    }

    #[inline]
    fn line_advance(&self) -> f32 {
        self.size.abs() * self.line_height
    }

    /// Walks the monospace-estimated layout, calling `f(column, row, char)` for every
    /// character. Returns `(widest row in columns, row count)`.
    fn layout(&self, mut f: impl FnMut(usize, usize, char)) -> (usize, usize) {
        let per_row = self
            .max_width
            .map(|w| ((w / self.advance()).floor() as usize).max(1));

        let mut widest = 0;
        let mut rows = 0;
        for line in self.text.split('\n') {
            let mut col = 0;
            rows += 1;
            for ch in line.chars() {
                if per_row == Some(col) {
                    rows += 1;
                    col = 0;
                }
                f(col, rows - 1, ch);
                col += 1;
                widest = widest.max(col);
            }
        }
        (widest, rows)
    }

    /// Estimated bounds of the laid-out block.
    pub fn bounds(&self) -> Rect {
        let (cols, rows) = self.layout(|_, _, _| {});
        Rect::from_origin_size(
            self.origin,
            Vec2::new(cols as f32 * self.advance(), rows as f32 * self.line_advance()),
        )
    }

    /// One placeholder quad per visible glyph cell.
    pub(crate) fn tessellate(&self, out: &mut BatchData) {
        let (advance, line) = (self.advance(), self.line_advance());
        let size = self.size.abs();
        self.layout(|col, row, ch| {
            if ch.is_whitespace() {
                return;
            }
            out.push_quad(Rect::new(
                self.origin.x + col as f32 * advance,
                self.origin.y + row as f32 * line,
                advance,
                size,
            ));
        });
    }
}

impl RenderCommand {
    /// Creates a text command.
    #[inline]
    pub fn text(z: ZIndex, text: TextCmd, material: MaterialKey) -> Self {
        Self::new(Shape::Text(text)).with_z(z).with_material(material)
    }
}
