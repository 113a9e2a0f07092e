// Cells: the unit of displayable, clickable bar content

use ratatui::style::Style;
use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Opaque handle of a running module.
///
/// Assigned by the runtime's module table; cells and the line buffer only
/// ever hold this index, never the module itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub(crate) usize);

impl ModuleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Pointer cursor shape requested while hovering a cell
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerShape {
    #[default]
    Default,
    Pointer,
    Text,
}

impl PointerShape {
    /// Name understood by the terminal's pointer-shape protocol
    pub fn css_name(self) -> &'static str {
        match self {
            PointerShape::Default => "default",
            PointerShape::Pointer => "pointer",
            PointerShape::Text => "text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// A single grapheme cluster, empty for continuation slots
    pub grapheme: String,

    /// Display width in columns (1 or 2, 0 only for continuation slots)
    pub width: usize,

    pub style: Style,

    /// Opaque tag used by modules for click dispatch (e.g. a workspace name)
    pub metadata: String,

    /// Cursor hint while hovering this cell
    pub pointer: Option<PointerShape>,

    /// Whether the cell should be owned by the module that rendered it
    pub interactive: bool,

    /// Owning module, stamped by the compositor
    pub owner: Option<ModuleId>,
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

impl Cell {
    /// Background cell: a space with no owner
    pub fn blank() -> Self {
        Self {
            grapheme: " ".to_string(),
            width: 1,
            style: Style::default(),
            metadata: String::new(),
            pointer: None,
            interactive: false,
            owner: None,
        }
    }

    /// Build an interactive cell from one grapheme.
    ///
    /// Returns `None` for graphemes with no visible width (controls,
    /// lone combining marks).
    pub fn new(grapheme: &str, style: Style) -> Option<Self> {
        if grapheme.chars().any(char::is_control) {
            return None;
        }
        let width = grapheme.width();
        if width == 0 {
            return None;
        }
        Some(Self {
            grapheme: grapheme.to_string(),
            width: width.min(2),
            style,
            metadata: String::new(),
            pointer: None,
            interactive: true,
            owner: None,
        })
    }

    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = metadata.into();
        self
    }

    pub fn with_pointer(mut self, pointer: PointerShape) -> Self {
        self.pointer = Some(pointer);
        self
    }

    /// Mark the cell as decoration that never receives input
    pub fn inert(mut self) -> Self {
        self.interactive = false;
        self
    }

    /// Slot filling the trailing columns of a wide grapheme
    pub fn continuation(&self) -> Self {
        Self {
            grapheme: String::new(),
            width: 0,
            style: self.style,
            metadata: self.metadata.clone(),
            pointer: self.pointer,
            interactive: self.interactive,
            owner: self.owner,
        }
    }

    pub fn is_continuation(&self) -> bool {
        self.width == 0
    }
}

/// Split text into interactive cells sharing one style
pub fn cells_from_str(text: &str, style: Style) -> Vec<Cell> {
    text.graphemes(true)
        .filter_map(|g| Cell::new(g, style))
        .collect()
}

/// Total display width of a cell sequence
pub fn total_width(cells: &[Cell]) -> usize {
    cells.iter().map(|c| c.width).sum()
}

/// Concatenated glyphs of a cell sequence
pub fn line_text(cells: &[Cell]) -> String {
    cells.iter().map(|c| c.grapheme.as_str()).collect()
}
