use gridform_engine::engine::{EvalOptions, Evaluator, SheetGrid};
use std::path::PathBuf;

/// Rows in a new sheet.
pub const DEFAULT_ROWS: usize = 20;
/// Columns in a new sheet.
pub const DEFAULT_COLS: usize = 10;

/// Maximum number of undo entries to keep
pub(crate) const MAX_UNDO_STACK: usize = 100;

/// UI-agnostic document state for the spreadsheet.
///
/// The document owns the grid and its extents; the engine only sees it
/// through `&mut` for the duration of one formula.
pub struct Document {
    pub grid: SheetGrid,
    /// Evaluator configured with the document's options
    pub evaluator: Evaluator,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the grid has been modified
    pub modified: bool,
    /// Grid snapshots taken before each change
    pub undo_stack: Vec<SheetGrid>,
    pub redo_stack: Vec<SheetGrid>,
}

impl Document {
    /// Create an empty document with the default 20x10 extent.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new() -> Self {
        Self::with_extent(DEFAULT_ROWS, DEFAULT_COLS)
    }

    pub fn with_extent(rows: usize, cols: usize) -> Self {
        Document {
            grid: SheetGrid::new(rows, cols),
            evaluator: Evaluator::default(),
            file_path: None,
            modified: false,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: EvalOptions) -> Self {
        self.evaluator = Evaluator::new(options);
        self
    }

    /// Create a document and load a CSV file if provided.
    ///
    /// A path that does not exist yet becomes the save target of an empty sheet.
    pub fn with_file(path: Option<PathBuf>, rows: usize, cols: usize) -> crate::Result<Self> {
        let mut doc = Self::with_extent(rows, cols);
        if let Some(p) = path {
            if p.exists() {
                doc.load_csv(&p)?;
            } else {
                doc.file_path = Some(p);
                doc.modified = false;
            }
        }
        Ok(doc)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
