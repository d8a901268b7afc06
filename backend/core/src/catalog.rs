//! Tool catalog: the static registry of available document operations.
//!
//! Read-only at runtime. Consulted for navigation (by category) and for
//! resolving the active tool (by id).
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// History action label for files processed outside any tool context.
pub const DEFAULT_ACTION: &str = "Batch Processed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ToolCategory {
    Pdf,
    Office,
    Conversion,
}

impl ToolCategory {
    /// All categories, in navigation order.
    pub const ALL: [ToolCategory; 3] = [Self::Pdf, Self::Office, Self::Conversion];

    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF Tools",
            Self::Office => "Office Tools",
            Self::Conversion => "Conversion Tools",
        }
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => f.write_str("PDF"),
            Self::Office => f.write_str("OFFICE"),
            Self::Conversion => f.write_str("CONVERSION"),
        }
    }
}

impl FromStr for ToolCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PDF" => Ok(Self::Pdf),
            "OFFICE" => Ok(Self::Office),
            "CONVERSION" => Ok(Self::Conversion),
            other => Err(format!("unknown tool category: {other}")),
        }
    }
}

/// Static metadata describing one available operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub category: ToolCategory,
    pub description: &'static str,
    /// Label written to the activity history for files processed by this tool.
    pub action: &'static str,
}

const fn tool(
    id: &'static str,
    name: &'static str,
    icon: &'static str,
    category: ToolCategory,
    description: &'static str,
    action: &'static str,
) -> ToolDescriptor {
    ToolDescriptor { id, name, icon, category, description, action }
}

static TOOLS: [ToolDescriptor; 10] = [
    // PDF
    tool("merge-pdf", "Merge PDF", "picture_as_pdf", ToolCategory::Pdf,
        "Combine multiple PDFs into one single document.", "Merged"),
    tool("compress-pdf", "Compress PDF", "compress", ToolCategory::Pdf,
        "Reduce PDF file size while maintaining quality.", "Compressed"),
    tool("split-pdf", "Split PDF", "content_cut", ToolCategory::Pdf,
        "Extract specific pages from your PDF files.", "Split"),
    tool("protect-pdf", "Protect PDF", "lock", ToolCategory::Pdf,
        "Add password protection to your sensitive documents.", "Protected"),
    // Office
    tool("word-to-pdf", "Word to PDF", "description", ToolCategory::Office,
        "Convert Microsoft Word documents to PDF format.", "PDF Convert"),
    tool("excel-to-pdf", "Excel to PDF", "table_chart", ToolCategory::Office,
        "Convert Excel spreadsheets into professional PDFs.", "PDF Convert"),
    tool("ppt-to-pdf", "PPT to PDF", "present_to_all", ToolCategory::Office,
        "Turn PowerPoint slides into high-quality PDFs.", "PDF Convert"),
    // Conversion
    tool("jpg-to-pdf", "JPG to PDF", "image", ToolCategory::Conversion,
        "Convert image files like JPG and PNG to PDF.", "PDF Convert"),
    tool("ocr-pdf", "OCR PDF", "translate", ToolCategory::Conversion,
        "Extract editable text from scanned PDF documents.", "Text Extracted"),
    tool("pdf-to-word", "PDF to Word", "article", ToolCategory::Conversion,
        "Convert PDF back to editable Word documents.", "Word Convert"),
];

/// Lookup surface over the built-in tools.
pub struct ToolCatalog;

impl ToolCatalog {
    pub fn all() -> &'static [ToolDescriptor] {
        &TOOLS
    }

    pub fn by_id(id: &str) -> Option<&'static ToolDescriptor> {
        TOOLS.iter().find(|t| t.id == id)
    }

    /// Tools in a category, in declaration order.
    pub fn by_category(category: ToolCategory) -> Vec<&'static ToolDescriptor> {
        TOOLS.iter().filter(|t| t.category == category).collect()
    }

    pub fn categories() -> &'static [ToolCategory] {
        &ToolCategory::ALL
    }

    /// History label for a tool context; unknown or absent tools map to [`DEFAULT_ACTION`].
    pub fn action_label(tool_id: Option<&str>) -> &'static str {
        tool_id
            .and_then(Self::by_id)
            .map(|t| t.action)
            .unwrap_or(DEFAULT_ACTION)
    }
}
