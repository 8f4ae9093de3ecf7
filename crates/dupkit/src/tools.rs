//! Tool registry: which tools exist, what shape their results have, and
//! what the table shows for each of them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    DuplicateFiles,
    EmptyFolders,
    BigFiles,
    EmptyFiles,
    SimilarImages,
    SimilarVideos,
    MusicDuplicates,
}

pub const ALL_TOOLS: [ToolKind; 7] = [
    ToolKind::DuplicateFiles,
    ToolKind::EmptyFolders,
    ToolKind::BigFiles,
    ToolKind::EmptyFiles,
    ToolKind::SimilarImages,
    ToolKind::SimilarVideos,
    ToolKind::MusicDuplicates,
];

/// Column identity, shared between the table layout and the comparator
/// registry. The sort semantic (numeric vs text) is keyed off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnId {
    Size,
    FileName,
    FolderName,
    Path,
    Modified,
    Similarity,
    Dimensions,
    Title,
    Artist,
    Year,
    Bitrate,
    Length,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub id: ColumnId,
    pub title: &'static str,
    pub width: u16,
}

const fn col(id: ColumnId, title: &'static str, width: u16) -> Column {
    Column { id, title, width }
}

/// Which entry fields the text filter is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    FileName,
    Path,
    Title,
    Artist,
}

/// Auto-selection criteria for grouped tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectCriterion {
    LargestSize,
    SmallestSize,
    Newest,
    Oldest,
    HighestResolution,
    LowestResolution,
}

impl SelectCriterion {
    pub fn label(self) -> &'static str {
        match self {
            SelectCriterion::LargestSize => "Select the biggest size",
            SelectCriterion::SmallestSize => "Select the smallest size",
            SelectCriterion::Newest => "Select the newest",
            SelectCriterion::Oldest => "Select the oldest",
            SelectCriterion::HighestResolution => "Select the highest resolution",
            SelectCriterion::LowestResolution => "Select the lowest resolution",
        }
    }
}

const FILE_COLUMNS: &[Column] = &[
    col(ColumnId::Size, "Size", 12),
    col(ColumnId::FileName, "File name", 24),
    col(ColumnId::Path, "Path", 42),
    col(ColumnId::Modified, "Modified date", 20),
];

const FOLDER_COLUMNS: &[Column] = &[
    col(ColumnId::FolderName, "Folder name", 24),
    col(ColumnId::Path, "Path", 54),
    col(ColumnId::Modified, "Modified date", 20),
];

const IMAGE_COLUMNS: &[Column] = &[
    col(ColumnId::Similarity, "Similarity", 11),
    col(ColumnId::Size, "Size", 12),
    col(ColumnId::Dimensions, "Dimensions", 12),
    col(ColumnId::FileName, "File name", 22),
    col(ColumnId::Path, "Path", 32),
    col(ColumnId::Modified, "Modified date", 20),
];

const MUSIC_COLUMNS: &[Column] = &[
    col(ColumnId::Size, "Size", 10),
    col(ColumnId::FileName, "File name", 20),
    col(ColumnId::Title, "Title", 14),
    col(ColumnId::Artist, "Artist", 12),
    col(ColumnId::Year, "Year", 6),
    col(ColumnId::Bitrate, "Bitrate", 10),
    col(ColumnId::Length, "Length", 8),
    col(ColumnId::Path, "Path", 28),
];

const NAME_PATH_FIELDS: &[SearchField] = &[SearchField::FileName, SearchField::Path];
const MUSIC_FIELDS: &[SearchField] = &[
    SearchField::FileName,
    SearchField::Path,
    SearchField::Title,
    SearchField::Artist,
];

const SIZE_DATE_CRITERIA: &[SelectCriterion] = &[
    SelectCriterion::LargestSize,
    SelectCriterion::SmallestSize,
    SelectCriterion::Newest,
    SelectCriterion::Oldest,
];

const IMAGE_CRITERIA: &[SelectCriterion] = &[
    SelectCriterion::HighestResolution,
    SelectCriterion::LowestResolution,
    SelectCriterion::LargestSize,
    SelectCriterion::SmallestSize,
    SelectCriterion::Newest,
    SelectCriterion::Oldest,
];

impl ToolKind {
    pub fn label(self) -> &'static str {
        match self {
            ToolKind::DuplicateFiles => "Duplicate Files",
            ToolKind::EmptyFolders => "Empty Folders",
            ToolKind::BigFiles => "Big Files",
            ToolKind::EmptyFiles => "Empty Files",
            ToolKind::SimilarImages => "Similar Images",
            ToolKind::SimilarVideos => "Similar Videos",
            ToolKind::MusicDuplicates => "Music Duplicates",
        }
    }

    /// Grouped tools deliver (reference, members) tuples; the rest deliver
    /// flat record lists.
    pub fn is_grouped(self) -> bool {
        matches!(
            self,
            ToolKind::DuplicateFiles
                | ToolKind::SimilarImages
                | ToolKind::SimilarVideos
                | ToolKind::MusicDuplicates
        )
    }

    pub fn columns(self) -> &'static [Column] {
        match self {
            ToolKind::DuplicateFiles | ToolKind::BigFiles | ToolKind::EmptyFiles => FILE_COLUMNS,
            ToolKind::EmptyFolders => FOLDER_COLUMNS,
            ToolKind::SimilarImages => IMAGE_COLUMNS,
            ToolKind::SimilarVideos => FILE_COLUMNS,
            ToolKind::MusicDuplicates => MUSIC_COLUMNS,
        }
    }

    pub fn search_fields(self) -> &'static [SearchField] {
        match self {
            ToolKind::MusicDuplicates => MUSIC_FIELDS,
            _ => NAME_PATH_FIELDS,
        }
    }

    /// Auto-selection criteria offered for this tool. Empty for flat tools.
    pub fn criteria(self) -> &'static [SelectCriterion] {
        match self {
            ToolKind::SimilarImages => IMAGE_CRITERIA,
            ToolKind::DuplicateFiles | ToolKind::SimilarVideos | ToolKind::MusicDuplicates => {
                SIZE_DATE_CRITERIA
            }
            _ => &[],
        }
    }

    /// File stem used when exporting this tool's results.
    pub fn save_file_stem(self) -> &'static str {
        match self {
            ToolKind::DuplicateFiles => "results_duplicates",
            ToolKind::EmptyFolders => "results_empty_folders",
            ToolKind::BigFiles => "results_big_files",
            ToolKind::EmptyFiles => "results_empty_files",
            ToolKind::SimilarImages => "results_similar_images",
            ToolKind::SimilarVideos => "results_similar_videos",
            ToolKind::MusicDuplicates => "results_music_duplicates",
        }
    }
}
