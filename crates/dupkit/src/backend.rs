//! The scanning backend: a task that serves asynchronous requests and
//! pushes events back to the UI.
//!
//! The UI never blocks on the backend. It sends one request and reacts to
//! events later; filesystem work runs on blocking threads. A scan is
//! cancelled cooperatively through a shared flag — the backend always still
//! delivers a terminal `ScanResult` event, possibly with a partial batch.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::model::{RawRecord, RecordDetails, ScanPayload};
use crate::settings::ScanSettings;
use crate::tools::ToolKind;

#[derive(Debug, Clone)]
pub struct RenameItem {
    pub path: String,
    pub new_ext: String,
}

#[derive(Debug)]
pub enum BackendRequest {
    StartScan {
        tool: ToolKind,
        settings: ScanSettings,
    },
    StopScan,
    DeleteFiles {
        paths: Vec<String>,
        move_to_trash: bool,
    },
    MoveFiles {
        paths: Vec<String>,
        destination: String,
        copy_mode: bool,
        preserve_structure: bool,
        override_mode: bool,
    },
    RenameExtensions {
        items: Vec<RenameItem>,
    },
    SaveResult {
        tool: ToolKind,
        destination_dir: String,
    },
}

#[derive(Debug)]
pub enum BackendEvent {
    ScanProgress {
        current_step: u32,
        total_steps: u32,
        step_label: String,
    },
    ScanResult {
        tool: ToolKind,
        message: String,
        payload: ScanPayload,
    },
    DeleteFilesResult(OpResult),
    MoveFilesResult(OpResult),
    RenameExtResult(OpResult),
    SaveResultDone {
        message: String,
    },
}

/// Outcome of a batch file operation. Partial failure is normal: succeeded
/// paths and per-path errors travel together.
#[derive(Debug, Clone, Default)]
pub struct OpResult {
    pub success_paths: Vec<String>,
    pub errors: Vec<String>,
}

impl OpResult {
    fn merge(mut self, mut other: OpResult) -> OpResult {
        self.success_paths.append(&mut other.success_paths);
        self.errors.append(&mut other.errors);
        self
    }
}

/// The UI's side of the backend channels.
pub struct BackendHandle {
    pub requests: mpsc::Sender<BackendRequest>,
    pub events: mpsc::UnboundedReceiver<BackendEvent>,
}

impl BackendHandle {
    /// Spawn the backend task. With `demo` set it serves deterministic
    /// synthetic batches instead of touching the filesystem for scans;
    /// file operations always run for real.
    pub fn spawn(demo: bool) -> BackendHandle {
        let (request_tx, request_rx) = mpsc::channel(16);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let task = BackendTask {
            demo,
            events: event_tx,
            cancelled: Arc::new(AtomicBool::new(false)),
            last_results: Arc::new(Mutex::new(HashMap::new())),
        };
        tokio::spawn(task.run(request_rx));

        BackendHandle {
            requests: request_tx,
            events: event_rx,
        }
    }
}

struct BackendTask {
    demo: bool,
    events: mpsc::UnboundedSender<BackendEvent>,
    cancelled: Arc<AtomicBool>,
    /// Most recent batch per tool, kept for the save-result export.
    last_results: Arc<Mutex<HashMap<ToolKind, ScanPayload>>>,
}

impl BackendTask {
    async fn run(self, mut requests: mpsc::Receiver<BackendRequest>) {
        while let Some(request) = requests.recv().await {
            match request {
                BackendRequest::StartScan { tool, settings } => {
                    self.cancelled.store(false, Ordering::Relaxed);
                    let events = self.events.clone();
                    let cancelled = self.cancelled.clone();
                    let results = self.last_results.clone();
                    let demo = self.demo;
                    tokio::spawn(async move {
                        let worker_events = events.clone();
                        let scan = tokio::task::spawn_blocking(move || {
                            if demo {
                                demo_scan(tool, &worker_events, &cancelled)
                            } else {
                                run_scan(tool, &settings, &worker_events, &cancelled)
                            }
                        })
                        .await;

                        let (message, payload) = match scan {
                            Ok(outcome) => outcome,
                            Err(err) => {
                                warn!("scan worker panicked: {err}");
                                (format!("Scan failed: {err}"), empty_payload(tool))
                            }
                        };
                        results.lock().unwrap().insert(tool, payload.clone());
                        info!("scan finished: {}", message.lines().next().unwrap_or(""));
                        let _ = events.send(BackendEvent::ScanResult {
                            tool,
                            message,
                            payload,
                        });
                    });
                }
                BackendRequest::StopScan => {
                    info!("stop requested");
                    self.cancelled.store(true, Ordering::Relaxed);
                }
                BackendRequest::DeleteFiles {
                    paths,
                    move_to_trash,
                } => {
                    let events = self.events.clone();
                    tokio::spawn(async move {
                        let result =
                            tokio::task::spawn_blocking(move || delete_files(&paths, move_to_trash))
                                .await
                                .unwrap_or_default();
                        let _ = events.send(BackendEvent::DeleteFilesResult(result));
                    });
                }
                BackendRequest::MoveFiles {
                    paths,
                    destination,
                    copy_mode,
                    preserve_structure,
                    override_mode,
                } => {
                    let events = self.events.clone();
                    tokio::spawn(async move {
                        let result = tokio::task::spawn_blocking(move || {
                            move_files(
                                &paths,
                                &destination,
                                copy_mode,
                                preserve_structure,
                                override_mode,
                            )
                        })
                        .await
                        .unwrap_or_default();
                        let _ = events.send(BackendEvent::MoveFilesResult(result));
                    });
                }
                BackendRequest::RenameExtensions { items } => {
                    let events = self.events.clone();
                    tokio::spawn(async move {
                        let result =
                            tokio::task::spawn_blocking(move || rename_extensions(&items))
                                .await
                                .unwrap_or_default();
                        let _ = events.send(BackendEvent::RenameExtResult(result));
                    });
                }
                BackendRequest::SaveResult {
                    tool,
                    destination_dir,
                } => {
                    let payload = self.last_results.lock().unwrap().get(&tool).cloned();
                    let events = self.events.clone();
                    tokio::spawn(async move {
                        let message = tokio::task::spawn_blocking(move || {
                            save_result(tool, payload, &destination_dir)
                        })
                        .await
                        .map(|result| {
                            result.unwrap_or_else(|err| format!("Save failed: {err:#}"))
                        })
                        .unwrap_or_else(|err| format!("Save failed: {err}"));
                        let _ = events.send(BackendEvent::SaveResultDone { message });
                    });
                }
            }
        }
    }
}

fn empty_payload(tool: ToolKind) -> ScanPayload {
    if tool.is_grouped() {
        ScanPayload::Grouped(Vec::new())
    } else {
        ScanPayload::Flat(Vec::new())
    }
}

fn send_progress(
    events: &mpsc::UnboundedSender<BackendEvent>,
    current_step: u32,
    total_steps: u32,
    step_label: String,
) {
    let _ = events.send(BackendEvent::ScanProgress {
        current_step,
        total_steps,
        step_label,
    });
}

// ---------------------------------------------------------------------------
// Real scans
// ---------------------------------------------------------------------------

fn run_scan(
    tool: ToolKind,
    settings: &ScanSettings,
    events: &mpsc::UnboundedSender<BackendEvent>,
    cancelled: &Arc<AtomicBool>,
) -> (String, ScanPayload) {
    match tool {
        ToolKind::DuplicateFiles => scan_duplicate_files(settings, events, cancelled),
        ToolKind::BigFiles => scan_big_files(settings, events, cancelled),
        ToolKind::EmptyFiles => scan_empty_files(settings, events, cancelled),
        ToolKind::EmptyFolders => scan_empty_folders(settings, events, cancelled),
        ToolKind::SimilarImages | ToolKind::SimilarVideos | ToolKind::MusicDuplicates => (
            format!(
                "{} scanning needs media analysis and is only served by the demo backend",
                tool.label()
            ),
            empty_payload(tool),
        ),
    }
}

fn file_record(path: &Path, size: u64, modified: i64) -> RawRecord {
    RawRecord {
        path: path.to_string_lossy().to_string(),
        size,
        modified,
        details: RecordDetails::File,
    }
}

fn modified_epoch(metadata: &fs::Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .and_then(|time| time.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|duration| duration.as_secs() as i64)
        .unwrap_or(0)
}

fn is_excluded(path: &Path, excluded: &[String]) -> bool {
    excluded
        .iter()
        .any(|prefix| path.starts_with(Path::new(prefix)))
}

fn extension_allowed(path: &Path, allowed: &[String]) -> bool {
    if allowed.is_empty() {
        return true;
    }
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| allowed.iter().any(|allow| allow.to_lowercase() == ext))
}

/// Walk the included directories and collect candidate file records.
fn collect_files(
    settings: &ScanSettings,
    min_size: u64,
    events: &mpsc::UnboundedSender<BackendEvent>,
    cancelled: &Arc<AtomicBool>,
) -> Vec<RawRecord> {
    let mut records = Vec::new();
    for root in &settings.included_directories {
        let mut walker = WalkDir::new(root);
        if !settings.recursive_search {
            walker = walker.max_depth(1);
        }
        for dir_entry in walker.into_iter().filter_map(|e| e.ok()) {
            if cancelled.load(Ordering::Relaxed) {
                return records;
            }
            let path = dir_entry.path();
            if !dir_entry.file_type().is_file()
                || is_excluded(path, &settings.excluded_directories)
                || !extension_allowed(path, &settings.allowed_extensions)
            {
                continue;
            }
            let Ok(metadata) = dir_entry.metadata() else {
                continue;
            };
            let size = metadata.len();
            if size < min_size || size > settings.maximum_file_size {
                continue;
            }
            records.push(file_record(path, size, modified_epoch(&metadata)));
            if records.len() % 100 == 0 {
                send_progress(events, 1, 2, format!("Scanned {} files", records.len()));
            }
        }
    }
    records
}

fn scan_duplicate_files(
    settings: &ScanSettings,
    events: &mpsc::UnboundedSender<BackendEvent>,
    cancelled: &Arc<AtomicBool>,
) -> (String, ScanPayload) {
    let records = collect_files(settings, settings.minimum_file_size, events, cancelled);

    // Files that share a size are the only hash candidates.
    let mut by_size: HashMap<u64, Vec<RawRecord>> = HashMap::new();
    for record in records {
        by_size.entry(record.size).or_default().push(record);
    }
    let candidates: Vec<RawRecord> = by_size
        .into_values()
        .filter(|group| group.len() > 1)
        .flatten()
        .collect();

    let total = candidates.len();
    let hashed_count = AtomicUsize::new(0);
    let hashed: Vec<(String, RawRecord)> = candidates
        .into_par_iter()
        .filter_map(|record| {
            if cancelled.load(Ordering::Relaxed) {
                return None;
            }
            let hash = hash_file(Path::new(&record.path)).ok()?;
            let done = hashed_count.fetch_add(1, Ordering::Relaxed) + 1;
            if done % 50 == 0 {
                send_progress(events, 2, 2, format!("Hashed {done}/{total} candidates"));
            }
            Some((hash, record))
        })
        .collect();

    let mut by_hash: HashMap<(u64, String), Vec<RawRecord>> = HashMap::new();
    for (hash, record) in hashed {
        let record = RawRecord {
            details: RecordDetails::Duplicate { hash: hash.clone() },
            ..record
        };
        by_hash.entry((record.size, hash)).or_default().push(record);
    }

    let mut tuples: Vec<(Option<RawRecord>, Vec<RawRecord>)> = by_hash
        .into_values()
        .filter(|group| group.len() > 1)
        .map(|mut members| {
            members.sort_by(|a, b| a.path.cmp(&b.path));
            (None, members)
        })
        .collect();
    tuples.sort_by(|a, b| a.1[0].path.cmp(&b.1[0].path));

    let message = if cancelled.load(Ordering::Relaxed) {
        format!("Scan stopped, {} duplicate groups found so far", tuples.len())
    } else {
        format!("Found {} duplicate groups", tuples.len())
    };
    (message, ScanPayload::Grouped(tuples))
}

fn scan_big_files(
    settings: &ScanSettings,
    events: &mpsc::UnboundedSender<BackendEvent>,
    cancelled: &Arc<AtomicBool>,
) -> (String, ScanPayload) {
    let mut records = collect_files(settings, settings.minimum_file_size, events, cancelled);
    records.sort_by(|a, b| b.size.cmp(&a.size));
    records.truncate(settings.big_files_count);
    let message = format!("Found {} biggest files", records.len());
    (message, ScanPayload::Flat(records))
}

fn scan_empty_files(
    settings: &ScanSettings,
    events: &mpsc::UnboundedSender<BackendEvent>,
    cancelled: &Arc<AtomicBool>,
) -> (String, ScanPayload) {
    let records: Vec<RawRecord> = collect_files(settings, 0, events, cancelled)
        .into_iter()
        .filter(|record| record.size == 0)
        .collect();
    let message = format!("Found {} empty files", records.len());
    (message, ScanPayload::Flat(records))
}

fn scan_empty_folders(
    settings: &ScanSettings,
    events: &mpsc::UnboundedSender<BackendEvent>,
    cancelled: &Arc<AtomicBool>,
) -> (String, ScanPayload) {
    let mut records = Vec::new();
    for root in &settings.included_directories {
        for dir_entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let path = dir_entry.path();
            if !dir_entry.file_type().is_dir()
                || is_excluded(path, &settings.excluded_directories)
            {
                continue;
            }
            let is_empty = fs::read_dir(path)
                .map(|mut children| children.next().is_none())
                .unwrap_or(false);
            if !is_empty {
                continue;
            }
            let modified = dir_entry
                .metadata()
                .map(|metadata| modified_epoch(&metadata))
                .unwrap_or(0);
            records.push(RawRecord {
                path: path.to_string_lossy().to_string(),
                size: 0,
                modified,
                details: RecordDetails::Folder,
            });
            if records.len() % 100 == 0 {
                send_progress(events, 1, 1, format!("Found {} empty folders", records.len()));
            }
        }
    }
    let message = format!("Found {} empty folders", records.len());
    (message, ScanPayload::Flat(records))
}

fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hasher.finalize().to_hex().to_string())
}

// ---------------------------------------------------------------------------
// Demo scans — deterministic synthetic batches, no filesystem access
// ---------------------------------------------------------------------------

/// Small deterministic generator so demo batches are stable run to run.
struct DemoRng(u64);

impl DemoRng {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next() % (hi - lo)
    }
}

const DEMO_NAMES: [&str; 6] = ["vacation", "invoice", "backup", "screenshot", "render", "draft"];
const DEMO_DIMENSIONS: [(u32, u32); 4] = [(1920, 1080), (1280, 720), (3840, 2160), (640, 480)];
const DEMO_ARTISTS: [&str; 4] = ["The Lowlands", "Mira Vox", "Static Garden", "Q.E.D."];

fn demo_scan(
    tool: ToolKind,
    events: &mpsc::UnboundedSender<BackendEvent>,
    cancelled: &Arc<AtomicBool>,
) -> (String, ScanPayload) {
    let mut rng = DemoRng(0x5eed_0001 + tool as u64);

    if !tool.is_grouped() {
        let count = match tool {
            ToolKind::BigFiles => 60,
            ToolKind::EmptyFiles => 40,
            _ => 20,
        };
        let mut records = Vec::with_capacity(count);
        for index in 0..count {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let name = DEMO_NAMES[index % DEMO_NAMES.len()];
            let (size, details) = match tool {
                ToolKind::EmptyFiles => (0, RecordDetails::File),
                ToolKind::EmptyFolders => (0, RecordDetails::Folder),
                _ => (rng.range(1 << 20, 4 << 30), RecordDetails::File),
            };
            records.push(RawRecord {
                path: format!("/demo/{}/{name}_{index:03}", tool.save_file_stem()),
                size,
                modified: 1_600_000_000 + rng.range(0, 150_000_000) as i64,
                details,
            });
        }
        send_progress(events, 1, 1, format!("Collected {} items", records.len()));
        let message = format!("Found {} items (demo)", records.len());
        return (message, ScanPayload::Flat(records));
    }

    let group_count = 24;
    let mut tuples = Vec::with_capacity(group_count);
    for group in 0..group_count {
        if cancelled.load(Ordering::Relaxed) {
            break;
        }
        let member_count = 2 + (rng.next() % 3) as usize;
        let base_size = rng.range(64 << 10, 512 << 20);
        let base_modified = 1_500_000_000 + rng.range(0, 200_000_000) as i64;
        let name = DEMO_NAMES[group % DEMO_NAMES.len()];
        let hash = format!("{:016x}", rng.next());

        let members: Vec<RawRecord> = (0..member_count)
            .map(|member| {
                let details = match tool {
                    ToolKind::DuplicateFiles => RecordDetails::Duplicate { hash: hash.clone() },
                    ToolKind::SimilarImages => {
                        let (width, height) = DEMO_DIMENSIONS[(group + member) % DEMO_DIMENSIONS.len()];
                        RecordDetails::Image {
                            width,
                            height,
                            similarity: (rng.next() % 20) as u32,
                        }
                    }
                    ToolKind::SimilarVideos => RecordDetails::Video {
                        similarity: (rng.next() % 20) as u32,
                    },
                    _ => RecordDetails::Music {
                        title: format!("{name} session {group}"),
                        artist: DEMO_ARTISTS[group % DEMO_ARTISTS.len()].to_string(),
                        year: format!("{}", 1990 + (rng.next() % 35)),
                        genre: "electronic".to_string(),
                        bitrate: 128 + 64 * (rng.next() % 4) as u32,
                        length: format!("{}:{:02}", rng.range(1, 8), rng.range(0, 60)),
                    },
                };
                RawRecord {
                    path: format!("/demo/library_{member}/{name}_{group:03}.dat"),
                    // Duplicates share a size; similar items only roughly.
                    size: if tool == ToolKind::DuplicateFiles {
                        base_size
                    } else {
                        base_size + rng.range(0, 1 << 20)
                    },
                    modified: base_modified + member as i64 * 3600,
                    details,
                }
            })
            .collect();

        if group % 6 == 0 {
            send_progress(events, 1, 1, format!("Comparing group {group}/{group_count}"));
        }
        tuples.push((None, members));
    }

    let message = if cancelled.load(Ordering::Relaxed) {
        format!("Scan stopped, {} groups found so far (demo)", tuples.len())
    } else {
        format!("Found {} groups (demo)", tuples.len())
    };
    (message, ScanPayload::Grouped(tuples))
}

// ---------------------------------------------------------------------------
// File operations
// ---------------------------------------------------------------------------

fn trash_dir() -> PathBuf {
    std::env::temp_dir().join("dupkit-trash")
}

/// Move a path into the trash directory instead of unlinking it. A name
/// collision gets a numeric suffix rather than overwriting.
fn move_to_trash(path: &Path) -> Result<(), String> {
    let trash = trash_dir();
    fs::create_dir_all(&trash).map_err(|err| err.to_string())?;
    let name = path
        .file_name()
        .ok_or_else(|| "path has no file name".to_string())?;
    let mut target = trash.join(name);
    let mut suffix = 1;
    while target.exists() {
        target = trash.join(format!("{}.{suffix}", name.to_string_lossy()));
        suffix += 1;
    }
    move_item(path, &target).map_err(|err| err.to_string())
}

pub fn delete_files(paths: &[String], trash: bool) -> OpResult {
    paths
        .par_iter()
        .fold(OpResult::default, |mut result, path_str| {
            let path = Path::new(path_str);

            if !path.exists() {
                result.errors.push(format!("`{path_str}` not found"));
                return result;
            }

            let fs_result = if trash {
                move_to_trash(path)
            } else if path.is_dir() {
                fs::remove_dir(path).map_err(|err| err.to_string())
            } else {
                fs::remove_file(path).map_err(|err| err.to_string())
            };

            match fs_result {
                Ok(()) => result.success_paths.push(path_str.clone()),
                Err(err) => result
                    .errors
                    .push(format!("`{path_str}` Failed, reason: {err}")),
            }

            result
        })
        .reduce(OpResult::default, OpResult::merge)
}

pub fn move_files(
    paths: &[String],
    destination: &str,
    copy_mode: bool,
    preserve_structure: bool,
    override_mode: bool,
) -> OpResult {
    paths
        .par_iter()
        .fold(OpResult::default, |mut result, source_str| {
            let source_path = PathBuf::from(source_str);
            let source_name = match source_path.file_name() {
                Some(file_name) => file_name.to_string_lossy().to_string(),
                None => {
                    result
                        .errors
                        .push(format!("Failed to get file name of `{source_str}`"));
                    return result;
                }
            };
            let mut dest_path = PathBuf::from(destination);

            if preserve_structure {
                if let Some(parent) = source_path.parent() {
                    let relative_path = parent
                        .components()
                        .filter(|c| matches!(c, std::path::Component::Normal(_)))
                        .collect::<PathBuf>();
                    dest_path.push(relative_path);
                }
            }

            if let Err(err) = fs::create_dir_all(&dest_path) {
                result
                    .errors
                    .push(format!("`{source_str}` Failed, reason: {err}"));
                return result;
            }

            dest_path.push(&source_name);

            if dest_path.exists() && !override_mode {
                result
                    .errors
                    .push(format!("`{}` already exists", dest_path.to_string_lossy()));
                return result;
            }

            let fs_result = if copy_mode {
                fs::copy(&source_path, &dest_path).map(|_| ())
            } else {
                move_item(&source_path, &dest_path)
            };

            match fs_result {
                Ok(()) => result.success_paths.push(source_str.clone()),
                Err(err) => result
                    .errors
                    .push(format!("`{source_str}` Failed, reason: {err}")),
            }

            result
        })
        .reduce(OpResult::default, OpResult::merge)
}

/// Rename, falling back to copy + remove across filesystems.
fn move_item(source: &Path, dest: &Path) -> io::Result<()> {
    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(source, dest)?;
            fs::remove_file(source)
        }
    }
}

pub fn rename_extensions(items: &[RenameItem]) -> OpResult {
    items
        .par_iter()
        .fold(OpResult::default, |mut result, item| {
            let old_path = PathBuf::from(&item.path);
            let mut new_path = old_path.clone();

            new_path.set_extension(&item.new_ext);

            if new_path == old_path {
                result.success_paths.push(item.path.clone());
                return result;
            }

            match fs::rename(&old_path, &new_path) {
                Ok(()) => result.success_paths.push(item.path.clone()),
                Err(err) => result
                    .errors
                    .push(format!("`{}` Failed, reason: {err}", item.path)),
            }

            result
        })
        .reduce(OpResult::default, OpResult::merge)
}

fn save_result(
    tool: ToolKind,
    payload: Option<ScanPayload>,
    destination_dir: &str,
) -> Result<String> {
    let Some(payload) = payload else {
        return Ok(format!("Nothing to save for {}", tool.label()));
    };
    fs::create_dir_all(destination_dir)
        .with_context(|| format!("Failed to create {destination_dir}"))?;
    let target = Path::new(destination_dir).join(format!("{}.json", tool.save_file_stem()));
    let file = fs::File::create(&target)
        .with_context(|| format!("Failed to create {}", target.display()))?;
    serde_json::to_writer_pretty(file, &payload)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    Ok(format!("Saved results to {}", target.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    fn test_channel() -> (
        mpsc::UnboundedSender<BackendEvent>,
        mpsc::UnboundedReceiver<BackendEvent>,
    ) {
        mpsc::unbounded_channel()
    }

    fn scan_settings(root: &Path) -> ScanSettings {
        ScanSettings {
            included_directories: vec![root.to_string_lossy().to_string()],
            minimum_file_size: 0,
            ..ScanSettings::default()
        }
    }

    #[test]
    fn test_duplicate_scan_groups_identical_content() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.bin"), b"same contents").unwrap();
        fs::write(root.join("b.bin"), b"same contents").unwrap();
        fs::write(root.join("c.bin"), b"different data").unwrap();

        let (events, _rx) = test_channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let (_, payload) = scan_duplicate_files(&scan_settings(root), &events, &cancelled);

        let ScanPayload::Grouped(tuples) = payload else {
            panic!("duplicates payload must be grouped");
        };
        assert_eq!(tuples.len(), 1);
        assert_eq!(tuples[0].1.len(), 2);
        assert!(tuples[0].1.iter().all(|record| matches!(
            record.details,
            RecordDetails::Duplicate { .. }
        )));
    }

    #[test]
    fn test_empty_folders_scan() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("empty")).unwrap();
        fs::create_dir(root.join("full")).unwrap();
        fs::write(root.join("full/file.txt"), b"x").unwrap();

        let (events, _rx) = test_channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let (_, payload) = scan_empty_folders(&scan_settings(root), &events, &cancelled);

        let ScanPayload::Flat(records) = payload else {
            panic!("empty folders payload must be flat");
        };
        assert_eq!(records.len(), 1);
        assert!(records[0].path.ends_with("empty"));
        assert_eq!(records[0].details, RecordDetails::Folder);
    }

    #[test]
    fn test_delete_reports_partial_failure() {
        let temp = TempDir::new().unwrap();
        let existing = temp.path().join("doomed.txt");
        fs::write(&existing, b"bye").unwrap();
        let missing = temp.path().join("already-gone.txt");

        let result = delete_files(
            &[
                existing.to_string_lossy().to_string(),
                missing.to_string_lossy().to_string(),
            ],
            false,
        );

        assert_eq!(result.success_paths.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert!(!existing.exists());
    }

    #[test]
    fn test_move_respects_override_mode() {
        let temp = TempDir::new().unwrap();
        let source_dir = temp.path().join("src");
        let dest_dir = temp.path().join("dest");
        fs::create_dir_all(&source_dir).unwrap();
        fs::create_dir_all(&dest_dir).unwrap();
        let source = source_dir.join("file.txt");
        fs::write(&source, b"payload").unwrap();
        fs::write(dest_dir.join("file.txt"), b"occupied").unwrap();

        let paths = vec![source.to_string_lossy().to_string()];
        let blocked = move_files(&paths, &dest_dir.to_string_lossy(), false, false, false);
        assert!(blocked.success_paths.is_empty());
        assert_eq!(blocked.errors.len(), 1);
        assert!(source.exists());

        let forced = move_files(&paths, &dest_dir.to_string_lossy(), false, false, true);
        assert_eq!(forced.success_paths.len(), 1);
        assert!(!source.exists());
        assert_eq!(fs::read(dest_dir.join("file.txt")).unwrap(), b"payload");
    }

    #[test]
    fn test_rename_extension_noop_counts_as_success() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("photo.jpeg");
        fs::write(&file, b"img").unwrap();

        let result = rename_extensions(&[
            RenameItem {
                path: file.to_string_lossy().to_string(),
                new_ext: "jpg".to_string(),
            },
        ]);
        assert_eq!(result.success_paths.len(), 1);
        assert!(temp.path().join("photo.jpg").exists());

        let unchanged = rename_extensions(&[
            RenameItem {
                path: temp.path().join("photo.jpg").to_string_lossy().to_string(),
                new_ext: "jpg".to_string(),
            },
        ]);
        assert_eq!(unchanged.success_paths.len(), 1);
        assert!(unchanged.errors.is_empty());
    }

    #[test]
    fn test_demo_scan_is_deterministic_and_well_formed() {
        let (events, _rx) = test_channel();
        let cancelled = Arc::new(AtomicBool::new(false));

        let (_, first) = demo_scan(ToolKind::SimilarImages, &events, &cancelled);
        let (_, second) = demo_scan(ToolKind::SimilarImages, &events, &cancelled);

        let (ScanPayload::Grouped(first), ScanPayload::Grouped(second)) = (first, second) else {
            panic!("similar images payload must be grouped");
        };
        assert_eq!(first.len(), second.len());
        assert!(!first.is_empty());
        for (reference, members) in &first {
            assert!(reference.is_none());
            assert!(members.len() >= 2);
            assert!(members
                .iter()
                .all(|record| matches!(record.details, RecordDetails::Image { .. })));
        }
        assert_eq!(first[0].1[0].path, second[0].1[0].path);
    }

    #[test]
    fn test_cancelled_demo_scan_still_produces_a_batch() {
        let (events, _rx) = test_channel();
        let cancelled = Arc::new(AtomicBool::new(true));
        let (message, payload) = demo_scan(ToolKind::DuplicateFiles, &events, &cancelled);
        assert!(message.contains("stopped"));
        assert!(matches!(payload, ScanPayload::Grouped(tuples) if tuples.is_empty()));
    }

    #[test]
    fn test_save_result_writes_json() {
        let temp = TempDir::new().unwrap();
        let payload = ScanPayload::Flat(vec![RawRecord {
            path: "/x/a".to_string(),
            size: 3,
            modified: 0,
            details: RecordDetails::File,
        }]);
        let message = save_result(
            ToolKind::BigFiles,
            Some(payload),
            &temp.path().to_string_lossy(),
        )
        .unwrap();
        assert!(message.contains("results_big_files.json"));
        let written = fs::read_to_string(temp.path().join("results_big_files.json")).unwrap();
        assert!(written.contains("/x/a"));
    }
}
