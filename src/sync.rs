// ABOUTME: Depth-first traversal and sync driver with progress reporting
// ABOUTME: Converts each document, creates pages, records path-to-id mappings

use crate::api::NotionClient;
use crate::convert::markdown_to_blocks;
use crate::icon::select_icon;
use crate::inline::DOC_EXTENSIONS;
use crate::refs::PageMap;
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Run-scoped counters, reset per run and read once at the end for the
/// summary report.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncStats {
    pub processed: usize,
    pub skipped: usize,
    pub created: usize,
    pub folders_created: usize,
    pub errors: usize,
}

/// Sync an entire directory tree under the given root page.
///
/// Strictly sequential depth-first traversal, entries sorted by name so
/// link resolution order is deterministic. Page creation failures are
/// reported and counted but never abort the run.
pub fn sync_all(client: &NotionClient, source: &Path, root_page_id: &str) -> Result<SyncStats> {
    let total = count_files(source)?;

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40}] {pos}/{len} files")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut map = PageMap::new();
    let mut stats = SyncStats::default();
    sync_directory(client, source, source, root_page_id, &mut map, &mut stats, &pb)?;

    pb.finish_with_message(format!(
        "synced {} files ({} created, {} skipped, {} errors)",
        stats.processed, stats.created, stats.skipped, stats.errors
    ));

    Ok(stats)
}

fn sync_directory(
    client: &NotionClient,
    dir: &Path,
    source_root: &Path,
    parent_id: &str,
    map: &mut PageMap,
    stats: &mut SyncStats,
    pb: &ProgressBar,
) -> Result<()> {
    for path in sorted_entries(dir)? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if path.is_dir() {
            let page_id = match find_or_create_folder(client, parent_id, &name, stats, pb) {
                Ok(id) => id,
                Err(e) => {
                    pb.println(format!("failed to create folder {}: {}", name, e));
                    stats.errors += 1;
                    continue;
                }
            };
            sync_directory(client, &path, source_root, &page_id, map, stats, pb)?;
        } else {
            stats.processed += 1;

            if !is_document(&name) {
                pb.println(format!("skipping non-text file: {}", name));
            } else if let Err(e) =
                sync_file(client, &path, &name, source_root, parent_id, map, stats, pb)
            {
                pb.println(format!("failed to sync {}: {}", name, e));
                stats.errors += 1;
            }

            pb.inc(1);
        }
    }

    Ok(())
}

fn find_or_create_folder(
    client: &NotionClient,
    parent_id: &str,
    name: &str,
    stats: &mut SyncStats,
    pb: &ProgressBar,
) -> Result<String> {
    if let Some(id) = client.find_page_by_title(parent_id, name)? {
        return Ok(id);
    }

    let icon = select_icon(name);
    pb.println(format!("creating folder: {} {}", icon, name));
    let id = client.create_page(parent_id, name, icon, &[])?;
    stats.folders_created += 1;
    Ok(id)
}

#[allow(clippy::too_many_arguments)]
fn sync_file(
    client: &NotionClient,
    path: &Path,
    name: &str,
    source_root: &Path,
    parent_id: &str,
    map: &mut PageMap,
    stats: &mut SyncStats,
    pb: &ProgressBar,
) -> Result<()> {
    let relative = relative_key(path, source_root);

    if let Some(id) = client.find_page_by_title(parent_id, name)? {
        pb.println(format!("skipping existing: {}", name));
        stats.skipped += 1;
        // Register skipped pages too, so later documents can link here.
        map.insert(relative, id);
        return Ok(());
    }

    let content = fs::read_to_string(path)?;
    let blocks = markdown_to_blocks(&content, Some(&relative), map);
    let children: Vec<Value> = blocks.iter().map(|b| b.to_json()).collect();

    let icon = select_icon(name);
    pb.println(format!("creating: {} {}", icon, name));
    let id = client.create_page(parent_id, name, icon, &children)?;
    map.insert(relative, id);
    stats.created += 1;
    Ok(())
}

fn is_document(name: &str) -> bool {
    DOC_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Forward-slash relative path used as the cross-reference key.
fn relative_key(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|e| e.path())
        .collect();
    entries.sort();
    Ok(entries)
}

fn count_files(dir: &Path) -> Result<usize> {
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            count += count_files(&path)?;
        } else {
            count += 1;
        }
    }
    Ok(count)
}
