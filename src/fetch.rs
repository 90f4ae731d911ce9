// Fetching the IPCA workbook.
//
// The IBGE publishes the series as a ZIP holding one `ipca_*.xls` workbook.
// The archive and its extraction directory are scratch space inside the target
// directory and are removed whether or not the fetch succeeds.
use crate::error::{PipelineError, Result};
use log::{info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const LOCAL_ZIP: &str = "ipca_data.zip";
const TEMP_DIR: &str = "temp_data_ipca";

/// Download `url` into `dest`, streaming the body.
pub fn download(url: &str, dest: &Path) -> Result<u64> {
    info!("downloading {}", url);
    let response = ureq::get(url).call().map_err(Box::new)?;
    let mut reader = response.into_reader();
    let mut file = fs::File::create(dest)?;
    let bytes = io::copy(&mut reader, &mut file)?;
    info!("download finished ({} bytes)", bytes);
    Ok(bytes)
}

/// Unpack `archive` into `dir`, replacing whatever was there.
pub fn extract(archive: &Path, dir: &Path) -> Result<()> {
    info!("extracting {}", archive.display());
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    let mut zip = zip::ZipArchive::new(fs::File::open(archive)?)?;
    zip.extract(dir)?;
    Ok(())
}

/// First file under `dir` (recursively) matching `pattern`, e.g. `ipca_*.xls`.
pub fn find_file(dir: &Path, pattern: &str) -> Result<Option<PathBuf>> {
    let full = format!(
        "{}/**/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        pattern
    );
    let mut matches: Vec<PathBuf> = glob::glob(&full)?
        .filter_map(|entry| entry.ok())
        .collect();
    matches.sort();
    Ok(matches.into_iter().next())
}

/// Move the workbook matching `pattern` out of an already-downloaded archive
/// into `target_dir`.
pub fn unpack_workbook(archive: &Path, target_dir: &Path, pattern: &str) -> Result<PathBuf> {
    let temp = target_dir.join(TEMP_DIR);
    extract(archive, &temp)?;
    let found = find_file(&temp, pattern)?.ok_or_else(|| {
        PipelineError::NotFound(format!(
            "no file matching '{}' in the extracted archive",
            pattern
        ))
    })?;
    let name = found
        .file_name()
        .ok_or_else(|| PipelineError::NotFound(format!("bad path {}", found.display())))?;
    let dest = target_dir.join(name);
    // rename fails across filesystems; the temp dir lives next to the target.
    fs::rename(&found, &dest)?;
    info!("workbook ready at {}", dest.display());
    Ok(dest)
}

/// Download the archive at `url` and leave the matching workbook in
/// `target_dir`. Scratch files are cleaned up in every case.
pub fn fetch_workbook(url: &str, target_dir: &Path, pattern: &str) -> Result<PathBuf> {
    fs::create_dir_all(target_dir)?;
    let zip_path = target_dir.join(LOCAL_ZIP);
    let result = download(url, &zip_path).and_then(|_| unpack_workbook(&zip_path, target_dir, pattern));
    cleanup(target_dir);
    result
}

fn cleanup(target_dir: &Path) {
    let zip_path = target_dir.join(LOCAL_ZIP);
    if zip_path.exists() {
        if let Err(e) = fs::remove_file(&zip_path) {
            warn!("could not remove {}: {}", zip_path.display(), e);
        }
    }
    let temp = target_dir.join(TEMP_DIR);
    if temp.exists() {
        if let Err(e) = fs::remove_dir_all(&temp) {
            warn!("could not remove {}: {}", temp.display(), e);
        }
    }
    info!("temporary files cleaned up");
}
