//! Archive extraction.
//!
//! Both formats extract into a fresh destination directory. Zip extraction
//! goes through a sibling temp directory first, so a failure partway
//! through leaves nothing at the destination.

use flate2::read::GzDecoder;
use spin_setup_core::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tar::Archive;
use tracing::{debug, trace};

fn io_error(operation: &str, path: &Path, e: impl std::fmt::Display) -> Error {
    Error::host(operation, format!("{}: {e}", path.display()))
}

/// Extract every entry of a zip archive into `dest`.
pub fn extract_zip(archive_path: &Path, dest: &Path) -> Result<PathBuf> {
    debug!(?archive_path, ?dest, "Extracting zip archive");

    let file = File::open(archive_path).map_err(|e| io_error("extract_zip", archive_path, e))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| io_error("extract_zip", archive_path, format!("failed to open zip: {e}")))?;

    let temp_dir = dest.with_file_name(format!(
        ".{}.tmp",
        dest.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("extract")
    ));
    if temp_dir.exists() {
        std::fs::remove_dir_all(&temp_dir).map_err(|e| io_error("extract_zip", &temp_dir, e))?;
    }
    std::fs::create_dir_all(&temp_dir).map_err(|e| io_error("extract_zip", &temp_dir, e))?;

    let extract_result = (|| -> std::io::Result<()> {
        for i in 0..archive.len() {
            let mut file = archive.by_index(i).map_err(std::io::Error::other)?;

            let Some(enclosed) = file.enclosed_name() else {
                trace!(name = file.name(), "Skipping zip entry outside archive root");
                continue;
            };
            let outpath = temp_dir.join(enclosed);

            if file.is_dir() {
                std::fs::create_dir_all(&outpath)?;
                continue;
            }
            if let Some(p) = outpath.parent() {
                std::fs::create_dir_all(p)?;
            }
            let mut content = Vec::new();
            file.read_to_end(&mut content)?;
            std::fs::write(&outpath, &content)?;

            #[cfg(unix)]
            if let Some(mode) = file.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
            }
        }
        Ok(())
    })();

    if let Err(e) = extract_result {
        let _ = std::fs::remove_dir_all(&temp_dir);
        return Err(io_error("extract_zip", archive_path, e));
    }

    if dest.exists() {
        std::fs::remove_dir_all(dest).map_err(|e| io_error("extract_zip", dest, e))?;
    }
    std::fs::rename(&temp_dir, dest).map_err(|e| io_error("extract_zip", dest, e))?;

    Ok(dest.to_path_buf())
}

/// Unpack a gzip-compressed tarball into `dest`.
pub fn extract_tar_gz(archive_path: &Path, dest: &Path) -> Result<PathBuf> {
    debug!(?archive_path, ?dest, "Extracting tar.gz archive");

    let file = File::open(archive_path).map_err(|e| io_error("extract_tar_gz", archive_path, e))?;
    std::fs::create_dir_all(dest).map_err(|e| io_error("extract_tar_gz", dest, e))?;

    let mut archive = Archive::new(GzDecoder::new(file));
    archive
        .unpack(dest)
        .map_err(|e| io_error("extract_tar_gz", archive_path, format!("failed to extract tar: {e}")))?;

    Ok(dest.to_path_buf())
}
