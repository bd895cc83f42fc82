use crate::error::Result;
use crate::types::SplitResult;
use std::io::{Cursor, Write};
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub struct ArchivePackager;

impl ArchivePackager {
    pub fn package(results: &[SplitResult]) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

            for result in results {
                zip.start_file(result.filename.as_str(), options)?;
                zip.write_all(&result.content)?;
                debug!("Archived '{}' ({} bytes)", result.filename, result.content.len());
            }

            zip.finish()?;
        }

        info!("Packaged {} files into {} byte archive", results.len(), buffer.len());
        Ok(buffer)
    }
}
