//! Archive compression with verify-before-delete.
//!
//! The uncompressed archive is the only copy of the rotated data, so the
//! ordering here is fixed: write the compressed sibling completely, read it
//! back and compare length and crc32 against what was encoded, and only
//! then delete the uncompressed original. On any failure the partial output
//! is removed and the original is left intact: rotation stays successful,
//! compression reports its own error.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use bzip2::read::BzDecoder;
use bzip2::write::BzEncoder;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tracing::{debug, info, warn};

use rollover_core::{ArchiveEntry, Compression, Error, Result};

use crate::naming;

/// Compress a rotated archive in place.
///
/// Returns the updated entry pointing at the compressed sibling. With
/// `Compression::None` the entry is returned unchanged. Dry-run computes
/// the would-be entry without touching the filesystem.
pub fn compress(entry: &ArchiveEntry, algorithm: Compression, dry_run: bool) -> Result<ArchiveEntry> {
    if algorithm == Compression::None {
        return Ok(entry.clone());
    }

    let target = naming::compressed_path(&entry.archive_path, algorithm);
    let mut compressed = ArchiveEntry {
        archive_path: target.clone(),
        compressed: true,
        algorithm,
        ..entry.clone()
    };

    if dry_run {
        debug!(
            path = %entry.archive_path.display(),
            target = %target.display(),
            %algorithm,
            "dry-run: would compress"
        );
        return Ok(compressed);
    }

    let fail = |reason: String| Error::CompressionFailed {
        path: entry.archive_path.clone(),
        reason,
    };

    let (original_len, compressed_len) =
        match encode_and_verify(&entry.archive_path, &target, algorithm) {
            Ok(sizes) => sizes,
            Err(reason) => {
                // Leave the uncompressed original; drop the partial output.
                if let Err(e) = fs::remove_file(&target) {
                    if e.kind() != io::ErrorKind::NotFound {
                        warn!(
                            path = %target.display(),
                            error = %e,
                            "failed to remove partial compressed output"
                        );
                    }
                }
                return Err(fail(reason));
            }
        };

    if let Err(e) = fs::remove_file(&entry.archive_path) {
        // Without the delete the slot holds two copies; undo the
        // compression so the state stays rotation-only.
        let _ = fs::remove_file(&target);
        return Err(fail(format!("failed to remove uncompressed original: {}", e)));
    }

    info!(
        path = %entry.archive_path.display(),
        target = %target.display(),
        %algorithm,
        original = original_len,
        compressed = compressed_len,
        "compressed archive"
    );

    compressed.original_size = original_len;
    compressed.compressed_size = Some(compressed_len);
    Ok(compressed)
}

/// Encode `input` into `output`, then re-read `output` and check that it
/// decompresses to the exact bytes that were encoded.
///
/// Returns `(original_len, compressed_len)` on success, a reason string on
/// failure (the caller owns cleanup).
fn encode_and_verify(
    input: &Path,
    output: &Path,
    algorithm: Compression,
) -> std::result::Result<(u64, u64), String> {
    let (len, crc) = encode(input, output, algorithm).map_err(|e| format!("encode: {}", e))?;
    let (read_len, read_crc) =
        decode_checksum(output, algorithm).map_err(|e| format!("verify: {}", e))?;
    if read_len != len || read_crc != crc {
        return Err(format!(
            "verification mismatch: wrote {} bytes (crc {:08x}), read back {} bytes (crc {:08x})",
            len, crc, read_len, read_crc
        ));
    }
    let compressed_len = fs::metadata(output)
        .map_err(|e| format!("stat compressed output: {}", e))?
        .len();
    Ok((len, compressed_len))
}

/// Stream `input` through the selected encoder into `output`, returning the
/// uncompressed length and crc32.
fn encode(input: &Path, output: &Path, algorithm: Compression) -> io::Result<(u64, u32)> {
    let mut reader = BufReader::new(File::open(input)?);
    let out = File::create(output)?;
    match algorithm {
        Compression::Gzip => {
            let mut encoder = GzEncoder::new(out, flate2::Compression::default());
            let sizes = copy_with_crc(&mut reader, &mut encoder)?;
            encoder.finish()?;
            Ok(sizes)
        }
        Compression::Bz2 => {
            let mut encoder = BzEncoder::new(out, bzip2::Compression::default());
            let sizes = copy_with_crc(&mut reader, &mut encoder)?;
            encoder.finish()?;
            Ok(sizes)
        }
        Compression::Zstd => {
            let mut encoder = zstd::Encoder::new(out, 0)?;
            let sizes = copy_with_crc(&mut reader, &mut encoder)?;
            encoder.finish()?;
            Ok(sizes)
        }
        Compression::None => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no compression algorithm selected",
        )),
    }
}

/// Decompress `path` into a sink, returning decompressed length and crc32.
fn decode_checksum(path: &Path, algorithm: Compression) -> io::Result<(u64, u32)> {
    let reader = BufReader::new(File::open(path)?);
    match algorithm {
        Compression::Gzip => copy_with_crc(&mut GzDecoder::new(reader), &mut io::sink()),
        Compression::Bz2 => copy_with_crc(&mut BzDecoder::new(reader), &mut io::sink()),
        Compression::Zstd => copy_with_crc(&mut zstd::Decoder::new(reader)?, &mut io::sink()),
        Compression::None => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no compression algorithm selected",
        )),
    }
}

/// `io::copy` that also folds the copied bytes into a crc32.
fn copy_with_crc<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<(u64, u32)> {
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = [0u8; 64 * 1024];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        writer.write_all(&buf[..n])?;
        total += n as u64;
    }
    Ok((total, hasher.finalize()))
}
