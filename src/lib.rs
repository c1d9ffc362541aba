pub mod collab;
pub mod db;
pub mod header;
pub mod install;
pub mod lead;
pub mod payload;
pub mod utils;

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use xz2::read::XzDecoder;
use zstd::stream::read::Decoder as ZstdDecoder;

use header::{HeaderLead, IndexArray, SignatureTag, Tag, Tags};
use lead::Lead;
use utils::align_n_bytes;

/// A package file opened for reading: lead, signature tags, header tags,
/// and the byte offset where the (possibly compressed) cpio payload
/// starts. This is the read-side counterpart the install engine uses to
/// inspect an incoming package before reconciling it against the
/// database (spec.md §2 "Package reader").
pub struct PackageFile {
    pub lead: Lead,
    pub signature_tags: Tags<SignatureTag>,
    pub header_tags: Tags<Tag>,
    payload_offset: u64,
    file: File,
}

impl PackageFile {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut file = File::open(path)?;
        let lead = Lead::read(&mut file)?;

        let signature_lead = HeaderLead::read(&mut file)?;
        let signature_indexes = IndexArray::read(&mut file, signature_lead.nindex)?;
        let signature_tags = Tags::read(&mut file, &signature_indexes, signature_lead.hsize as usize)?;

        let pad = align_n_bytes(signature_lead.hsize, 8);
        file.seek(SeekFrom::Current(pad.into()))?;

        let header_lead = HeaderLead::read(&mut file)?;
        let header_indexes = IndexArray::read(&mut file, header_lead.nindex)?;
        let header_tags = Tags::read(&mut file, &header_indexes, header_lead.hsize as usize)?;

        let payload_offset = file.stream_position()?;

        Ok(PackageFile {
            lead,
            signature_tags,
            header_tags,
            payload_offset,
            file,
        })
    }

    /// A reader over the decompressed cpio payload, positioned at its start.
    pub fn payload_reader(&mut self) -> io::Result<Box<dyn Read + '_>> {
        self.file.seek(SeekFrom::Start(self.payload_offset))?;

        let compressor = self.header_tags.get_string_or(Tag::Payloadcompressor, "gzip");
        match compressor.as_str() {
            "gzip" => Ok(Box::new(GzDecoder::new(&self.file))),
            "bzip2" => Ok(Box::new(BzDecoder::new(&self.file))),
            "zstd" => Ok(Box::new(ZstdDecoder::new(&self.file)?)),
            "xz" | "lzma" => Ok(Box::new(XzDecoder::new(&self.file))),
            other => Err(io::Error::other(format!("unsupported payload compressor: {other}"))),
        }
    }
}

#[cfg(test)]
impl PackageFile {
    /// Test-only constructor: builds a `PackageFile` around an in-memory
    /// header and a gzip-compressed payload, skipping the lead/signature
    /// byte encoding real packages carry (spec.md's Non-goals exclude the
    /// on-disk header format, so nothing in `install::` depends on it --
    /// only on the `header_tags`/`payload_reader` surface this exercises).
    pub(crate) fn for_testing(lead: Lead, header_tags: Tags<Tag>, cpio_payload: &[u8]) -> io::Result<Self> {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut gz = GzEncoder::new(Vec::new(), Compression::default());
        gz.write_all(cpio_payload)?;
        let compressed = gz.finish()?;

        let mut file = tempfile::tempfile()?;
        file.write_all(&compressed)?;
        file.seek(SeekFrom::Start(0))?;

        Ok(PackageFile {
            lead,
            signature_tags: Tags::new(),
            header_tags,
            payload_offset: 0,
            file,
        })
    }
}
