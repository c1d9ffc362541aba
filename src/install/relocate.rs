//! Path relocator (spec.md §4.2): rewrites `FILENAMES` when an install
//! targets a prefix other than the package's built-in `DEFAULTPREFIX`.

use crate::header::{RType, Tag, Tags};

use super::error::InstallError;

/// The relocated header plus the byte length of whichever prefix is now
/// in effect (spec.md §3 "Relocation result"), used downstream to size
/// path buffers the way the original pre-sized its own.
pub struct Relocated {
    pub header: Tags<Tag>,
    pub relocation_length: usize,
}

/// Relocates `header` so its files live under `new_prefix` instead of the
/// package's declared `DEFAULTPREFIX`, recording the effective prefix back
/// onto the result as `INSTALLPREFIX`. A `new_prefix` equal to the
/// package's own prefix is a no-op rewrite: the header is still cloned
/// (callers own the result uniformly) but `FILENAMES` is untouched.
///
/// Fatal (`NoRelocate`) if the package declares no `DEFAULTPREFIX` at all
/// -- such packages have no relocatable root to rewrite.
pub fn relocate(header: &Tags<Tag>, new_prefix: &str) -> Result<Relocated, InstallError> {
    let Some(default_prefix) = header.get_value(Tag::DefaultPrefix).and_then(RType::as_string) else {
        return Err(InstallError::NoRelocate);
    };

    let default_prefix = default_prefix.trim_end_matches('/').to_string();
    let new_prefix = new_prefix.trim_end_matches('/');

    if default_prefix == new_prefix {
        let relocated = header.clone_and_modify(|h| {
            h.insert(Tag::Installprefix, RType::String(default_prefix.clone()));
        });
        return Ok(Relocated {
            header: relocated,
            relocation_length: default_prefix.len() + 1,
        });
    }

    let relocated = header.clone_and_modify(|h| {
        let names = h.get_string_array(Tag::Filenames);
        let rewritten: Vec<String> = names
            .into_iter()
            .map(|name| rewrite_one(&name, &default_prefix, new_prefix))
            .collect();
        h.insert(Tag::Filenames, RType::StringArray(rewritten));
        h.insert(Tag::Installprefix, RType::String(new_prefix.to_owned()));
    });

    Ok(Relocated {
        header: relocated,
        relocation_length: new_prefix.len() + 1,
    })
}

/// Rewrites one file name under the new prefix. A name not actually
/// rooted under `default_prefix` is an anomaly (a mis-tagged file
/// shipped outside the package's own relocatable tree); spec.md still
/// asks for a best-effort rewrite rather than a hard failure, so the
/// default-prefix-length byte span is dropped and the remainder is
/// re-anchored at `/`.
fn rewrite_one(name: &str, default_prefix: &str, new_prefix: &str) -> String {
    match name.strip_prefix(default_prefix) {
        Some(rest) => format!("{new_prefix}{rest}"),
        None => {
            log::warn!("file {name} is not under default prefix {default_prefix}; relocating anomalously");
            let remainder = name.get(default_prefix.len()..).unwrap_or(name);
            format!("/{}", remainder.trim_start_matches('/'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_with_prefix(prefix: &str, files: &[&str]) -> Tags<Tag> {
        let mut h = Tags::new();
        h.insert(Tag::DefaultPrefix, RType::String(prefix.to_owned()));
        h.insert(
            Tag::Filenames,
            RType::StringArray(files.iter().map(|s| s.to_string()).collect()),
        );
        h
    }

    #[test]
    fn no_default_prefix_tag_is_fatal() {
        let header = Tags::new();
        assert!(matches!(relocate(&header, "/opt/x"), Err(InstallError::NoRelocate)));
    }

    #[test]
    fn equal_prefix_is_noop_but_records_installprefix() {
        let header = header_with_prefix("/usr", &["/usr/bin/foo"]);
        let result = relocate(&header, "/usr").unwrap();
        assert_eq!(result.relocation_length, "/usr".len() + 1);
        assert_eq!(result.header.get_string_array(Tag::Filenames), vec!["/usr/bin/foo"]);
        assert_eq!(result.header.get_string(Tag::Installprefix), "/usr");
    }

    #[test]
    fn differing_prefix_rewrites_filenames_and_records_installprefix() {
        let header = header_with_prefix("/usr", &["/usr/bin/foo", "/usr/etc/foo.conf"]);
        let result = relocate(&header, "/opt/pkg").unwrap();
        assert_eq!(result.relocation_length, "/opt/pkg".len() + 1);
        assert_eq!(
            result.header.get_string_array(Tag::Filenames),
            vec!["/opt/pkg/bin/foo", "/opt/pkg/etc/foo.conf"]
        );
        assert_eq!(result.header.get_string(Tag::Installprefix), "/opt/pkg");
    }

    #[test]
    fn file_outside_default_prefix_is_handled_anomalously() {
        let header = header_with_prefix("/usr", &["/etc/foo.conf"]);
        let result = relocate(&header, "/opt/pkg").unwrap();
        // "/etc/foo.conf" doesn't start with "/usr"; the anomaly branch
        // drops len("/usr") == 4 bytes from the front and re-anchors at "/".
        assert_eq!(result.header.get_string_array(Tag::Filenames), vec!["/oo.conf"]);
    }

    #[test]
    fn other_tags_survive_relocation_untouched() {
        let mut header = header_with_prefix("/usr", &["/usr/bin/foo"]);
        header.insert(Tag::Name, RType::String("foo".into()));
        let result = relocate(&header, "/opt/pkg").unwrap();
        assert_eq!(result.header.get_string(Tag::Name), "foo");
    }
}
