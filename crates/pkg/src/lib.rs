use anyhow::{anyhow, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use flate2::read::GzDecoder;
use fs_err as fs;

/// Unpacks a `.tar.gz` release archive into `dest`, returning every regular
/// file it contained at any depth. Directory entries are created but not
/// returned.
pub fn unpack_tar_gz(archive: &Utf8Path, dest: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    if !archive.exists() {
        anyhow::bail!("archive {} missing", archive);
    }
    fs::create_dir_all(dest)?;
    let file = fs::File::open(archive)?;
    let mut tar = tar::Archive::new(GzDecoder::new(file));
    tar.set_preserve_permissions(true);

    let mut files = Vec::new();
    for entry in tar
        .entries()
        .with_context(|| format!("reading {archive}"))?
    {
        let mut entry = entry.with_context(|| format!("reading {archive}"))?;
        let rel = entry.path()?.into_owned();
        let rel = Utf8PathBuf::from_path_buf(rel)
            .map_err(|p| anyhow!("non utf-8 archive entry {}", p.display()))?;
        let is_file = entry.header().entry_type().is_file();
        if !entry
            .unpack_in(dest)
            .with_context(|| format!("unpacking {rel} into {dest}"))?
        {
            anyhow::bail!("archive entry {rel} escapes {dest}");
        }
        if is_file {
            files.push(dest.join(rel));
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;

    fn build_archive(path: &Utf8Path, entries: &[(&str, &[u8])]) {
        let file = std::fs::File::create(path).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn unpacks_release_archive() {
        let dir = TempDir::new().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let archive = root.join("merge-raml-download.tar.gz");
        build_archive(&archive, &[("merge-raml", b"#!/bin/sh\n")]);

        let files = unpack_tar_gz(&archive, &root.join("bin")).unwrap();

        assert_eq!(files, vec![root.join("bin/merge-raml")]);
        assert_eq!(
            std::fs::read_to_string(root.join("bin/merge-raml")).unwrap(),
            "#!/bin/sh\n"
        );
    }

    #[test]
    fn lists_nested_files_but_not_directories() {
        let dir = TempDir::new().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let archive = root.join("release.tar.gz");
        {
            let file = std::fs::File::create(&archive).unwrap();
            let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
            let mut header = tar::Header::new_gnu();
            header.set_entry_type(tar::EntryType::Directory);
            header.set_size(0);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, "docs/", std::io::empty()).unwrap();
            builder.into_inner().unwrap().finish().unwrap();
        }
        let nested = root.join("nested.tar.gz");
        build_archive(&nested, &[("merge-raml", b"bin"), ("docs/README.md", b"readme")]);

        let dest = root.join("out");
        assert!(unpack_tar_gz(&archive, &dest).unwrap().is_empty());
        assert!(dest.join("docs").is_dir());

        let files = unpack_tar_gz(&nested, &dest).unwrap();
        assert_eq!(files, vec![dest.join("merge-raml"), dest.join("docs/README.md")]);
    }

    #[test]
    fn missing_archive_is_an_error() {
        let dir = TempDir::new().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        assert!(unpack_tar_gz(&root.join("nope.tar.gz"), root).is_err());
    }
}
