//! Metadata-preserving copy.

use std::fs::{self, File, FileTimes};
use std::io;
use std::path::Path;

/// Copies content and permission bits, then access/modify times. Returns bytes copied.
pub(super) fn copy_with_times(src: &Path, dst: &Path) -> io::Result<u64> {
    let copied = fs::copy(src, dst)?;
    let meta = fs::metadata(src)?;
    let times = FileTimes::new()
        .set_accessed(meta.accessed()?)
        .set_modified(meta.modified()?);
    // Read-only handle: the copy may have inherited read-only permission bits.
    File::open(dst)?.set_times(times)?;
    Ok(copied)
}

/// Gives `dst` the owner and group of `src`.
#[cfg(unix)]
pub(super) fn copy_ownership(src: &Path, dst: &Path) -> io::Result<()> {
    use std::os::unix::fs::MetadataExt;
    let meta = fs::metadata(src)?;
    std::os::unix::fs::chown(dst, Some(meta.uid()), Some(meta.gid()))
}

#[cfg(not(unix))]
pub(super) fn copy_ownership(_src: &Path, _dst: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    #[test]
    fn modified_time_survives_copy() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.mp4");
        let dst = dir.path().join("b.mp4");
        fs::write(&src, b"data").unwrap();
        let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        File::options()
            .write(true)
            .open(&src)
            .unwrap()
            .set_modified(past)
            .unwrap();

        assert_eq!(copy_with_times(&src, &dst).unwrap(), 4);
        assert_eq!(fs::metadata(&dst).unwrap().modified().unwrap(), past);
        assert_eq!(fs::read(&dst).unwrap(), b"data");
    }

    #[cfg(unix)]
    #[test]
    fn permissions_and_owner_follow_source() {
        use std::os::unix::fs::{MetadataExt, PermissionsExt};
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.mp3");
        let dst = dir.path().join("b.mp3");
        fs::write(&src, b"x").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o640)).unwrap();

        copy_with_times(&src, &dst).unwrap();
        copy_ownership(&src, &dst).unwrap();
        let (s, d) = (fs::metadata(&src).unwrap(), fs::metadata(&dst).unwrap());
        assert_eq!(d.permissions().mode() & 0o777, 0o640);
        assert_eq!((d.uid(), d.gid()), (s.uid(), s.gid()));
    }
}
