use std::{fs, io::Write, path::Path};

use tempfile::Builder;

use crate::processor::{ProcessorError, Stats, merger::GlobalAggregate};

/// Renders the finished aggregate as `key=min/mean/max` lines.
///
/// Keys are sorted byte-wise and written verbatim. Lines are joined with
/// `\n`; there is no trailing newline, and an empty aggregate renders to
/// nothing.
pub fn render(global: GlobalAggregate<'_>) -> Vec<u8> {
    render_sorted(&global.into_sorted())
}

pub fn render_sorted(entries: &[(&[u8], Stats)]) -> Vec<u8> {
    let mut out = Vec::with_capacity(entries.len() * 32);
    for (i, (key, stats)) in entries.iter().enumerate() {
        if i > 0 {
            out.push(b'\n');
        }
        out.extend_from_slice(key);
        out.push(b'=');
        out.extend_from_slice(stats.to_string().as_bytes());
    }
    out
}

/// Writes `bytes` to `path` through a temporary file in the same directory,
/// so the destination either holds the full report or is left untouched.
///
/// A new file gets the usual `0666 & !umask` mode; an existing destination
/// keeps its permissions.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), ProcessorError> {
    let output_err = |source| ProcessorError::Output {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    builder.prefix(".chunk-aggregator");
    set_default_mode(&mut builder);
    let mut tmp = builder.tempfile_in(dir).map_err(output_err)?;

    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(output_err)?;
    }

    tmp.write_all(bytes).map_err(output_err)?;
    tmp.flush().map_err(output_err)?;
    tmp.persist(path).map_err(|e| output_err(e.error))?;
    Ok(())
}

#[cfg(unix)]
fn set_default_mode(builder: &mut Builder<'_, '_>) {
    use std::os::unix::fs::PermissionsExt;

    // the umask is applied at creation, as for any regular file
    builder.permissions(fs::Permissions::from_mode(0o666));
}

#[cfg(not(unix))]
fn set_default_mode(_builder: &mut Builder<'_, '_>) {}
