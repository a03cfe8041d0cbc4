//! Command layer over [`Provisioner`]: what `pvctl apply` does and prints.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;

use crate::provisioner::Provisioner;

/// Load every path in order, report the staged count on `out` and submit.
///
/// Returns how many objects were sent. Any error is returned for the caller
/// to turn into a non-zero exit.
pub async fn apply<W: Write>(
    provisioner: &Provisioner,
    backend: &str,
    files: &[PathBuf],
    out: &mut W,
) -> anyhow::Result<usize> {
    for path in files {
        provisioner
            .load_from_path(path)
            .await
            .context("apply command returned error")?;
    }

    let staged = provisioner.objects_staged().await;
    if staged == 0 {
        writeln!(out, "No objects found for apply.")?;
        return Ok(0);
    }

    writeln!(out, "apply found {} object(s) loaded and ready to send.", staged)?;

    let sent = provisioner
        .submit_all(backend)
        .await
        .context("apply error sending object")?;

    Ok(sent)
}
