use super::file_operations::{read_file_content, target_exists, write_file_atomic};
use crate::error::{PatchError, Result};
use crate::matcher::{contains_bytes, substitute};
use crate::types::{Outcome, OutcomeEntry, PatchDescriptor, Report};
use log::{debug, info};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Directory that relative descriptor targets are resolved against.
    pub root: Option<PathBuf>,
    pub dry_run: bool,
}

/// Applies the descriptors in order, writing one progress line per
/// descriptor and a summary line to `out`.
///
/// Per-descriptor conditions never stop the run. The first I/O failure on an
/// existing target aborts it: the error is returned and later descriptors are
/// not attempted.
pub fn apply_all<W: Write>(
    descriptors: &[PatchDescriptor],
    options: &ApplyOptions,
    out: &mut W,
) -> Result<Report> {
    let mut report = Report::new(options.dry_run);

    for (i, descriptor) in descriptors.iter().enumerate() {
        debug!(
            "Descriptor #{} ({}): {}",
            i + 1,
            descriptor.kind,
            descriptor.description
        );
        let outcome = apply_descriptor(descriptor, options)?;
        let entry = OutcomeEntry {
            description: descriptor.description.clone(),
            target: descriptor.resolve_target(options.root.as_deref()),
            outcome,
        };

        writeln!(out, "{}", entry.progress_line(options.dry_run)).map_err(PatchError::Output)?;
        report.outcomes.push(entry);
    }

    writeln!(out, "{}", report.summary()).map_err(PatchError::Output)?;
    info!(
        "{} applied, {} already patched, {} not found, {} missing",
        report.applied(),
        report.already_patched(),
        report.not_found(),
        report.skipped_missing()
    );

    Ok(report)
}

pub fn apply_descriptor(descriptor: &PatchDescriptor, options: &ApplyOptions) -> Result<Outcome> {
    let path = descriptor.resolve_target(options.root.as_deref());
    let io_err = |source| PatchError::Io {
        path: path.clone(),
        description: descriptor.description.clone(),
        source,
    };

    if !target_exists(&path).map_err(io_err)? {
        return Ok(Outcome::SkippedMissing);
    }

    let content = read_file_content(&path).map_err(io_err)?;

    if contains_bytes(&content, descriptor.marker.as_bytes()) {
        return Ok(Outcome::AlreadyPatched);
    }

    let substitution = substitute(descriptor, &content)?;
    if !substitution.changed(&content) {
        return Ok(Outcome::NotFound);
    }

    if options.dry_run {
        debug!("Dry run, leaving {:?} untouched", path);
    } else {
        write_file_atomic(&path, &substitution.content).map_err(io_err)?;
    }

    Ok(Outcome::Applied {
        replacements: substitution.replacements,
    })
}
