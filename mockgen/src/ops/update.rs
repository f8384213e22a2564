//! Update operation - merge a regenerated mock into the existing file.

use std::path::Path;

use mockgen_codegen_go::{MockGenerator, MockOptions, formatter_for, merge};
use mockgen_core::{Config, File, FileRules, Result, SourceContext};

use super::{discover::find_mock, resolve, source_dir};
use crate::reports::{GenerationResult, UpdateReport};

/// Options for the update operation.
pub struct UpdateOptions<'a> {
    /// Go file, package directory or descriptor file declaring the type.
    pub source: &'a Path,
    /// Interface or function type the mock implements.
    pub interface: &'a str,
    pub config: &'a Config,
    /// Whether to preview without writing.
    pub dry_run: bool,
}

/// Execute the update operation.
///
/// Methods whose signature did not change keep their existing text;
/// the file is rewritten once with the merged result.
pub fn update(opts: UpdateOptions) -> Result<UpdateReport> {
    let _span = tracing::info_span!("update", interface = opts.interface).entered();

    let iface = resolve(opts.source, opts.interface, opts.config)?;
    let options = MockOptions::from_config(opts.config);
    let mock_dir = source_dir(opts.source).join(options.mock_package_name(&iface));
    let (path, existing) = find_mock(&mock_dir, &iface.qualified_name())?;
    let filename = path.display().to_string();

    let struct_name = merge::struct_name(&existing).ok_or_else(|| {
        SourceContext::new(existing.as_str(), filename.as_str())
            .extraction_error("no mock struct declaration found", None)
    })?;
    tracing::debug!(path = %filename, struct_name = %struct_name, "updating mock");

    let generator = MockGenerator::new(&iface, struct_name.as_str()).with_options(options);
    let fresh = generator.generate_formatted(formatter_for(&opts.config.format).as_ref())?;
    let merged = merge::merge(&existing, &fresh, &filename)?;

    let regenerated = iface
        .methods
        .iter()
        .map(|m| m.name.clone())
        .filter(|name| !merged.preserved.contains(name) && !merged.added.contains(name))
        .collect();

    let file = File::new(path, merged.content).with_rules(FileRules::replace());
    let result = if opts.dry_run {
        GenerationResult::Preview(file.content().to_string())
    } else {
        file.write()?;
        GenerationResult::Written
    };

    Ok(UpdateReport {
        interface: iface.qualified_name(),
        struct_name,
        path: file.path().to_path_buf(),
        preserved: merged.preserved,
        regenerated,
        added: merged.added,
        removed: merged.removed,
        result,
    })
}
