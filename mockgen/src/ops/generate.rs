//! Generate operation - write a new mock file.

use std::path::Path;

use mockgen_codegen_go::{MockGenerator, MockOptions, formatter_for};
use mockgen_core::{Config, Error, File, Result, is_ident_char, mock_file_name};

use super::{resolve, source_dir};
use crate::reports::{GenerateReport, GenerationResult};

/// Options for the generate operation.
pub struct GenerateOptions<'a> {
    /// Go file, package directory or descriptor file declaring the type.
    pub source: &'a Path,
    /// Interface or function type to mock.
    pub interface: &'a str,
    /// Name of the mock struct.
    pub struct_name: &'a str,
    pub config: &'a Config,
    /// Whether to preview without writing.
    pub dry_run: bool,
}

/// Execute the generate operation.
///
/// The mock is written to `<pkg><suffix>/<struct>.go` next to the source;
/// an existing file is never replaced.
pub fn generate(opts: GenerateOptions) -> Result<GenerateReport> {
    let _span = tracing::info_span!("generate", interface = opts.interface).entered();

    if !is_identifier(opts.struct_name) {
        return Err(Error::construction(format!(
            "'{}' is not a valid struct name",
            opts.struct_name
        )));
    }

    let iface = resolve(opts.source, opts.interface, opts.config)?;
    let generator = MockGenerator::new(&iface, opts.struct_name)
        .with_options(MockOptions::from_config(opts.config));
    let path = source_dir(opts.source)
        .join(generator.package_name())
        .join(mock_file_name(opts.struct_name));

    let formatter = formatter_for(&opts.config.format);
    tracing::debug!(formatter = formatter.name(), "formatting mock");
    let file = File::new(path, generator.generate_formatted(formatter.as_ref())?);

    let result = if opts.dry_run {
        GenerationResult::Preview(file.content().to_string())
    } else {
        file.write()?;
        GenerationResult::Written
    };

    Ok(GenerateReport {
        interface: iface.qualified_name(),
        struct_name: opts.struct_name.to_string(),
        path: file.path().to_path_buf(),
        methods: iface.methods.iter().map(|m| m.name.clone()).collect(),
        result,
    })
}

fn is_identifier(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && name.chars().all(is_ident_char)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use mockgen_core::ErrorKind;
    use tempfile::TempDir;

    use super::*;
    use crate::ops::fixtures::module_tree;

    fn options<'a>(source: &'a Path, config: &'a Config, dry_run: bool) -> GenerateOptions<'a> {
        GenerateOptions {
            source,
            interface: "Exampler",
            struct_name: "TestMock",
            config,
            dry_run,
        }
    }

    #[test]
    fn test_generate_writes_mock_next_to_source() {
        let tmp = TempDir::new().unwrap();
        module_tree(tmp.path());
        let source = tmp.path().join("test/inputnew/example/types.go");
        let config = Config::default();

        let report = generate(options(&source, &config, false)).unwrap();

        let expected = tmp.path().join("test/inputnew/example/examplemock/testmock.go");
        assert_eq!(report.path, expected);
        assert_eq!(report.interface, "example.Exampler");
        assert_eq!(report.methods, ["FunctionA", "FunctionC", "FunctionZ"]);
        assert!(matches!(report.result, GenerationResult::Written));

        let content = fs::read_to_string(&expected).unwrap();
        assert!(content.starts_with("package examplemock\n"));
        assert!(content.contains("type TestMock struct {\n\tmock.Mock\n}"));
        assert!(content.contains("\"github.com/fastbill/go-mock-gen/test/inputnew/model\""));
        assert!(content.contains("func (m *TestMock) FunctionA(user *model.StructA) (string, error) {"));
    }

    #[test]
    fn test_generate_refuses_existing_file() {
        let tmp = TempDir::new().unwrap();
        module_tree(tmp.path());
        let source = tmp.path().join("test/inputnew/example/types.go");
        let config = Config::default();

        generate(options(&source, &config, false)).unwrap();
        let err = generate(options(&source, &config, false)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Filesystem);
        assert!(matches!(*err, Error::AlreadyExists { .. }));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        module_tree(tmp.path());
        let source = tmp.path().join("test/inputnew/example");
        let config = Config::default();

        let report = generate(options(&source, &config, true)).unwrap();
        let GenerationResult::Preview(content) = &report.result else {
            panic!("expected a preview");
        };
        assert!(content.contains("type TestMock struct"));
        assert!(!report.path.exists());
        assert!(!tmp.path().join("test/inputnew/example/examplemock").exists());
    }

    #[test]
    fn test_configured_suffix() {
        let tmp = TempDir::new().unwrap();
        module_tree(tmp.path());
        let source = tmp.path().join("test/inputnew/example/types.go");
        let config =
            Config::from_str_with_filename("[mock]\nsuffix = \"fakes\"\n", "mockgen.toml").unwrap();

        let report = generate(options(&source, &config, false)).unwrap();
        assert!(report.path.ends_with("examplefakes/testmock.go"));
        let content = fs::read_to_string(&report.path).unwrap();
        assert!(content.starts_with("package examplefakes\n"));
    }

    #[test]
    fn test_invalid_struct_name() {
        let tmp = TempDir::new().unwrap();
        module_tree(tmp.path());
        let source = tmp.path().join("test/inputnew/example/types.go");
        let config = Config::default();

        let err = generate(GenerateOptions {
            struct_name: "Test-Mock",
            ..options(&source, &config, false)
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Construction);
    }
}
