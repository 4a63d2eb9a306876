use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use log::{debug, info};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use vendorfix_core::{manifest, PatchDescriptor};

pub const DEFAULT_MANIFEST: &str = "vendorfix.toml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Apply the built-in SlevomatCodingStandard fixes from the project root
    vendorfix apply

    # Show what would change without touching vendor/
    vendorfix apply --dry-run

    # Fail a CI step when any fix is still missing
    vendorfix check --root path/to/project

    # Read descriptors from stdin
    cat fixes.toml | vendorfix apply --manifest -

MANIFEST:
    Lookup order: --manifest, ./vendorfix.toml, built-in descriptor set."#)]
pub struct Args {
    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Apply every descriptor once; never fails on per-descriptor outcomes
    Apply {
        #[command(flatten)]
        source: ManifestSource,

        #[arg(long, help = "Directory relative targets are resolved against [default: .]")]
        root: Option<PathBuf>,

        #[arg(long, help = "Report what would change without writing")]
        dry_run: bool,
    },

    /// Dry run that exits with status 1 unless every descriptor is already applied
    Check {
        #[command(flatten)]
        source: ManifestSource,

        #[arg(long, help = "Directory relative targets are resolved against [default: .]")]
        root: Option<PathBuf>,
    },

    /// Print the descriptors that would be applied
    List {
        #[command(flatten)]
        source: ManifestSource,
    },
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ManifestSource {
    #[arg(
        short,
        long,
        value_name = "PATH",
        help = "Descriptor manifest (TOML), or '-' for stdin [default: ./vendorfix.toml, then built-in]"
    )]
    pub manifest: Option<PathBuf>,
}

impl ManifestSource {
    pub fn load(&self) -> Result<Vec<PatchDescriptor>> {
        self.load_from(Path::new("."))
    }

    /// Resolves the manifest, looking for the default file under `cwd`.
    pub fn load_from(&self, cwd: &Path) -> Result<Vec<PatchDescriptor>> {
        match &self.manifest {
            Some(path) if path.as_os_str() == "-" => {
                if atty::is(atty::Stream::Stdin) {
                    bail!("--manifest - given but no data piped from stdin");
                }
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read manifest from stdin")?;
                debug!("Manifest read from stdin");
                manifest::load_from_str(&buffer).context("Invalid manifest on stdin")
            }
            Some(path) => manifest::load_from_path(path)
                .with_context(|| format!("Failed to load manifest {:?}", path)),
            None => {
                let default_path = cwd.join(DEFAULT_MANIFEST);
                if default_path.exists() {
                    info!("Using manifest {:?}", default_path);
                    manifest::load_from_path(&default_path)
                        .with_context(|| format!("Failed to load manifest {:?}", default_path))
                } else {
                    info!("No {} found, using built-in descriptors", DEFAULT_MANIFEST);
                    manifest::builtin().context("Built-in manifest is invalid")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_no_subcommand_parses() {
        let args = Args::try_parse_from(["vendorfix"]).unwrap();
        assert!(args.command.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_apply_flags() {
        let args = Args::try_parse_from([
            "vendorfix",
            "apply",
            "--dry-run",
            "--root",
            "/project",
            "-m",
            "fixes.toml",
            "-v",
        ])
        .unwrap();
        assert!(args.verbose);
        match args.command {
            Some(Command::Apply {
                source,
                root,
                dry_run,
            }) => {
                assert!(dry_run);
                assert_eq!(root, Some(PathBuf::from("/project")));
                assert_eq!(source.manifest, Some(PathBuf::from("fixes.toml")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_falls_back_to_builtin() {
        let dir = tempdir().unwrap();
        let patches = ManifestSource::default().load_from(dir.path()).unwrap();
        assert_eq!(patches.len(), 5);
    }

    #[test]
    fn test_prefers_default_manifest_in_cwd() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_MANIFEST),
            "[[patch]]\ndescription = \"local\"\nfile = \"a.php\"\nsearch = \"a\"\nreplace = \"ab\"\ncheck = \"ab\"\n",
        )
        .unwrap();

        let patches = ManifestSource::default().load_from(dir.path()).unwrap();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].description, "local");
    }

    #[test]
    fn test_missing_explicit_manifest_fails() {
        let dir = tempdir().unwrap();
        let source = ManifestSource {
            manifest: Some(dir.path().join("nope.toml")),
        };
        assert!(source.load_from(dir.path()).is_err());
    }
}
