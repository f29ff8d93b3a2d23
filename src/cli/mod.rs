pub mod build;
pub mod check;
pub mod completions;
pub mod init;
pub mod inspect;
pub mod watch;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::discovery::{self, Manifest, Project, MANIFEST_FILENAME};
use crate::error::Result;
use crate::exports::ExportFormat;
use crate::preprocess::{Pipeline, RunOptions};
use crate::store::Backend;

/// rdftex - expand RDF directives in LaTeX sources
#[derive(Parser, Debug)]
#[command(name = "rdftex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process all *.rdf.tex files and write the export document
    Build(build::BuildArgs),

    /// Process everything without writing any file
    Check(check::CheckArgs),

    /// Rebuild whenever a source changes
    Watch(watch::WatchArgs),

    /// Show what the knowledge store knows about a content node
    Inspect(inspect::InspectArgs),

    /// Initialize an rdftex project (generates rdftex.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Project selection and manifest overrides shared by the commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project directory containing rdftex.yaml
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Directory scanned for *.rdf.tex sources
    #[arg(long)]
    pub texdir: Option<PathBuf>,

    /// Where the export document is written
    #[arg(long)]
    pub export_path: Option<PathBuf>,

    /// Export document format
    #[arg(long, value_enum)]
    pub export_format: Option<ExportFormat>,

    /// Knowledge-store backend
    #[arg(long)]
    pub backend: Option<String>,

    /// Knowledge-store file
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Directory Figure media are looked up in
    #[arg(long)]
    pub media_root: Option<PathBuf>,

    /// Resolver timeout in milliseconds (0 disables)
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

impl ProjectArgs {
    /// Apply command-line overrides on top of the manifest.
    pub fn apply(&self, manifest: &mut Manifest) {
        if let Some(texdir) = &self.texdir {
            manifest.texdir = texdir.clone();
        }
        if let Some(path) = &self.export_path {
            manifest.exportpath = path.clone();
        }
        if let Some(format) = self.export_format {
            manifest.export_format = format;
        }
        if let Some(backend) = &self.backend {
            manifest.backend = backend.clone();
        }
        if let Some(store) = &self.store {
            manifest.store = store.clone();
        }
        if let Some(media_root) = &self.media_root {
            manifest.media_root = Some(media_root.clone());
        }
        if let Some(timeout) = self.timeout_ms {
            manifest.resolver_timeout_ms = timeout;
        }
    }

    /// Discover the project and apply overrides.
    pub fn load_project(&self) -> Result<Project> {
        let manifest_path = self.path.join(MANIFEST_FILENAME);
        let has_manifest = manifest_path.exists();
        let mut manifest = if has_manifest {
            Manifest::load(&manifest_path)?
        } else {
            Manifest::default()
        };

        self.apply(&mut manifest);
        Ok(discovery::from_manifest(self.path.clone(), manifest, has_manifest))
    }
}

/// Open the configured backend and bind a pipeline to it.
///
/// The backend name is checked before the store file is touched.
pub fn open_pipeline(project: &Project, dry_run: bool) -> Result<Pipeline<Backend>> {
    let manifest = &project.manifest;
    Backend::ensure_supported(&manifest.backend)?;

    let backend = Backend::open(&manifest.backend, &project.store_path, &project.media_root)?;

    Ok(Pipeline::new(
        backend,
        RunOptions {
            export_path: project.export_path.clone(),
            export_format: manifest.export_format,
            resolver_timeout: manifest.resolver_timeout(),
            dry_run,
        },
    ))
}
