mod color;
mod geometry;
mod merge;
mod model;
mod object;
mod observer;
mod project;
mod template;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use merge::{Merge, MergeKind, MergeRecord};
use project::LabelDoc;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(author, version, about = "Print label documents or merge source files as JSON", long_about = None)]
struct Cli {
    /// Label document (.lsd) or delimited-text merge file
    #[arg(value_name = "FILE")]
    file: String,

    /// Merge format id for text files, e.g. "Text/Comma" or "Text/Tab/Line1Keys"
    #[arg(long, value_name = "FORMAT", default_value = "Text/Comma/Line1Keys")]
    format: String,
}

/// JSON shape for a loaded merge source.
#[derive(Serialize)]
struct MergeView<'a> {
    kind: &'a str,
    keys: &'a [String],
    records: &'a [MergeRecord],
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("labelsmith=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let path = Utf8PathBuf::from(&cli.file);
    let json = if path.extension() == Some("lsd") {
        let doc = LabelDoc::load_from_binary(&path)
            .with_context(|| format!("Failed to load {}", path))?;
        serde_json::to_string_pretty(&doc)?
    } else {
        let kind = MergeKind::from_id(&cli.format)
            .ok_or_else(|| anyhow::anyhow!("Unknown merge format: {}", cli.format))?;
        let mut merge = Merge::new(kind);
        merge
            .set_source(&path)
            .with_context(|| format!("Failed to read {}", path))?;
        serde_json::to_string_pretty(&MergeView {
            kind: kind.id(),
            keys: merge.keys(),
            records: merge.records(),
        })?
    };
    println!("{}", json);
    Ok(())
}
