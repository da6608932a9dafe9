use std::path::PathBuf;

use clap::ValueHint;
use meshchunk::{split::DEFAULT_MAX_VERTICES, IndexWidth};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Full => f.write_str("full"),
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,meshchunk=info,pack=info",
        env = "MESHCHUNK_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
    /// Maximum number of vertices in each submesh
    #[arg(short, long, default_value_t = DEFAULT_MAX_VERTICES)]
    pub max_vertices: usize,
    /// Bytes per index in each submesh
    #[arg(short, long, default_value = "2", value_parser = parse_index_width, value_name = "2|4")]
    pub index_width: IndexWidth,
    /// Generate normals for meshes which don't have them
    #[arg(short, long)]
    pub normals: bool,
    /// Also write the split meshes as Wavefront OBJ text
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub obj_out: Option<PathBuf>,
    /// Path of the binary container to write
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub out: PathBuf,
    /// OBJ files to pack
    #[arg(num_args = 1.., required = true, value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
#[error("expected an index width of 2 or 4 bytes, found {0:?}")]
pub struct IndexWidthError(String);

fn parse_index_width(s: &str) -> Result<IndexWidth, IndexWidthError> {
    match s.trim() {
        "2" => Ok(IndexWidth::U16),
        "4" => Ok(IndexWidth::U32),
        other => Err(IndexWidthError(other.to_owned())),
    }
}

/// Set up log output on stderr
pub(crate) fn initialize_tracing(log_filter: &str, log_format: LogFormat) {
    let tsub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::OffsetTime::new(
            time::UtcOffset::current_local_offset().unwrap_or_else(|e| {
                tracing::warn!("couldn't get local time offset: {:?}", e);
                time::UtcOffset::UTC
            }),
            time::macros::format_description!("[hour]:[minute]:[second]"),
        ))
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn index_widths() {
        assert_eq!(parse_index_width("2").unwrap(), IndexWidth::U16);
        assert_eq!(parse_index_width(" 4").unwrap(), IndexWidth::U32);
        assert!(parse_index_width("3").is_err());
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["pack", "--out", "a.bin", "a.obj", "b.obj"]).unwrap();
        assert_eq!(cli.max_vertices, DEFAULT_MAX_VERTICES);
        assert_eq!(cli.index_width, IndexWidth::U16);
        assert!(!cli.normals);
        assert_eq!(cli.obj_out, None);
        assert_eq!(cli.files.len(), 2);
    }

    #[test]
    fn files_are_required() {
        assert!(Cli::try_parse_from(["pack", "--out", "a.bin"]).is_err());
    }
}
