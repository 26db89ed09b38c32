use clap::Parser;
use log::LevelFilter;
use pdf_scan::ScanOptions;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration, from flags or `PDFSCAN_*` environment variables
#[derive(Parser, Debug, Clone)]
#[command(name = "pdf-scan-server", about = "Image to PDF web service", version)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "PDFSCAN_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Directory for transient PDFs, page images and thumbnails
    /// (defaults to a directory under the system temp dir)
    #[arg(long, env = "PDFSCAN_STORAGE_DIR")]
    pub storage_dir: Option<PathBuf>,

    /// JSON file with scan options
    #[arg(long, env = "PDFSCAN_OPTIONS")]
    pub options: Option<PathBuf>,

    /// Override the maximum PDF size in bytes
    #[arg(long, env = "PDFSCAN_MAX_PDF_BYTES")]
    pub max_pdf_bytes: Option<u64>,

    /// Override the page resolution
    #[arg(long, env = "PDFSCAN_DPI")]
    pub dpi: Option<u32>,

    /// Maximum size of an upload request body in bytes
    #[arg(long, env = "PDFSCAN_MAX_UPLOAD_BYTES", default_value = "67108864")]
    pub max_upload_bytes: usize,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "PDFSCAN_LOG_LEVEL", default_value = "info")]
    pub log_level: LevelFilter,
}

impl ServerConfig {
    /// Resolve scan options: file (or defaults), then flag overrides
    pub async fn scan_options(&self) -> pdf_scan::Result<ScanOptions> {
        let mut options = match &self.options {
            Some(path) => ScanOptions::load(path).await?,
            None => ScanOptions::default(),
        };

        if let Some(max_pdf_bytes) = self.max_pdf_bytes {
            options.max_pdf_bytes = max_pdf_bytes;
        }
        if let Some(dpi) = self.dpi {
            options.dpi = dpi;
        }

        options.validate()?;
        Ok(options)
    }
}
