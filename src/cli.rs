use clap::Parser;

use crate::core::document::DocumentId;

#[derive(Parser, Debug)]
#[command(name = "codeshare")]
#[command(about = "Share code and plain text through auto-saved documents", long_about = None)]
pub struct Cli {
    /// Document id or share link to open
    #[arg(value_parser = parse_document)]
    pub document: Option<DocumentId>,

    /// Start a new document with a fresh id
    #[arg(short, long, conflicts_with = "document")]
    pub new: bool,

    /// Document store base URL (overrides config and CODESHARE_API_URL)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Base URL for share links (overrides config and CODESHARE_SHARE_URL)
    #[arg(long, value_name = "URL")]
    pub share_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_document(value: &str) -> Result<DocumentId, String> {
    DocumentId::parse(value).map_err(|e| e.to_string())
}

impl Cli {
    /// Document to open on start-up, if any
    pub fn start_document(&self) -> Option<DocumentId> {
        if self.new {
            Some(DocumentId::generate())
        } else {
            self.document.clone()
        }
    }
}
