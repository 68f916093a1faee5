//! CLI argument definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use selkit_action::{Capabilities, Context};

/// selkit - Run extension actions on selected text
#[derive(Parser)]
#[command(name = "selkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Extensions directory (overrides the configuration)
    #[arg(long, global = true)]
    pub extensions_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List loaded extensions and their actions
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the actions offered for a text
    Actions {
        /// Selected text
        text: String,

        #[command(flatten)]
        context: ContextArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Resolve a module reference to its canonical file
    Resolve {
        /// Module reference ("./helper", "lib/util", ...)
        reference: String,

        /// Package root
        #[arg(long)]
        package: PathBuf,

        /// File issuing the reference
        #[arg(long)]
        from: Option<PathBuf>,

        /// Shared module repository (overrides the configuration)
        #[arg(long)]
        repository: Option<PathBuf>,
    },

    /// Run one action on a text
    Run {
        /// Extension identifier
        extension: String,

        /// Action identifier
        action: String,

        /// Selected text
        text: String,

        #[command(flatten)]
        context: ContextArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Environment the text was selected in.
#[derive(Args, Debug, Clone, Default)]
pub struct ContextArgs {
    /// Bundle identifier of the foreground app
    #[arg(long)]
    pub app: Option<String>,

    /// Display name of the foreground app (defaults to the bundle identifier)
    #[arg(long, requires = "app")]
    pub app_name: Option<String>,

    /// The target accepts pasting
    #[arg(long)]
    pub paste: bool,

    /// The selection can be cut
    #[arg(long)]
    pub cut: bool,

    /// The selection cannot be copied
    #[arg(long)]
    pub no_copy: bool,

    /// The target accepts formatted text
    #[arg(long)]
    pub formatting: bool,

    /// URL of the browser page showing the selection
    #[arg(long)]
    pub page_url: Option<String>,
}

impl ContextArgs {
    pub fn to_context(&self) -> Context {
        let mut context = Context::default().with_capabilities(Capabilities {
            formatting: self.formatting,
            paste: self.paste,
            copy: !self.no_copy,
            cut: self.cut,
        });
        if let Some(app) = &self.app {
            let name = self.app_name.as_ref().unwrap_or(app);
            context = context.with_app(name.clone(), app.clone());
        }
        if let Some(url) = &self.page_url {
            context = context.with_browser(url.clone(), String::new());
        }
        context
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
