use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rolegate_core::models::HttpMethod;

#[derive(Parser, Debug)]
#[command(name = "rolegate", version, about = "Inspect and test permission route rules")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the version.
    Version,

    /// Parse a path specification and print its rules as JSON.
    Parse(RuleSource),

    /// Rewrite a path specification in canonical form.
    ///
    /// Method tokens are trimmed and upper-cased and bare paths spell out the
    /// default methods, so the output parses the same without them.
    Normalize(RuleSource),

    /// Render a path specification as badge markup.
    Render {
        #[command(flatten)]
        source: RuleSource,

        /// Admin route prefix shown in front of every path.
        #[arg(long, default_value = "")]
        prefix: String,
    },

    /// Check a request against a path specification.
    ///
    /// Prints `allow` or `deny`; exits with status 2 on `deny`.
    Check {
        #[command(flatten)]
        source: RuleSource,

        /// Request method.
        #[arg(long)]
        method: String,

        /// Request path.
        #[arg(long)]
        path: String,

        /// Admin route prefix the rule paths are relative to.
        #[arg(long, default_value = "")]
        prefix: String,
    },
}

/// Where the path specification comes from.
#[derive(Args, Debug)]
pub struct RuleSource {
    /// File holding the path specification, one rule per line (`-` for stdin).
    pub file: PathBuf,

    /// Methods for bare path lines, comma-separated. Empty means any method.
    #[arg(long, value_delimiter = ',')]
    pub default_methods: Vec<HttpMethod>,
}
