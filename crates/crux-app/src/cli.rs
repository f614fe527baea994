use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Crux: streaming fact-checking assistant.
#[derive(Parser, Debug)]
#[command(name = "crux", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter directive override (e.g. "crux=debug").
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive chat on stdin. Ctrl-C stops the current reply.
    Chat,

    /// Ask a single question and print the streamed answer.
    Ask {
        /// The question.
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Assess a claim's credibility and print the result as JSON.
    Verify {
        /// Claim text.
        #[arg(long)]
        text: Option<String>,

        /// URL of the claim's source.
        #[arg(long)]
        url: Option<String>,

        /// Save the result for this user.
        #[arg(long)]
        user: Option<String>,
    },

    /// Explain in plain words why a claim got its verdict.
    Explain {
        /// Claim text.
        #[arg(long)]
        text: String,

        /// Verdict to explain (VERIFIED, FALSE, MIXED, UNVERIFIED).
        #[arg(long)]
        verdict: String,

        /// Language of the explanation.
        #[arg(long, default_value = "en")]
        lang: String,
    },

    /// Score a claim against evidence you already have and print JSON.
    Score {
        /// Claim text.
        #[arg(long)]
        text: String,

        /// One evidence item; repeat for more.
        #[arg(long = "evidence")]
        evidence: Vec<String>,
    },

    /// Screen claims for crisis keywords and print the report as JSON.
    Crisis {
        /// Claims to screen.
        #[arg(required = true, num_args = 1..)]
        claims: Vec<String>,

        /// Verify each claim first so alerts carry the verdict.
        #[arg(long)]
        verify: bool,
    },

    /// Print the effective configuration as JSON.
    Config,
}

pub fn parse() -> Args {
    Args::parse()
}
