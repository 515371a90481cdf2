use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::guidance::Platform;

#[derive(Parser, Debug)]
#[command(name = "sharepick", version, about = "Pick a screen or window to share")]
pub struct Args {
    /// Platform family used for permission guidance (detected by default)
    #[arg(long, global = true, value_enum)]
    pub platform: Option<Platform>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the picker and print the selection as JSON (`null` when canceled)
    Pick {
        /// JSON file with the available sources, or `-` for stdin
        #[arg(short, long)]
        sources: PathBuf,

        /// Start with audio capture enabled
        #[arg(short, long)]
        audio: bool,

        /// Initial quality preset (720p, 1080p, 4K, gaming)
        #[arg(short, long)]
        quality: Option<String>,
    },
    /// Show how to grant screen-recording permission on this platform
    Guidance {
        /// Print plain text instead of opening a dialog
        #[arg(long)]
        plain: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pick() {
        let args = Args::parse_from(["sharepick", "pick", "--sources", "-", "--audio", "-q", "4K"]);
        let Command::Pick {
            sources,
            audio,
            quality,
        } = args.command
        else {
            panic!("expected pick");
        };
        assert_eq!(sources, PathBuf::from("-"));
        assert!(audio);
        assert_eq!(quality.as_deref(), Some("4K"));
    }

    #[test]
    fn test_parse_guidance_with_platform() {
        let args = Args::parse_from(["sharepick", "guidance", "--plain", "--platform", "mac"]);
        assert_eq!(args.platform, Some(Platform::Mac));
        assert!(matches!(args.command, Command::Guidance { plain: true }));
    }

    #[test]
    fn test_pick_requires_sources() {
        assert!(Args::try_parse_from(["sharepick", "pick"]).is_err());
    }
}
