//! CLI command definitions
//!
//! All CLI structs and subcommand enums are defined here.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// corkboard - Kanban boards from the terminal
#[derive(Parser, Debug)]
#[command(name = "corkboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (default: ~/.config/corkboard/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL, overriding config and CORKBOARD_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Account email
    #[arg(short, long, global = true, env = "CORKBOARD_EMAIL")]
    pub email: Option<String>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    // =========================================================================
    // ACCOUNT
    // =========================================================================
    /// Check credentials and show the signed-in user
    Login,

    /// Create an account
    Register {
        /// Full name (prompted if omitted)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show the signed-in user
    Whoami,

    /// Revoke the server-side session
    Logout,

    /// Change the account password
    Passwd,

    // =========================================================================
    // BOARDS
    // =========================================================================
    /// List your boards
    Boards,

    /// Create, rename or delete a board
    #[command(subcommand)]
    Board(BoardCommands),

    /// Show a board with its lists and cards
    Show {
        /// Board id or title
        board: String,
    },

    // =========================================================================
    // LISTS & CARDS
    // =========================================================================
    /// Manage lists on a board
    #[command(subcommand)]
    List(ListCommands),

    /// Manage cards on a board
    #[command(subcommand)]
    Card(CardCommands),
}

#[derive(Subcommand, Debug)]
pub enum BoardCommands {
    /// Create a board
    Create {
        /// Board title
        title: String,
    },

    /// Rename a board
    Rename {
        /// Board id or title
        board: String,
        /// New title
        title: String,
    },

    /// Delete a board with all lists and cards
    Delete {
        /// Board id or title
        board: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
    /// Append a list
    Add {
        /// Board id or title
        board: String,
        /// List title
        title: String,
    },

    /// Rename a list
    Rename {
        /// Board id or title
        board: String,
        /// List id or title
        list: String,
        /// New title
        title: String,
    },

    /// Delete a list and its cards
    Delete {
        /// Board id or title
        board: String,
        /// List id or title
        list: String,
    },

    /// Move a list to another position
    Move {
        /// Board id or title
        board: String,
        /// List id or title
        list: String,
        /// Zero-based destination index
        #[arg(long)]
        to: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum CardCommands {
    /// Append a card to a list
    Add {
        /// Board id or title
        board: String,
        /// List id or title
        list: String,
        /// Card title
        title: String,
        /// Card description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Edit a card's title or description
    Edit {
        /// Board id or title
        board: String,
        /// Card id
        card: String,
        /// New title (kept if omitted)
        #[arg(short, long)]
        title: Option<String>,
        /// New description (kept if omitted)
        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description
        #[arg(long)]
        clear_description: bool,
    },

    /// Delete a card
    Delete {
        /// Board id or title
        board: String,
        /// Card id
        card: String,
    },

    /// Move a card within its list or to another list
    Move {
        /// Board id or title
        board: String,
        /// Card id
        card: String,
        /// Destination list id or title (default: same list)
        #[arg(long)]
        to_list: Option<String>,
        /// Zero-based destination index
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_card_move() {
        let cli = Cli::try_parse_from([
            "corkboard", "--yes", "card", "move", "Sprint", "12", "--to-list", "Done", "--index", "2",
        ])
        .unwrap();

        assert!(cli.yes);
        match cli.command {
            Commands::Card(CardCommands::Move {
                board,
                card,
                to_list,
                index,
            }) => {
                assert_eq!(board, "Sprint");
                assert_eq!(card, "12");
                assert_eq!(to_list.as_deref(), Some("Done"));
                assert_eq!(index, 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_card_edit_clear_description() {
        let cli = Cli::try_parse_from(["corkboard", "card", "edit", "Sprint", "12", "--clear-description"])
            .unwrap();

        match cli.command {
            Commands::Card(CardCommands::Edit {
                description,
                clear_description,
                ..
            }) => {
                assert!(clear_description);
                assert!(description.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let conflicting = Cli::try_parse_from([
            "corkboard", "card", "edit", "Sprint", "12", "-d", "notes", "--clear-description",
        ]);
        assert!(conflicting.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "corkboard", "boards", "--api-url", "http://127.0.0.1:4000", "-c", "/tmp/c.yaml",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://127.0.0.1:4000"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.yaml")));
        assert!(matches!(cli.command, Commands::Boards));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
