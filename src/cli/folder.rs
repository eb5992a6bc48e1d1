//! Folder CLI subcommands.

use clap::Subcommand;

/// Folder management commands.
///
/// Deleting a folder also deletes every task filed under it.
#[derive(Subcommand, Debug, Clone)]
pub enum FolderCommand {
    /// Create a folder.
    Add {
        /// Folder name
        name: String,
    },
    /// Rename a folder.
    Rename {
        /// Folder id
        id: String,
        /// New name
        name: String,
    },
    /// Delete a folder and its tasks.
    Rm {
        /// Folder id
        id: String,
    },
    /// Share a folder with other users.
    Share {
        /// Folder id
        id: String,
        /// User ids to share with
        #[arg(required = true)]
        users: Vec<String>,
    },
    /// List folders with their progress.
    List,
}
