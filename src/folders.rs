//! In-memory folder collection with cascading deletes.
//!
//! Deleting a folder removes every task filed under it. The cascade is
//! computed up front by [`FolderStore::prepare_delete`] and applied in one
//! step by [`FolderStore::commit_delete`], so no caller ever observes a
//! task pointing at a folder that is gone.

use crate::error::{Error, Result};
use crate::tasks::id::generate_unique_id;
use crate::tasks::{Folder, TaskStore};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// A folder removal and the tasks that go with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderCascade {
    /// The folder being removed.
    pub folder: Folder,
    /// Ids of the tasks filed under it.
    pub task_ids: Vec<String>,
}

/// Owned, ordered collection of folders.
#[derive(Debug, Clone, Default)]
pub struct FolderStore {
    folders: Vec<Folder>,
}

fn require_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation("folder name must not be empty".into()));
    }
    Ok(())
}

impl FolderStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { folders: Vec::new() }
    }

    /// All folders, in insertion order.
    #[must_use]
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// Look up a folder by id.
    #[must_use]
    pub fn get_folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Whether a folder with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get_folder(id).is_some()
    }

    /// Replace the whole collection with a snapshot.
    pub fn replace_all(&mut self, folders: Vec<Folder>) {
        self.folders.clear();
        for folder in folders {
            self.commit(folder);
        }
    }

    /// Write a record back, replacing the folder with the same id or
    /// appending a new one.
    pub fn commit(&mut self, folder: Folder) {
        match self.folders.iter_mut().find(|f| f.id == folder.id) {
            Some(slot) => *slot = folder,
            None => self.folders.push(folder),
        }
    }

    fn existing(&self, id: &str) -> Result<&Folder> {
        self.get_folder(id).ok_or_else(|| Error::folder_not_found(id))
    }

    /// Validate `name` and build the new folder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a blank name.
    pub fn prepare_create(&self, name: &str, now: DateTime<Utc>) -> Result<Folder> {
        require_name(name)?;
        let id = generate_unique_id("folder", name, |candidate| self.contains(candidate));
        Ok(Folder {
            id,
            name: name.to_string(),
            created_at: now,
            is_shared: false,
            shared_with: BTreeSet::new(),
        })
    }

    /// Rename a folder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the folder does not exist, or
    /// [`Error::Validation`] for a blank name.
    pub fn prepare_rename(&self, id: &str, name: &str) -> Result<Folder> {
        let current = self.existing(id)?;
        require_name(name)?;
        let mut folder = current.clone();
        folder.name = name.to_string();
        Ok(folder)
    }

    /// Mark a folder shared with `user_ids`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the folder does not exist.
    pub fn prepare_share<I, S>(&self, id: &str, user_ids: I) -> Result<Folder>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut folder = self.existing(id)?.clone();
        folder.is_shared = true;
        folder.shared_with = user_ids.into_iter().map(Into::into).collect();
        Ok(folder)
    }

    /// Work out what deleting a folder removes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the folder does not exist.
    pub fn prepare_delete(&self, id: &str, tasks: &TaskStore) -> Result<FolderCascade> {
        let folder = self.existing(id)?.clone();
        let task_ids = tasks.tasks_in_folder(id).map(|t| t.id.clone()).collect();
        Ok(FolderCascade { folder, task_ids })
    }

    /// Apply a cascade: drop the folder and every task still filed under it.
    ///
    /// Tasks are matched by folder id as well as by the ids recorded in the
    /// cascade, so a task filed under the folder after the cascade was
    /// prepared does not survive as an orphan.
    pub fn commit_delete(&mut self, cascade: &FolderCascade, tasks: &mut TaskStore) {
        let folder_id = cascade.folder.id.as_str();
        self.folders.retain(|f| f.id != folder_id);
        let mut doomed = cascade.task_ids.clone();
        doomed.extend(tasks.tasks_in_folder(folder_id).map(|t| t.id.clone()));
        tasks.remove_many(&doomed);
    }

    /// Create a folder.
    ///
    /// # Errors
    ///
    /// See [`FolderStore::prepare_create`].
    pub fn create_folder(&mut self, name: &str, now: DateTime<Utc>) -> Result<Folder> {
        let folder = self.prepare_create(name, now)?;
        self.commit(folder.clone());
        Ok(folder)
    }

    /// Rename a folder.
    ///
    /// # Errors
    ///
    /// See [`FolderStore::prepare_rename`].
    pub fn rename_folder(&mut self, id: &str, name: &str) -> Result<Folder> {
        let folder = self.prepare_rename(id, name)?;
        self.commit(folder.clone());
        Ok(folder)
    }

    /// Share a folder.
    ///
    /// # Errors
    ///
    /// See [`FolderStore::prepare_share`].
    pub fn share_folder<I, S>(&mut self, id: &str, user_ids: I) -> Result<Folder>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let folder = self.prepare_share(id, user_ids)?;
        self.commit(folder.clone());
        Ok(folder)
    }

    /// Delete a folder and, with it, every task filed under it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the folder does not exist; nothing is
    /// removed in that case.
    pub fn delete_folder(&mut self, id: &str, tasks: &mut TaskStore) -> Result<FolderCascade> {
        let cascade = self.prepare_delete(id, tasks)?;
        self.commit_delete(&cascade, tasks);
        Ok(cascade)
    }
}
